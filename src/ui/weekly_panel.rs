//! Weekly reports panel.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_ARROW_DOWN};

use super::app::App;
use super::components::{colors, empty_state, panel_header, primary_button_with_icon, styled_button_with_icon};
use crate::export::ExportTable;
use crate::format::format_rate;
use crate::models::WeeklySummary;

/// Show the weekly reports panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Weekly Reports", "Perfect attendance per week");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, ARROWS_CLOCKWISE, "Load", !app.weekly.loading()).clicked() {
            app.load_weekly();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_ARROW_DOWN, "Export Weeks", !app.weekly.weeks.is_empty()).clicked() {
            app.export(ExportTable::weekly(&app.weekly.weeks));
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_ARROW_DOWN, "Export Details", !app.weekly.details.is_empty()).clicked() {
            app.export(ExportTable::weekly_details(&app.weekly.details));
        }

        ui.add_space(20.0);
        ui.label(format!("Last {} weeks", app.weekly.weeks.len()));
    });

    ui.add_space(15.0);

    if let Some(week) = show_weeks_table(app, ui) {
        app.select_week(&week);
    }

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    show_details_table(app, ui);
}

/// Returns the week the user picked, if any.
fn show_weeks_table(app: &App, ui: &mut Ui) -> Option<WeeklySummary> {
    if app.weekly.weeks.is_empty() {
        empty_state(ui, app.weekly.loading(), "No weekly summaries yet.");
        return None;
    }

    let mut picked = None;
    ScrollArea::vertical()
        .id_salt("weekly_scroll")
        .max_height(260.0)
        .show(ui, |ui| {
            egui::Grid::new("weekly_summary_grid")
                .num_columns(5)
                .striped(true)
                .min_col_width(90.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Week");
                    ui.strong("Employees");
                    ui.strong("Perfect Attendance");
                    ui.strong("Rate");
                    ui.strong("");
                    ui.end_row();

                    for week in &app.weekly.weeks {
                        let selected = app.weekly.selected_week == Some(week.week_start);
                        let label = format!(
                            "{} - {}",
                            week.week_start.format("%Y-%m-%d"),
                            week.week_end.format("%Y-%m-%d")
                        );
                        if ui.selectable_label(selected, label).clicked() && !selected {
                            picked = Some(week.clone());
                        }
                        ui.label(week.total_employees.to_string());
                        ui.label(week.perfect_attendance_count.to_string());
                        ui.label(format_rate(week.perfect_attendance_rate));
                        if ui.small_button("Details").clicked() {
                            picked = Some(week.clone());
                        }
                        ui.end_row();
                    }
                });
        });

    picked
}

fn show_details_table(app: &App, ui: &mut Ui) {
    let Some(week) = app.weekly.selected() else {
        empty_state(ui, false, "Select a week to see per-employee attendance.");
        return;
    };

    ui.label(RichText::new(format!("Week of {}", week.week_start.format("%Y-%m-%d"))).strong());
    ui.add_space(6.0);

    if app.weekly.details.is_empty() {
        empty_state(ui, app.weekly.loading_details(), "No employee records for this week.");
        return;
    }

    ScrollArea::both().id_salt("weekly_details_scroll").show(ui, |ui| {
        egui::Grid::new("weekly_details_grid")
            .num_columns(9)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Days");
                ui.strong("Present");
                ui.strong("Leave");
                ui.strong("Hours");
                ui.strong("On-time");
                ui.strong("Late");
                ui.strong("Attendance");
                ui.end_row();

                for summary in &app.weekly.details {
                    ui.label(&summary.emp_code);
                    ui.label(&summary.name);
                    ui.label(summary.total_days.to_string());
                    ui.label(summary.present_days.to_string());
                    ui.label(summary.leave_days.to_string());
                    ui.label(format!("{:.1}", summary.total_hours));
                    ui.label(summary.ontime_days.to_string());
                    ui.colored_label(
                        if summary.late_days > 0 { colors::ERROR } else { colors::NEUTRAL },
                        summary.late_days.to_string(),
                    );
                    ui.label(format_rate(summary.attendance_rate));
                    ui.end_row();
                }
            });
    });
}
