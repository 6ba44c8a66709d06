//! Monthly reports panel.

use chrono::NaiveDate;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CARET_LEFT, CARET_RIGHT, FILE_ARROW_DOWN};

use super::app::App;
use super::components::{
    category_color, colors, empty_state, panel_header, primary_button_with_icon, stat_card, status_color,
    styled_button_with_icon,
};
use crate::export::ExportTable;
use crate::format::{format_hours, format_rate, format_time};

/// Show the monthly reports panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Monthly Reports", "Attendance over one calendar month");

    let mut changed = false;

    ui.horizontal(|ui| {
        if ui.button(CARET_LEFT).on_hover_text("Previous month").clicked() {
            app.monthly.shift(-1);
            changed = true;
        }

        let title = NaiveDate::from_ymd_opt(app.monthly.year, app.monthly.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default();
        ui.label(RichText::new(title).size(16.0).strong());

        if ui.button(CARET_RIGHT).on_hover_text("Next month").clicked() {
            app.monthly.shift(1);
            changed = true;
        }

        ui.add_space(20.0);

        ui.label("Employee:");
        let selected_text = app
            .monthly
            .emp_code
            .as_deref()
            .map(|code| {
                app.monthly
                    .employee_options
                    .iter()
                    .find(|e| e.emp_code == code)
                    .map(|e| format!("{} {}", e.emp_code, e.name))
                    .unwrap_or_else(|| code.to_string())
            })
            .unwrap_or_else(|| "All Employees".to_string());

        egui::ComboBox::from_id_salt("monthly_employee_filter")
            .width(220.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(app.monthly.emp_code.is_none(), "All Employees")
                    .clicked()
                    && app.monthly.emp_code.is_some()
                {
                    app.monthly.emp_code = None;
                    changed = true;
                }
                for employee in &app.monthly.employee_options {
                    let selected = app.monthly.emp_code.as_deref() == Some(employee.emp_code.as_str());
                    if ui
                        .selectable_label(selected, format!("{} {}", employee.emp_code, employee.name))
                        .clicked()
                        && !selected
                    {
                        app.monthly.emp_code = Some(employee.emp_code.clone());
                        changed = true;
                    }
                }
            });

        ui.add_space(20.0);

        if primary_button_with_icon(ui, ARROWS_CLOCKWISE, "Load", !app.monthly.loading()).clicked() {
            changed = true;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_ARROW_DOWN, "Export", !app.monthly.records.is_empty()).clicked() {
            app.export(ExportTable::monthly(&app.monthly.records));
        }
    });

    if changed {
        app.load_monthly();
    }

    ui.add_space(15.0);

    show_overview(app, ui);

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    if app.monthly.summaries.is_empty() {
        empty_state(ui, app.monthly.loading(), "Pick a month and click Load.");
        return;
    }

    ScrollArea::vertical().id_salt("monthly_scroll").show(ui, |ui| {
        ui.label(RichText::new("Per employee").strong());
        ui.add_space(6.0);
        show_summary_table(app, ui);

        ui.add_space(15.0);
        ui.label(RichText::new(format!("Records ({})", app.monthly.records.len())).strong());
        ui.add_space(6.0);
        show_record_table(app, ui);
    });
}

fn show_overview(app: &App, ui: &mut Ui) {
    let overview = &app.monthly.overview;
    if overview.days_reported == 0 {
        return;
    }

    ui.horizontal_wrapped(|ui| {
        stat_card(
            ui,
            "Days Reported",
            &overview.days_reported.to_string(),
            "with a daily summary",
            colors::ACCENT,
        );
        stat_card(
            ui,
            "Avg Present",
            &format!("{:.1}", overview.average_present),
            "employees per day",
            colors::ACCENT,
        );
        stat_card(
            ui,
            "Avg On-time Rate",
            &format_rate(overview.average_ontime_rate),
            &format!("{} early, {} on time", overview.early_total, overview.ontime_total),
            colors::SUCCESS,
        );
        stat_card(
            ui,
            "Acceptable",
            &overview.acceptable_total.to_string(),
            "check-ins this month",
            colors::WARNING,
        );
        stat_card(
            ui,
            "Late",
            &overview.late_total.to_string(),
            "check-ins this month",
            colors::ERROR,
        );
    });
}

fn show_summary_table(app: &App, ui: &mut Ui) {
    egui::Grid::new("monthly_summary_grid")
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

            for summary in &app.monthly.summaries {
                ui.label(&summary.emp_code);
                ui.label(&summary.name);
                ui.label(summary.total_days.to_string());
                ui.label(summary.present_days.to_string());
                ui.label(summary.leave_days.to_string());
                ui.label(format!("{:.1}", summary.total_hours));
                ui.label(summary.ontime_days.to_string());
                ui.label(summary.late_days.to_string());
                ui.label(format_rate(summary.attendance_rate));
                ui.end_row();
            }
        });
}

fn show_record_table(app: &App, ui: &mut Ui) {
    egui::Grid::new("monthly_records_grid")
        .num_columns(8)
        .striped(true)
        .min_col_width(60.0)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.strong("Date");
            ui.strong("Code");
            ui.strong("Name");
            ui.strong("Check In");
            ui.strong("Check Out");
            ui.strong("Hours");
            ui.strong("Status");
            ui.strong("Category");
            ui.end_row();

            for record in &app.monthly.records {
                ui.label(record.date.format("%Y-%m-%d").to_string());
                ui.label(&record.emp_code);
                ui.label(&record.name);
                ui.label(format_time(record.check_in));
                ui.label(format_time(record.check_out));
                ui.label(format_hours(record.work_hours));
                ui.colored_label(status_color(&record.status), &record.status);
                ui.colored_label(
                    category_color(record.time_category.as_deref()),
                    record.time_category.as_deref().unwrap_or("-"),
                );
                ui.end_row();
            }
        });
}
