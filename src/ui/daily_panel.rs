//! Daily summary panel.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_ARROW_DOWN};

use super::app::App;
use super::components::{
    colors, date_range_picker, empty_state, panel_header, primary_button_with_icon, stat_card, styled_button_with_icon,
};
use crate::aggregate::latest_daily;
use crate::export::ExportTable;
use crate::format::{format_long_date, format_rate, format_time};

/// Show the daily summary panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Daily Summary", "Attendance counts per day");

    let today = app.today;
    if date_range_picker(ui, "daily_range", &mut app.daily.range, today) {
        app.load_daily();
    }

    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, ARROWS_CLOCKWISE, "Load", !app.daily.loading()).clicked() {
            app.load_daily();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_ARROW_DOWN, "Export", !app.daily.rows.is_empty()).clicked() {
            app.export(ExportTable::daily(&app.daily.rows));
        }

        ui.add_space(20.0);
        ui.label(format!("{} days in {}", app.daily.rows.len(), app.daily.range));
    });

    ui.add_space(15.0);

    show_latest_cards(app, ui);

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    show_daily_table(app, ui);
}

fn show_latest_cards(app: &App, ui: &mut Ui) {
    let Some(latest) = latest_daily(&app.daily.rows) else {
        return;
    };

    ui.label(RichText::new(format_long_date(latest.date)).strong());
    ui.add_space(6.0);

    ui.horizontal_wrapped(|ui| {
        stat_card(
            ui,
            "Present",
            &latest.total_employees_present.to_string(),
            "employees checked in",
            colors::ACCENT,
        );
        stat_card(
            ui,
            "On-time Rate",
            &format_rate(latest.ontime_rate),
            &format!("{} early, {} on time", latest.early_count, latest.ontime_count),
            colors::SUCCESS,
        );
        stat_card(
            ui,
            "Acceptable",
            &latest.acceptable_count.to_string(),
            "within grace period",
            colors::WARNING,
        );
        stat_card(ui, "Late", &latest.late_count.to_string(), "after grace period", colors::ERROR);
        stat_card(
            ui,
            "Check-ins",
            &format_time(latest.earliest_checkin),
            &format!("latest {}", format_time(latest.latest_checkin)),
            colors::NEUTRAL,
        );
    });
}

fn show_daily_table(app: &App, ui: &mut Ui) {
    if app.daily.rows.is_empty() {
        empty_state(ui, app.daily.loading(), "No daily summaries in this range.");
        return;
    }

    ScrollArea::both().show(ui, |ui| {
        egui::Grid::new("daily_summary_grid")
            .num_columns(9)
            .striped(true)
            .min_col_width(70.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Present");
                ui.strong("Early");
                ui.strong("On-time");
                ui.strong("Acceptable");
                ui.strong("Late");
                ui.strong("On-time Rate");
                ui.strong("Earliest");
                ui.strong("Latest");
                ui.end_row();

                for day in &app.daily.rows {
                    ui.label(day.date.format("%Y-%m-%d").to_string());
                    ui.label(day.total_employees_present.to_string());
                    ui.label(day.early_count.to_string());
                    ui.label(day.ontime_count.to_string());
                    ui.label(day.acceptable_count.to_string());
                    ui.colored_label(
                        if day.late_count > 0 { colors::ERROR } else { colors::NEUTRAL },
                        day.late_count.to_string(),
                    );
                    ui.label(format_rate(day.ontime_rate));
                    ui.label(format_time(day.earliest_checkin));
                    ui.label(format_time(day.latest_checkin));
                    ui.end_row();
                }
            });
    });
}
