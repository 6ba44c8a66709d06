//! Employee details panel: searchable employee list and per-employee records.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_ARROW_DOWN, MAGNIFYING_GLASS, USER};

use super::app::App;
use super::components::{
    category_color, colors, date_range_picker, empty_state, panel_header, primary_button_with_icon, stat_card,
    status_color, styled_button_with_icon,
};
use crate::aggregate::summarize_by_employee;
use crate::export::ExportTable;
use crate::format::{format_hours, format_rate, format_time};

/// Show the employee details panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Employee Details", "Daily records of one employee");

    let today = app.today;
    if date_range_picker(ui, "employee_range", &mut app.employees.range, today) {
        app.load_employees();
        app.load_employee_records();
    }

    ui.add_space(10.0);

    egui::SidePanel::left("employee_list")
        .resizable(true)
        .default_width(260.0)
        .show_inside(ui, |ui| show_employee_list(app, ui));

    egui::CentralPanel::default().show_inside(ui, |ui| show_records(app, ui));
}

fn show_employee_list(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(MAGNIFYING_GLASS);
        ui.add(
            egui::TextEdit::singleline(&mut app.employees.search)
                .hint_text("Code or name")
                .desired_width(170.0),
        );
        if ui
            .add_enabled(!app.employees.loading_list(), egui::Button::new(ARROWS_CLOCKWISE))
            .on_hover_text("Reload employees")
            .clicked()
        {
            app.load_employees();
        }
    });

    ui.add_space(6.0);

    if app.employees.employees.is_empty() {
        empty_state(ui, app.employees.loading_list(), "No employees in this range.");
        return;
    }

    let mut clicked = None;
    ScrollArea::vertical().id_salt("employee_list_scroll").show(ui, |ui| {
        for employee in app.employees.filtered() {
            let selected = app.employees.selected.as_deref() == Some(employee.emp_code.as_str());
            let text = format!("{} {}", employee.emp_code, employee.name);
            if ui.selectable_label(selected, text).clicked() && !selected {
                clicked = Some(employee.emp_code.clone());
            }
        }
    });

    if let Some(emp_code) = clicked {
        app.select_employee(emp_code);
    }
}

fn show_records(app: &mut App, ui: &mut Ui) {
    let Some(employee) = app.employees.selected_employee().cloned() else {
        empty_state(ui, false, "Select an employee to see their records.");
        return;
    };

    ui.horizontal(|ui| {
        ui.heading(format!("{USER} {}", employee.name));
        ui.label(RichText::new(&employee.emp_code).weak());
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let loading = app.employees.loading_records();
        if primary_button_with_icon(ui, ARROWS_CLOCKWISE, "Load", !loading).clicked() {
            app.load_employee_records();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_ARROW_DOWN, "Export", !app.employees.records.is_empty()).clicked() {
            app.export(ExportTable::employee(&app.employees.records));
        }
    });

    ui.add_space(10.0);

    if let Some(summary) = summarize_by_employee(&app.employees.records).into_iter().next() {
        ui.horizontal_wrapped(|ui| {
            stat_card(
                ui,
                "Present",
                &format!("{} / {}", summary.present_days, summary.total_days),
                &format!("{} days leave", summary.leave_days),
                colors::ACCENT,
            );
            stat_card(
                ui,
                "Attendance",
                &format_rate(summary.attendance_rate),
                "of recorded days",
                colors::SUCCESS,
            );
            stat_card(
                ui,
                "On time",
                &summary.ontime_days.to_string(),
                &format!("{} late", summary.late_days),
                colors::WARNING,
            );
            stat_card(ui, "Hours", &format!("{:.1}", summary.total_hours), "worked", colors::NEUTRAL);
        });
        ui.add_space(10.0);
    }

    if app.employees.records.is_empty() {
        empty_state(ui, app.employees.loading_records(), "No records in this range.");
        return;
    }

    ScrollArea::both().id_salt("employee_records_scroll").show(ui, |ui| {
        egui::Grid::new("employee_records_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(70.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Check In");
                ui.strong("Check Out");
                ui.strong("Hours");
                ui.strong("Punches");
                ui.strong("Status");
                ui.strong("Category");
                ui.end_row();

                for record in &app.employees.records {
                    ui.label(record.date.format("%Y-%m-%d").to_string());
                    ui.label(format_time(record.check_in));
                    ui.label(format_time(record.check_out));
                    ui.label(format_hours(record.work_hours));
                    ui.label(record.total_punches.to_string());
                    ui.colored_label(status_color(&record.status), &record.status);
                    ui.colored_label(
                        category_color(record.time_category.as_deref()),
                        record.time_category.as_deref().unwrap_or("-"),
                    );
                    ui.end_row();
                }
            });
    });
}
