//! Shared UI components.

use chrono::NaiveDate;
use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::models::{AttendanceStatus, DateRange};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const ACCENT: Color32 = Color32::from_rgb(68, 114, 196);
}

/// Render a tab header with title and subtitle.
pub fn panel_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.label(RichText::new(subtitle).weak());
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Plain button with consistent padding.
pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(0.0, 28.0)))
}

/// Plain button with a leading icon, disabled while `enabled` is false.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str, enabled: bool) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)).min_size(egui::vec2(0.0, 28.0)),
    )
}

/// Accent-filled button with a leading icon, disabled while `enabled` is false.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str, enabled: bool) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(
            RichText::new(format!("{icon} {text}"))
                .size(14.0)
                .color(Color32::WHITE),
        )
        .fill(colors::ACCENT)
        .min_size(egui::vec2(0.0, 28.0)),
    )
}

/// Render a summary card with a big value.
pub fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str, accent: Color32) {
    egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(14))
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .show(ui, |ui| {
            ui.set_width(150.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(title).size(12.0).weak());
                ui.label(RichText::new(value).size(26.0).strong().color(accent));
                ui.label(RichText::new(subtitle).size(11.0).weak());
            });
        });
}

/// Dismissible message banner. Returns `true` when dismissed.
pub fn banner(ui: &mut Ui, message: &str, is_error: bool) -> bool {
    let (fill, text) = if is_error {
        (Color32::from_rgb(90, 30, 30), colors::ERROR)
    } else {
        (Color32::from_rgb(30, 70, 35), colors::SUCCESS)
    };

    let mut dismissed = false;
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(text, message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    ui.add_space(8.0);
    dismissed
}

/// Placeholder row for an empty table.
pub fn empty_state(ui: &mut Ui, loading: bool, hint: &str) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        if loading {
            ui.spinner();
            ui.label("Loading...");
        } else {
            ui.label(RichText::new(hint).weak());
        }
    });
}

/// From/To date pickers plus quick range buttons.
///
/// Returns `true` if the range changed.
pub fn date_range_picker(ui: &mut Ui, id: &str, range: &mut DateRange, today: NaiveDate) -> bool {
    let before = *range;

    ui.horizontal(|ui| {
        ui.label("From:");
        ui.add(DatePickerButton::new(&mut range.start).id_salt(&format!("{id}_start")));
        ui.label("To:");
        ui.add(DatePickerButton::new(&mut range.end).id_salt(&format!("{id}_end")));

        ui.add_space(20.0);

        if styled_button(ui, "Last 7 Days").clicked() {
            *range = DateRange::last_days(today, 7);
        }
        if styled_button(ui, "Last 30 Days").clicked() {
            *range = DateRange::last_days(today, 30);
        }
        if styled_button(ui, "This Month").clicked() {
            *range = DateRange::month_to_date(today);
        }
    });

    // Keep the range ordered when the user picks an end before the start
    if range.end < range.start {
        if range.start != before.start {
            range.end = range.start;
        } else {
            range.start = range.end;
        }
    }

    *range != before
}

/// Color for a time category label.
pub fn category_color(label: Option<&str>) -> Color32 {
    use crate::models::TimeCategory;

    match label.and_then(TimeCategory::from_label) {
        Some(TimeCategory::Early) | Some(TimeCategory::OnTime) => colors::SUCCESS,
        Some(TimeCategory::Acceptable) => colors::WARNING,
        Some(TimeCategory::Late) => colors::ERROR,
        None => colors::NEUTRAL,
    }
}

/// Color for a day status label.
pub fn status_color(label: &str) -> Color32 {
    match AttendanceStatus::from_label(label) {
        AttendanceStatus::Present => colors::SUCCESS,
        AttendanceStatus::Leave => colors::WARNING,
        AttendanceStatus::Absent => colors::ERROR,
        AttendanceStatus::Other => colors::NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color("Present"), colors::SUCCESS);
        assert_eq!(status_color(" on leave "), colors::WARNING);
        assert_eq!(status_color("ABSENT"), colors::ERROR);
        assert_eq!(status_color("Holiday"), colors::NEUTRAL);
    }

    #[test]
    fn test_category_color() {
        assert_eq!(category_color(Some("Late")), colors::ERROR);
        assert_eq!(category_color(None), colors::NEUTRAL);
    }
}
