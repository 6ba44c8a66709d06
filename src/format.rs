//! Display formatting for dates, times and figures.

use chrono::{NaiveDate, NaiveTime};

/// Round half-up at the tenths place.
pub fn round_tenths(value: f64) -> f64 {
    // Small epsilon absorbs representation error, e.g. 0.15 * 10 = 1.4999999999999998
    (value * 10.0 + 0.5 + 1e-9).floor() / 10.0
}

/// `HH:MM`, or `-` when missing.
pub fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Hours with one decimal, or `-` when missing.
pub fn format_hours(hours: Option<f64>) -> String {
    hours
        .map(|h| format!("{:.1}", round_tenths(h)))
        .unwrap_or_else(|| "-".to_string())
}

/// Percentage with one decimal, e.g. `75.5%`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", round_tenths(rate))
}

/// Long date for card headings, e.g. `Mon, 06 Jan 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y").to_string()
}

/// Parse date from multiple formats: "2000-1-1", "2000/1/1", "2000 1 1", "2000.1.1"
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 3 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a month as "2025-01" or "2025/1".
pub fn parse_month(input: &str) -> Option<(i32, u32)> {
    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 2 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}
