//! Attendance records and the small value types used to filter and classify them.

use chrono::{Datelike, Duration, NaiveDate};

use crate::entities::{daily_summary, employee_attendance, weekly_summary};
use crate::error::{AppError, Result};

/// Aggregate attendance counts for one calendar day.
pub type DailySummary = daily_summary::Model;

/// Aggregate attendance counts for one week.
pub type WeeklySummary = weekly_summary::Model;

/// One employee's attendance on one day.
pub type EmployeeRecord = employee_attendance::Model;

/// Bucketed check-in timeliness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeCategory {
    Early,
    OnTime,
    Acceptable,
    Late,
}

impl TimeCategory {
    /// All categories in display order.
    pub const ALL: [TimeCategory; 4] = [
        TimeCategory::Early,
        TimeCategory::OnTime,
        TimeCategory::Acceptable,
        TimeCategory::Late,
    ];

    /// Parse the label stored in `time_category`. Case and separators are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "early" => Some(TimeCategory::Early),
            "ontime" => Some(TimeCategory::OnTime),
            "acceptable" => Some(TimeCategory::Acceptable),
            "late" => Some(TimeCategory::Late),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeCategory::Early => "Early",
            TimeCategory::OnTime => "On-time",
            TimeCategory::Acceptable => "Acceptable",
            TimeCategory::Late => "Late",
        }
    }

    /// Early and on-time arrivals both count as on time.
    pub fn is_on_time(&self) -> bool {
        matches!(self, TimeCategory::Early | TimeCategory::OnTime)
    }
}

/// Day status of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Leave,
    Absent,
    Other,
}

impl AttendanceStatus {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "present" => AttendanceStatus::Present,
            "leave" | "on leave" => AttendanceStatus::Leave,
            "absent" => AttendanceStatus::Absent,
            _ => AttendanceStatus::Other,
        }
    }
}

impl EmployeeRecord {
    pub fn attendance_status(&self) -> AttendanceStatus {
        AttendanceStatus::from_label(&self.status)
    }

    pub fn is_present(&self) -> bool {
        self.attendance_status() == AttendanceStatus::Present
    }

    pub fn category(&self) -> Option<TimeCategory> {
        self.time_category.as_deref().and_then(TimeCategory::from_label)
    }
}

impl DailySummary {
    /// Count for one timeliness bucket.
    pub fn count_for(&self, category: TimeCategory) -> i32 {
        match category {
            TimeCategory::Early => self.early_count,
            TimeCategory::OnTime => self.ontime_count,
            TimeCategory::Acceptable => self.acceptable_count,
            TimeCategory::Late => self.late_count,
        }
    }
}

/// Inclusive date window used by every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AppError::validation(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending at `today`, inclusive.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days.max(1) - 1),
            end: today,
        }
    }

    /// Monday through Sunday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// First through last day of a calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation(format!("invalid month {year}-{month:02}")))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::validation(format!("invalid month {year}-{month:02}")))?;

        Ok(Self {
            start,
            end: next - Duration::days(1),
        })
    }

    /// First of the month containing `today` through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Filter for per-employee record queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub range: DateRange,
    /// Restrict to one employee.
    pub emp_code: Option<String>,
}

impl RecordQuery {
    /// All employees over a date range.
    pub fn range(range: DateRange) -> Self {
        Self {
            range,
            emp_code: None,
        }
    }

    /// One employee over a date range.
    pub fn employee(range: DateRange, emp_code: impl Into<String>) -> Self {
        Self {
            range,
            emp_code: Some(emp_code.into()),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_category_labels() {
        assert_eq!(TimeCategory::from_label("On-time"), Some(TimeCategory::OnTime));
        assert_eq!(TimeCategory::from_label("on time"), Some(TimeCategory::OnTime));
        assert_eq!(TimeCategory::from_label("ONTIME"), Some(TimeCategory::OnTime));
        assert_eq!(TimeCategory::from_label("Early"), Some(TimeCategory::Early));
        assert_eq!(TimeCategory::from_label("Late"), Some(TimeCategory::Late));
        assert_eq!(TimeCategory::from_label(""), None);

        for category in TimeCategory::ALL {
            assert_eq!(TimeCategory::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_on_time_buckets() {
        assert!(TimeCategory::Early.is_on_time());
        assert!(TimeCategory::OnTime.is_on_time());
        assert!(!TimeCategory::Acceptable.is_on_time());
        assert!(!TimeCategory::Late.is_on_time());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(AttendanceStatus::from_label("Present"), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::from_label(" present "), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::from_label("Leave"), AttendanceStatus::Leave);
        assert_eq!(AttendanceStatus::from_label("Holiday"), AttendanceStatus::Other);
    }

    #[test]
    fn test_range_rejects_reversed() {
        assert!(DateRange::new(date(2025, 1, 10), date(2025, 1, 9)).is_err());
        assert!(DateRange::new(date(2025, 1, 10), date(2025, 1, 10)).is_ok());
    }

    #[test]
    fn test_last_days_is_inclusive() {
        let range = DateRange::last_days(date(2025, 1, 31), 7);
        assert_eq!(range.start, date(2025, 1, 25));
        assert_eq!(range.days(), 7);
    }

    #[test]
    fn test_week_of() {
        // 2025-01-08 is a Wednesday
        let range = DateRange::week_of(date(2025, 1, 8));
        assert_eq!(range.start, date(2025, 1, 6));
        assert_eq!(range.end, date(2025, 1, 12));
    }

    #[test]
    fn test_month_bounds() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end, date(2024, 2, 29));

        let dec = DateRange::month(2025, 12).unwrap();
        assert_eq!(dec.start, date(2025, 12, 1));
        assert_eq!(dec.end, date(2025, 12, 31));

        assert!(DateRange::month(2025, 13).is_err());
    }

}
