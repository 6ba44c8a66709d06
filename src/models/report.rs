//! Report-level aggregates built from daily summaries.

/// Attendance overview of a month, built from its daily summaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyOverview {
    /// Days with a summary row.
    pub days_reported: u32,
    pub average_present: f64,
    /// Mean of the daily on-time rates, in percent.
    pub average_ontime_rate: f64,
    pub early_total: i64,
    pub ontime_total: i64,
    pub acceptable_total: i64,
    pub late_total: i64,
}
