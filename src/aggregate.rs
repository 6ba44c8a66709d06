//! Client-side reductions over fetched attendance rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::format::round_tenths;
use crate::models::{DailySummary, Employee, EmployeeRecord, EmployeeSummary, MonthlyOverview, TimeCategory};

#[derive(Default)]
struct EmployeeTally<'a> {
    name: &'a str,
    name_date: Option<NaiveDate>,
    total_days: u32,
    present_days: u32,
    hours: f64,
    ontime_days: u32,
    late_days: u32,
}

impl<'a> EmployeeTally<'a> {
    /// Keep the name of the newest record. Equal dates keep the first seen.
    fn offer_name(&mut self, name: &'a str, date: NaiveDate) {
        if self.name_date.is_none_or(|seen| date > seen) {
            self.name = name;
            self.name_date = Some(date);
        }
    }
}

/// Group daily records by `emp_code` and tally each employee.
///
/// Output is sorted by employee code.
pub fn summarize_by_employee(records: &[EmployeeRecord]) -> Vec<EmployeeSummary> {
    let mut tallies: BTreeMap<&str, EmployeeTally> = BTreeMap::new();

    for record in records {
        let tally = tallies.entry(record.emp_code.as_str()).or_default();
        tally.offer_name(&record.name, record.date);
        tally.total_days += 1;

        if !record.is_present() {
            continue;
        }

        tally.present_days += 1;
        tally.hours += record.work_hours.unwrap_or(0.0);

        match record.category() {
            Some(category) if category.is_on_time() => tally.ontime_days += 1,
            Some(TimeCategory::Late) => tally.late_days += 1,
            _ => {}
        }
    }

    tallies
        .into_iter()
        .map(|(code, tally)| {
            let attendance_rate = if tally.total_days == 0 {
                0.0
            } else {
                round_tenths(tally.present_days as f64 / tally.total_days as f64 * 100.0)
            };

            EmployeeSummary {
                emp_code: code.to_string(),
                name: tally.name.to_string(),
                total_days: tally.total_days,
                present_days: tally.present_days,
                leave_days: tally.total_days - tally.present_days,
                total_hours: round_tenths(tally.hours),
                ontime_days: tally.ontime_days,
                late_days: tally.late_days,
                attendance_rate,
            }
        })
        .collect()
}

/// One entry per distinct `emp_code`, named after its most recent record.
pub fn unique_employees(records: &[EmployeeRecord]) -> Vec<Employee> {
    let mut seen: BTreeMap<&str, EmployeeTally> = BTreeMap::new();

    for record in records {
        seen.entry(record.emp_code.as_str())
            .or_default()
            .offer_name(&record.name, record.date);
    }

    seen.into_iter()
        .map(|(code, tally)| Employee {
            emp_code: code.to_string(),
            name: tally.name.to_string(),
        })
        .collect()
}

/// Totals and averages over a month of daily summaries.
pub fn monthly_overview(dailies: &[DailySummary]) -> MonthlyOverview {
    if dailies.is_empty() {
        return MonthlyOverview::default();
    }

    let days = dailies.len() as f64;
    let present: i64 = dailies.iter().map(|d| d.total_employees_present as i64).sum();
    let rate: f64 = dailies.iter().map(|d| d.ontime_rate).sum();
    let total_for =
        |category: TimeCategory| -> i64 { dailies.iter().map(|d| d.count_for(category) as i64).sum() };

    MonthlyOverview {
        days_reported: dailies.len() as u32,
        average_present: round_tenths(present as f64 / days),
        average_ontime_rate: round_tenths(rate / days),
        early_total: total_for(TimeCategory::Early),
        ontime_total: total_for(TimeCategory::OnTime),
        acceptable_total: total_for(TimeCategory::Acceptable),
        late_total: total_for(TimeCategory::Late),
    }
}

/// Newest daily summary, used for the summary cards.
pub fn latest_daily(dailies: &[DailySummary]) -> Option<&DailySummary> {
    dailies.iter().max_by_key(|d| d.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn record(code: &str, name: &str, day: u32, status: &str, hours: Option<f64>, category: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            emp_code: code.to_string(),
            date: date(day),
            name: name.to_string(),
            check_in: NaiveTime::from_hms_opt(8, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 0, 0),
            work_hours: hours,
            status: status.to_string(),
            time_category: category.map(str::to_string),
            total_punches: 2,
        }
    }

    fn daily(day: u32, present: i32, rate: f64) -> DailySummary {
        DailySummary {
            date: date(day),
            total_employees_present: present,
            early_count: 5,
            ontime_count: 20,
            acceptable_count: 10,
            late_count: 5,
            ontime_rate: rate,
            earliest_checkin: NaiveTime::from_hms_opt(7, 2, 0),
            latest_checkin: NaiveTime::from_hms_opt(9, 30, 0),
        }
    }

    fn week() -> Vec<EmployeeRecord> {
        vec![
            record("E002", "Tran Binh", 6, "Present", Some(8.0), Some("On-time")),
            record("E001", "Le An", 6, "Present", Some(8.25), Some("Early")),
            record("E001", "Le An", 7, "Present", Some(7.5), Some("Late")),
            record("E001", "Le An", 8, "Leave", Some(4.0), None),
            record("E002", "Tran Binh", 7, "Present", None, Some("Acceptable")),
            record("E001", "Le An", 9, "Present", Some(0.05), Some("On-time")),
        ]
    }

    #[test]
    fn test_total_days_counts_every_record() {
        let records = week();
        let summaries = summarize_by_employee(&records);
        assert_eq!(summaries.len(), 2);

        for summary in &summaries {
            let count = records.iter().filter(|r| r.emp_code == summary.emp_code).count() as u32;
            assert_eq!(summary.total_days, count);
            assert_eq!(summary.present_days + summary.leave_days, summary.total_days);
        }
    }

    #[test]
    fn test_summary_tallies() {
        let summaries = summarize_by_employee(&week());

        let first = &summaries[0];
        assert_eq!(first.emp_code, "E001");
        assert_eq!(first.total_days, 4);
        assert_eq!(first.present_days, 3);
        assert_eq!(first.leave_days, 1);
        assert_eq!(first.ontime_days, 2);
        assert_eq!(first.late_days, 1);
        assert_eq!(first.attendance_rate, 75.0);

        let second = &summaries[1];
        assert_eq!(second.emp_code, "E002");
        assert_eq!(second.present_days, 2);
        assert_eq!(second.ontime_days, 1);
        assert_eq!(second.late_days, 0);
        assert_eq!(second.attendance_rate, 100.0);
    }

    #[test]
    fn test_total_hours_sums_present_days_only() {
        let summaries = summarize_by_employee(&week());

        // 8.25 + 7.5 + 0.05 = 15.8; the leave day's 4.0 is excluded
        assert_eq!(summaries[0].total_hours, 15.8);
        // Missing hours count as zero
        assert_eq!(summaries[1].total_hours, 8.0);
    }

    #[test]
    fn test_total_hours_rounds_half_up() {
        let records = vec![
            record("E010", "Pham Cuong", 6, "Present", Some(4.1), None),
            record("E010", "Pham Cuong", 7, "Present", Some(4.15), None),
        ];
        let summaries = summarize_by_employee(&records);
        assert_eq!(summaries[0].total_hours, 8.3);
    }

    #[test]
    fn test_summary_name_from_latest_record() {
        let records = vec![
            record("E001", "Le Van An", 9, "Present", Some(8.0), None),
            record("E001", "Le An", 6, "Present", Some(8.0), None),
        ];
        let summaries = summarize_by_employee(&records);
        assert_eq!(summaries[0].name, "Le Van An");
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_by_employee(&[]).is_empty());
        assert!(unique_employees(&[]).is_empty());
        assert_eq!(monthly_overview(&[]), MonthlyOverview::default());
        assert!(latest_daily(&[]).is_none());
    }

    #[test]
    fn test_unique_employees_one_per_code() {
        let employees = unique_employees(&week());
        let codes: Vec<_> = employees.iter().map(|e| e.emp_code.as_str()).collect();
        assert_eq!(codes, vec!["E001", "E002"]);
    }

    #[test]
    fn test_unique_employees_prefers_newest_name() {
        let records = vec![
            record("E001", "Old Name", 6, "Present", None, None),
            record("E001", "New Name", 8, "Present", None, None),
            record("E001", "Middle Name", 7, "Present", None, None),
        ];
        let employees = unique_employees(&records);
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name, "New Name");
    }

    #[test]
    fn test_unique_employees_same_date_keeps_first() {
        let records = vec![
            record("E001", "First", 6, "Present", None, None),
            record("E001", "Second", 6, "Present", None, None),
        ];
        assert_eq!(unique_employees(&records)[0].name, "First");
    }

    #[test]
    fn test_monthly_overview() {
        let dailies = vec![daily(6, 40, 75.0), daily(7, 38, 80.0), daily(8, 41, 70.5)];
        let overview = monthly_overview(&dailies);

        assert_eq!(overview.days_reported, 3);
        assert_eq!(overview.average_present, 39.7);
        assert_eq!(overview.average_ontime_rate, 75.2);
        assert_eq!(overview.early_total, 15);
        assert_eq!(overview.ontime_total, 60);
        assert_eq!(overview.acceptable_total, 30);
        assert_eq!(overview.late_total, 15);
    }

    #[test]
    fn test_latest_daily() {
        let dailies = vec![daily(7, 38, 80.0), daily(9, 41, 70.5), daily(6, 40, 75.0)];
        assert_eq!(latest_daily(&dailies).map(|d| d.date), Some(date(9)));
    }
}
