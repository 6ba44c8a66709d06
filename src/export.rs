//! CSV and Excel export of the tables shown in each tab.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveTime};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::error::{AppError, Result};
use crate::models::{DailySummary, EmployeeRecord, EmployeeSummary, WeeklySummary};

/// Export layouts. Column order is a contract with downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Daily,
    Weekly,
    WeeklyDetails,
    Employee,
    Monthly,
}

const DAILY_HEADERS: [&str; 9] = [
    "Date",
    "Total Employees",
    "Early Count",
    "On-time Count",
    "Acceptable Count",
    "Late Count",
    "On-time Rate (%)",
    "Earliest Check-in",
    "Latest Check-in",
];

const WEEKLY_HEADERS: [&str; 5] = [
    "Week Start",
    "Week End",
    "Total Employees",
    "Perfect Attendance Count",
    "Perfect Attendance Rate (%)",
];

const WEEKLY_DETAIL_HEADERS: [&str; 9] = [
    "Employee Code",
    "Name",
    "Total Days",
    "Present Days",
    "Leave Days",
    "Total Hours",
    "On-time Days",
    "Late Days",
    "Attendance Rate (%)",
];

const RECORD_HEADERS: [&str; 9] = [
    "Date",
    "Employee Code",
    "Name",
    "Check In",
    "Check Out",
    "Work Hours",
    "Total Punches",
    "Status",
    "Time Category",
];

impl ExportKind {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ExportKind::Daily => &DAILY_HEADERS,
            ExportKind::Weekly => &WEEKLY_HEADERS,
            ExportKind::WeeklyDetails => &WEEKLY_DETAIL_HEADERS,
            ExportKind::Employee | ExportKind::Monthly => &RECORD_HEADERS,
        }
    }

    /// Columns written as numbers in Excel.
    fn numeric_columns(&self) -> &'static [usize] {
        match self {
            ExportKind::Daily => &[1, 2, 3, 4, 5, 6],
            ExportKind::Weekly => &[2, 3, 4],
            ExportKind::WeeklyDetails => &[2, 3, 4, 5, 6, 7, 8],
            ExportKind::Employee | ExportKind::Monthly => &[5, 6],
        }
    }

    /// File name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Daily => "daily_summary",
            ExportKind::Weekly => "weekly_summary",
            ExportKind::WeeklyDetails => "weekly_details",
            ExportKind::Employee => "employee_attendance",
            ExportKind::Monthly => "monthly_attendance",
        }
    }

    fn sheet_name(&self) -> &'static str {
        match self {
            ExportKind::Daily => "Daily Summary",
            ExportKind::Weekly => "Weekly Summary",
            ExportKind::WeeklyDetails => "Weekly Details",
            ExportKind::Employee => "Employee Attendance",
            ExportKind::Monthly => "Monthly Attendance",
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV Files",
            ExportFormat::Xlsx => "Excel Files",
        }
    }
}

/// Rows rendered as strings in the column order of their kind.
#[derive(Debug, Clone)]
pub struct ExportTable {
    pub kind: ExportKind,
    pub rows: Vec<Vec<String>>,
}

fn time_field(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M:%S").to_string()).unwrap_or_default()
}

fn optional_field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ExportTable {
    pub fn daily(rows: &[DailySummary]) -> Self {
        let rows = rows
            .iter()
            .map(|d| {
                vec![
                    d.date.to_string(),
                    d.total_employees_present.to_string(),
                    d.early_count.to_string(),
                    d.ontime_count.to_string(),
                    d.acceptable_count.to_string(),
                    d.late_count.to_string(),
                    d.ontime_rate.to_string(),
                    time_field(d.earliest_checkin),
                    time_field(d.latest_checkin),
                ]
            })
            .collect();

        Self {
            kind: ExportKind::Daily,
            rows,
        }
    }

    pub fn weekly(rows: &[WeeklySummary]) -> Self {
        let rows = rows
            .iter()
            .map(|w| {
                vec![
                    w.week_start.to_string(),
                    w.week_end.to_string(),
                    w.total_employees.to_string(),
                    w.perfect_attendance_count.to_string(),
                    w.perfect_attendance_rate.to_string(),
                ]
            })
            .collect();

        Self {
            kind: ExportKind::Weekly,
            rows,
        }
    }

    pub fn weekly_details(rows: &[EmployeeSummary]) -> Self {
        let rows = rows
            .iter()
            .map(|s| {
                vec![
                    s.emp_code.clone(),
                    s.name.clone(),
                    s.total_days.to_string(),
                    s.present_days.to_string(),
                    s.leave_days.to_string(),
                    s.total_hours.to_string(),
                    s.ontime_days.to_string(),
                    s.late_days.to_string(),
                    s.attendance_rate.to_string(),
                ]
            })
            .collect();

        Self {
            kind: ExportKind::WeeklyDetails,
            rows,
        }
    }

    pub fn employee(rows: &[EmployeeRecord]) -> Self {
        Self::records(ExportKind::Employee, rows)
    }

    pub fn monthly(rows: &[EmployeeRecord]) -> Self {
        Self::records(ExportKind::Monthly, rows)
    }

    fn records(kind: ExportKind, rows: &[EmployeeRecord]) -> Self {
        let rows = rows
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.emp_code.clone(),
                    r.name.clone(),
                    time_field(r.check_in),
                    time_field(r.check_out),
                    optional_field(r.work_hours),
                    r.total_punches.to_string(),
                    r.status.clone(),
                    r.time_category.clone().unwrap_or_default(),
                ]
            })
            .collect();

        Self { kind, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV: header line, one line per row, `\n` line endings.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(self.kind.headers())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| AppError::parse(format!("CSV output is not UTF-8: {e}")))
    }

    /// Write as CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv_string()?)?;
        Ok(())
    }

    /// Write as Excel workbook with a styled, frozen header row.
    pub fn write_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.set_name(self.kind.sheet_name())?;

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x4472C4))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin);

        let headers = self.kind.headers();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
            worksheet.set_column_width(col as u16, (header.len() + 4).max(12) as f64)?;
        }

        let numeric = self.kind.numeric_columns();
        for (idx, row) in self.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                match value.parse::<f64>() {
                    Ok(number) if numeric.contains(&col) => {
                        worksheet.write_number(row_num, col as u16, number)?;
                    }
                    _ => {
                        worksheet.write_string(row_num, col as u16, value)?;
                    }
                }
            }
        }

        if !self.rows.is_empty() {
            let last_row = self.rows.len() as u32;
            worksheet.autofilter(0, 0, last_row, (headers.len() - 1) as u16)?;
        }

        worksheet.set_freeze_panes(1, 0)?;

        workbook.save(path)?;
        Ok(())
    }

    /// Write in the requested format.
    pub fn save(&self, path: &Path, format: ExportFormat) -> Result<()> {
        tracing::info!(
            "Exporting {} {:?} rows to {}",
            self.rows.len(),
            self.kind,
            path.display()
        );
        match format {
            ExportFormat::Csv => self.write_csv(path),
            ExportFormat::Xlsx => self.write_xlsx(path),
        }
    }
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str, format: ExportFormat, directory: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter(format.filter_name(), &[format.extension()]);

    if let Some(dir) = directory {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str, format: ExportFormat) -> String {
    let now = Local::now();
    format!(
        "{prefix}_{ts}.{ext}",
        ts = now.format("%Y%m%d_%H%M%S"),
        ext = format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sample_daily() -> DailySummary {
        DailySummary {
            date: date(6),
            total_employees_present: 40,
            early_count: 5,
            ontime_count: 30,
            acceptable_count: 3,
            late_count: 2,
            ontime_rate: 75.0,
            earliest_checkin: NaiveTime::from_hms_opt(7, 2, 15),
            latest_checkin: NaiveTime::from_hms_opt(9, 41, 0),
        }
    }

    fn sample_record(name: &str) -> EmployeeRecord {
        EmployeeRecord {
            emp_code: "E001".to_string(),
            date: date(6),
            name: name.to_string(),
            check_in: NaiveTime::from_hms_opt(7, 55, 0),
            check_out: None,
            work_hours: Some(8.5),
            status: "Present".to_string(),
            time_category: Some("On-time".to_string()),
            total_punches: 3,
        }
    }

    #[test]
    fn test_daily_csv_layout() {
        let csv = ExportTable::daily(&[sample_daily()]).to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Date,Total Employees,Early Count,On-time Count,Acceptable Count,Late Count,On-time Rate (%),Earliest Check-in,Latest Check-in"
        );
        assert_eq!(lines[1], "2025-01-06,40,5,30,3,2,75,07:02:15,09:41:00");
        assert_eq!(lines[1].split(',').count(), 9);
    }

    #[test]
    fn test_weekly_csv_layout() {
        let week = WeeklySummary {
            week_start: date(6),
            week_end: date(12),
            total_employees: 42,
            perfect_attendance_count: 30,
            perfect_attendance_rate: 71.4,
        };
        let csv = ExportTable::weekly(&[week]).to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Week Start,Week End,Total Employees,Perfect Attendance Count,Perfect Attendance Rate (%)"
        );
        assert_eq!(lines[1], "2025-01-06,2025-01-12,42,30,71.4");
    }

    #[test]
    fn test_weekly_details_csv_layout() {
        let summary = EmployeeSummary {
            emp_code: "E001".to_string(),
            name: "Le An".to_string(),
            total_days: 5,
            present_days: 4,
            leave_days: 1,
            total_hours: 32.5,
            ontime_days: 3,
            late_days: 1,
            attendance_rate: 80.0,
        };
        let csv = ExportTable::weekly_details(&[summary]).to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Employee Code,Name,Total Days,Present Days,Leave Days,Total Hours,On-time Days,Late Days,Attendance Rate (%)"
        );
        assert_eq!(lines[1], "E001,Le An,5,4,1,32.5,3,1,80");
    }

    #[test]
    fn test_employee_and_monthly_share_layout() {
        let records = [sample_record("Le An")];
        let employee = ExportTable::employee(&records).to_csv_string().unwrap();
        let monthly = ExportTable::monthly(&records).to_csv_string().unwrap();

        assert_eq!(employee, monthly);
        let lines: Vec<&str> = employee.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Employee Code,Name,Check In,Check Out,Work Hours,Total Punches,Status,Time Category"
        );
        assert_eq!(lines[1], "2025-01-06,E001,Le An,07:55:00,,8.5,3,Present,On-time");
    }

    #[test]
    fn test_csv_escaping() {
        let records = [sample_record("Le, \"An\"")];
        let csv = ExportTable::employee(&records).to_csv_string().unwrap();
        let data = csv.lines().nth(1).unwrap();
        assert!(data.contains(",\"Le, \"\"An\"\"\","));
    }

    #[test]
    fn test_csv_quotes_newlines() {
        let records = [sample_record("Line one\nLine two")];
        let csv = ExportTable::employee(&records).to_csv_string().unwrap();
        assert!(csv.contains("\"Line one\nLine two\""));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let csv = ExportTable::weekly(&[]).to_csv_string().unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_header_counts() {
        assert_eq!(ExportKind::Daily.headers().len(), 9);
        assert_eq!(ExportKind::Weekly.headers().len(), 5);
        assert_eq!(ExportKind::WeeklyDetails.headers().len(), 9);
        assert_eq!(ExportKind::Employee.headers().len(), 9);
        assert_eq!(ExportKind::Monthly.headers().len(), 9);
    }

    #[test]
    fn test_write_csv_file() {
        let path = std::env::temp_dir().join(format!("attendance-export-{}.csv", std::process::id()));
        let table = ExportTable::daily(&[sample_daily()]);
        table.save(&path, ExportFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, table.to_csv_string().unwrap());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("daily_summary", ExportFormat::Csv);
        assert!(name.starts_with("daily_summary_"));
        assert!(name.ends_with(".csv"));
    }
}
