//! Data models for attendance summaries, employee records and derived reports.

pub mod attendance;
pub mod employee;
pub mod report;

pub use attendance::{AttendanceStatus, DailySummary, DateRange, EmployeeRecord, RecordQuery, TimeCategory, WeeklySummary};
pub use employee::{Employee, EmployeeSummary};
pub use report::MonthlyOverview;
