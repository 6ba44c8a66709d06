pub use super::daily_summary::Entity as DailySummaries;
pub use super::employee_attendance::Entity as EmployeeAttendance;
pub use super::weekly_summary::Entity as WeeklySummaries;
