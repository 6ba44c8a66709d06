//! Per-employee attendance record queries.

use crate::aggregate::unique_employees;
use crate::entities::{employee_attendance, prelude::*};
use crate::models::{DateRange, Employee, EmployeeRecord, RecordQuery};
use sea_orm::*;

/// Employee records matching a query, newest first then by code.
pub async fn records(db: &DatabaseConnection, query: &RecordQuery) -> Result<Vec<EmployeeRecord>, DbErr> {
    let mut select = EmployeeAttendance::find()
        .filter(employee_attendance::Column::Date.between(query.range.start, query.range.end));

    if let Some(code) = &query.emp_code {
        select = select.filter(employee_attendance::Column::EmpCode.eq(code.as_str()));
    }

    select
        .order_by_desc(employee_attendance::Column::Date)
        .order_by_asc(employee_attendance::Column::EmpCode)
        .all(db)
        .await
}

/// Distinct employees seen in a date range.
pub async fn employees(db: &DatabaseConnection, range: DateRange) -> Result<Vec<Employee>, DbErr> {
    let rows = records(db, &RecordQuery::range(range)).await?;
    Ok(unique_employees(&rows))
}
