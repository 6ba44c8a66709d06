//! SeaORM entities for the hosted attendance tables.
//!
//! The application only reads these tables; rows are produced elsewhere.

pub mod prelude;

pub mod daily_summary;
pub mod employee_attendance;
pub mod weekly_summary;
