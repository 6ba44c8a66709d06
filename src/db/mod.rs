//! Read-only access to the hosted Postgres through SeaORM.

pub mod connection;
pub mod employee;
pub mod summary;

pub use connection::{TableCounts, connect, get_table_counts, get_version, test_connection};
