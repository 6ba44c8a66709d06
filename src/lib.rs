pub mod aggregate;
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod source;
pub mod ui;

pub use error::{AppError, Result};
