//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod daily_panel;
pub mod employee_panel;
pub mod monthly_panel;
pub mod setup_wizard;
pub mod weekly_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
