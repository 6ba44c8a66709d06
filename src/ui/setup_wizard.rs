//! First-run setup wizard for configuration.

use std::path::PathBuf;

use crate::config::{AppConfig, SourceKind};
use crate::source;
use eframe::egui::{self, RichText};
use tokio::sync::mpsc;

use super::components::colors;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success(String),
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Data source connection test state.
    pub test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Port input as string for text editing.
    port_input: String,
    /// Default range input as string.
    days_input: String,
    /// Weekly limit input as string.
    weeks_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SetupWizard {
    /// Start from an existing (possibly invalid) configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            port_input: config.database.port.to_string(),
            days_input: config.reports.default_days.to_string(),
            weeks_input: config.reports.weekly_limit.to_string(),
            config,
            test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => matches!(self.test_state, ConnectionTestState::Success(_)),
            2 => self.config.validate().is_ok(),
            3 => true,
            _ => false,
        }
    }

    /// Editing source settings invalidates an earlier test.
    fn source_changed(&mut self) {
        self.test_state = ConnectionTestState::NotTested;
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Data Source",
            2 => "Report Defaults",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
    test_rx: Option<mpsc::UnboundedReceiver<Result<String, String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            config_path,
            rt,
            test_rx: None,
        }
    }

    /// Test the configured data source asynchronously.
    fn start_test(&mut self) {
        let config = self.wizard.config.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        self.test_rx = Some(rx);
        self.wizard.test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = source::test_config(&config).await.map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_result(&mut self) {
        if let Some(rx) = &mut self.test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.test_state = match result {
                Ok(server) => {
                    tracing::info!("Setup connection test succeeded: {}", server);
                    ConnectionTestState::Success(server)
                }
                Err(e) => {
                    tracing::warn!("Setup connection test failed: {}", e);
                    ConnectionTestState::Failed(e)
                }
            };
            self.test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async test results
        self.poll_test_result();

        // Keep repainting while the connection test runs
        if matches!(self.wizard.test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header with step indicator
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Attendance Analytics Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                let needs_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_source_step(ui, &mut self.wizard),
                    2 => {
                        show_reports_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_test {
                    self.start_test();
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        // Save config once the last step is confirmed
        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config saved to {:?}", self.config_path);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Attendance Analytics!");
    ui.add_space(10.0);
    ui.label("This wizard will help you connect to your attendance data.");
    ui.add_space(20.0);
    ui.label("You will need one of:");
    ui.add_space(5.0);
    ui.label("  - PostgreSQL connection details for the hosted database");
    ui.label("  - The project URL and API key of its REST gateway");
}

fn show_source_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    ui.horizontal(|ui| {
        for kind in [SourceKind::Postgres, SourceKind::Rest] {
            if ui
                .radio_value(&mut wizard.config.source.kind, kind, kind.label())
                .changed()
            {
                wizard.source_changed();
            }
        }
    });

    ui.add_space(10.0);

    let mut changed = false;
    egui::Grid::new("source_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| match wizard.config.source.kind {
            SourceKind::Postgres => {
                let db = &mut wizard.config.database;

                ui.label("Host:");
                changed |= ui.text_edit_singleline(&mut db.host).changed();
                ui.end_row();

                ui.label("Port:");
                if ui.text_edit_singleline(&mut wizard.port_input).changed() {
                    changed = true;
                    if let Ok(p) = wizard.port_input.parse() {
                        db.port = p;
                    }
                }
                ui.end_row();

                ui.label("Database:");
                changed |= ui.text_edit_singleline(&mut db.name).changed();
                ui.end_row();

                ui.label("Username:");
                changed |= ui.text_edit_singleline(&mut db.username).changed();
                ui.end_row();

                ui.label("Password:");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut db.password).password(true))
                    .changed();
                ui.end_row();

                ui.label("TLS:");
                changed |= ui.checkbox(&mut db.require_ssl, "Require SSL").changed();
                ui.end_row();
            }
            SourceKind::Rest => {
                let api = &mut wizard.config.api;

                ui.label("Project URL:");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut api.url).hint_text("https://..."))
                    .changed();
                ui.end_row();

                ui.label("API key:");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut api.anon_key).password(true))
                    .changed();
                ui.end_row();

                ui.label("Schema:");
                changed |= ui.text_edit_singleline(&mut api.schema).changed();
                ui.end_row();
            }
        });

    if changed {
        wizard.source_changed();
    }

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success(server) => {
                ui.colored_label(colors::SUCCESS, "Connection successful!")
                    .on_hover_text(server);
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
            }
        }
    });

    needs_test
}

fn show_reports_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    ui.label("Choose what the dashboard loads on startup.");
    ui.add_space(10.0);

    egui::Grid::new("reports_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Default range (days):");
            if ui.text_edit_singleline(&mut wizard.days_input).changed()
                && let Ok(d) = wizard.days_input.parse()
            {
                wizard.config.reports.default_days = d;
            }
            ui.end_row();

            ui.label("Weeks listed:");
            if ui.text_edit_singleline(&mut wizard.weeks_input).changed()
                && let Ok(w) = wizard.weeks_input.parse()
            {
                wizard.config.reports.weekly_limit = w;
            }
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading(wizard.config.source.kind.label());
        match wizard.config.source.kind {
            SourceKind::Postgres => {
                ui.label(format!(
                    "  {}@{}:{}/{}",
                    wizard.config.database.username,
                    wizard.config.database.host,
                    wizard.config.database.port,
                    wizard.config.database.name
                ));
            }
            SourceKind::Rest => {
                ui.label(format!("  {}", wizard.config.api.rest_url()));
            }
        }
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Reports");
        ui.label(format!("  Default range: {} days", wizard.config.reports.default_days));
        ui.label(format!("  Weeks listed: {}", wizard.config.reports.weekly_limit));
    });

    ui.add_space(20.0);
    ui.label(format!("The configuration will be saved to {}.", path.display()));
    ui.label("You will need to restart the application after setup.");
}
