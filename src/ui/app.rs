//! Main application UI.

use std::future::Future;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{CALENDAR, CALENDAR_BLANK, CHART_BAR, FILE_CSV, FILE_XLS, USERS};
use tokio::sync::mpsc;

use crate::aggregate::{monthly_overview, summarize_by_employee, unique_employees};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::export::{ExportFormat, ExportTable, generate_export_filename, show_save_dialog};
use crate::models::{
    DailySummary, DateRange, Employee, EmployeeRecord, EmployeeSummary, MonthlyOverview, RecordQuery, WeeklySummary,
};
use crate::source::DataSource;

use super::components::{banner, colors};
use super::{daily_panel, employee_panel, monthly_panel, weekly_panel};

/// Tab currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Daily,
    Employees,
    Weekly,
    Monthly,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Daily, Tab::Employees, Tab::Weekly, Tab::Monthly];

    /// Get the display name for the tab.
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Daily => "Daily Summary",
            Tab::Employees => "Employee Details",
            Tab::Weekly => "Weekly Reports",
            Tab::Monthly => "Monthly Reports",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Tab::Daily => CALENDAR_BLANK,
            Tab::Employees => USERS,
            Tab::Weekly => CHART_BAR,
            Tab::Monthly => CALENDAR,
        }
    }

    /// Tab for a config index, falling back to the first tab.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Data source connection status.
#[derive(Debug, Clone, Default)]
pub enum ConnectionStatus {
    #[default]
    Checking,
    Connected(String),
    Error(String),
}

/// Async request whose response is awaited. Each tab has one or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    DailyRows,
    EmployeeList,
    EmployeeRecords,
    Weeks,
    WeekDetails,
    Month,
}

impl Slot {
    fn tab(&self) -> Tab {
        match self {
            Slot::DailyRows => Tab::Daily,
            Slot::EmployeeList | Slot::EmployeeRecords => Tab::Employees,
            Slot::Weeks | Slot::WeekDetails => Tab::Weekly,
            Slot::Month => Tab::Monthly,
        }
    }
}

/// Messages from async tasks to UI.
///
/// Every response carries the id of the request that produced it. Only the
/// latest request of a slot is applied; anything older is dropped.
pub enum UiMessage {
    DailyLoaded {
        request: u64,
        rows: Vec<DailySummary>,
    },
    EmployeesLoaded {
        request: u64,
        employees: Vec<Employee>,
    },
    EmployeeRecordsLoaded {
        request: u64,
        records: Vec<EmployeeRecord>,
    },
    WeeklyLoaded {
        request: u64,
        weeks: Vec<WeeklySummary>,
    },
    WeekDetailsLoaded {
        request: u64,
        records: Vec<EmployeeRecord>,
    },
    MonthlyLoaded {
        request: u64,
        emp_code: Option<String>,
        dailies: Vec<DailySummary>,
        records: Vec<EmployeeRecord>,
    },
    LoadFailed {
        slot: Slot,
        request: u64,
        error: String,
    },
    ConnectionChecked(std::result::Result<String, String>),
}

/// Daily summary tab state.
pub struct DailyState {
    pub range: DateRange,
    pub rows: Vec<DailySummary>,
    pending: Option<u64>,
}

impl DailyState {
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Employee details tab state.
pub struct EmployeeState {
    pub range: DateRange,
    pub search: String,
    pub employees: Vec<Employee>,
    pub selected: Option<String>,
    pub records: Vec<EmployeeRecord>,
    pending_list: Option<u64>,
    pending_records: Option<u64>,
}

impl EmployeeState {
    /// Employees matching the search box.
    pub fn filtered(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|e| e.matches(&self.search))
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        let code = self.selected.as_deref()?;
        self.employees.iter().find(|e| e.emp_code == code)
    }

    pub fn loading_list(&self) -> bool {
        self.pending_list.is_some()
    }

    pub fn loading_records(&self) -> bool {
        self.pending_records.is_some()
    }
}

/// Weekly reports tab state.
pub struct WeeklyState {
    pub weeks: Vec<WeeklySummary>,
    pub selected_week: Option<NaiveDate>,
    pub details: Vec<EmployeeSummary>,
    pending: Option<u64>,
    pending_details: Option<u64>,
}

impl WeeklyState {
    pub fn selected(&self) -> Option<&WeeklySummary> {
        let start = self.selected_week?;
        self.weeks.iter().find(|w| w.week_start == start)
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn loading_details(&self) -> bool {
        self.pending_details.is_some()
    }
}

/// Monthly reports tab state.
pub struct MonthlyState {
    pub year: i32,
    pub month: u32,
    pub emp_code: Option<String>,
    /// Employees seen in the last unfiltered load, for the filter box.
    pub employee_options: Vec<Employee>,
    pub dailies: Vec<DailySummary>,
    pub records: Vec<EmployeeRecord>,
    pub summaries: Vec<EmployeeSummary>,
    pub overview: MonthlyOverview,
    pending: Option<u64>,
}

impl MonthlyState {
    fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            emp_code: None,
            employee_options: Vec::new(),
            dailies: Vec::new(),
            records: Vec::new(),
            summaries: Vec::new(),
            overview: MonthlyOverview::default(),
            pending: None,
        }
    }

    pub fn range(&self) -> Result<DateRange> {
        DateRange::month(self.year, self.month)
    }

    /// Step the selected month by `delta` months.
    pub fn shift(&mut self, delta: i32) {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        self.year = index.div_euclid(12);
        self.month = index.rem_euclid(12) as u32 + 1;
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    fn clear(&mut self) {
        self.dailies.clear();
        self.records.clear();
        self.summaries.clear();
        self.overview = MonthlyOverview::default();
    }
}

/// Main application state.
pub struct App {
    // Runtime and data source
    pub rt: tokio::runtime::Runtime,
    pub source: DataSource,
    pub config: AppConfig,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,
    last_request: u64,

    // Navigation
    pub current_tab: Tab,
    pub today: NaiveDate,

    // Tabs
    pub daily: DailyState,
    pub employees: EmployeeState,
    pub weekly: WeeklyState,
    pub monthly: MonthlyState,

    // Export
    pub export_format: ExportFormat,

    // Banners
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Status bar
    pub connection: ConnectionStatus,
    pub last_refresh: Option<DateTime<Local>>,
}

impl App {
    pub fn new(rt: tokio::runtime::Runtime, source: DataSource, config: AppConfig) -> Self {
        let mut app = Self::with_state(rt, source, config, Local::now().date_naive());

        // Load initial data
        app.check_connection();
        app.load_daily();
        app.load_employees();
        app.load_weekly();

        app
    }

    /// Build the initial state without sending any request.
    fn with_state(rt: tokio::runtime::Runtime, source: DataSource, config: AppConfig, today: NaiveDate) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let range = DateRange::last_days(today, config.reports.default_days);

        Self {
            rt,
            source,
            tx,
            rx,
            last_request: 0,
            current_tab: Tab::from_index(config.ui.start_tab),
            today,
            daily: DailyState {
                range,
                rows: Vec::new(),
                pending: None,
            },
            employees: EmployeeState {
                range,
                search: String::new(),
                employees: Vec::new(),
                selected: None,
                records: Vec::new(),
                pending_list: None,
                pending_records: None,
            },
            weekly: WeeklyState {
                weeks: Vec::new(),
                selected_week: None,
                details: Vec::new(),
                pending: None,
                pending_details: None,
            },
            monthly: MonthlyState::new(today.year(), today.month()),
            export_format: ExportFormat::default(),
            error_message: None,
            success_message: None,
            connection: ConnectionStatus::default(),
            last_refresh: None,
            config,
        }
    }

    fn next_request(&mut self) -> u64 {
        self.last_request += 1;
        self.last_request
    }

    /// Run a query on the runtime and post its message back to the UI.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn failed(slot: Slot, request: u64, error: impl ToString) -> UiMessage {
        UiMessage::LoadFailed {
            slot,
            request,
            error: error.to_string(),
        }
    }

    /// Check the data source for the status bar.
    pub fn check_connection(&mut self) {
        self.connection = ConnectionStatus::Checking;
        let source = self.source.clone();

        self.spawn(async move { UiMessage::ConnectionChecked(source.probe().await.map_err(|e| e.to_string())) });
    }

    /// Load daily summaries for the selected range, superseding any earlier load.
    pub fn load_daily(&mut self) {
        let request = self.next_request();
        self.daily.pending = Some(request);
        self.daily.rows.clear();

        let source = self.source.clone();
        let range = self.daily.range;
        let limit = self.config.reports.daily_limit;

        self.spawn(async move {
            match source.daily_summaries(range, limit).await {
                Ok(rows) => UiMessage::DailyLoaded { request, rows },
                Err(e) => Self::failed(Slot::DailyRows, request, e),
            }
        });
    }

    /// Load the employee list for the selected range.
    pub fn load_employees(&mut self) {
        let request = self.next_request();
        self.employees.pending_list = Some(request);
        self.employees.employees.clear();

        let source = self.source.clone();
        let range = self.employees.range;

        self.spawn(async move {
            match source.employees(range).await {
                Ok(employees) => UiMessage::EmployeesLoaded { request, employees },
                Err(e) => Self::failed(Slot::EmployeeList, request, e),
            }
        });
    }

    /// Select an employee and load their records.
    pub fn select_employee(&mut self, emp_code: String) {
        self.employees.selected = Some(emp_code);
        self.load_employee_records();
    }

    /// Load records of the selected employee over the selected range.
    pub fn load_employee_records(&mut self) {
        let Some(emp_code) = self.employees.selected.clone() else {
            return;
        };
        let request = self.next_request();
        self.employees.pending_records = Some(request);
        self.employees.records.clear();

        let source = self.source.clone();
        let query = RecordQuery::employee(self.employees.range, emp_code);

        self.spawn(async move {
            match source.employee_records(&query).await {
                Ok(records) => UiMessage::EmployeeRecordsLoaded { request, records },
                Err(e) => Self::failed(Slot::EmployeeRecords, request, e),
            }
        });
    }

    /// Load the most recent weekly summaries.
    pub fn load_weekly(&mut self) {
        let request = self.next_request();
        self.weekly.pending = Some(request);

        let source = self.source.clone();
        let limit = self.config.reports.weekly_limit;

        self.spawn(async move {
            match source.weekly_summaries(None, limit).await {
                Ok(weeks) => UiMessage::WeeklyLoaded { request, weeks },
                Err(e) => Self::failed(Slot::Weeks, request, e),
            }
        });
    }

    /// Select a week and load the employee records it covers.
    pub fn select_week(&mut self, week: &WeeklySummary) {
        let request = self.next_request();
        self.weekly.selected_week = Some(week.week_start);
        self.weekly.details.clear();
        self.weekly.pending_details = Some(request);

        let source = self.source.clone();
        let range = DateRange {
            start: week.week_start,
            end: week.week_end.max(week.week_start),
        };

        self.spawn(async move {
            match source.employee_records(&RecordQuery::range(range)).await {
                Ok(records) => UiMessage::WeekDetailsLoaded { request, records },
                Err(e) => Self::failed(Slot::WeekDetails, request, e),
            }
        });
    }

    /// Load daily summaries and employee records of the selected month.
    pub fn load_monthly(&mut self) {
        let range = match self.monthly.range() {
            Ok(range) => range,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        let request = self.next_request();
        self.monthly.pending = Some(request);
        self.monthly.clear();

        let source = self.source.clone();
        let emp_code = self.monthly.emp_code.clone();
        let query = RecordQuery {
            range,
            emp_code: emp_code.clone(),
        };

        self.spawn(async move {
            let result = async {
                let dailies = source.daily_summaries(range, 31).await?;
                let records = source.employee_records(&query).await?;
                Ok::<_, AppError>((dailies, records))
            }
            .await;

            match result {
                Ok((dailies, records)) => UiMessage::MonthlyLoaded {
                    request,
                    emp_code,
                    dailies,
                    records,
                },
                Err(e) => Self::failed(Slot::Month, request, e),
            }
        });
    }

    /// Ask for a destination and write the table in the selected format.
    pub fn export(&mut self, table: ExportTable) {
        if table.is_empty() {
            self.error_message = Some("No rows to export".to_string());
            return;
        }

        let format = self.export_format;
        let filename = generate_export_filename(table.kind.prefix(), format);
        let Some(path) = show_save_dialog(&filename, format, self.config.ui.export_dir.as_deref()) else {
            return;
        };

        match table.save(&path, format) {
            Ok(()) => {
                self.success_message = Some(format!("Exported {} rows to {}", table.rows.len(), path.display()));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Pending request id of a slot.
    fn pending_mut(&mut self, slot: Slot) -> &mut Option<u64> {
        match slot {
            Slot::DailyRows => &mut self.daily.pending,
            Slot::EmployeeList => &mut self.employees.pending_list,
            Slot::EmployeeRecords => &mut self.employees.pending_records,
            Slot::Weeks => &mut self.weekly.pending,
            Slot::WeekDetails => &mut self.weekly.pending_details,
            Slot::Month => &mut self.monthly.pending,
        }
    }

    /// Settle `request` if it is the one `slot` is waiting for.
    fn settle(&mut self, slot: Slot, request: u64) -> bool {
        let pending = self.pending_mut(slot);
        if *pending != Some(request) {
            tracing::debug!("Dropping stale {:?} response {}", slot, request);
            return false;
        }
        *pending = None;
        true
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::DailyLoaded { request, rows } => {
                    if self.settle(Slot::DailyRows, request) {
                        tracing::debug!("Loaded {} daily summaries", rows.len());
                        self.daily.rows = rows;
                        self.last_refresh = Some(Local::now());
                    }
                }
                UiMessage::EmployeesLoaded { request, employees } => {
                    if self.settle(Slot::EmployeeList, request) {
                        self.employees.employees = employees;
                        self.last_refresh = Some(Local::now());
                    }
                }
                UiMessage::EmployeeRecordsLoaded { request, records } => {
                    if self.settle(Slot::EmployeeRecords, request) {
                        self.employees.records = records;
                    }
                }
                UiMessage::WeeklyLoaded { request, weeks } => {
                    if self.settle(Slot::Weeks, request) {
                        self.weekly.weeks = weeks;
                        self.last_refresh = Some(Local::now());
                    }
                }
                UiMessage::WeekDetailsLoaded { request, records } => {
                    if self.settle(Slot::WeekDetails, request) {
                        self.weekly.details = summarize_by_employee(&records);
                    }
                }
                UiMessage::MonthlyLoaded {
                    request,
                    emp_code,
                    dailies,
                    records,
                } => {
                    if !self.settle(Slot::Month, request) {
                        continue;
                    }
                    let monthly = &mut self.monthly;
                    if emp_code.is_none() {
                        monthly.employee_options = unique_employees(&records);
                    }
                    monthly.overview = monthly_overview(&dailies);
                    monthly.summaries = summarize_by_employee(&records);
                    monthly.dailies = dailies;
                    monthly.records = records;
                    self.last_refresh = Some(Local::now());
                }
                UiMessage::LoadFailed { slot, request, error } => {
                    if self.settle(slot, request) {
                        let tab = slot.tab();
                        tracing::error!("{} load failed: {}", tab.name(), error);
                        self.error_message = Some(format!("{}: {}", tab.name(), error));
                    }
                }
                UiMessage::ConnectionChecked(result) => {
                    self.connection = match result {
                        Ok(server) => {
                            tracing::info!("Connected: {}", server);
                            ConnectionStatus::Connected(server)
                        }
                        Err(e) => {
                            tracing::warn!("Connection check failed: {}", e);
                            ConnectionStatus::Error(e)
                        }
                    };
                }
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.daily.loading()
            || self.employees.loading_list()
            || self.employees.loading_records()
            || self.weekly.loading()
            || self.weekly.loading_details()
            || self.monthly.loading()
            || matches!(self.connection, ConnectionStatus::Checking)
    }

    /// Render tab bar and export format toggle.
    fn show_tab_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    let text = RichText::new(format!("{} {}", tab.icon(), tab.name())).size(15.0);
                    if ui.selectable_label(self.current_tab == tab, text).clicked() {
                        self.current_tab = tab;
                    }
                    ui.add_space(6.0);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.selectable_value(&mut self.export_format, ExportFormat::Xlsx, format!("{FILE_XLS} XLSX"));
                    ui.selectable_value(&mut self.export_format, ExportFormat::Csv, format!("{FILE_CSV} CSV"));
                    ui.label("Export as:");
                });
            });
            ui.add_space(4.0);
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let source = self.source.kind().label();
                    match &self.connection {
                        ConnectionStatus::Checking => {
                            ui.spinner();
                            ui.colored_label(colors::WARNING, format!("{source}: checking..."));
                        }
                        ConnectionStatus::Connected(server) => {
                            ui.colored_label(colors::SUCCESS, format!("{source}: connected"))
                                .on_hover_text(server);
                        }
                        ConnectionStatus::Error(e) => {
                            ui.colored_label(colors::ERROR, format!("{source}: unreachable"))
                                .on_hover_text(e);
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(at) = self.last_refresh {
                            ui.label(
                                RichText::new(format!("Updated {}", at.format("%H:%M:%S")))
                                    .color(colors::NEUTRAL),
                            );
                        }
                    });
                });
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_busy() {
            ctx.request_repaint();
        }

        self.show_tab_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = self.error_message.clone()
                && banner(ui, &error, true)
            {
                self.error_message = None;
            }
            if let Some(msg) = self.success_message.clone()
                && banner(ui, &msg, false)
            {
                self.success_message = None;
            }

            match self.current_tab {
                Tab::Daily => daily_panel::show(self, ui),
                Tab::Employees => employee_panel::show(self, ui),
                Tab::Weekly => weekly_panel::show(self, ui),
                Tab::Monthly => monthly_panel::show(self, ui),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RestClient;
    use crate::config::ApiConfig;
    use chrono::NaiveTime;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    /// App on a runtime that is never driven, so spawned queries never run
    /// and each test delivers responses by hand.
    fn test_app() -> App {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let api = ApiConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "key".to_string(),
            ..ApiConfig::default()
        };
        let source = DataSource::Rest(RestClient::new(&api).unwrap());
        App::with_state(rt, source, AppConfig::default(), date(3, 15))
    }

    fn record(code: &str, day: NaiveDate) -> EmployeeRecord {
        EmployeeRecord {
            emp_code: code.to_string(),
            date: day,
            name: format!("Employee {code}"),
            check_in: NaiveTime::from_hms_opt(8, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 0, 0),
            work_hours: Some(8.0),
            status: "Present".to_string(),
            time_category: Some("On-time".to_string()),
            total_punches: 2,
        }
    }

    fn daily(day: NaiveDate) -> DailySummary {
        DailySummary {
            date: day,
            total_employees_present: 10,
            early_count: 2,
            ontime_count: 6,
            acceptable_count: 1,
            late_count: 1,
            ontime_rate: 80.0,
            earliest_checkin: None,
            latest_checkin: None,
        }
    }

    fn week(start: NaiveDate) -> WeeklySummary {
        WeeklySummary {
            week_start: start,
            week_end: start + chrono::Duration::days(6),
            total_employees: 10,
            perfect_attendance_count: 7,
            perfect_attendance_rate: 70.0,
        }
    }

    fn deliver(app: &mut App, msg: UiMessage) {
        app.tx.send(msg).unwrap();
        app.poll_async_results();
    }

    #[test]
    fn test_month_shift_wraps_years() {
        let mut state = MonthlyState::new(2025, 1);
        state.shift(-1);
        assert_eq!((state.year, state.month), (2024, 12));

        state.shift(1);
        assert_eq!((state.year, state.month), (2025, 1));

        state.shift(12);
        assert_eq!((state.year, state.month), (2026, 1));
    }

    #[test]
    fn test_tab_from_index() {
        assert_eq!(Tab::from_index(0), Tab::Daily);
        assert_eq!(Tab::from_index(3), Tab::Monthly);
        assert_eq!(Tab::from_index(9), Tab::Daily);
    }

    #[test]
    fn test_month_change_during_load_requests_new_month() {
        let mut app = test_app();
        app.load_monthly();
        let march = app.monthly.pending.unwrap();

        app.monthly.shift(-1);
        app.load_monthly();
        let february = app.monthly.pending.unwrap();
        assert_ne!(march, february);

        deliver(
            &mut app,
            UiMessage::MonthlyLoaded {
                request: march,
                emp_code: None,
                dailies: vec![daily(date(3, 3))],
                records: vec![record("E001", date(3, 3))],
            },
        );
        assert!(app.monthly.loading());
        assert!(app.monthly.records.is_empty());
        assert_eq!(app.monthly.overview, MonthlyOverview::default());

        deliver(
            &mut app,
            UiMessage::MonthlyLoaded {
                request: february,
                emp_code: None,
                dailies: vec![daily(date(2, 3))],
                records: vec![record("E002", date(2, 3))],
            },
        );
        assert!(!app.monthly.loading());
        assert_eq!(app.monthly.records[0].date, date(2, 3));
        assert_eq!(app.monthly.summaries[0].emp_code, "E002");
        assert_eq!(app.monthly.employee_options.len(), 1);
    }

    #[test]
    fn test_month_load_clears_previous_month() {
        let mut app = test_app();
        app.load_monthly();
        let request = app.monthly.pending.unwrap();
        deliver(
            &mut app,
            UiMessage::MonthlyLoaded {
                request,
                emp_code: None,
                dailies: vec![daily(date(3, 3))],
                records: vec![record("E001", date(3, 3))],
            },
        );
        assert_eq!(app.monthly.records.len(), 1);

        app.monthly.shift(1);
        app.load_monthly();
        assert!(app.monthly.records.is_empty());
        assert!(app.monthly.summaries.is_empty());
    }

    #[test]
    fn test_daily_range_change_drops_old_rows() {
        let mut app = test_app();
        app.load_daily();
        let old = app.daily.pending.unwrap();

        app.daily.range = DateRange::last_days(date(3, 15), 7);
        app.load_daily();
        let current = app.daily.pending.unwrap();

        deliver(&mut app, UiMessage::DailyLoaded { request: old, rows: vec![daily(date(2, 20))] });
        assert!(app.daily.rows.is_empty());
        assert!(app.daily.loading());

        deliver(&mut app, UiMessage::DailyLoaded { request: current, rows: vec![daily(date(3, 14))] });
        assert_eq!(app.daily.rows.len(), 1);
        assert!(!app.daily.loading());
    }

    #[test]
    fn test_records_for_previous_employee_are_dropped() {
        let mut app = test_app();
        app.select_employee("E001".to_string());
        let first = app.employees.pending_records.unwrap();
        app.select_employee("E002".to_string());
        let second = app.employees.pending_records.unwrap();

        deliver(
            &mut app,
            UiMessage::EmployeeRecordsLoaded {
                request: first,
                records: vec![record("E001", date(3, 10))],
            },
        );
        assert!(app.employees.records.is_empty());

        deliver(
            &mut app,
            UiMessage::EmployeeRecordsLoaded {
                request: second,
                records: vec![record("E002", date(3, 10))],
            },
        );
        assert_eq!(app.employees.records[0].emp_code, "E002");
    }

    #[test]
    fn test_records_for_previous_range_are_dropped() {
        let mut app = test_app();
        app.select_employee("E001".to_string());
        let wide = app.employees.pending_records.unwrap();

        app.employees.range = DateRange::last_days(date(3, 15), 7);
        app.load_employee_records();
        let narrow = app.employees.pending_records.unwrap();

        deliver(
            &mut app,
            UiMessage::EmployeeRecordsLoaded {
                request: narrow,
                records: vec![record("E001", date(3, 14))],
            },
        );
        deliver(
            &mut app,
            UiMessage::EmployeeRecordsLoaded {
                request: wide,
                records: vec![record("E001", date(2, 20)), record("E001", date(3, 14))],
            },
        );
        assert_eq!(app.employees.records.len(), 1);
        assert_eq!(app.employees.records[0].date, date(3, 14));
    }

    #[test]
    fn test_details_for_previous_week_are_dropped() {
        let mut app = test_app();
        app.select_week(&week(date(3, 3)));
        let first = app.weekly.pending_details.unwrap();
        app.select_week(&week(date(3, 10)));
        let second = app.weekly.pending_details.unwrap();

        deliver(
            &mut app,
            UiMessage::WeekDetailsLoaded {
                request: first,
                records: vec![record("E001", date(3, 4))],
            },
        );
        assert!(app.weekly.details.is_empty());
        assert!(app.weekly.loading_details());

        deliver(
            &mut app,
            UiMessage::WeekDetailsLoaded {
                request: second,
                records: vec![record("E002", date(3, 11)), record("E002", date(3, 12))],
            },
        );
        assert_eq!(app.weekly.details.len(), 1);
        assert_eq!(app.weekly.details[0].emp_code, "E002");
        assert_eq!(app.weekly.details[0].total_days, 2);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut app = test_app();
        app.load_daily();
        let old = app.daily.pending.unwrap();
        app.load_daily();
        let current = app.daily.pending.unwrap();

        deliver(
            &mut app,
            UiMessage::LoadFailed {
                slot: Slot::DailyRows,
                request: old,
                error: "timeout".to_string(),
            },
        );
        assert!(app.error_message.is_none());
        assert!(app.daily.loading());

        deliver(
            &mut app,
            UiMessage::LoadFailed {
                slot: Slot::DailyRows,
                request: current,
                error: "timeout".to_string(),
            },
        );
        assert_eq!(app.error_message.as_deref(), Some("Daily Summary: timeout"));
        assert!(!app.daily.loading());
    }
}
