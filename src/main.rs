//! Attendance Analytics - desktop dashboard for daily, weekly and monthly attendance reports.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use eframe::egui;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use attendance_analytics as app;

use app::aggregate::summarize_by_employee;
use app::config::{AppConfig, ConfigLoadResult};
use app::export::{ExportFormat, ExportKind, ExportTable};
use app::format::{parse_flexible_date, parse_month};
use app::models::{DateRange, RecordQuery};
use app::source::{DataSource, connect_verified};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop dashboard for attendance analytics.
#[derive(Parser)]
#[command(name = "attendance-analytics", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a report to a file without opening a window
    Export(ExportArgs),
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Report to export
    #[arg(value_enum)]
    kind: KindArg,

    /// First day of the range
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Last day of the range
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,

    /// Month for monthly reports, as YYYY-MM
    #[arg(long, value_parser = parse_month_arg)]
    month: Option<(i32, u32)>,

    /// Restrict to one employee
    #[arg(long)]
    emp_code: Option<String>,

    /// Maximum number of summary rows
    #[arg(long)]
    limit: Option<u64>,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Destination file
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Daily,
    Weekly,
    WeeklyDetails,
    Employee,
    Monthly,
}

impl From<KindArg> for ExportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Daily => ExportKind::Daily,
            KindArg::Weekly => ExportKind::Weekly,
            KindArg::WeeklyDetails => ExportKind::WeeklyDetails,
            KindArg::Employee => ExportKind::Employee,
            KindArg::Monthly => ExportKind::Monthly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_flexible_date(input).ok_or_else(|| format!("invalid date '{input}', expected YYYY-MM-DD"))
}

fn parse_month_arg(input: &str) -> Result<(i32, u32), String> {
    parse_month(input).ok_or_else(|| format!("invalid month '{input}', expected YYYY-MM"))
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging();

    tracing::info!("Attendance Analytics {} starting...", env!("CARGO_PKG_VERSION"));

    // Determine config path based on mode
    let config_path = match cli.config {
        Some(path) => path,
        None if cli.dev => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        None => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::new(AppConfig::default()), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::new(AppConfig::default()), Some(e.to_string()))
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    match (cli.command, launch_mode) {
        (Some(Command::Export(args)), LaunchMode::Normal(config)) => rt.block_on(run_export(&config, args)),
        (Some(Command::Export(_)), LaunchMode::Setup(_, error)) => {
            bail!(
                "No usable config at {}{}",
                config_path.display(),
                error.map(|e| format!(": {e}")).unwrap_or_default()
            )
        }
        (None, LaunchMode::Normal(config)) => {
            match rt.block_on(connect_verified(&config)) {
                Ok((source, server)) => {
                    tracing::info!("{}: {}", source.kind().label(), server);
                    run_main_app(rt, source, config)
                }
                Err(e) => {
                    tracing::error!("Failed to connect: {}", e);
                    let message = format!("Failed to connect: {e}");
                    run_setup_wizard(SetupWizard::new(config), Some(message), config_path, rt)
                }
            }
        }
        (None, LaunchMode::Setup(wizard, error)) => run_setup_wizard(wizard, error, config_path, rt),
    }
}

/// Log to stdout and to a daily rolling file in the platform data directory.
fn init_logging() -> WorkerGuard {
    let log_dir = ProjectDirs::from("", "", "attendance-analytics")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    let file_appender = tracing_appender::rolling::daily(&log_dir, "attendance-analytics.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

/// Register the phosphor icon font next to the default fonts.
fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Run the setup wizard.
fn run_setup_wizard(
    wizard: SetupWizard,
    initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Attendance Analytics - Setup")
            .with_inner_size([600.0, 520.0])
            .with_min_inner_size([500.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Attendance Analytics - Setup",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Run the main application.
fn run_main_app(rt: tokio::runtime::Runtime, source: DataSource, config: AppConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Attendance Analytics")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Attendance Analytics",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(rt, source, config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Date range from `--from`/`--to`, defaulting to the configured window ending today.
fn export_range(args: &ExportArgs, config: &AppConfig, today: NaiveDate) -> anyhow::Result<DateRange> {
    let fallback = DateRange::last_days(today, config.reports.default_days);
    let start = args.from.unwrap_or(fallback.start);
    let end = args.to.unwrap_or(if args.from.is_some() { today.max(start) } else { fallback.end });
    Ok(DateRange::new(start, end)?)
}

/// Headless export of one report kind.
async fn run_export(config: &AppConfig, args: ExportArgs) -> anyhow::Result<()> {
    let source = DataSource::connect(config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.source.kind.label()))?;
    let today = Local::now().date_naive();

    let table = match args.kind {
        KindArg::Daily => {
            let range = export_range(&args, config, today)?;
            let limit = args.limit.unwrap_or(config.reports.daily_limit);
            ExportTable::daily(&source.daily_summaries(range, limit).await?)
        }
        KindArg::Weekly => {
            let range = match (args.from, args.to) {
                (None, None) => None,
                _ => Some(export_range(&args, config, today)?),
            };
            let limit = args.limit.unwrap_or(config.reports.weekly_limit);
            ExportTable::weekly(&source.weekly_summaries(range, limit).await?)
        }
        KindArg::WeeklyDetails => {
            let range = match (args.from, args.to) {
                (Some(_), Some(_)) => export_range(&args, config, today)?,
                (from, _) => DateRange::week_of(from.unwrap_or(today)),
            };
            let query = RecordQuery {
                range,
                emp_code: args.emp_code.clone(),
            };
            ExportTable::weekly_details(&summarize_by_employee(&source.employee_records(&query).await?))
        }
        KindArg::Employee => {
            let Some(emp_code) = args.emp_code.clone() else {
                bail!("--emp-code is required for employee exports");
            };
            let range = export_range(&args, config, today)?;
            ExportTable::employee(&source.employee_records(&RecordQuery::employee(range, emp_code)).await?)
        }
        KindArg::Monthly => {
            let (year, month) = args.month.unwrap_or((today.year(), today.month()));
            let query = RecordQuery {
                range: DateRange::month(year, month)?,
                emp_code: args.emp_code.clone(),
            };
            ExportTable::monthly(&source.employee_records(&query).await?)
        }
    };

    let kind = ExportKind::from(args.kind);
    if table.is_empty() {
        tracing::warn!("No {:?} rows matched, writing header only", kind);
    }

    table
        .save(&args.output, args.format.into())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Exported {} rows to {}", table.rows.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "attendance-analytics",
            "export",
            "weekly-details",
            "--from",
            "2025/1/6",
            "--format",
            "xlsx",
            "--output",
            "week.xlsx",
        ])
        .unwrap();

        let Some(Command::Export(args)) = cli.command else {
            panic!("expected export command");
        };
        assert!(matches!(args.kind, KindArg::WeeklyDetails));
        assert_eq!(args.from, Some(date(2025, 1, 6)));
        assert!(matches!(args.format, FormatArg::Xlsx));
    }

    #[test]
    fn test_cli_rejects_bad_month() {
        let result = Cli::try_parse_from([
            "attendance-analytics",
            "export",
            "monthly",
            "--month",
            "2025-13",
            "--output",
            "m.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_range_defaults() {
        let cli = Cli::try_parse_from(["attendance-analytics", "export", "daily", "-o", "d.csv"]).unwrap();
        let Some(Command::Export(args)) = cli.command else {
            panic!("expected export command");
        };
        let config = AppConfig::default();
        let range = export_range(&args, &config, date(2025, 1, 31)).unwrap();

        assert_eq!(range.end, date(2025, 1, 31));
        assert_eq!(range.days(), config.reports.default_days);
    }
}
