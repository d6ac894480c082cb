//! SaRa Report - a terminal dashboard for daily report data.
//!
//! Pick a date, fetch the report for it from the configured endpoint, browse
//! it as a table and export it as CSV. A headless `--fetch` mode does the
//! same in one shot for scripts.

mod app;
mod ui;
mod utils;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sara_report_core::export::{self, ExportError};
use sara_report_core::{Config, ReportSource, Session, Table};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;
use utils::parse_date_input;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "sara-report.log";

const USAGE: &str = "\
Usage: sara-report [OPTIONS]

Without options, starts the interactive dashboard.

Options:
  --fetch YYYY-MM-DD   Fetch the report for a date and write it as CSV
  --out DIR            Directory for --fetch output (default: configured export dir)
  --init-config        Write the current settings to the config file
  -h, --help           Show this help";

/// Initialize the tracing subscriber writing to stderr
fn init_stderr_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Initialize tracing into a log file, since the TUI owns the terminal.
/// The returned guard must be held until shutdown so buffered lines are flushed.
fn init_file_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_dir = config.log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;

    if args.iter().any(|a| a == "--init-config") {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if let Some(date_arg) = flag_value(&args, "--fetch")? {
        init_stderr_tracing();
        let out_dir = flag_value(&args, "--out")?.map(PathBuf::from);
        return fetch_once(config, &date_arg, out_dir).await;
    }

    if let Some(unknown) = args.first() {
        bail!("Unknown argument: {}\n\n{}", unknown, USAGE);
    }

    let _log_guard = init_file_tracing(&config);
    info!("SaRa Report starting");

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("SaRa Report shutting down");
    Ok(())
}

/// Value following `flag`, if the flag is present
fn flag_value(args: &[String], flag: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => match args.get(i + 1) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.clone())),
            _ => bail!("{} requires a value", flag),
        },
    }
}

/// Headless login, fetch and CSV export for a single date
async fn fetch_once(config: Config, date_arg: &str, out_dir: Option<PathBuf>) -> Result<()> {
    let date = parse_date_input(date_arg)?;
    let source = ReportSource::from_config(&config)?;
    let mut session = Session::new(config.credential_scheme()?);

    if session.is_gated() {
        let password = rpassword::prompt_password("Password: ")?;
        if !session.attempt_login(&source, password.into()).await {
            bail!("Invalid password");
        }
        eprintln!("Authentication successful!");
    }

    eprintln!("Fetching data for {}...", date);
    let payload = match source.fetch_report(date, session.require_authenticated()?).await {
        Ok(payload) => payload,
        Err(e) => {
            if let Some(raw) = e.raw() {
                eprintln!("{}", serde_json::to_string_pretty(raw)?);
            }
            bail!(e.user_message());
        }
    };

    let table = Table::from_payload(&payload);
    let dir = out_dir.unwrap_or_else(|| config.export_dir());
    match export::write_csv(&dir, date, &table) {
        Ok(path) => println!("{}", path.display()),
        Err(ExportError::Empty) => eprintln!("{}", ExportError::Empty),
        Err(e) => return Err(e.into()),
    }

    eprintln!("Total records: {}", table.row_count());
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Queued work runs after the draw so its status message is on screen
        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["--fetch", "2024-01-01", "--out", "/tmp"]);
        assert_eq!(flag_value(&a, "--fetch").unwrap().as_deref(), Some("2024-01-01"));
        assert_eq!(flag_value(&a, "--out").unwrap().as_deref(), Some("/tmp"));
        assert_eq!(flag_value(&a, "--missing").unwrap(), None);

        assert!(flag_value(&args(&["--fetch"]), "--fetch").is_err());
        assert!(flag_value(&args(&["--fetch", "--out"]), "--fetch").is_err());
    }
}
