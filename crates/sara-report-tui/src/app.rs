//! Application state management for the SaRa Report dashboard.
//!
//! This module contains the `App` struct that owns the session, the report
//! source and all UI state. Network work happens in `run_pending`, which the
//! main loop calls after drawing so the "Fetching..." status is visible while
//! the single request is in flight.

use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use tracing::{debug, error, info, warn};

use sara_report_core::export::{self, ExportError};
use sara_report_core::{Config, Credential, ReportError, ReportSource, Session, Table};

use crate::utils::{format_long_date, parse_date_input};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// `YYYY-MM-DD`
const MAX_DATE_INPUT_LENGTH: usize = 10;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    EditingDate,
    ShowingHelp,
    ShowingRaw,
    ConfirmingQuit,
    Quitting,
}

/// Work queued by input handling and run after the next draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Login,
    Fetch,
}

/// A successfully fetched report
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub date: NaiveDate,
    pub table: Table,
}

impl LoadedReport {
    pub fn heading(&self) -> String {
        format!("Report Data for {}", format_long_date(self.date))
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub source: ReportSource,
    pub session: Session,

    pub state: AppState,
    pending: Option<PendingAction>,

    // Login form state
    pub login_password: String,
    pub login_error: Option<String>,

    // Date selection
    pub selected_date: NaiveDate,
    pub date_input: String,
    pub date_error: Option<String>,

    // Report view
    pub report: Option<LoadedReport>,
    pub raw_response: Option<String>,
    pub row_selection: usize,
    pub column_offset: usize,
    pub raw_scroll: u16,

    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let source = ReportSource::from_config(&config)?;
        let session = Session::new(config.credential_scheme()?);
        Ok(Self::with_parts(config, source, session))
    }

    pub fn with_parts(config: Config, source: ReportSource, session: Session) -> Self {
        let state = if session.is_authenticated() {
            AppState::Normal
        } else {
            AppState::LoggingIn
        };
        debug!(?state, gated = session.is_gated(), "App created");

        Self {
            config,
            source,
            session,
            state,
            pending: None,
            login_password: String::new(),
            login_error: None,
            selected_date: Local::now().date_naive(),
            date_input: String::new(),
            date_error: None,
            report: None,
            raw_response: None,
            row_selection: 0,
            column_offset: 0,
            raw_scroll: 0,
            status_message: None,
        }
    }

    // =========================================================================
    // Deferred work
    // =========================================================================

    pub fn queue(&mut self, action: PendingAction) {
        self.status_message = Some(match action {
            PendingAction::Login => "Checking access...".to_string(),
            PendingAction::Fetch => "Fetching data...".to_string(),
        });
        self.pending = Some(action);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the queued action, if any. At most one request is in flight.
    pub async fn run_pending(&mut self) {
        match self.pending.take() {
            Some(PendingAction::Login) => self.attempt_login().await,
            Some(PendingAction::Fetch) => self.fetch_selected_date().await,
            None => {}
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Probe the entered password and open the dashboard if it is accepted
    pub async fn attempt_login(&mut self) {
        let candidate = Credential::new(std::mem::take(&mut self.login_password));
        if self.session.attempt_login(&self.source, candidate).await {
            self.login_error = None;
            self.state = AppState::Normal;
            self.status_message = Some("Authentication successful!".to_string());
        } else {
            self.login_error = Some(ReportError::AuthDenied.user_message());
            self.status_message = None;
        }
    }

    pub fn logout(&mut self) {
        if !self.session.is_gated() {
            self.status_message = Some("This deployment does not require a login".to_string());
            return;
        }
        self.session.logout();
        self.clear_report();
        self.login_password.clear();
        self.login_error = None;
        self.status_message = None;
        self.state = AppState::LoggingIn;
    }

    // =========================================================================
    // Report
    // =========================================================================

    fn clear_report(&mut self) {
        self.report = None;
        self.raw_response = None;
        self.row_selection = 0;
        self.column_offset = 0;
        self.raw_scroll = 0;
    }

    /// Fetch the report for `selected_date` with the session credential
    pub async fn fetch_selected_date(&mut self) {
        let date = self.selected_date;
        self.clear_report();

        let credential = match self.session.require_authenticated() {
            Ok(credential) => credential,
            Err(_) => {
                warn!("Fetch requested without an authenticated session");
                self.status_message = Some("Please log in to fetch data".to_string());
                self.state = AppState::LoggingIn;
                return;
            }
        };

        match self.source.fetch_report(date, credential).await {
            Ok(payload) => {
                let table = Table::from_payload(&payload);
                info!(%date, rows = table.row_count(), "Report loaded");
                self.status_message = Some(format!("Total records: {}", table.row_count()));
                self.report = Some(LoadedReport { date, table });
            }
            Err(e) => {
                error!(error = %e, %date, "Fetch failed");
                self.status_message = Some(e.user_message());
                if let Some(raw) = e.raw() {
                    self.raw_response = Some(
                        serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string()),
                    );
                    self.state = AppState::ShowingRaw;
                }
            }
        }
    }

    /// Write the loaded report as CSV into the export directory
    pub fn export_csv(&mut self) {
        let Some(report) = self.report.as_ref() else {
            self.status_message = Some("Fetch a report before exporting".to_string());
            return;
        };

        let dir = self.config.export_dir();
        self.status_message = Some(match export::write_csv(&dir, report.date, &report.table) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(ExportError::Empty) => ExportError::Empty.to_string(),
            Err(e) => {
                error!(error = %e, "Export failed");
                e.to_string()
            }
        });
    }

    pub fn toggle_raw(&mut self) {
        match self.state {
            AppState::ShowingRaw => self.state = AppState::Normal,
            AppState::Normal if self.raw_response.is_some() => {
                self.raw_scroll = 0;
                self.state = AppState::ShowingRaw;
            }
            _ => {}
        }
    }

    // =========================================================================
    // Date selection
    // =========================================================================

    pub fn previous_day(&mut self) {
        if let Some(date) = self.selected_date.checked_sub_days(Days::new(1)) {
            self.selected_date = date;
        }
    }

    pub fn next_day(&mut self) {
        if let Some(date) = self.selected_date.checked_add_days(Days::new(1)) {
            self.selected_date = date;
        }
    }

    pub fn select_today(&mut self) {
        self.selected_date = Local::now().date_naive();
    }

    pub fn start_date_edit(&mut self) {
        self.date_input = self.selected_date.format("%Y-%m-%d").to_string();
        self.date_error = None;
        self.state = AppState::EditingDate;
    }

    pub fn commit_date_edit(&mut self) {
        match parse_date_input(&self.date_input) {
            Ok(date) => {
                self.selected_date = date;
                self.date_error = None;
                self.state = AppState::Normal;
            }
            Err(e) => self.date_error = Some(e.to_string()),
        }
    }

    pub fn cancel_date_edit(&mut self) {
        self.date_error = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Table navigation
    // =========================================================================

    fn row_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.table.row_count())
    }

    fn column_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.table.columns.len())
    }

    pub fn select_next_row(&mut self, step: usize) {
        let last = self.row_count().saturating_sub(1);
        self.row_selection = (self.row_selection + step).min(last);
    }

    pub fn select_prev_row(&mut self, step: usize) {
        self.row_selection = self.row_selection.saturating_sub(step);
    }

    pub fn scroll_right(&mut self) {
        if self.column_offset + 1 < self.column_count() {
            self.column_offset += 1;
        }
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(1);
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a date input character should be accepted
pub fn can_add_date_char(current_len: usize, c: char) -> bool {
    current_len < MAX_DATE_INPUT_LENGTH && (c.is_ascii_digit() || c == '-')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use sara_report_core::{CredentialScheme, FixtureSource, SessionState};

    use super::*;

    fn fixture_app(scheme: CredentialScheme) -> App {
        App::with_parts(
            Config::default(),
            ReportSource::Fixture(FixtureSource::new()),
            Session::new(scheme),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -------------------------------------------------------------------------
    // Session Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_gated_app_starts_at_login() {
        assert_eq!(fixture_app(CredentialScheme::PerSession).state, AppState::LoggingIn);
        assert_eq!(fixture_app(CredentialScheme::None).state, AppState::Normal);
        assert_eq!(
            fixture_app(CredentialScheme::Fixed("k".into())).state,
            AppState::Normal
        );
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let mut app = fixture_app(CredentialScheme::PerSession);

        app.attempt_login().await;
        assert_eq!(app.login_error.as_deref(), Some("Invalid password"));
        assert_eq!(app.state, AppState::LoggingIn);

        app.login_password = "demo".to_string();
        app.queue(PendingAction::Login);
        app.run_pending().await;
        assert_eq!(app.state, AppState::Normal);
        assert!(app.login_password.is_empty());
        assert_eq!(app.session.state(), SessionState::Authenticated);

        app.logout();
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.session.state(), SessionState::Unauthenticated);
        assert!(app.report.is_none());
    }

    #[test]
    fn test_logout_on_ungated_session_is_ignored() {
        let mut app = fixture_app(CredentialScheme::None);
        app.logout();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.is_authenticated());
    }

    // -------------------------------------------------------------------------
    // Fetch Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_loads_table() {
        let mut app = fixture_app(CredentialScheme::None);
        app.selected_date = date(2024, 1, 1);

        app.queue(PendingAction::Fetch);
        assert!(app.has_pending());
        app.run_pending().await;
        assert!(!app.has_pending());

        let report = app.report.as_ref().expect("report should be loaded");
        assert_eq!(report.table.row_count(), 24);
        assert_eq!(report.heading(), "Report Data for January 01, 2024");
        assert_eq!(app.status_message.as_deref(), Some("Total records: 24"));
    }

    #[tokio::test]
    async fn test_fetch_while_logged_out_returns_to_login() {
        let mut app = fixture_app(CredentialScheme::PerSession);
        app.state = AppState::Normal;

        app.fetch_selected_date().await;
        assert!(app.report.is_none());
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.status_message.as_deref(), Some("Please log in to fetch data"));
    }

    #[tokio::test]
    async fn test_decode_failure_shows_raw_response() {
        let path = std::env::temp_dir().join(format!("sara_report_app_raw_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"message":"maintenance"}"#).unwrap();

        let mut app = App::with_parts(
            Config::default(),
            ReportSource::Fixture(FixtureSource::from_file(&path, vec!["data".to_string()])),
            Session::new(CredentialScheme::None),
        );
        app.fetch_selected_date().await;

        assert!(app.report.is_none());
        assert_eq!(app.state, AppState::ShowingRaw);
        assert!(app.raw_response.as_deref().unwrap().contains("maintenance"));

        app.toggle_raw();
        assert_eq!(app.state, AppState::Normal);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("sara_report_app_export_{}", std::process::id()));
        let mut app = fixture_app(CredentialScheme::None);
        app.config.export_dir = Some(dir.clone());

        app.export_csv();
        assert_eq!(app.status_message.as_deref(), Some("Fetch a report before exporting"));

        app.selected_date = date(2024, 1, 1);
        app.fetch_selected_date().await;
        app.export_csv();

        let path = dir.join("report_data_2024-01-01.csv");
        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,revenue,orders\n"));
        assert_eq!(contents.lines().count(), 25);

        let _ = std::fs::remove_dir_all(dir);
    }

    // -------------------------------------------------------------------------
    // Date Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_day_navigation() {
        let mut app = fixture_app(CredentialScheme::None);
        app.selected_date = date(2024, 3, 1);
        app.previous_day();
        assert_eq!(app.selected_date, date(2024, 2, 29));
        app.next_day();
        app.next_day();
        assert_eq!(app.selected_date, date(2024, 3, 2));
        app.select_today();
        assert_eq!(app.selected_date, Local::now().date_naive());
    }

    #[test]
    fn test_date_edit() {
        let mut app = fixture_app(CredentialScheme::None);
        app.selected_date = date(2024, 1, 1);

        app.start_date_edit();
        assert_eq!(app.date_input, "2024-01-01");
        app.date_input = "2024-13-01".to_string();
        app.commit_date_edit();
        assert!(app.date_error.is_some());
        assert_eq!(app.state, AppState::EditingDate);

        app.date_input = "2023-07-04".to_string();
        app.commit_date_edit();
        assert_eq!(app.selected_date, date(2023, 7, 4));
        assert_eq!(app.state, AppState::Normal);
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_row_and_column_bounds() {
        let mut app = fixture_app(CredentialScheme::None);
        app.fetch_selected_date().await;

        app.select_next_row(100);
        assert_eq!(app.row_selection, 23);
        app.select_prev_row(PAGE_SCROLL_SIZE);
        assert_eq!(app.row_selection, 13);
        app.select_prev_row(100);
        assert_eq!(app.row_selection, 0);

        for _ in 0..10 {
            app.scroll_right();
        }
        assert_eq!(app.column_offset, 2);
        app.scroll_left();
        assert_eq!(app.column_offset, 1);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        // Exceeds max length
        assert!(!can_add_password_char(128, 'a'));
        // Control characters rejected
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_date_char() {
        assert!(can_add_date_char(0, '2'));
        assert!(can_add_date_char(4, '-'));
        assert!(!can_add_date_char(10, '1'));
        assert!(!can_add_date_char(0, 'x'));
    }
}
