//! Report data sources.
//!
//! A deployment either talks to the live endpoint or serves a static
//! fixture (used for demos and offline work). Both sides present the same
//! `probe`/`fetch_report` surface so callers never branch on which one is active.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::{ReportClient, ReportError};
use crate::auth::{Credential, CredentialProbe};
use crate::config::{Config, DataSourceKind};
use crate::models::{ReportPayload, ReportRecord, QUERY_DATE_FORMAT};

/// Number of hourly sample records generated per day
const SAMPLE_HOURS: u32 = 24;

/// Static report data.
///
/// Without a fixture file, each date gets its own deterministic set of
/// hourly sample records, so asking twice for the same date gives the same answer.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    fixture_path: Option<PathBuf>,
    records_fields: Vec<String>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the contents of a JSON file for every date
    pub fn from_file(path: impl Into<PathBuf>, records_fields: Vec<String>) -> Self {
        Self {
            fixture_path: Some(path.into()),
            records_fields,
        }
    }

    /// Any non-empty credential is accepted
    pub async fn probe(&self, credential: &Credential) -> bool {
        !credential.is_empty()
    }

    pub async fn fetch_report(
        &self,
        date: NaiveDate,
        _credential: Option<&Credential>,
    ) -> Result<ReportPayload, ReportError> {
        let payload = match &self.fixture_path {
            Some(path) => {
                let body = std::fs::read(path).map_err(|e| {
                    ReportError::Transport(format!("failed to read fixture {}: {}", path.display(), e))
                })?;
                ReportPayload::from_body(&body, self.records_fields.as_slice())?
            }
            None => Self::sample_payload(date),
        };
        debug!(%date, records = payload.len(), "Fixture report served");
        Ok(payload)
    }

    /// Hourly sample records for `date`, seeded by the date itself
    pub fn sample_payload(date: NaiveDate) -> ReportPayload {
        let mut rng = StdRng::seed_from_u64(date.num_days_from_ce() as u64);

        let records = (0..SAMPLE_HOURS)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(|time| {
                let orders: u32 = rng.gen_range(0..40);
                let average_ticket: u32 = rng.gen_range(15..60);
                let record = json!({
                    "timestamp": date.and_time(time).format(QUERY_DATE_FORMAT).to_string(),
                    "revenue": orders * average_ticket,
                    "orders": orders,
                });
                match record {
                    Value::Object(map) => map,
                    _ => ReportRecord::new(),
                }
            })
            .collect();

        ReportPayload::new(records)
    }
}

/// The source a deployment is configured to use
#[derive(Debug, Clone)]
pub enum ReportSource {
    Live(ReportClient),
    Fixture(FixtureSource),
}

impl ReportSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = match config.data_source {
            DataSourceKind::Live => {
                let client = ReportClient::from_config(config)
                    .context("Failed to build report client")?;
                ReportSource::Live(client)
            }
            DataSourceKind::Fixture => match &config.fixture_path {
                Some(path) => ReportSource::Fixture(FixtureSource::from_file(
                    path.clone(),
                    config.records_fields.clone(),
                )),
                None => ReportSource::Fixture(FixtureSource::new()),
            },
        };
        info!(source = source.describe(), "Report source configured");
        Ok(source)
    }

    /// Short label for status lines and logs
    pub fn describe(&self) -> &'static str {
        match self {
            ReportSource::Live(_) => "live",
            ReportSource::Fixture(_) => "fixture",
        }
    }

    pub async fn probe(&self, credential: &Credential) -> bool {
        match self {
            ReportSource::Live(client) => client.probe(credential).await,
            ReportSource::Fixture(fixture) => fixture.probe(credential).await,
        }
    }

    pub async fn fetch_report(
        &self,
        date: NaiveDate,
        credential: Option<&Credential>,
    ) -> Result<ReportPayload, ReportError> {
        match self {
            ReportSource::Live(client) => client.fetch_report(date, credential).await,
            ReportSource::Fixture(fixture) => fixture.fetch_report(date, credential).await,
        }
    }
}

impl CredentialProbe for ReportSource {
    async fn probe(&self, credential: &Credential) -> bool {
        ReportSource::probe(self, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sample_payload_is_deterministic() {
        let first = FixtureSource::sample_payload(date(2024, 1, 1));
        let second = FixtureSource::sample_payload(date(2024, 1, 1));
        assert_eq!(first, second);
        assert_eq!(first.len(), 24);

        let other_day = FixtureSource::sample_payload(date(2024, 1, 2));
        assert_ne!(first, other_day);
    }

    #[test]
    fn test_sample_records_shape() {
        let payload = FixtureSource::sample_payload(date(2024, 3, 15));
        let first = &payload.records[0];
        assert_eq!(first["timestamp"], "2024-03-15 00:00:00");
        assert!(first["revenue"].is_u64());
        assert!(first["orders"].is_u64());
        assert_eq!(payload.records[23]["timestamp"], "2024-03-15 23:00:00");
    }

    #[tokio::test]
    async fn test_fixture_probe_rejects_empty_key() {
        let source = ReportSource::Fixture(FixtureSource::new());
        assert!(source.probe(&Credential::new("demo")).await);
        assert!(!source.probe(&Credential::new("")).await);
    }

    #[tokio::test]
    async fn test_fixture_file() {
        let path = std::env::temp_dir().join(format!("sara_report_fixture_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"data":[{"a":1},{"a":2}]}"#).unwrap();

        let source = FixtureSource::from_file(&path, vec!["data".to_string()]);
        let payload = source.fetch_report(date(2024, 1, 1), None).await.unwrap();
        assert_eq!(payload.len(), 2);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_missing_fixture_file_is_an_error() {
        let source = FixtureSource::from_file("/nonexistent/sara_report.json", vec![]);
        let err = source.fetch_report(date(2024, 1, 1), None).await.unwrap_err();
        assert!(matches!(err, ReportError::Transport(_)));
    }

    #[test]
    fn test_from_config_selects_source() {
        let config = Config {
            data_source: DataSourceKind::Fixture,
            ..Config::default()
        };
        let source = ReportSource::from_config(&config).unwrap();
        assert_eq!(source.describe(), "fixture");

        let source = ReportSource::from_config(&Config::default()).unwrap();
        assert_eq!(source.describe(), "live");
    }
}
