//! Deployment configuration.
//!
//! Settings are read from `~/.config/sara-report/config.json` (or the
//! platform equivalent) and then overridden from the environment. The fixed
//! deployment key is only ever taken from `SARA_REPORT_APP_KEY` and is never
//! written back to the config file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::auth::{Credential, CredentialScheme};
use crate::models::DEFAULT_RECORDS_FIELDS;

/// Application name used for config/log directory paths
const APP_NAME: &str = "sara-report";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_ENDPOINT: &str = "https://meetsum.scg-wedo.tech/api/report";

pub const ENV_ENDPOINT: &str = "SARA_REPORT_ENDPOINT";
pub const ENV_CREDENTIAL_MODE: &str = "SARA_REPORT_CREDENTIAL_MODE";
pub const ENV_DATA_SOURCE: &str = "SARA_REPORT_DATA_SOURCE";
pub const ENV_TIMEOUT_SECS: &str = "SARA_REPORT_TIMEOUT_SECS";
pub const ENV_EXPORT_DIR: &str = "SARA_REPORT_EXPORT_DIR";
pub const ENV_APP_KEY: &str = "SARA_REPORT_APP_KEY";

/// Which credential scheme the deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialMode {
    None,
    Fixed,
    #[default]
    PerSession,
}

impl FromStr for CredentialMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CredentialMode::None),
            "fixed" => Ok(CredentialMode::Fixed),
            "per-session" | "per_session" | "session" => Ok(CredentialMode::PerSession),
            other => bail!("Unknown credential mode: {}", other),
        }
    }
}

/// Where report data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DataSourceKind {
    #[default]
    Live,
    Fixture,
}

impl FromStr for DataSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(DataSourceKind::Live),
            "fixture" | "sample" => Ok(DataSourceKind::Fixture),
            other => bail!("Unknown data source: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub credential_mode: CredentialMode,
    pub data_source: DataSourceKind,
    pub request_timeout_secs: u64,
    pub records_fields: Vec<String>,
    pub export_dir: Option<PathBuf>,
    pub fixture_path: Option<PathBuf>,
    #[serde(skip)]
    pub fixed_credential: Option<Credential>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credential_mode: CredentialMode::default(),
            data_source: DataSourceKind::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            records_fields: DEFAULT_RECORDS_FIELDS.iter().map(|f| f.to_string()).collect(),
            export_dir: None,
            fixture_path: None,
            fixed_credential: None,
        }
    }
}

impl Config {
    /// Load from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(mode) = lookup(ENV_CREDENTIAL_MODE) {
            self.credential_mode = mode.parse()?;
        }
        if let Some(source) = lookup(ENV_DATA_SOURCE) {
            self.data_source = source.parse()?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))?;
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR) {
            self.export_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup(ENV_APP_KEY) {
            self.fixed_credential = Some(Credential::new(key));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            bail!("Report endpoint must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("Request timeout must be at least one second");
        }
        if self.credential_mode == CredentialMode::Fixed
            && self.fixed_credential.as_ref().map_or(true, Credential::is_empty)
        {
            bail!("Fixed credential mode requires {} to be set", ENV_APP_KEY);
        }
        Ok(())
    }

    /// Credential scheme for new sessions
    pub fn credential_scheme(&self) -> Result<CredentialScheme> {
        match self.credential_mode {
            CredentialMode::None => Ok(CredentialScheme::None),
            CredentialMode::PerSession => Ok(CredentialScheme::PerSession),
            CredentialMode::Fixed => self
                .fixed_credential
                .clone()
                .filter(|key| !key.is_empty())
                .map(CredentialScheme::Fixed)
                .ok_or_else(|| anyhow::anyhow!("{} is not set", ENV_APP_KEY)),
        }
    }

    /// Save settings to the default path. The fixed credential is never written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Directory CSV exports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
