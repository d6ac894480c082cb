//! Core library for SaRa Report.
//!
//! This crate holds everything except the terminal UI:
//!
//! - `auth`: session-scoped credential store and credential schemes
//! - `api`: the report endpoint client and its error taxonomy
//! - `source`: live endpoint or static fixture, selected by configuration
//! - `models`: date ranges and decoded report payloads
//! - `table`: tolerant conversion of a payload into rows and columns
//! - `export`: CSV encoding of a table
//! - `config`: deployment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod export;
pub mod models;
pub mod source;
pub mod table;

pub use api::{ReportClient, ReportError};
pub use auth::{Credential, CredentialProbe, CredentialScheme, Session, SessionState};
pub use config::{Config, CredentialMode, DataSourceKind};
pub use export::ExportError;
pub use models::{DateRange, ReportPayload, ReportRecord};
pub use source::{FixtureSource, ReportSource};
pub use table::Table;
