//! Report endpoint client.
//!
//! This module provides the `ReportClient` that performs the single GET
//! against the configured report endpoint, and the `ReportError` taxonomy
//! every failure is classified into.
//!
//! Requests carry the credential verbatim in an `app-key` header and the
//! date window as `from`/`to` query parameters.

pub mod client;
pub mod error;

pub use client::ReportClient;
pub use error::ReportError;
