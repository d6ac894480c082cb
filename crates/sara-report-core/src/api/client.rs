//! Client for the report endpoint.
//!
//! One `ReportClient` issues exactly one GET per call. There is no retry at
//! this layer; a failed call is surfaced to the caller, who may try again.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::auth::{Credential, CredentialProbe};
use crate::config::Config;
use crate::models::{DateRange, ReportPayload, DEFAULT_RECORDS_FIELDS};

use super::ReportError;

/// Header carrying the credential, value sent verbatim
pub const APP_KEY_HEADER: &str = "app-key";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the report endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ReportClient {
    client: Client,
    endpoint: String,
    records_fields: Vec<String>,
}

impl ReportClient {
    /// Create a client for `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            records_fields: DEFAULT_RECORDS_FIELDS.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(client.with_records_fields(config.records_fields.clone()))
    }

    /// Override the object fields searched for a wrapped record sequence
    pub fn with_records_fields(mut self, fields: Vec<String>) -> Self {
        self.records_fields = fields;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, range: &DateRange, credential: Option<&Credential>) -> reqwest::Result<Response> {
        let mut request = self.client.get(&self.endpoint).query(&range.query_pairs());
        if let Some(credential) = credential {
            request = request.header(APP_KEY_HEADER, credential.as_str());
        }

        debug!(
            endpoint = %self.endpoint,
            from = %range.from_text(),
            to = %range.to_text(),
            has_key = credential.is_some(),
            "Sending report request"
        );
        request.send().await
    }

    /// Check whether `credential` is accepted by the endpoint.
    ///
    /// Sends one request for today's `23:59:59` instant. Only an exact 200 counts;
    /// any other status or a transport failure is reported as `false`.
    pub async fn probe(&self, credential: &Credential) -> bool {
        let range = DateRange::probe_today();
        match self.send(&range, Some(credential)).await {
            Ok(response) => {
                let status = response.status();
                debug!(status = status.as_u16(), "Probe response received");
                status == StatusCode::OK
            }
            Err(e) => {
                warn!(error = %e, "Probe request failed");
                false
            }
        }
    }

    /// Fetch the report covering `00:00:00`..`23:59:59` of `date`
    pub async fn fetch_report(
        &self,
        date: NaiveDate,
        credential: Option<&Credential>,
    ) -> Result<ReportPayload, ReportError> {
        let range = DateRange::for_day(date);

        let response = self.send(&range, credential).await.map_err(|e| {
            warn!(error = %e, %date, "Report request failed");
            ReportError::from_transport(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %ReportError::truncate_body(&body),
                %date,
                "Report request rejected"
            );
            return Err(ReportError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, %date, "Failed to read report body");
            ReportError::from_transport(&e)
        })?;

        let payload = ReportPayload::from_body(&body, self.records_fields.as_slice()).map_err(|e| {
            warn!(error = %e, %date, "Failed to decode report body");
            e
        })?;

        info!(%date, records = payload.len(), "Report fetched");
        Ok(payload)
    }
}

impl CredentialProbe for ReportClient {
    async fn probe(&self, credential: &Credential) -> bool {
        ReportClient::probe(self, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_endpoint_and_fields() {
        let config = Config {
            endpoint: "http://127.0.0.1:9/report".to_string(),
            records_fields: vec!["rows".to_string()],
            ..Config::default()
        };
        let client = ReportClient::from_config(&config).expect("client should build");
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/report");
        assert_eq!(client.records_fields, vec!["rows".to_string()]);
    }

    #[test]
    fn test_default_records_fields() {
        let client = ReportClient::new("http://localhost/report", Duration::from_secs(1))
            .expect("client should build");
        assert_eq!(client.records_fields, vec!["data", "records", "items"]);
    }
}
