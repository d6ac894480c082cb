//! Data models for the report workflow.
//!
//! - `DateRange`: the `from`/`to` window sent as query parameters
//! - `ReportPayload`, `ReportRecord`: the decoded response body

pub mod date_range;
pub mod report;

pub use date_range::{DateRange, QUERY_DATE_FORMAT};
pub use report::{ReportPayload, ReportRecord, DEFAULT_RECORDS_FIELDS};
