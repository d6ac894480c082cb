use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::ReportError;

/// Field names under which a wrapped record sequence is looked for
pub const DEFAULT_RECORDS_FIELDS: &[&str] = &["data", "records", "items"];

/// One flat record; the field set is decided by the server.
pub type ReportRecord = Map<String, Value>;

/// Decoded report body for one date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub records: Vec<ReportRecord>,
}

impl ReportPayload {
    pub fn new(records: Vec<ReportRecord>) -> Self {
        Self { records }
    }

    /// Decode a response body.
    ///
    /// Accepts a bare array of objects, or an object holding such an array
    /// under one of `records_fields`. Valid JSON of any other shape fails with
    /// the decoded value attached so it can still be shown to the user.
    pub fn from_body<S: AsRef<str>>(body: &[u8], records_fields: &[S]) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ReportError::decode(format!("body is not valid JSON: {}", e)))?;
        Self::from_value(value, records_fields)
    }

    pub fn from_value<S: AsRef<str>>(value: Value, records_fields: &[S]) -> Result<Self, ReportError> {
        let items = match &value {
            Value::Array(items) => Some(items),
            Value::Object(obj) => records_fields
                .iter()
                .find_map(|field| obj.get(field.as_ref()).and_then(Value::as_array)),
            _ => None,
        };

        let records = match items {
            None => Err("response does not contain a record sequence"),
            Some(items) => items
                .iter()
                .map(|item| item.as_object().cloned())
                .collect::<Option<Vec<_>>>()
                .ok_or("record sequence contains non-object entries"),
        };

        match records {
            Ok(records) => Ok(Self { records }),
            Err(message) => Err(ReportError::Decode {
                message: message.to_string(),
                raw: Some(value),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<ReportPayload, ReportError> {
        ReportPayload::from_body(body.as_bytes(), DEFAULT_RECORDS_FIELDS)
    }

    #[test]
    fn test_bare_array() {
        let payload = decode(r#"[{"timestamp":"2024-01-01 09:00:00","revenue":100,"orders":5}]"#)
            .expect("bare array should decode");
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.records[0]["revenue"], Value::from(100));
    }

    #[test]
    fn test_wrapped_object() {
        let payload = decode(r#"{"status":"ok","data":[{"a":1},{"a":2,"b":"x"}]}"#)
            .expect("wrapped array should decode");
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_custom_records_field() {
        let body = br#"{"rows":[{"a":1}]}"#;
        assert!(ReportPayload::from_body(body, DEFAULT_RECORDS_FIELDS).is_err());
        let payload = ReportPayload::from_body(body, &["rows"]).expect("custom field should decode");
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn test_empty_array() {
        let payload = decode("[]").expect("empty array is a valid payload");
        assert!(payload.is_empty());
    }

    #[test]
    fn test_invalid_json_has_no_raw() {
        let err = decode("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ReportError::Decode { raw: None, .. }));
    }

    #[test]
    fn test_unexpected_shape_keeps_raw() {
        let err = decode(r#"{"message":"no data today"}"#).unwrap_err();
        assert_eq!(err.raw(), Some(&serde_json::json!({"message": "no data today"})));

        let err = decode("[1, 2, 3]").unwrap_err();
        assert_eq!(err.raw(), Some(&serde_json::json!([1, 2, 3])));

        let err = decode("42").unwrap_err();
        assert!(err.raw().is_some());
    }
}
