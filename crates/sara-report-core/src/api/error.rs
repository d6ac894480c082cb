use thiserror::Error;

/// Failure kinds for the report workflow.
///
/// Every kind is recoverable by a new user action; none of them ends the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Invalid response: {message}")]
    Decode {
        message: String,
        /// The decoded body, when it was valid JSON but not a record sequence
        raw: Option<serde_json::Value>,
    },

    #[error("Access denied")]
    AuthDenied,
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ReportError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        ReportError::Decode {
            message: message.into(),
            raw: None,
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        ReportError::Transport(format!("{}: {}", kind, err))
    }

    /// The raw decoded body, if the failure kept one for inspection
    pub fn raw(&self) -> Option<&serde_json::Value> {
        match self {
            ReportError::Decode { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }

    /// Short message suitable for a status line
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Transport(msg) => format!("Error fetching data: {}", msg),
            ReportError::HttpStatus(401) | ReportError::HttpStatus(403) => {
                "Error fetching data: the server rejected the access key".to_string()
            }
            ReportError::HttpStatus(code) => {
                format!("Error fetching data: server returned HTTP {}", code)
            }
            ReportError::Decode { message, raw } => {
                if raw.is_some() {
                    format!("Error processing data: {} (raw response available)", message)
                } else {
                    format!("Error processing data: {}", message)
                }
            }
            ReportError::AuthDenied => "Invalid password".to_string(),
        }
    }
}
