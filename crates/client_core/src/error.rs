use shared::error::ErrorCode;
use thiserror::Error;

/// Every way an API call can fail. Callers are expected to handle all of
/// them on one path; the variants exist for logs and messages.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP {status}: {reason} ({code:?})")]
    Status {
        code: ErrorCode,
        status: u16,
        reason: String,
    },
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            code: ErrorCode::from_status(status.as_u16()),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown status").to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
