//! API error types.

use std::path::PathBuf;

/// Errors from backend API operations.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// No session is available for an authenticated endpoint.
    #[error("Not signed in (run `pair-admin signin` or set PAIR_ADMIN_TOKEN)")]
    Unauthenticated,

    /// The configured base URL cannot be used.
    #[error("Invalid backend URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection or transport failure.
    #[error("Request to backend failed: {0}")]
    Transport(String),

    /// The request did not complete in time.
    #[error("Backend request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Backend {
        status: u16,
        /// Message supplied by the backend, if the body carried one.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    /// The number list attached to a new route could not be read.
    #[error("Failed to read number list {path}: {source}")]
    NumberList {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ApiError {
    /// Message to show an operator: the backend's own text when it sent one,
    /// otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Backend {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status reported by the backend, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Backends answer with `{"error": "..."}` or `{"message": "..."}`.
pub(crate) fn extract_backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}
