//! Session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated operator session.
///
/// Created from a successful sign-in and cleared at logout. The API client
/// reads its bearer token from here and nowhere else.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Signed-in user, when the backend reports one.
    #[serde(default)]
    pub user: Option<String>,
    /// Bearer token for authenticated requests.
    pub token: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session from a freshly issued token.
    #[must_use]
    pub fn new(token: impl Into<String>, user: Option<String>) -> Self {
        Self {
            user,
            token: token.into(),
            created_at: Utc::now(),
        }
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Keep tokens out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Errors from session persistence.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
