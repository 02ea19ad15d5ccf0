//! Wire types for the route backend.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::ApiError;

/// A route ("country pair") as the backend reports it.
///
/// The backend owns identity and lifecycle status; `priority` is whatever
/// the backend last stored and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteRecord {
    /// Opaque identifier. Accepted as a JSON string or number.
    #[serde(deserialize_with = "opaque_id")]
    pub pair_id: String,
    #[serde(rename = "pairName")]
    pub pair_name: String,
    #[serde(rename = "activeStatus", default)]
    pub active_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Lifecycle command for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAction {
    Start,
    Stop,
    Restart,
}

impl RouteAction {
    /// Path segment under `/program/`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a lifecycle command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRequest {
    pub pair_name: String,
}

/// Body of a priority update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityUpdate {
    pub priority: u32,
}

/// An uploaded list of destination numbers (newline or CSV delimited).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberList {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl NumberList {
    /// Read a number list from disk. The contents are sent as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NumberList`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let contents = std::fs::read(path).map_err(|source| ApiError::NumberList {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "numbers.txt".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            file_name,
            contents,
        })
    }

    /// Number of non-empty entries, for display only.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        String::from_utf8_lossy(&self.contents)
            .split(|c| c == '\n' || c == ',')
            .filter(|entry| !entry.trim().is_empty())
            .count()
    }
}

/// Fields collected by the route creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDraft {
    pub pair_name: String,
    pub proxy: String,
    pub number_list: Option<NumberList>,
}

/// Credentials for `POST /signin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

/// Response of `POST /signin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignInResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl SignInResponse {
    /// Display name for the signed-in user, if the backend sent one.
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        match self.user.as_ref()? {
            serde_json::Value::String(name) => Some(name.clone()),
            serde_json::Value::Object(map) => ["username", "email"]
                .iter()
                .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
                .map(String::from),
            _ => None,
        }
    }
}

/// Envelope the stats endpoints wrap their payload in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsEnvelope<T> {
    pub stats: T,
}
