//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "pair-admin";

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the route backend.
    pub base_url: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// Where client-side state is kept on disk.
///
/// Unset paths resolve under `<data_dir>/pair-admin/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the priority cache file.
    pub priority_cache_path: Option<PathBuf>,
    /// Override for the session file.
    pub session_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the priority cache location.
    #[must_use]
    pub fn priority_cache_path(&self) -> PathBuf {
        self.priority_cache_path
            .clone()
            .unwrap_or_else(|| data_dir().join("priorities.json"))
    }

    /// Resolve the session file location.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| data_dir().join("session.json"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Thresholds (in percent) used to classify stats snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// Aggregate failure rate above which the system is flagged.
    pub aggregate_danger_failure_rate: f64,
    /// Aggregate success rate above which the system is healthy.
    pub aggregate_healthy_success_rate: f64,
    /// Per-route success rate above which a route is healthy.
    pub route_healthy_success_rate: f64,
    /// Per-route failure rate above which a route is flagged.
    pub route_danger_failure_rate: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            aggregate_danger_failure_rate: 12.0,
            aggregate_healthy_success_rate: 50.0,
            route_healthy_success_rate: 90.0,
            route_danger_failure_rate: 10.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub health: HealthConfig,
}
