//! Health classification of stats snapshots.

use serde::{Deserialize, Serialize};

use super::types::{AggregateStats, RouteStats};
use crate::config::HealthConfig;

/// Coarse health of a route or of the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Healthy,
    Neutral,
    Danger,
}

impl Health {
    /// Short label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Neutral => "neutral",
            Self::Danger => "danger",
        }
    }
}

/// Classify aggregate stats. A high failure rate wins over a high success rate.
#[must_use]
pub fn classify_aggregate(stats: &AggregateStats, thresholds: &HealthConfig) -> Health {
    if stats.overall_failure_rate > thresholds.aggregate_danger_failure_rate {
        Health::Danger
    } else if stats.overall_success_rate > thresholds.aggregate_healthy_success_rate {
        Health::Healthy
    } else {
        Health::Neutral
    }
}

/// Classify a single route's stats.
#[must_use]
pub fn classify_route(stats: &RouteStats, thresholds: &HealthConfig) -> Health {
    if stats.total_rate_of_failure > thresholds.route_danger_failure_rate {
        Health::Danger
    } else if stats.total_rate_of_success > thresholds.route_healthy_success_rate {
        Health::Healthy
    } else {
        Health::Neutral
    }
}
