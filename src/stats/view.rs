//! Stats fetchers: fresh per view, never cached.

use chrono::{DateTime, Utc};

use super::health::{classify_aggregate, classify_route, Health};
use super::types::{AggregateStats, RouteStats};
use crate::api::{ApiError, StatsBackend};
use crate::config::HealthConfig;

/// Shown when the backend gives no reason of its own.
pub const STATS_FETCH_FAILED: &str = "Failed to fetch statistics";

/// A stats failure with the message to show the operator.
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct StatsError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl StatsError {
    fn new(source: ApiError, fallback: &str) -> Self {
        Self {
            message: source.user_message(fallback),
            source,
        }
    }
}

/// Aggregate stats with their classification.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub stats: AggregateStats,
    pub health: Health,
    pub fetched_at: DateTime<Utc>,
}

/// One route's stats with their classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    pub pair_name: String,
    pub stats: RouteStats,
    pub health: Health,
    pub fetched_at: DateTime<Utc>,
}

/// Reads and edits stats records through a [`StatsBackend`].
pub struct StatsView<'a> {
    backend: &'a dyn StatsBackend,
    thresholds: HealthConfig,
}

impl<'a> StatsView<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn StatsBackend, thresholds: HealthConfig) -> Self {
        Self {
            backend,
            thresholds,
        }
    }

    /// Fetch and classify the overall stats.
    ///
    /// # Errors
    ///
    /// Returns a [`StatsError`] carrying the backend message, or
    /// [`STATS_FETCH_FAILED`] when there is none.
    pub async fn overall(&self) -> Result<AggregateReport, StatsError> {
        let stats = self.backend.aggregate_stats().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch aggregate stats");
            StatsError::new(e, STATS_FETCH_FAILED)
        })?;
        Ok(AggregateReport {
            health: classify_aggregate(&stats, &self.thresholds),
            stats,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch and classify one route's stats.
    ///
    /// # Errors
    ///
    /// Returns a [`StatsError`] if the backend call fails.
    pub async fn route(&self, pair_name: &str) -> Result<RouteReport, StatsError> {
        let stats = self.backend.route_stats(pair_name).await.map_err(|e| {
            tracing::warn!(pair_name = %pair_name, error = %e, "Failed to fetch route stats");
            StatsError::new(e, STATS_FETCH_FAILED)
        })?;
        Ok(self.report(pair_name, stats))
    }

    /// Overwrite a route's stats record and return what the backend stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StatsError`] if the backend call fails.
    pub async fn update(
        &self,
        pair_name: &str,
        stats: &RouteStats,
    ) -> Result<RouteReport, StatsError> {
        let stored = self
            .backend
            .update_route_stats(pair_name, stats)
            .await
            .map_err(|e| {
                tracing::warn!(pair_name = %pair_name, error = %e, "Failed to update route stats");
                StatsError::new(e, "Failed to update statistics")
            })?;
        tracing::info!(pair_name = %pair_name, "Route stats updated");
        Ok(self.report(pair_name, stored))
    }

    /// Delete a route's stats record.
    ///
    /// # Errors
    ///
    /// Returns a [`StatsError`] if the backend call fails.
    pub async fn delete(&self, pair_name: &str) -> Result<(), StatsError> {
        self.backend.delete_route_stats(pair_name).await.map_err(|e| {
            tracing::warn!(pair_name = %pair_name, error = %e, "Failed to delete route stats");
            StatsError::new(e, "Failed to delete statistics")
        })?;
        tracing::info!(pair_name = %pair_name, "Route stats deleted");
        Ok(())
    }

    fn report(&self, pair_name: &str, stats: RouteStats) -> RouteReport {
        RouteReport {
            pair_name: pair_name.to_string(),
            health: classify_route(&stats, &self.thresholds),
            stats,
            fetched_at: Utc::now(),
        }
    }
}
