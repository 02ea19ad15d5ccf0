//! Backend seams used by the route and stats coordinators.

use async_trait::async_trait;

use super::types::{RouteAction, RouteDraft, RouteRecord};
use super::{ApiClient, ApiError};
use crate::stats::{AggregateStats, RouteStats};

/// Route operations the coordinators depend on.
#[async_trait]
pub trait RouteBackend: Send + Sync {
    /// Fetch every route, in backend order.
    async fn list_routes(&self) -> Result<Vec<RouteRecord>, ApiError>;

    /// Store one route's priority.
    async fn update_priority(&self, pair_id: &str, priority: u32) -> Result<(), ApiError>;

    /// Send a lifecycle command for a route.
    async fn route_action(&self, action: RouteAction, pair_name: &str) -> Result<(), ApiError>;

    /// Create a route.
    async fn create_route(&self, draft: &RouteDraft) -> Result<serde_json::Value, ApiError>;
}

/// Stats operations.
#[async_trait]
pub trait StatsBackend: Send + Sync {
    async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError>;

    async fn route_stats(&self, pair_name: &str) -> Result<RouteStats, ApiError>;

    async fn update_route_stats(
        &self,
        pair_name: &str,
        stats: &RouteStats,
    ) -> Result<RouteStats, ApiError>;

    async fn delete_route_stats(&self, pair_name: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl RouteBackend for ApiClient {
    async fn list_routes(&self) -> Result<Vec<RouteRecord>, ApiError> {
        ApiClient::list_routes(self).await
    }

    async fn update_priority(&self, pair_id: &str, priority: u32) -> Result<(), ApiError> {
        ApiClient::update_priority(self, pair_id, priority).await
    }

    async fn route_action(&self, action: RouteAction, pair_name: &str) -> Result<(), ApiError> {
        ApiClient::route_action(self, action, pair_name).await
    }

    async fn create_route(&self, draft: &RouteDraft) -> Result<serde_json::Value, ApiError> {
        ApiClient::create_route(self, draft).await
    }
}

#[async_trait]
impl StatsBackend for ApiClient {
    async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError> {
        ApiClient::aggregate_stats(self).await
    }

    async fn route_stats(&self, pair_name: &str) -> Result<RouteStats, ApiError> {
        ApiClient::route_stats(self, pair_name).await
    }

    async fn update_route_stats(
        &self,
        pair_name: &str,
        stats: &RouteStats,
    ) -> Result<RouteStats, ApiError> {
        ApiClient::update_route_stats(self, pair_name, stats).await
    }

    async fn delete_route_stats(&self, pair_name: &str) -> Result<(), ApiError> {
        ApiClient::delete_route_stats(self, pair_name).await
    }
}
