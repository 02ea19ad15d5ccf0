//! Aggregate and per-route delivery statistics.

mod health;
mod types;
mod view;

pub use health::{classify_aggregate, classify_route, Health};
pub use types::{AggregateStats, RouteStats};
pub use view::{AggregateReport, RouteReport, StatsError, StatsView, STATS_FETCH_FAILED};
