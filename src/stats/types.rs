//! Stats snapshot types.

use serde::{Deserialize, Serialize};

/// Delivery stats for one route.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteStats {
    pub total_sms_sent: u64,
    pub total_sms_failed: u64,
    /// Percent of attempts that succeeded.
    pub total_rate_of_success: f64,
    /// Percent of attempts that failed.
    pub total_rate_of_failure: f64,
}

/// Delivery stats across every route.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    pub total_sms_sent: u64,
    pub total_sms_failed: u64,
    pub overall_success_rate: f64,
    pub overall_failure_rate: f64,
}
