//! Route list types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::RouteRecord;

/// Priority given to routes with no known position. Sorts after everything else.
pub const UNPOSITIONED: u32 = u32::MAX;

/// A route as displayed: backend identity and status plus its position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    pub pair_id: String,
    #[serde(rename = "pairName")]
    pub pair_name: String,
    #[serde(rename = "activeStatus")]
    pub active_status: bool,
    /// 1-based position, or [`UNPOSITIONED`].
    pub priority: u32,
}

impl Route {
    /// Build a display route from a backend record and a resolved priority.
    #[must_use]
    pub fn from_record(record: RouteRecord, priority: u32) -> Self {
        Self {
            pair_id: record.pair_id,
            pair_name: record.pair_name,
            active_status: record.active_status,
            priority,
        }
    }

    /// Whether the route has a known position.
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        self.priority != UNPOSITIONED
    }
}

/// Why the route list is being fetched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// First load of the list.
    Mount,
    /// The creation panel closed.
    PanelClosed,
    /// A reorder was persisted and the list revision moved on.
    Revision,
    /// A reorder batch failed; restore backend truth.
    Reconcile,
}

impl RefreshReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::PanelClosed => "panel_closed",
            Self::Revision => "revision",
            Self::Reconcile => "reconcile",
        }
    }
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
