//! Route list, ordering and lifecycle.
//!
//! [`ReorderCoordinator`] owns the displayed list: it merges backend routes
//! with the durable [`PriorityCache`] and runs the optimistic
//! reorder-and-persist flow. [`ActionDispatcher`] and [`CreationPanel`] are
//! stateless with respect to the list; callers refresh it afterwards.

mod actions;
mod create;
mod priority;
mod reorder;
mod store;
mod types;

pub use actions::{ActionDispatcher, ActionError};
pub use create::{CreationPanel, SubmitOutcome, CREATE_FAILED_MESSAGE};
pub use priority::{CacheError, PriorityCache};
pub use reorder::{
    reorder, ReorderCoordinator, ReorderError, ReorderOutcome, REORDER_FAILED_MESSAGE,
};
pub use store::{merge_with_priorities, RouteListStore};
pub use types::{RefreshReason, Route, UNPOSITIONED};
