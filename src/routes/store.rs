//! In-memory ordered route list.

use super::priority::PriorityCache;
use super::types::{Route, UNPOSITIONED};
use crate::api::RouteRecord;

/// Ordered collection of routes. Display order is the vector order.
#[derive(Debug, Clone, Default)]
pub struct RouteListStore {
    routes: Vec<Route>,
    revision: u64,
}

impl RouteListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes in display order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Incremented on every replacement of the list.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole list and bump the revision.
    pub fn replace(&mut self, routes: Vec<Route>) {
        self.routes = routes;
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Merge backend records with cached positions.
///
/// Routes without a cached priority get [`UNPOSITIONED`] and land after
/// every positioned route. The sort is stable, so ties keep backend order.
#[must_use]
pub fn merge_with_priorities(records: Vec<RouteRecord>, cache: &PriorityCache) -> Vec<Route> {
    let mut routes: Vec<Route> = records
        .into_iter()
        .map(|record| {
            let priority = cache
                .get(&record.pair_id)
                .filter(|p| *p >= 1)
                .unwrap_or(UNPOSITIONED);
            Route::from_record(record, priority)
        })
        .collect();
    routes.sort_by_key(|r| r.priority);
    routes
}
