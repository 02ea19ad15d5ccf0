//! Reorder-and-persist coordination.
//!
//! A move is applied to the local list first, then every route's new
//! priority is sent to the backend concurrently. Batches reach the backend
//! one at a time. Each move takes the next value of an operation counter; a
//! queued batch that has been overtaken is never sent, and the results of a
//! batch or refresh overtaken mid-flight are discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Mutex;

use super::priority::{CacheError, PriorityCache};
use super::store::{merge_with_priorities, RouteListStore};
use super::types::{RefreshReason, Route};
use crate::api::{ApiError, RouteBackend};

/// Shown to the operator when any priority update in a batch fails.
pub const REORDER_FAILED_MESSAGE: &str = "Failed to save the new order. Please try again.";

/// Errors from a reorder.
#[derive(thiserror::Error, Debug)]
pub enum ReorderError {
    /// An index does not address a route in the current list.
    #[error("Cannot move position {from} to {to}: list has {len} routes")]
    IndexOutOfRange { from: usize, to: usize, len: usize },

    /// A previous batch failed and the list has not been re-fetched yet.
    #[error("Route list is out of sync with the backend; refresh before reordering")]
    ReconcilePending,

    /// One or more priority updates failed. The list was re-fetched.
    #[error("Failed to save the new order. Please try again.")]
    Persist { failed: usize, total: usize },

    /// The confirmed order could not be written to the local cache.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result of a reorder that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// No destination: nothing changed.
    Unchanged,
    /// Every priority was stored and the cache updated.
    Persisted { updated: usize },
    /// A newer reorder started before this one settled; its result was dropped.
    Superseded,
}

/// Move the route at `source` to `destination` and renumber priorities
/// `1..=N` in the resulting order.
///
/// # Errors
///
/// Returns [`ReorderError::IndexOutOfRange`] if either index is past the end.
pub fn reorder(
    routes: &[Route],
    source: usize,
    destination: usize,
) -> Result<Vec<Route>, ReorderError> {
    let len = routes.len();
    if source >= len || destination >= len {
        return Err(ReorderError::IndexOutOfRange {
            from: source,
            to: destination,
            len,
        });
    }

    let mut result = routes.to_vec();
    let moved = result.remove(source);
    result.insert(destination, moved);
    for (position, route) in result.iter_mut().enumerate() {
        route.priority = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
    Ok(result)
}

/// A batch whose priorities have been applied locally but not yet confirmed.
struct InFlight {
    op: u64,
    assignment: Vec<(String, u32)>,
}

/// Displayed list plus what is needed to undo or overlay it.
#[derive(Default)]
struct ListState {
    store: RouteListStore,
    /// Last order the backend agreed with: from a refresh or a persisted batch.
    confirmed: Vec<Route>,
    in_flight: Option<InFlight>,
}

/// Owns the displayed route list and keeps it in step with the backend.
///
/// Lock order is `state` then `cache`. Neither is held across a network
/// await. `send_gate` serializes batches so the backend always ends up with
/// the newest assignment.
pub struct ReorderCoordinator {
    backend: Arc<dyn RouteBackend>,
    state: Mutex<ListState>,
    cache: Mutex<PriorityCache>,
    send_gate: Mutex<()>,
    op_seq: AtomicU64,
    reconcile_pending: AtomicBool,
}

impl ReorderCoordinator {
    #[must_use]
    pub fn new(backend: Arc<dyn RouteBackend>, cache: PriorityCache) -> Self {
        Self {
            backend,
            state: Mutex::new(ListState::default()),
            cache: Mutex::new(cache),
            send_gate: Mutex::new(()),
            op_seq: AtomicU64::new(0),
            reconcile_pending: AtomicBool::new(false),
        }
    }

    /// Snapshot of the displayed routes.
    pub async fn routes(&self) -> Vec<Route> {
        self.state.lock().await.store.routes().to_vec()
    }

    /// Current list revision.
    pub async fn revision(&self) -> u64 {
        self.state.lock().await.store.revision()
    }

    /// Snapshot of the priority cache.
    pub async fn cached_priorities(&self) -> std::collections::BTreeMap<String, u32> {
        self.cache.lock().await.entries().clone()
    }

    /// Whether a failed batch is still waiting for a successful refresh.
    #[must_use]
    pub fn is_reconcile_pending(&self) -> bool {
        self.reconcile_pending.load(Ordering::SeqCst)
    }

    fn is_current(&self, op: u64) -> bool {
        self.op_seq.load(Ordering::SeqCst) == op
    }

    /// Fetch routes from the backend and merge them with cached priorities.
    ///
    /// If a reorder starts while the fetch is in flight, the fetched list is
    /// discarded and the current (newer) list is returned instead. While a
    /// batch is being persisted its assignment takes precedence over the
    /// cache, so the optimistic order stays on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    pub async fn refresh(&self, reason: RefreshReason) -> Result<Vec<Route>, ApiError> {
        let op_at_start = self.op_seq.load(Ordering::SeqCst);
        tracing::debug!(reason = %reason, op = op_at_start, "Refreshing route list");

        let records = self.backend.list_routes().await?;

        let mut state = self.state.lock().await;
        if !self.is_current(op_at_start) {
            tracing::debug!(reason = %reason, "Discarding route list overtaken by a reorder");
            return Ok(state.store.routes().to_vec());
        }

        let cache = self.cache.lock().await;
        let confirmed = merge_with_priorities(records.clone(), &cache);
        let displayed = match &state.in_flight {
            Some(batch) => {
                let mut overlay = cache.clone();
                overlay.replace_all(batch.assignment.iter().cloned());
                tracing::debug!(reason = %reason, op = batch.op, "Keeping in-flight order");
                merge_with_priorities(records, &overlay)
            }
            None => confirmed.clone(),
        };
        drop(cache);

        state.confirmed = confirmed;
        state.store.replace(displayed.clone());
        self.reconcile_pending.store(false, Ordering::SeqCst);
        tracing::info!(
            reason = %reason,
            count = displayed.len(),
            revision = state.store.revision(),
            "Route list refreshed"
        );
        Ok(displayed)
    }

    /// Move a route and persist the new order.
    ///
    /// `destination` is `None` when the gesture was cancelled; nothing changes.
    /// The move is shown at once; its priority updates wait until any earlier
    /// batch has settled and are skipped if a newer move arrived meanwhile.
    ///
    /// # Errors
    ///
    /// - [`ReorderError::IndexOutOfRange`] for a bad index (state untouched).
    /// - [`ReorderError::ReconcilePending`] while a failed batch is unresolved.
    /// - [`ReorderError::Persist`] when any update failed; the last confirmed
    ///   order is restored and a re-fetch attempted.
    /// - [`ReorderError::Cache`] if the confirmed order cannot be saved locally.
    pub async fn reorder(
        &self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<ReorderOutcome, ReorderError> {
        let Some(destination) = destination else {
            tracing::debug!(source, "Reorder cancelled");
            return Ok(ReorderOutcome::Unchanged);
        };

        if self.is_reconcile_pending() {
            return Err(ReorderError::ReconcilePending);
        }

        let (op, assignment) = {
            let mut state = self.state.lock().await;
            let reordered = reorder(state.store.routes(), source, destination)?;
            let assignment: Vec<(String, u32)> = reordered
                .iter()
                .map(|r| (r.pair_id.clone(), r.priority))
                .collect();
            state.store.replace(reordered);
            let op = self.op_seq.fetch_add(1, Ordering::SeqCst) + 1;
            state.in_flight = Some(InFlight {
                op,
                assignment: assignment.clone(),
            });
            (op, assignment)
        };
        tracing::info!(op, source, destination, "Applied reorder locally");

        let _gate = self.send_gate.lock().await;
        if !self.is_current(op) {
            tracing::debug!(op, "Reorder superseded before sending");
            return Ok(ReorderOutcome::Superseded);
        }

        let results = join_all(
            assignment
                .iter()
                .map(|(pair_id, priority)| self.backend.update_priority(pair_id, *priority)),
        )
        .await;

        let total = results.len();
        let mut failed = 0;
        for ((pair_id, priority), result) in assignment.iter().zip(&results) {
            if let Err(e) = result {
                failed += 1;
                tracing::warn!(op, pair_id = %pair_id, priority, error = %e, "Priority update failed");
            }
        }

        {
            let mut state = self.state.lock().await;
            if !self.is_current(op) {
                tracing::debug!(op, failed, "Reorder superseded by a newer one");
                return Ok(ReorderOutcome::Superseded);
            }
            state.in_flight = None;

            if failed > 0 {
                let confirmed = state.confirmed.clone();
                state.store.replace(confirmed);
                self.reconcile_pending.store(true, Ordering::SeqCst);
            } else {
                let mut cache = self.cache.lock().await;
                cache.replace_all(assignment);
                state.confirmed = state.store.routes().to_vec();
                cache.save()?;
            }
        }

        if failed > 0 {
            if let Err(e) = self.refresh(RefreshReason::Reconcile).await {
                tracing::warn!(op, error = %e, "Re-fetch after failed reorder also failed");
            }
            return Err(ReorderError::Persist { failed, total });
        }
        tracing::info!(op, updated = total, "Reorder persisted");

        if let Err(e) = self.refresh(RefreshReason::Revision).await {
            tracing::warn!(op, error = %e, "Re-fetch after reorder failed; keeping local order");
        }
        Ok(ReorderOutcome::Persisted { updated: total })
    }
}
