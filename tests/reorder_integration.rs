//! End-to-end reorder flow over HTTP.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{route, signed_in_client, spawn_backend, MockState};
use pair_admin::routes::{
    PriorityCache, RefreshReason, ReorderCoordinator, ReorderError, ReorderOutcome,
    REORDER_FAILED_MESSAGE,
};
use tempfile::TempDir;

fn names(routes: &[pair_admin::routes::Route]) -> Vec<String> {
    routes.iter().map(|r| r.pair_name.clone()).collect()
}

#[tokio::test]
async fn test_reorder_persists_every_priority_and_cache() {
    let state = MockState::with_routes(vec![
        route(1, "uk-de", true),
        route(2, "fr-es", true),
        route(3, "it-pl", false),
    ]);
    let base = spawn_backend(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("priorities.json");

    let coordinator = ReorderCoordinator::new(
        Arc::new(signed_in_client(&base)),
        PriorityCache::empty(&cache_path),
    );
    coordinator.refresh(RefreshReason::Mount).await.unwrap();

    let outcome = coordinator.reorder(2, Some(0)).await.unwrap();
    assert_eq!(outcome, ReorderOutcome::Persisted { updated: 3 });
    assert_eq!(
        names(&coordinator.routes().await),
        vec!["it-pl", "uk-de", "fr-es"]
    );

    let mut updates = state.priority_updates.lock().unwrap().clone();
    updates.sort();
    assert_eq!(
        updates,
        vec![
            ("1".to_string(), 2),
            ("2".to_string(), 3),
            ("3".to_string(), 1),
        ]
    );
    // Mount plus the post-save refresh.
    assert_eq!(state.list_calls.load(Ordering::SeqCst), 2);

    // A fresh coordinator restores the order from disk.
    let reopened = ReorderCoordinator::new(
        Arc::new(signed_in_client(&base)),
        PriorityCache::load(&cache_path).unwrap(),
    );
    let routes = reopened.refresh(RefreshReason::Mount).await.unwrap();
    assert_eq!(names(&routes), vec!["it-pl", "uk-de", "fr-es"]);
}

#[tokio::test]
async fn test_partial_failure_restores_backend_order() {
    let state = MockState::with_routes(vec![
        route(1, "uk-de", true),
        route(2, "fr-es", true),
    ]);
    state.fail_priority("2");
    let base = spawn_backend(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("priorities.json");

    let coordinator = ReorderCoordinator::new(
        Arc::new(signed_in_client(&base)),
        PriorityCache::empty(&cache_path),
    );
    coordinator.refresh(RefreshReason::Mount).await.unwrap();

    let err = coordinator.reorder(1, Some(0)).await.unwrap_err();
    assert!(matches!(err, ReorderError::Persist { failed: 1, total: 2 }));
    assert_eq!(err.to_string(), REORDER_FAILED_MESSAGE);

    assert_eq!(names(&coordinator.routes().await), vec!["uk-de", "fr-es"]);
    assert!(coordinator.cached_priorities().await.is_empty());
    assert!(!cache_path.exists());
    assert!(!coordinator.is_reconcile_pending());
    assert_eq!(state.list_calls.load(Ordering::SeqCst), 2);
}
