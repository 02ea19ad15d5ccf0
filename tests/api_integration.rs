//! Integration tests for the backend client against a mock server.

mod common;

use std::sync::Arc;

use common::{api_config, route, signed_in_client, spawn_backend, MockState, TOKEN};
use pair_admin::api::{ApiClient, ApiError, RouteAction};
use pair_admin::config::HealthConfig;
use pair_admin::routes::ActionDispatcher;
use pair_admin::stats::{Health, RouteStats, StatsView};

#[tokio::test]
async fn test_sign_in_returns_session() {
    let base = spawn_backend(MockState::with_routes(Vec::new())).await;
    let client = ApiClient::new(&api_config(&base), None).unwrap();

    let session = client.sign_in("ops@example.com", "hunter2").await.unwrap();
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user.as_deref(), Some("ops@example.com"));
}

#[tokio::test]
async fn test_sign_in_bad_password_surfaces_message() {
    let base = spawn_backend(MockState::with_routes(Vec::new())).await;
    let client = ApiClient::new(&api_config(&base), None).unwrap();

    let err = client.sign_in("ops", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("fallback"), "Invalid credentials");
}

#[tokio::test]
async fn test_list_routes_sends_bearer_and_parses_ids() {
    let state = MockState::with_routes(vec![route(7, "uk-de", true), route(9, "fr-es", false)]);
    let base = spawn_backend(state.clone()).await;

    let routes = signed_in_client(&base).list_routes().await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].pair_id, "7");
    assert_eq!(routes[0].pair_name, "uk-de");
    assert!(routes[0].active_status);
    assert!(!routes[1].active_status);
    assert_eq!(
        state.auth_headers.lock().unwrap().as_slice(),
        &[format!("Bearer {TOKEN}")]
    );
}

#[tokio::test]
async fn test_unauthenticated_client_never_hits_backend() {
    let state = MockState::with_routes(vec![route(1, "uk-de", true)]);
    let base = spawn_backend(state.clone()).await;
    let client = ApiClient::new(&api_config(&base), None).unwrap();

    let err = client.list_routes().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(state.auth_headers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_priority_patches_route() {
    let state = MockState::with_routes(Vec::new());
    let base = spawn_backend(state.clone()).await;

    signed_in_client(&base)
        .update_priority("42", 3)
        .await
        .unwrap();
    assert_eq!(
        state.priority_updates.lock().unwrap().as_slice(),
        &[("42".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_actions_reach_backend_and_failures_surface() {
    let state = MockState::with_routes(Vec::new());
    let base = spawn_backend(state.clone()).await;
    let dispatcher = ActionDispatcher::new(Arc::new(signed_in_client(&base)));

    dispatcher
        .dispatch(RouteAction::Start, "uk-de")
        .await
        .unwrap();
    let err = dispatcher
        .dispatch(RouteAction::Restart, "missing")
        .await
        .unwrap_err();
    assert_eq!(err.source.user_message("fallback"), "Pair not found");

    let actions = state.actions.lock().unwrap();
    assert_eq!(
        actions.as_slice(),
        &[
            ("start".to_string(), "uk-de".to_string()),
            ("restart".to_string(), "missing".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_stats_view_classifies_snapshots() {
    let base = spawn_backend(MockState::with_routes(Vec::new())).await;
    let client = signed_in_client(&base);
    let view = StatsView::new(&client, HealthConfig::default());

    let overall = view.overall().await.unwrap();
    assert_eq!(overall.stats.total_sms_sent, 1000);
    // 15% failure is above the aggregate danger threshold.
    assert_eq!(overall.health, Health::Danger);

    let route = view.route("uk-de").await.unwrap();
    assert_eq!(route.stats.total_sms_failed, 4);
    assert_eq!(route.health, Health::Healthy);
}

#[tokio::test]
async fn test_stats_failure_without_message_uses_fallback() {
    let base = spawn_backend(MockState::with_routes(Vec::new())).await;
    let client = signed_in_client(&base);
    let view = StatsView::new(&client, HealthConfig::default());

    let err = view.route("broken").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch statistics");
}

#[tokio::test]
async fn test_stats_update_and_delete() {
    let state = MockState::with_routes(Vec::new());
    let base = spawn_backend(state.clone()).await;
    let client = signed_in_client(&base);
    let view = StatsView::new(&client, HealthConfig::default());

    let stats = RouteStats {
        total_sms_sent: 10,
        total_sms_failed: 5,
        total_rate_of_success: 50.0,
        total_rate_of_failure: 50.0,
    };
    let report = view.update("fr-es", &stats).await.unwrap();
    assert_eq!(report.stats, stats);
    assert_eq!(report.health, Health::Danger);

    view.delete("fr-es").await.unwrap();
    assert_eq!(
        state.stats_deleted.lock().unwrap().as_slice(),
        &["fr-es".to_string()]
    );
}
