//! In-process mock of the route backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use pair_admin::api::ApiClient;
use pair_admin::config::ApiConfig;
use pair_admin::session::Session;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

#[derive(Default)]
pub struct MockState {
    pub routes: Mutex<Vec<Value>>,
    pub list_calls: AtomicUsize,
    pub priority_updates: Mutex<Vec<(String, u32)>>,
    pub fail_priority_for: Mutex<HashSet<String>>,
    pub actions: Mutex<Vec<(String, String)>>,
    pub created: Mutex<Vec<(String, String)>>,
    pub auth_headers: Mutex<Vec<String>>,
    pub stats_deleted: Mutex<Vec<String>>,
}

impl MockState {
    pub fn with_routes(routes: Vec<Value>) -> Arc<Self> {
        let state = Self::default();
        *state.routes.lock().unwrap() = routes;
        Arc::new(state)
    }

    pub fn fail_priority(&self, pair_id: &str) {
        self.fail_priority_for
            .lock()
            .unwrap()
            .insert(pair_id.to_string());
    }

    fn record_auth(&self, headers: &HeaderMap) -> bool {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let ok = value == format!("Bearer {TOKEN}");
        self.auth_headers.lock().unwrap().push(value);
        ok
    }
}

pub fn route(id: u64, name: &str, active: bool) -> Value {
    json!({ "pair_id": id, "pairName": name, "activeStatus": active })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Missing token"}))).into_response()
}

async fn signin(Json(body): Json<Value>) -> Response {
    if body["password"] == "hunter2" {
        Json(json!({ "token": TOKEN, "user": { "username": body["identifier"] } }))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn list_pairs(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.routes.lock().unwrap().clone()).into_response()
}

async fn update_priority(
    State(state): State<Arc<MockState>>,
    Path(pair_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    if state.fail_priority_for.lock().unwrap().contains(&pair_id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let priority = u32::try_from(body["priority"].as_u64().unwrap_or_default()).unwrap_or(0);
    state
        .priority_updates
        .lock()
        .unwrap()
        .push((pair_id, priority));
    StatusCode::OK.into_response()
}

async fn create_pair(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = String::from_utf8_lossy(&body).to_string();
    state
        .created
        .lock()
        .unwrap()
        .push((content_type, body.clone()));
    if body.contains("bad-proxy") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Proxy bad-proxy is unreachable"})),
        )
            .into_response();
    }
    if body.contains("silent-fail") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    (StatusCode::CREATED, Json(json!({"status": "created"}))).into_response()
}

async fn route_action(
    State(state): State<Arc<MockState>>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    let pair_name = body["pair_name"].as_str().unwrap_or_default().to_string();
    state
        .actions
        .lock()
        .unwrap()
        .push((action, pair_name.clone()));
    if pair_name == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Pair not found"})),
        )
            .into_response();
    }
    Json(json!({"ok": true})).into_response()
}

async fn aggregate_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    Json(json!({
        "stats": {
            "total_sms_sent": 1000,
            "total_sms_failed": 150,
            "overall_success_rate": 85.0,
            "overall_failure_rate": 15.0
        }
    }))
    .into_response()
}

async fn route_stats(
    State(state): State<Arc<MockState>>,
    Path(pair_name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    if pair_name == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "stats": {
            "total_sms_sent": 200,
            "total_sms_failed": 4,
            "total_rate_of_success": 98.0,
            "total_rate_of_failure": 2.0
        }
    }))
    .into_response()
}

async fn put_route_stats(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    Json(json!({ "stats": body })).into_response()
}

async fn delete_route_stats(
    State(state): State<Arc<MockState>>,
    Path(pair_name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !state.record_auth(&headers) {
        return unauthorized();
    }
    state.stats_deleted.lock().unwrap().push(pair_name);
    StatusCode::NO_CONTENT.into_response()
}

/// Start the mock backend and return its base URL.
pub async fn spawn_backend(state: Arc<MockState>) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    let app = Router::new()
        .route("/signin", post(signin))
        .route("/program/pairs", get(list_pairs))
        .route("/program/create", post(create_pair))
        .route("/program/update/:pair_id", patch(update_priority))
        .route("/program/:action", post(route_action))
        .route("/stats/aggregate", get(aggregate_stats))
        .route(
            "/stats/:pair_name",
            get(route_stats)
                .put(put_route_stats)
                .delete(delete_route_stats),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
    }
}

/// Client signed in with the token the mock accepts.
pub fn signed_in_client(base_url: &str) -> ApiClient {
    ApiClient::new(&api_config(base_url), Some(Session::new(TOKEN, None)))
        .expect("build client")
}
