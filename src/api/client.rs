//! HTTP client for the route backend.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::extract_backend_message;
use super::types::{
    ActionRequest, PriorityUpdate, RouteAction, RouteDraft, RouteRecord, SignInRequest,
    SignInResponse, StatsEnvelope,
};
use super::ApiError;
use crate::config::ApiConfig;
use crate::session::Session;
use crate::stats::{AggregateStats, RouteStats};

/// Build an HTTP client with the configured timeouts.
fn build_http_client(config: &ApiConfig) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Typed client for the backend surface.
///
/// Authenticated calls take their bearer token from the attached
/// [`Session`]; without one they fail with [`ApiError::Unauthenticated`]
/// before touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Option<Session>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot carry paths,
    /// or [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Option<Session>) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            http: build_http_client(config)?,
            base_url,
            session,
        })
    }

    /// Replace the attached session.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The attached session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::Unauthenticated)?;
        let url = self.endpoint(segments);
        tracing::trace!(%method, %url, "Backend request");
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, session.bearer()))
    }

    /// Send a request and turn non-success statuses into [`ApiError::Backend`].
    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_backend_message(&body);
        tracing::debug!(status = status.as_u16(), message = ?message, "Backend rejected request");
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Exchange credentials for a new [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend message on bad
    /// credentials, or a transport/parse error.
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<Session, ApiError> {
        let request = SignInRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };
        let builder = self.http.post(self.endpoint(&["signin"])).json(&request);
        let response: SignInResponse = Self::send_json(builder).await?;

        tracing::info!(identifier = %identifier, "Signed in");
        Ok(Session::new(response.token.clone(), response.user_name()))
    }

    /// Fetch every route, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a route list.
    pub async fn list_routes(&self) -> Result<Vec<RouteRecord>, ApiError> {
        let builder = self.authorized(Method::GET, &["program", "pairs"])?;
        let routes: Vec<RouteRecord> = Self::send_json(builder).await?;
        tracing::debug!(count = routes.len(), "Fetched routes");
        Ok(routes)
    }

    /// Create a route from a multipart form submission.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] carrying the backend's message when the
    /// backend rejects the route.
    pub async fn create_route(&self, draft: &RouteDraft) -> Result<serde_json::Value, ApiError> {
        let mut form = Form::new()
            .text("pair_name", draft.pair_name.clone())
            .text("proxy", draft.proxy.clone());
        if let Some(list) = &draft.number_list {
            let part = Part::bytes(list.contents.clone()).file_name(list.file_name.clone());
            form = form.part("number_list", part);
        }

        let builder = self
            .authorized(Method::POST, &["program", "create"])?
            .multipart(form);
        let created: serde_json::Value = Self::send_json(builder).await?;
        tracing::info!(pair_name = %draft.pair_name, "Route created");
        Ok(created)
    }

    /// Send a lifecycle command for a route.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the command or is unreachable.
    pub async fn route_action(&self, action: RouteAction, pair_name: &str) -> Result<(), ApiError> {
        let body = ActionRequest {
            pair_name: pair_name.to_string(),
        };
        let builder = self
            .authorized(Method::POST, &["program", action.as_str()])?
            .json(&body);
        Self::send(builder).await?;
        Ok(())
    }

    /// Store a route's priority.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or is unreachable.
    pub async fn update_priority(&self, pair_id: &str, priority: u32) -> Result<(), ApiError> {
        let builder = self
            .authorized(Method::PATCH, &["program", "update", pair_id])?
            .json(&PriorityUpdate { priority });
        Self::send(builder).await?;
        Ok(())
    }

    /// Fetch overall delivery stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError> {
        let builder = self.authorized(Method::GET, &["stats", "aggregate"])?;
        let envelope: StatsEnvelope<AggregateStats> = Self::send_json(builder).await?;
        Ok(envelope.stats)
    }

    /// Fetch stats for one route.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn route_stats(&self, pair_name: &str) -> Result<RouteStats, ApiError> {
        let builder = self.authorized(Method::GET, &["stats", pair_name])?;
        let envelope: StatsEnvelope<RouteStats> = Self::send_json(builder).await?;
        Ok(envelope.stats)
    }

    /// Overwrite the stats record of one route.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn update_route_stats(
        &self,
        pair_name: &str,
        stats: &RouteStats,
    ) -> Result<RouteStats, ApiError> {
        let builder = self
            .authorized(Method::PUT, &["stats", pair_name])?
            .json(stats);
        let envelope: StatsEnvelope<RouteStats> = Self::send_json(builder).await?;
        Ok(envelope.stats)
    }

    /// Delete the stats record of one route. The route itself is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_route_stats(&self, pair_name: &str) -> Result<(), ApiError> {
        let builder = self.authorized(Method::DELETE, &["stats", pair_name])?;
        Self::send(builder).await?;
        Ok(())
    }
}
