//! Route lifecycle commands.

use std::sync::Arc;

use crate::api::{ApiError, RouteAction, RouteBackend};

/// A lifecycle command the backend did not accept.
#[derive(thiserror::Error, Debug)]
#[error("Failed to {action} {pair_name}: {source}")]
pub struct ActionError {
    pub action: RouteAction,
    pub pair_name: String,
    #[source]
    pub source: ApiError,
}

/// Sends start/stop/restart to the backend.
///
/// The backend owns route status; nothing changes locally until the next
/// list refresh. Commands are never retried.
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: Arc<dyn RouteBackend>,
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(backend: Arc<dyn RouteBackend>) -> Self {
        Self { backend }
    }

    /// Send one command.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] if the backend rejects the command or
    /// cannot be reached. The failure is also logged.
    pub async fn dispatch(&self, action: RouteAction, pair_name: &str) -> Result<(), ActionError> {
        tracing::debug!(action = %action, pair_name = %pair_name, "Dispatching route action");
        match self.backend.route_action(action, pair_name).await {
            Ok(()) => {
                tracing::info!(action = %action, pair_name = %pair_name, "Route action accepted");
                Ok(())
            }
            Err(source) => {
                tracing::warn!(action = %action, pair_name = %pair_name, error = %source, "Route action failed");
                Err(ActionError {
                    action,
                    pair_name: pair_name.to_string(),
                    source,
                })
            }
        }
    }
}
