//! Route creation form.

use crate::api::{NumberList, RouteBackend, RouteDraft};

/// Shown when the backend rejects a route without saying why.
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create country pair";

/// Result of submitting the form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The route was created; the panel closed and the form reset.
    Created(serde_json::Value),
    /// The backend refused; the panel is still open showing this message.
    Rejected(String),
}

/// State of the "add route" panel.
///
/// Nothing is validated locally; the backend decides. Closing the panel
/// flips [`CreationPanel::trigger`], which the route list watches to know
/// it must refresh.
#[derive(Debug, Clone, Default)]
pub struct CreationPanel {
    open: bool,
    draft: RouteDraft,
    error: Option<String>,
    trigger: bool,
}

impl CreationPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the panel, clearing the form and any error.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.draft = RouteDraft::default();
        self.error = None;
        self.trigger = !self.trigger;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggles every time the panel closes.
    #[must_use]
    pub fn trigger(&self) -> bool {
        self.trigger
    }

    /// Error from the last submission, verbatim.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn draft(&self) -> &RouteDraft {
        &self.draft
    }

    pub fn set_pair_name(&mut self, pair_name: impl Into<String>) {
        self.draft.pair_name = pair_name.into();
    }

    pub fn set_proxy(&mut self, proxy: impl Into<String>) {
        self.draft.proxy = proxy.into();
    }

    pub fn attach_number_list(&mut self, list: NumberList) {
        self.draft.number_list = Some(list);
    }

    /// Submit the form.
    ///
    /// On success the panel closes. On failure it stays open and
    /// [`Self::error`] holds the backend's message, or
    /// [`CREATE_FAILED_MESSAGE`] when the backend gave none.
    pub async fn submit(&mut self, backend: &dyn RouteBackend) -> SubmitOutcome {
        self.error = None;
        match backend.create_route(&self.draft).await {
            Ok(created) => {
                tracing::info!(pair_name = %self.draft.pair_name, "Route creation accepted");
                self.close();
                SubmitOutcome::Created(created)
            }
            Err(e) => {
                tracing::warn!(pair_name = %self.draft.pair_name, error = %e, "Route creation failed");
                let message = e.user_message(CREATE_FAILED_MESSAGE);
                self.error = Some(message.clone());
                SubmitOutcome::Rejected(message)
            }
        }
    }
}
