//! Refresh lifecycle and the list/saved actions around it.

use std::{sync::Arc, time::Duration};

use shared::domain::RfpId;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    config::ClientSettings,
    error::{ClientError, Result},
    poller::ProgressPoller,
    state::{Action, AppState},
    transport::HttpRfpClient,
    RfpApi,
};

mod list;
mod saved;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub message: Option<String>,
    /// Per-item ingest problems the backend reported alongside success.
    pub ingest_errors: Vec<String>,
}

pub struct RefreshCoordinator {
    api: Arc<dyn RfpApi>,
    state: Arc<Mutex<AppState>>,
    poll_interval: Duration,
}

impl RefreshCoordinator {
    pub fn new(api: Arc<dyn RfpApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(AppState::default())),
            poll_interval,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let client = HttpRfpClient::new(settings)?;
        info!(api_base = client.api_base(), "rfp client configured");
        Ok(Self::new(Arc::new(client), settings.poll_interval()))
    }

    /// Shared handle to the state container, for front ends that render
    /// while an action is still running.
    pub fn state(&self) -> Arc<Mutex<AppState>> {
        Arc::clone(&self.state)
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn can_refresh(&self) -> bool {
        !self.state.lock().await.is_refreshing()
    }

    pub async fn dismiss_error(&self) {
        self.dispatch(Action::ErrorDismissed).await;
    }

    /// Runs one refresh: trigger, poll progress until the trigger and the
    /// follow-up reloads settle, then settle the status.
    ///
    /// Rejected with [`ClientError::RefreshInProgress`] and no state change
    /// while another refresh is running.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        {
            let mut state = self.state.lock().await;
            if state.is_refreshing() {
                return Err(ClientError::RefreshInProgress);
            }
            state.apply(Action::RefreshStarted);
        }
        info!("refresh started");

        let poller = ProgressPoller::start(
            Arc::clone(&self.api),
            Arc::clone(&self.state),
            self.poll_interval,
        );
        let result = self.run_refresh().await;
        poller.stop().await;

        let settled = match &result {
            Ok(outcome) => Ok(outcome.message.clone()),
            Err(err) => Err(format!("Refresh failed: {}", err.user_message())),
        };
        self.dispatch(Action::RefreshSettled(settled)).await;
        match &result {
            Ok(outcome) => info!(message = ?outcome.message, "refresh finished"),
            Err(err) => error!("refresh failed: {err}"),
        }
        result
    }

    async fn run_refresh(&self) -> Result<RefreshOutcome> {
        let response = self.api.trigger_refresh().await?;
        if let Some(backend_error) = response.error.as_deref() {
            warn!(ok = response.ok, "refresh reported a backend error: {backend_error}");
        }
        for ingest_error in &response.errors {
            warn!("ingest problem: {ingest_error}");
        }

        // Sequential on purpose: each reload settles before the next starts.
        self.dispatch(Action::PageReset).await;
        let _ = self.fetch_page(0).await;
        let _ = self.reload_saved().await;
        if let Some(rfp_id) = self.open_detail_id().await {
            let _ = self.reload_detail(rfp_id).await;
        }

        let mut ingest_errors = response.errors;
        if let Some(backend_error) = response.error {
            ingest_errors.insert(0, backend_error);
        }
        Ok(RefreshOutcome {
            message: response.message,
            ingest_errors,
        })
    }

    pub async fn health(&self) -> Result<String> {
        match self.api.health().await {
            Ok(status) => Ok(status),
            Err(err) => Err(self.fail("health check", err).await),
        }
    }

    /// Development helper: asks the backend to insert sample rows, then
    /// reloads the first page.
    pub async fn seed_demo_data(&self) -> Result<String> {
        let message = match self.api.seed_demo_data().await {
            Ok(message) => message,
            Err(err) => return Err(self.fail("seed demo data", err).await),
        };
        let _ = self.fetch_page(0).await;
        Ok(message)
    }

    async fn dispatch(&self, action: Action) {
        self.state.lock().await.apply(action);
    }

    async fn open_detail_id(&self) -> Option<RfpId> {
        self.state.lock().await.saved.open_rfp_id()
    }

    /// Logs the failure, records its user-facing text, and hands the error
    /// back for the caller to return.
    async fn fail(&self, action: &str, err: ClientError) -> ClientError {
        error!(action, "{err}");
        self.dispatch(Action::ActionFailed(err.user_message())).await;
        err
    }
}

#[cfg(test)]
#[path = "../tests/coordinator_tests.rs"]
mod tests;
