//! Application State
//!
//! Shared state across all handlers. Created once at startup and dropped at
//! shutdown; the session store lives here rather than in a global.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use support_bot_agent::{DialogueController, SessionStore};
use support_bot_config::Settings;
use support_bot_core::OrderLookup;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Per-caller dialogue state
    pub sessions: Arc<SessionStore>,
    pub controller: Arc<DialogueController>,
    /// Prometheus handle; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state around an order lookup
    pub fn new(config: Settings, orders: Arc<dyn OrderLookup>) -> Self {
        let sessions = Arc::new(SessionStore::from_config(&config.session));
        let controller = DialogueController::new(sessions.clone(), orders)
            .with_shared_anonymous_state(config.session.share_anonymous_state);

        Self {
            config: Arc::new(config),
            sessions,
            controller: Arc::new(controller),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
