//! Application state shared across HTTP handlers

use crate::alarm::AlarmController;
use crate::alerts::AlertStore;
use crate::config::Config;
use crate::hub::{NotificationHub, SessionConfig, SnapshotPublisher};
use std::sync::Arc;
use std::time::Instant;

/// HTTP server state shared across handlers
///
/// Every field is cheap to clone; the engine components are handles onto
/// shared state, so all workers see the same store, hub and alarm.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    pub store: AlertStore,
    pub hub: NotificationHub,
    pub publisher: SnapshotPublisher,
    pub alarm: AlarmController,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        store: AlertStore,
        hub: NotificationHub,
        alarm: AlarmController,
    ) -> Self {
        let publisher = SnapshotPublisher::new(store.clone(), hub.clone());
        Self {
            config: Arc::new(config),
            store,
            hub,
            publisher,
            alarm,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from(self.config.hub())
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
