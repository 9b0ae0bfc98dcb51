//! Server builder and run_server function
//!
//! Wires the engine (store, hub, publisher, alarm) into an [`AppState`]
//! and starts its background tasks.

use crate::alarm::{AlarmController, SoundPlayer, detect_player};
use crate::alerts::AlertStore;
use crate::config::Config;
use crate::hub::NotificationHub;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    player: Option<Arc<dyn SoundPlayer>>,
}

/// Handles on the long-lived tasks started by [`ServerBuilder`]
#[derive(Debug)]
pub struct BackgroundTasks {
    hub: NotificationHub,
    alarm: AlarmController,
    hub_task: JoinHandle<()>,
    publisher_task: JoinHandle<()>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this player instead of probing the host
    pub fn with_player(mut self, player: Arc<dyn SoundPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    /// Build the shared state and start the background tasks.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build_state(self) -> Result<(AppState, BackgroundTasks)> {
        let config = self
            .config
            .ok_or_else(|| AppError::config("Configuration is required"))?;

        let store = AlertStore::new(config.alerts().max_size);
        let (hub, hub_task) = NotificationHub::spawn(config.hub().buffer_size);

        let player = match self.player {
            Some(player) => player,
            None => detect_player(config.alarm().player.as_deref()),
        };
        let alarm = AlarmController::new(store.clone(), player, config.alarm());

        let state = AppState::new(config, store, hub.clone(), alarm.clone());
        let publisher_task = state.publisher.clone().spawn();
        alarm.start();

        debug!(
            "Engine ready (max alerts: {}, hub buffer: {})",
            state.config.alerts().max_size,
            state.config.hub().buffer_size
        );

        Ok((
            state,
            BackgroundTasks {
                hub,
                alarm,
                hub_task,
                publisher_task,
            },
        ))
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<(HttpServer, BackgroundTasks)> {
        let (state, tasks) = self.build_state()?;
        Ok((HttpServer::new(state), tasks))
    }
}

impl BackgroundTasks {
    /// Stop the alarm, the publisher and the hub
    pub async fn shutdown(self) {
        self.alarm.shutdown();
        self.publisher_task.abort();
        self.hub.shutdown();
        if let Err(e) = self.hub_task.await {
            debug!("Hub task ended abnormally: {}", e);
        }
    }
}

/// Run the service until the HTTP server stops
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting Wake Me Up {}", crate::VERSION);

    let (server, tasks) = ServerBuilder::new().with_config(config).build()?;
    info!("Server starting at: http://{}", server.config().address());
    info!("API Endpoints:");
    info!("   POST /webhook - Alertmanager webhook");
    info!("   POST /acknowledge?id=<id> - Acknowledge an alert");
    info!("   POST /clear - Clear acknowledged and resolved alerts");
    info!("   GET  /status - Unacknowledged flag");
    info!("   GET  /api/alerts - Current alerts");
    info!("   GET  /ws - Live updates");
    info!("   GET  /sound - Alarm sound");
    info!("   GET  /health - Health check");

    let result = server.start().await;
    tasks.shutdown().await;
    result
}
