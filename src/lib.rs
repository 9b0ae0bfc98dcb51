//! # wake-me-up
//!
//! Receives Prometheus Alertmanager webhooks, keeps the live alert set in
//! memory, pushes every change to connected viewers over a websocket and
//! keeps an audible alarm going until each firing alert is acknowledged.
//!
//! ## Features
//!
//! - **Label-exact resolution**: a resolved notification removes the firing
//!   alert with the identical label set, from any earlier batch
//! - **Acknowledgement lifecycle**: acknowledge single alerts, clear
//!   everything that is settled
//! - **Live updates**: full-state snapshots fanned out to every viewer;
//!   slow viewers are dropped instead of slowing anyone down
//! - **Alarm loop**: plays a sound through `afplay`, `paplay` or `aplay`
//!   (terminal bell otherwise) and stops as soon as nothing is left to
//!   acknowledge
//!
//! ## Running
//!
//! ```rust,no_run
//! use wake_me_up::{Config, WakeMeUp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/config.yaml").await?;
//!     WakeMeUp::new(config).run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod alarm;
pub mod alerts;
pub mod config;
pub mod hub;
pub mod server;
pub mod utils;

// Re-export main types
pub use alarm::AlarmController;
pub use alerts::{AlertStore, WebhookPayload};
pub use config::Config;
pub use hub::{NotificationHub, SnapshotPublisher};
pub use utils::error::{AppError, Result};

use tracing::{debug, info};

/// The whole service: engine plus HTTP front end
pub struct WakeMeUp {
    config: Config,
}

impl WakeMeUp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Start the engine and serve HTTP until the server stops
    pub async fn run(self) -> Result<()> {
        info!("Starting Wake Me Up");
        debug!("Configuration: {:#?}", self.config);

        server::run_server(self.config).await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
