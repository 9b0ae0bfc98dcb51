//! Logging setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` wins over the
//! configured level when it is set.

mod types;

pub use types::LogLevel;

use crate::config::LoggingConfig;
use crate::utils::error::{AppError, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Resolve the configured level, falling back to `info` for unknown names.
    ///
    /// Returns the rejected name alongside so it can be reported once the
    /// subscriber is installed.
    pub fn resolve_level(raw: &str) -> (LogLevel, Option<String>) {
        match raw.parse::<LogLevel>() {
            Ok(level) => (level, None),
            Err(_) => (LogLevel::Info, Some(raw.to_string())),
        }
    }

    pub fn init_logger(config: &LoggingConfig) -> Result<()> {
        let (level, rejected) = Self::resolve_level(&config.level);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

        let installed = if config.json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .json()
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_thread_ids(false)
                .try_init()
        };
        installed.map_err(|e| AppError::internal(format!("Failed to install logger: {}", e)))?;

        if let Some(raw) = rejected {
            warn!("Invalid log level '{}', defaulting to 'info'", raw);
        }

        Ok(())
    }
}
