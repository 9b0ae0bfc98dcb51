//! Configuration management for the service
//!
//! This module handles loading, validation, and management of the YAML
//! configuration file.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Main configuration struct for the service
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Service configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse, normalize and validate configuration text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to unit; treat it as all defaults.
        let app: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| AppError::config(format!("Failed to parse config: {}", e)))?
        };

        let app = app.normalize().map_err(AppError::config)?;
        let config = Self { app };
        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.app.logging
    }

    /// Get alert store configuration
    pub fn alerts(&self) -> &AlertsConfig {
        &self.app.alerts
    }

    /// Get alarm configuration
    pub fn alarm(&self) -> &AlarmConfig {
        &self.app.alarm
    }

    /// Get live-update hub configuration
    pub fn hub(&self) -> &HubConfig {
        &self.app.hub
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.app.validate().map_err(AppError::config)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.app)
            .map_err(|e| AppError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
