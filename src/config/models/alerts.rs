//! Alert store configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Maximum number of retained entries; the oldest are evicted first
    #[serde(default = "default_max_alerts")]
    pub max_size: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_alerts(),
        }
    }
}

impl AlertsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_size == 0 {
            return Err("alerts.max_size must be greater than 0".to_string());
        }
        Ok(())
    }
}
