//! Configuration validation
//!
//! Each section validates itself; `AppConfig` chains them and prefixes the
//! failing section so startup errors point at the right key.

use super::models::*;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.alerts
            .validate()
            .map_err(|e| format!("Alerts config error: {}", e))?;
        self.alarm
            .validate()
            .map_err(|e| format!("Alarm config error: {}", e))?;
        self.hub
            .validate()
            .map_err(|e| format!("Hub config error: {}", e))?;
        Ok(())
    }
}
