//! Top-level service configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Main service configuration, one section per component
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub hub: HubConfig,
    /// Flat keys of the first config format, folded into the sections above
    #[serde(flatten)]
    pub legacy: LegacyKeys,
}

/// `listen_port`, `log_level` and `sound_effect_file_path` at the top level
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LegacyKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<PortValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_effect_file_path: Option<String>,
}

/// A port written either as a number or as a quoted string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl AppConfig {
    /// Move legacy flat keys into their sections. Flat keys win since a file
    /// using them will not also set the nested form.
    pub fn normalize(mut self) -> Result<Self, String> {
        let legacy = std::mem::take(&mut self.legacy);

        if let Some(port) = legacy.listen_port {
            self.server.port = match port {
                PortValue::Number(port) => port,
                PortValue::Text(text) => text
                    .trim()
                    .parse()
                    .map_err(|e| format!("Invalid listen_port '{}': {}", text, e))?,
            };
        }
        if let Some(level) = legacy.log_level {
            self.logging.level = level;
        }
        if let Some(path) = legacy.sound_effect_file_path {
            self.alarm.sound_file = path;
        }

        Ok(self)
    }
}
