//! Alarm configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Audible alarm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Run the alarm loop at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Audio file handed to the player, also served on `/sound`
    #[serde(default = "default_sound_file")]
    pub sound_file: String,
    /// Pause between two playbacks in milliseconds
    #[serde(default = "default_alarm_interval_ms")]
    pub interval_ms: u64,
    /// Player program to use instead of probing `PATH`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_file: default_sound_file(),
            interval_ms: default_alarm_interval_ms(),
            player: None,
        }
    }
}

impl AlarmConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Sound file resolved against the working directory when relative
    pub fn sound_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.sound_file);
        if path.is_absolute() {
            return path;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sound_file.trim().is_empty() {
            return Err("alarm.sound_file cannot be empty".to_string());
        }
        if self.interval_ms == 0 {
            return Err("alarm.interval_ms must be greater than 0".to_string());
        }
        if let Some(player) = &self.player {
            if player.trim().is_empty() {
                return Err("alarm.player cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}
