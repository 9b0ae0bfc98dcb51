//! Live-update hub configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Queued snapshots per subscriber before it is dropped as too slow
    #[serde(default = "default_hub_buffer")]
    pub buffer_size: usize,
    /// Seconds between keep-alive pings
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    /// Seconds without any frame from the peer before the session is closed
    #[serde(default = "default_pong_timeout_secs")]
    pub pong_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_hub_buffer(),
            ping_interval_secs: default_ping_interval_secs(),
            pong_timeout_secs: default_pong_timeout_secs(),
        }
    }
}

impl HubConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn pong_timeout(&self) -> Duration {
        Duration::from_secs(self.pong_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("hub.buffer_size must be greater than 0".to_string());
        }
        if self.ping_interval_secs == 0 {
            return Err("hub.ping_interval_secs must be greater than 0".to_string());
        }
        if self.pong_timeout_secs <= self.ping_interval_secs {
            return Err(
                "hub.pong_timeout_secs must be greater than hub.ping_interval_secs".to_string(),
            );
        }
        Ok(())
    }
}
