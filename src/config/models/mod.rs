//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

pub mod alarm;
pub mod alerts;
pub mod app;
pub mod hub;
pub mod logging;
pub mod server;

pub use alarm::*;
pub use alerts::*;
pub use app::*;
pub use hub::*;
pub use logging::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

/// Default number of retained alert entries
pub fn default_max_alerts() -> usize {
    100
}

pub fn default_sound_file() -> String {
    "sounds/alarm.wav".to_string()
}

/// Pause between two alarm cycles, in milliseconds
pub fn default_alarm_interval_ms() -> u64 {
    1000
}

/// Outbound buffer per live-update subscriber
pub fn default_hub_buffer() -> usize {
    256
}

pub fn default_ping_interval_secs() -> u64 {
    54
}

pub fn default_pong_timeout_secs() -> u64 {
    60
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
