//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks. The one stand-in is
//! [`FakePlayer`], which spawns `sleep` instead of an audio player.

use chrono::{Duration, Utc};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::process::Command;
use wake_me_up::alarm::{Playback, SoundPlayer};
use wake_me_up::alerts::{Alert, AlertStatus, LabelSet, WebhookPayload};
use wake_me_up::config::Config;
use wake_me_up::server::{AppState, BackgroundTasks, ServerBuilder};

/// Factory for single alerts
pub struct AlertFactory;

impl AlertFactory {
    /// Alert with `alertname` set and one instance label
    pub fn named(status: &str, name: &str) -> Alert {
        Self::with_labels(status, &[("alertname", name), ("instance", "node-1:9100")])
    }

    pub fn with_labels(status: &str, labels: &[(&str, &str)]) -> Alert {
        let labels: LabelSet = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut annotations = LabelSet::new();
        annotations.insert("summary".to_string(), "Test alert".to_string());

        let status = AlertStatus::from(status);
        let ends_at = status.is_resolved().then(Utc::now);
        Alert {
            status,
            labels,
            annotations,
            starts_at: Utc::now() - Duration::minutes(5),
            ends_at,
            generator_url: Some("http://prometheus:9090/graph".to_string()),
        }
    }
}

/// Factory for Alertmanager notifications
pub struct PayloadFactory;

impl PayloadFactory {
    pub fn firing(names: &[&str]) -> WebhookPayload {
        Self::build(
            "firing",
            names.iter().map(|n| AlertFactory::named("firing", n)).collect(),
        )
    }

    pub fn resolved(names: &[&str]) -> WebhookPayload {
        Self::build(
            "resolved",
            names
                .iter()
                .map(|n| AlertFactory::named("resolved", n))
                .collect(),
        )
    }

    pub fn build(status: &str, alerts: Vec<Alert>) -> WebhookPayload {
        WebhookPayload {
            version: "4".to_string(),
            group_key: "{}:{alertname=\"test\"}".to_string(),
            status: AlertStatus::from(status),
            receiver: "wake-me-up".to_string(),
            external_url: "http://alertmanager:9093".to_string(),
            alerts,
            ..Default::default()
        }
    }

    /// The same notification as raw JSON, the way Alertmanager sends it
    pub fn json(payload: &WebhookPayload) -> serde_json::Value {
        serde_json::to_value(payload).unwrap()
    }
}

/// Player that spawns `sleep 30` so there is a real process to kill
#[derive(Debug, Default)]
pub struct FakePlayer {
    launches: AtomicUsize,
}

impl FakePlayer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for FakePlayer {
    fn name(&self) -> &str {
        "fake"
    }

    fn play(&self, _path: &Path) -> io::Result<Playback> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Command::new("sleep")
            .arg("30")
            .kill_on_drop(true)
            .spawn()
            .map(Playback::Child)
    }
}

/// A fully wired service without the HTTP listener
pub struct TestService {
    pub state: AppState,
    pub tasks: BackgroundTasks,
    pub player: Arc<FakePlayer>,
}

impl TestService {
    pub fn start() -> Self {
        Self::with_config(Config::from_yaml("alarm:\n  interval_ms: 20\n").unwrap())
    }

    pub fn with_config(config: Config) -> Self {
        let player = FakePlayer::new();
        let (state, tasks) = ServerBuilder::new()
            .with_config(config)
            .with_player(player.clone())
            .build_state()
            .unwrap();
        Self {
            state,
            tasks,
            player,
        }
    }

    pub async fn stop(self) {
        self.tasks.shutdown().await;
    }
}
