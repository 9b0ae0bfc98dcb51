//! Alert payloads, stored entries and read-side views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label or annotation set of an alert
pub type LabelSet = BTreeMap<String, String>;

/// Lifecycle state carried in an alert's `status` field
///
/// Anything other than `firing` or `resolved` is kept verbatim and treated
/// as "not resolved".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    Firing,
    Resolved,
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Other(s) => s,
        }
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        matches!(self, AlertStatus::Firing)
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, AlertStatus::Resolved)
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "firing" => AlertStatus::Firing,
            "resolved" => AlertStatus::Resolved,
            _ => AlertStatus::Other(s),
        }
    }
}

impl From<&str> for AlertStatus {
    fn from(s: &str) -> Self {
        AlertStatus::from(s.to_string())
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        match status {
            AlertStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl Default for AlertStatus {
    fn default() -> Self {
        AlertStatus::Other(String::new())
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alert as delivered by Alertmanager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: LabelSet,
    pub starts_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "generatorURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub generator_url: Option<String>,
}

impl Alert {
    /// Value of the `alertname` label, if any
    pub fn name(&self) -> Option<&str> {
        self.labels.get("alertname").map(String::as_str)
    }
}

/// Alertmanager webhook envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookPayload {
    pub version: String,
    pub group_key: String,
    pub status: AlertStatus,
    pub receiver: String,
    pub group_labels: LabelSet,
    pub common_labels: LabelSet,
    pub common_annotations: LabelSet,
    #[serde(rename = "externalURL")]
    pub external_url: String,
    pub alerts: Vec<Alert>,
}

impl WebhookPayload {
    /// True when reconciliation has to run for this payload
    pub fn carries_resolutions(&self) -> bool {
        self.status.is_resolved() || self.alerts.iter().any(|a| a.status.is_resolved())
    }
}

/// A stored alert together with its identity and receipt time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub id: String,
    #[serde(rename = "timestamp")]
    pub received_at: DateTime<Utc>,
    pub alert: Alert,
}

/// Display priority; lower sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Firing = 0,
    Acknowledged = 1,
    Settled = 2,
}

impl Priority {
    pub fn of(status: &AlertStatus, acknowledged: bool) -> Self {
        match (status.is_firing(), acknowledged) {
            (true, false) => Priority::Firing,
            (true, true) => Priority::Acknowledged,
            (false, _) => Priority::Settled,
        }
    }
}

/// Entry annotated with its acknowledgement flag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    #[serde(flatten)]
    pub entry: AlertEntry,
    pub is_acknowledged: bool,
}

impl AlertView {
    pub fn priority(&self) -> Priority {
        Priority::of(&self.entry.alert.status, self.is_acknowledged)
    }
}

/// Consistent, sorted copy of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub alerts: Vec<AlertView>,
    pub has_unacknowledged: bool,
    /// Store revision the snapshot was taken at
    pub revision: u64,
}

/// What an ingestion did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Entries inserted
    pub accepted: usize,
    /// Firing entries removed by a matching resolved alert
    pub resolved: usize,
    /// Resolved alerts dropped because nothing was firing for them
    pub discarded: usize,
    /// Entries dropped to stay within the size bound
    pub evicted: usize,
}

/// Mutation that triggered a [`StoreEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Ingested(IngestReport),
    Acknowledged,
    Cleared(usize),
}

/// State-changed signal emitted after every mutation, outside the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub revision: u64,
    pub kind: ChangeKind,
}
