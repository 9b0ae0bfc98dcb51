//! Messages pushed to live viewers

use crate::alerts::{AlertView, StoreSnapshot};
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;

/// Full-state update sent to every viewer after each store change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub alerts: Vec<AlertView>,
    pub has_unacknowledged: bool,
}

impl UpdateMessage {
    pub const KIND: &'static str = "update";
}

impl From<StoreSnapshot> for UpdateMessage {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self {
            kind: Self::KIND,
            alerts: snapshot.alerts,
            has_unacknowledged: snapshot.has_unacknowledged,
        }
    }
}

/// Serialized update as carried by the hub.
///
/// The body is opaque to the hub; the revision lets a session drop
/// anything older than what it already sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub revision: u64,
    pub body: Arc<str>,
}

impl Update {
    pub fn new(revision: u64, body: impl Into<Arc<str>>) -> Self {
        Self {
            revision,
            body: body.into(),
        }
    }

    /// Serialize a store snapshot
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let revision = snapshot.revision;
        let body = serde_json::to_string(&UpdateMessage::from(snapshot))?;
        Ok(Self::new(revision, body))
    }
}
