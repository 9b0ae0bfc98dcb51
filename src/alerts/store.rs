//! Thread-safe alert store
//!
//! Owns the ordered entry list (newest first) and the acknowledgement set
//! behind a single reader/writer lock. Every mutation bumps a revision and
//! broadcasts a [`StoreEvent`] once the lock has been released.

use super::matching::reconcile;
use super::types::{
    Alert, AlertEntry, AlertView, ChangeKind, IngestReport, StoreEvent, StoreSnapshot,
    WebhookPayload,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// Buffered events per subscriber; a lagging subscriber just re-reads state
const EVENT_CAPACITY: usize = 64;

/// Consolidated store state - single lock for entries and acknowledgements
#[derive(Debug, Default)]
struct StoreState {
    entries: VecDeque<AlertEntry>,
    acknowledged: HashSet<String>,
    revision: u64,
}

impl StoreState {
    fn is_acknowledged(&self, id: &str) -> bool {
        self.acknowledged.contains(id)
    }

    fn has_unacknowledged_firing(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.alert.status.is_firing() && !self.is_acknowledged(&e.id))
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// Live alert set shared by the HTTP handlers and the background tasks
#[derive(Debug, Clone)]
pub struct AlertStore {
    state: Arc<RwLock<StoreState>>,
    max_size: usize,
    events: broadcast::Sender<StoreEvent>,
}

impl AlertStore {
    /// Create a store retaining at most `max_size` entries.
    ///
    /// A store always keeps at least the newest entry, so 0 is raised to 1.
    /// Configuration rejects 0 before it gets here.
    pub fn new(max_size: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            max_size: max_size.max(1),
            events,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Subscribe to state-changed events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Merge a webhook notification into the store.
    ///
    /// Resolved alerts first remove their matching firing entries; a resolved
    /// alert is itself recorded only if it removed one. Everything else is
    /// recorded as a new entry at the front.
    pub fn ingest(&self, payload: WebhookPayload) -> IngestReport {
        let received_at = Utc::now();
        let mut report = IngestReport::default();

        let revision = {
            let mut state = self.state.write();
            let mut matched = vec![false; payload.alerts.len()];

            if payload.carries_resolutions() {
                let positions: Vec<usize> = payload
                    .alerts
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.status.is_resolved())
                    .map(|(i, _)| i)
                    .collect();
                let resolved: Vec<&Alert> = positions.iter().map(|&i| &payload.alerts[i]).collect();

                let entries = Vec::from(std::mem::take(&mut state.entries));
                let outcome = reconcile(entries, &resolved);

                state.entries = VecDeque::from(outcome.kept);
                for (entry, _) in &outcome.removed {
                    state.acknowledged.remove(&entry.id);
                }
                for (k, hit) in outcome.matched.into_iter().enumerate() {
                    matched[positions[k]] = hit;
                }
                report.resolved = outcome.removed.len();
            }

            for (i, alert) in payload.alerts.into_iter().enumerate() {
                if alert.status.is_resolved() && !matched[i] {
                    debug!(
                        "Ignoring resolved alert that didn't match any firing alert: {:?}",
                        alert.labels
                    );
                    report.discarded += 1;
                    continue;
                }

                state.entries.push_front(AlertEntry {
                    id: Uuid::new_v4().to_string(),
                    received_at,
                    alert,
                });
                report.accepted += 1;
            }

            while state.entries.len() > self.max_size {
                if let Some(evicted) = state.entries.pop_back() {
                    state.acknowledged.remove(&evicted.id);
                    report.evicted += 1;
                }
            }

            state.bump()
        };

        debug!(
            accepted = report.accepted,
            resolved = report.resolved,
            discarded = report.discarded,
            evicted = report.evicted,
            "Ingested notification"
        );
        self.emit(revision, ChangeKind::Ingested(report));
        report
    }

    /// Mark an entry as seen.
    ///
    /// Idempotent. An id with no current entry is still recorded; since ids
    /// are never reused it cannot affect any read, and the next clear drops
    /// it. Returns whether an entry with this id exists.
    pub fn acknowledge(&self, id: &str) -> bool {
        let (known, revision) = {
            let mut state = self.state.write();
            let known = state.entries.iter().any(|e| e.id == id);
            state.acknowledged.insert(id.to_string());
            (known, state.bump())
        };

        if known {
            info!("Alert {} acknowledged", id);
        } else {
            debug!("Acknowledge for unknown alert {} ignored", id);
        }
        self.emit(revision, ChangeKind::Acknowledged);
        known
    }

    /// Drop every entry except the firing, unacknowledged ones.
    ///
    /// Acknowledgements left without an entry go too. Returns the number of
    /// entries removed.
    pub fn clear_acknowledged_and_resolved(&self) -> usize {
        let (cleared, revision) = {
            let mut state = self.state.write();
            let StoreState {
                entries,
                acknowledged,
                ..
            } = &mut *state;

            let before = entries.len();
            entries.retain(|e| {
                let keep = e.alert.status.is_firing() && !acknowledged.contains(&e.id);
                if !keep {
                    acknowledged.remove(&e.id);
                }
                keep
            });
            let live: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
            acknowledged.retain(|id| live.contains(id.as_str()));
            let cleared = before - entries.len();
            (cleared, state.bump())
        };

        debug!("Cleared {} acknowledged/resolved alerts", cleared);
        self.emit(revision, ChangeKind::Cleared(cleared));
        cleared
    }

    /// Sorted copy of the current state.
    ///
    /// Unacknowledged firing first, then acknowledged firing, then the rest;
    /// newest first within each band. The sort is stable, so entries with the
    /// same band and timestamp stay in store order.
    pub fn snapshot(&self) -> StoreSnapshot {
        let (mut alerts, has_unacknowledged, revision) = {
            let state = self.state.read();
            let alerts: Vec<AlertView> = state
                .entries
                .iter()
                .map(|entry| AlertView {
                    is_acknowledged: state.is_acknowledged(&entry.id),
                    entry: entry.clone(),
                })
                .collect();
            (alerts, state.has_unacknowledged_firing(), state.revision)
        };

        alerts.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| b.entry.received_at.cmp(&a.entry.received_at))
        });

        StoreSnapshot {
            alerts,
            has_unacknowledged,
            revision,
        }
    }

    /// True iff some firing entry has not been acknowledged
    pub fn has_unacknowledged_firing(&self) -> bool {
        self.state.read().has_unacknowledged_firing()
    }

    pub fn is_acknowledged(&self, id: &str) -> bool {
        self.state.read().is_acknowledged(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    fn emit(&self, revision: u64, kind: ChangeKind) {
        // No subscribers is fine: nothing to notify.
        let _ = self.events.send(StoreEvent { revision, kind });
    }
}
