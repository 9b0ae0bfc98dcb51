//! Label-set matching and the reconciliation pass
//!
//! Everything here is pure; the store calls it while holding its write lock.

use super::types::{Alert, AlertEntry, LabelSet};
use tracing::debug;

/// Two label sets match iff they carry the same keys with the same values.
/// An empty set never matches anything, including another empty set.
pub fn labels_match(a: &LabelSet, b: &LabelSet) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

/// Does `resolved` refer to the same alert as `firing`?
#[inline]
pub fn alerts_match(resolved: &Alert, firing: &Alert) -> bool {
    labels_match(&resolved.labels, &firing.labels)
}

/// Outcome of reconciling stored entries against a batch of resolved alerts
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Entries that survive, in their original order
    pub kept: Vec<AlertEntry>,
    /// Removed firing entries, each paired with the index (into the
    /// `resolved` slice) of the alert that resolved it
    pub removed: Vec<(AlertEntry, usize)>,
    /// `matched[i]` is true iff `resolved[i]` removed a firing entry
    pub matched: Vec<bool>,
}

/// Match stored firing entries against resolved alerts.
///
/// Entries are visited in store order (newest first). For each firing entry
/// the first resolved alert that matches and has not been used yet removes
/// it. A resolved alert removes at most one entry.
pub fn reconcile(entries: Vec<AlertEntry>, resolved: &[&Alert]) -> Reconciliation {
    let mut outcome = Reconciliation {
        kept: Vec::with_capacity(entries.len()),
        removed: Vec::new(),
        matched: vec![false; resolved.len()],
    };

    for entry in entries {
        if !entry.alert.status.is_firing() {
            outcome.kept.push(entry);
            continue;
        }

        let hit = resolved
            .iter()
            .enumerate()
            .find(|(i, r)| !outcome.matched[*i] && alerts_match(r, &entry.alert))
            .map(|(i, _)| i);

        match hit {
            Some(i) => {
                debug!(
                    "Removing firing alert {} - matches resolved alert with labels: {:?}",
                    entry.id, resolved[i].labels
                );
                outcome.matched[i] = true;
                outcome.removed.push((entry, i));
            }
            None => outcome.kept.push(entry),
        }
    }

    outcome
}
