//! Alert state
//!
//! Wire types for Alertmanager notifications, the label-set matching rules
//! used to reconcile resolutions, and the [`AlertStore`] that holds the live
//! alert set together with its acknowledgements.

pub mod matching;
pub mod store;
pub mod types;

pub use matching::{alerts_match, labels_match};
pub use store::AlertStore;
pub use types::{
    Alert, AlertEntry, AlertStatus, AlertView, ChangeKind, IngestReport, LabelSet, Priority,
    StoreEvent, StoreSnapshot, WebhookPayload,
};
