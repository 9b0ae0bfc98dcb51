//! Live updates
//!
//! [`NotificationHub`] fans serialized [`Update`]s out to subscribers,
//! [`SnapshotPublisher`] feeds it from store events and [`session`] relays
//! a subscription over a websocket.

pub mod hub;
pub mod message;
pub mod publisher;
pub mod session;

pub use hub::{NotificationHub, SubscriberId, Subscription};
pub use message::{Update, UpdateMessage};
pub use publisher::SnapshotPublisher;
pub use session::SessionConfig;
