//! Turns store events into published snapshots

use super::hub::NotificationHub;
use super::message::Update;
use crate::alerts::AlertStore;
use crate::utils::error::Result;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    store: AlertStore,
    hub: NotificationHub,
}

impl SnapshotPublisher {
    pub fn new(store: AlertStore, hub: NotificationHub) -> Self {
        Self { store, hub }
    }

    /// Serialize the current store state
    pub fn render(&self) -> Result<Update> {
        Update::from_snapshot(self.store.snapshot())
    }

    /// Publish the current state right away
    pub fn publish_now(&self) -> Result<()> {
        let update = self.render()?;
        debug!("Publishing update at revision {}", update.revision);
        self.hub.publish(update);
        Ok(())
    }

    /// Publish after every store change.
    ///
    /// Events that pile up while a snapshot is being built are folded into
    /// the next one; each update carries the full state anyway.
    pub fn spawn(self) -> JoinHandle<()> {
        let mut events = self.store.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }

                loop {
                    match events.try_recv() {
                        Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                        Err(_) => break,
                    }
                }

                if let Err(e) = self.publish_now() {
                    error!("Failed to build update message: {}", e);
                }
            }
        })
    }
}
