//! Subscriber registry owned by a single task

use super::message::Update;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub type SubscriberId = u64;

enum Command {
    Register {
        id: SubscriberId,
        sender: mpsc::Sender<Update>,
    },
    Unregister {
        id: SubscriberId,
    },
    Publish(Update),
    Stats(oneshot::Sender<usize>),
    Shutdown,
}

/// Fan-out of serialized updates to any number of subscribers.
///
/// All registry state lives inside the hub task; handles only send it
/// commands over an unbounded channel, so none of the calls here block.
/// A subscriber whose buffer is full when an update is published is
/// dropped and its channel closed.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    commands: mpsc::UnboundedSender<Command>,
    next_id: Arc<AtomicU64>,
    buffer_size: usize,
}

/// Receiving end handed to a subscriber; unregisters itself on drop
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Update>,
    hub: NotificationHub,
}

impl NotificationHub {
    /// Start the hub task. `buffer_size` is the per-subscriber queue length.
    pub fn spawn(buffer_size: usize) -> (Self, JoinHandle<()>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(receiver));
        let hub = Self {
            commands,
            next_id: Arc::new(AtomicU64::new(1)),
            buffer_size: buffer_size.max(1),
        };
        (hub, handle)
    }

    /// Add a subscriber, optionally pre-loaded with an initial update
    pub fn register(&self, initial: Option<Update>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.buffer_size);

        if let Some(update) = initial {
            // Fresh channel with capacity >= 1; cannot be full.
            let _ = sender.try_send(update);
        }

        // If the hub is gone the sender drops here and the subscription
        // sees a closed channel after the initial update.
        let _ = self.commands.send(Command::Register { id, sender });

        Subscription {
            id,
            receiver,
            hub: self.clone(),
        }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unregister(&self, id: SubscriberId) {
        let _ = self.commands.send(Command::Unregister { id });
    }

    /// Queue an update for every current subscriber and return at once
    pub fn publish(&self, update: Update) {
        if self.commands.send(Command::Publish(update)).is_err() {
            debug!("Hub stopped, update not delivered");
        }
    }

    /// Number of registered subscribers; 0 once the hub has stopped
    pub async fn subscriber_count(&self) -> usize {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Command::Stats(reply)).is_err() {
            return 0;
        }
        response.await.unwrap_or(0)
    }

    /// Stop the hub task, closing every subscriber channel
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next update; `None` once the hub has dropped this subscriber
    pub async fn recv(&mut self) -> Option<Update> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Update> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
    }
}

async fn run(mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut subscribers: HashMap<SubscriberId, mpsc::Sender<Update>> = HashMap::new();

    while let Some(command) = commands.recv().await {
        match command {
            Command::Register { id, sender } => {
                subscribers.insert(id, sender);
                debug!(
                    "Subscriber {} registered. Total subscribers: {}",
                    id,
                    subscribers.len()
                );
            }
            Command::Unregister { id } => {
                if subscribers.remove(&id).is_some() {
                    debug!(
                        "Subscriber {} unregistered. Total subscribers: {}",
                        id,
                        subscribers.len()
                    );
                }
            }
            Command::Publish(update) => {
                subscribers.retain(|id, sender| match sender.try_send(update.clone()) {
                    Ok(()) => true,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!("Subscriber {} is not keeping up, dropping it", id);
                        false
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        debug!("Subscriber {} went away", id);
                        false
                    }
                });
            }
            Command::Stats(reply) => {
                let _ = reply.send(subscribers.len());
            }
            Command::Shutdown => break,
        }
    }

    info!(
        "Notification hub stopped with {} subscribers",
        subscribers.len()
    );
}
