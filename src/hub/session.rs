//! Websocket session relaying hub updates to one viewer

use super::hub::Subscription;
use super::message::Update;
use crate::config::HubConfig;
use actix_ws::{CloseReason, Message, MessageStream, Session};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::time::{Instant, interval_at, sleep_until};
use tracing::debug;

/// Keep-alive timings for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub ping_interval: Duration,
    pub pong_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&HubConfig::default())
    }
}

impl From<&HubConfig> for SessionConfig {
    fn from(config: &HubConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            pong_timeout: config.pong_timeout(),
        }
    }
}

/// Drive one websocket until either side goes away.
///
/// Inbound frames only matter for liveness: any frame refreshes the
/// last-seen instant and pings are answered. Outbound, every update newer
/// than the last one sent is written as a text frame and a ping goes out
/// every `ping_interval`. The session ends when the peer closes, stays
/// silent past `pong_timeout`, a write fails, or the hub drops the
/// subscription. `initial` is written first.
pub async fn run(
    mut session: Session,
    mut messages: MessageStream,
    mut subscription: Subscription,
    initial: Update,
    config: SessionConfig,
) {
    let id = subscription.id();
    let mut last_seen = Instant::now();
    let mut last_revision = initial.revision;
    let mut ping = interval_at(Instant::now() + config.ping_interval, config.ping_interval);

    let (why, close_reason): (&str, Option<CloseReason>) =
        if session.text(&*initial.body).await.is_err() {
            ("write failed", None)
        } else {
            loop {
                tokio::select! {
                    frame = messages.next() => match frame {
                        Some(Ok(Message::Ping(bytes))) => {
                            last_seen = Instant::now();
                            if session.pong(&bytes).await.is_err() {
                                break ("write failed", None);
                            }
                        }
                        Some(Ok(Message::Close(reason))) => break ("closed by peer", reason),
                        Some(Ok(_)) => last_seen = Instant::now(),
                        Some(Err(e)) => {
                            debug!("Websocket protocol error on subscriber {}: {}", id, e);
                            break ("protocol error", None);
                        }
                        None => break ("connection dropped", None),
                    },
                    update = subscription.recv() => match update {
                        Some(update) => {
                            if update.revision <= last_revision {
                                continue;
                            }
                            last_revision = update.revision;
                            if session.text(&*update.body).await.is_err() {
                                break ("write failed", None);
                            }
                        }
                        None => break ("dropped by hub", None),
                    },
                    _ = ping.tick() => {
                        if session.ping(b"").await.is_err() {
                            break ("write failed", None);
                        }
                    }
                    _ = sleep_until(last_seen + config.pong_timeout) => {
                        break ("pong timeout", None);
                    }
                }
            }
        };

    debug!("Websocket session {} ended: {}", id, why);
    drop(subscription);
    let _ = session.close(close_reason).await;
}
