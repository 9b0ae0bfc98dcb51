//! Alarm loop driven by the store's unacknowledged state

use super::player::{Playback, SoundPlayer};
use crate::alerts::AlertStore;
use crate::config::AlarmConfig;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct LoopState {
    /// Generation token of the live loop, if any
    running: Option<u64>,
    shut_down: bool,
}

#[derive(Debug)]
struct Inner {
    store: AlertStore,
    player: Arc<dyn SoundPlayer>,
    sound_path: PathBuf,
    interval: Duration,
    enabled: bool,
    state: Mutex<LoopState>,
    /// Bumped on every start and stop; a loop whose token differs is stale
    generation: watch::Sender<u64>,
    cycles: AtomicU64,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

/// Keeps the alarm sounding while any firing alert is unacknowledged.
///
/// Two states: Idle and Looping. [`evaluate`](Self::evaluate) moves between
/// them based on [`AlertStore::has_unacknowledged_firing`]. While Looping a
/// single task launches the player, waits for it, pauses for the configured
/// interval and starts over. Stopping bumps the generation in a watch
/// channel; every wait in the loop selects on it, so a stop takes effect
/// immediately and kills the in-flight player.
#[derive(Debug, Clone)]
pub struct AlarmController {
    inner: Arc<Inner>,
}

impl AlarmController {
    pub fn new(store: AlertStore, player: Arc<dyn SoundPlayer>, config: &AlarmConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                store,
                player,
                sound_path: config.sound_path(),
                interval: config.interval(),
                enabled: config.enabled,
                state: Mutex::new(LoopState::default()),
                generation,
                cycles: AtomicU64::new(0),
                watcher: Mutex::new(None),
            }),
        }
    }

    /// Spawn the task that re-evaluates on every store event
    pub fn start(&self) {
        if !self.inner.enabled {
            info!("Alarm disabled by configuration");
            return;
        }

        let mut events = self.inner.store.subscribe();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            inner.evaluate();
            loop {
                match events.recv().await {
                    Ok(_) => inner.evaluate(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Alarm watcher lagged by {} events", skipped);
                        inner.evaluate();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.inner.watcher.lock().replace(handle) {
            previous.abort();
        }
        info!(
            "Alarm controller started (player: {}, interval: {:?})",
            self.inner.player.name(),
            self.inner.interval
        );
    }

    /// Start or stop the loop to match the store. Never blocks.
    pub fn evaluate(&self) {
        self.inner.evaluate();
    }

    /// Stop the loop and the watcher for good
    pub fn shutdown(&self) {
        if let Some(watcher) = self.inner.watcher.lock().take() {
            watcher.abort();
        }

        let mut state = self.inner.state.lock();
        state.shut_down = true;
        if state.running.take().is_some() {
            self.inner.bump();
        }
        info!("Alarm controller stopped");
    }

    pub fn is_looping(&self) -> bool {
        self.inner.state.lock().running.is_some()
    }

    /// Number of playbacks launched so far
    pub fn cycles(&self) -> u64 {
        self.inner.cycles.load(Ordering::Relaxed)
    }

    pub fn player_name(&self) -> &str {
        self.inner.player.name()
    }
}

impl Inner {
    fn bump(&self) -> u64 {
        self.generation.send_modify(|generation| *generation += 1);
        *self.generation.borrow()
    }

    fn evaluate(self: &Arc<Self>) {
        let mut state = self.state.lock();
        self.evaluate_locked(&mut state);
    }

    /// Caller holds the controller mutex; the store lock is taken inside
    fn evaluate_locked(self: &Arc<Self>, state: &mut LoopState) {
        if state.shut_down || !self.enabled {
            return;
        }

        let wanted = self.store.has_unacknowledged_firing();
        match (wanted, state.running) {
            (true, None) => {
                let token = self.bump();
                state.running = Some(token);
                info!("Unacknowledged alerts present, starting alarm");
                let this = Arc::clone(self);
                tokio::spawn(async move { this.run(token).await });
            }
            (false, Some(_)) => {
                state.running = None;
                self.bump();
                info!("No unacknowledged alerts left, stopping alarm");
            }
            _ => {}
        }
    }

    async fn run(self: Arc<Self>, token: u64) {
        let mut cancel = self.generation.subscribe();

        loop {
            if *cancel.borrow_and_update() != token || !self.store.has_unacknowledged_firing() {
                break;
            }

            match self.player.play(&self.sound_path) {
                Ok(Playback::Child(mut child)) => {
                    self.cycles.fetch_add(1, Ordering::Relaxed);
                    tokio::select! {
                        status = child.wait() => match status {
                            Ok(status) if !status.success() => {
                                warn!("Audio player exited with {}", status);
                            }
                            Ok(_) => {}
                            Err(e) => warn!("Failed to wait for audio player: {}", e),
                        },
                        _ = cancelled(&mut cancel, token) => {
                            if let Err(e) = child.kill().await {
                                debug!("Failed to kill audio player: {}", e);
                            }
                            break;
                        }
                    }
                }
                Ok(Playback::Bell) => {
                    // The bell cannot be repeated usefully; hold until stopped.
                    self.cycles.fetch_add(1, Ordering::Relaxed);
                    cancelled(&mut cancel, token).await;
                    break;
                }
                Err(e) => warn!("Failed to play sound: {}", e),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancelled(&mut cancel, token) => break,
            }
        }

        self.finish(token);
    }

    /// Reset after the loop ends and re-check, all under the mutex, so a
    /// start request racing the exit is not lost.
    fn finish(self: &Arc<Self>, token: u64) {
        let mut state = self.state.lock();
        if state.running == Some(token) {
            debug!("Alarm loop exited on its own");
            state.running = None;
            self.evaluate_locked(&mut state);
        }
    }
}

/// Resolves once the generation moves past `token`
async fn cancelled(rx: &mut watch::Receiver<u64>, token: u64) {
    loop {
        if *rx.borrow_and_update() != token {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
