//! Idle session eviction.
//!
//! Periodically removes sessions nobody has touched within the idle timeout
//! and strips the paging reactions from their messages. The rendered page
//! itself stays in the channel.

use crate::config::ReaperConfig;
use chat_client::Messenger;
use session_store::SessionStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Background sweeper over the session store.
pub struct ExpiryReaper {
    store: SessionStore,
    messenger: Arc<dyn Messenger>,
    config: ReaperConfig,
}

impl ExpiryReaper {
    pub fn new(store: SessionStore, messenger: Arc<dyn Messenger>, config: ReaperConfig) -> Self {
        Self {
            store,
            messenger,
            config,
        }
    }

    /// Run a single sweep. Returns the number of evicted sessions.
    pub async fn sweep_once(&self) -> usize {
        let mut evicted = 0;

        for session in self.store.all() {
            let Some(key) = session.key().cloned() else {
                continue;
            };
            if !session.is_idle(self.config.idle_timeout) {
                continue;
            }

            // A page turn may have landed since the snapshot.
            let still_idle = self
                .store
                .get(&key)
                .is_some_and(|live| live.is_idle(self.config.idle_timeout));
            if !still_idle {
                continue;
            }

            let Some(removed) = self.store.delete(&key) else {
                continue;
            };
            evicted += 1;
            info!(message = %key, query = %removed.query, "Evicted idle session");

            let Some(message) = removed.message else {
                continue;
            };
            match self.messenger.clear_reactions(&message).await {
                Ok(()) => {}
                Err(e) if e.is_expected() => {
                    debug!("Could not clear reactions on {}: {}", key, e);
                }
                Err(e) => {
                    error!("Failed to clear reactions on {}: {}", key, e);
                }
            }
        }

        evicted
    }

    /// Sweep on every interval tick until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            "Starting expiry reaper, interval: {:?}, idle timeout: {:?}",
            self.config.interval, self.config.idle_timeout
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Expiry reaper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let evicted = self.sweep_once().await;
                    if evicted > 0 {
                        debug!("Sweep evicted {} sessions", evicted);
                    }
                }
            }
        }
    }

    /// Spawn the reaper as a background task.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(shutdown).await;
        })
    }
}
