//! Periodic removal of expired entries
//!
//! Entries are otherwise only reset when the same client returns, so clients
//! that never come back would stay in the map for the life of the process.

use crate::domain::repository::RateLimitStore;
use platform::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to the background sweep task. Dropping it stops the task.
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a task that sweeps `store` every `interval`
///
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper<S>(store: Arc<S>, clock: Arc<dyn Clock>, interval: Duration) -> SweeperHandle
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be expired yet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.sweep_expired(clock.now_ms()).await;
            if removed > 0 {
                let tracked = store.tracked_clients().await;
                tracing::debug!(
                    removed = removed,
                    tracked = tracked,
                    "Swept expired rate limit entries"
                );
            }
        }
    });

    SweeperHandle { task }
}
