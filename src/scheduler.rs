//! Periodic driver for the auto-advance engine.
//!
//! One pass runs immediately when the owning view mounts, then hourly while
//! it stays active. The handle returned by [`AdvanceScheduler::spawn`] must
//! be shut down (or dropped) on teardown, or ticks keep firing after the
//! view is gone.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::engine;
use crate::state::AppState;
use crate::types::OwnerScope;

/// Interval between auto-advance passes (1 hour).
const ADVANCE_INTERVAL_SECS: u64 = 60 * 60;

/// Owns the periodic auto-advance loop for one actor's scope.
pub struct AdvanceScheduler {
    state: Arc<AppState>,
    scope: OwnerScope,
}

impl AdvanceScheduler {
    pub fn new(state: Arc<AppState>, scope: OwnerScope) -> Self {
        Self { state, scope }
    }

    /// Start the loop: one pass now, then one per interval. Returns the
    /// teardown handle.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move { self.run(shutdown_rx).await });
        SchedulerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            self.tick();
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(ADVANCE_INTERVAL_SECS)) => {}
                changed = shutdown.changed() => {
                    // A closed channel means the handle is gone; stop either way.
                    if changed.is_err() || *shutdown.borrow() {
                        log::info!("Auto-advance scheduler stopped");
                        return;
                    }
                }
            }
        }
    }

    /// One pass. Every failure is logged and swallowed — a failed tick must
    /// never cancel future ticks.
    fn tick(&self) {
        let advanced = {
            let guard = match self.state.db.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    log::warn!("Auto-advance tick skipped: store lock poisoned");
                    return;
                }
            };
            let Some(db) = guard.as_ref() else {
                log::warn!("Auto-advance tick skipped: database not initialized");
                return;
            };
            engine::run_auto_advance(db, &self.scope, Utc::now())
        };
        self.state.set_last_advance_run(Utc::now());

        if advanced.is_empty() {
            return;
        }
        // The in-memory collection is stale now; reload it from the store.
        let refreshed = self
            .state
            .with_store(|db| Ok(self.state.cache.refresh(db, &self.scope)?));
        match refreshed {
            Ok(n) => log::debug!(
                "Auto-advance moved {} lead(s); cache reloaded with {n}",
                advanced.len()
            ),
            Err(e) => log::warn!("Cache refresh after auto-advance failed: {e}"),
        }
    }
}

/// Teardown handle for a running scheduler.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        // Dropping the handle without an explicit shutdown still stops the
        // loop rather than leaking a free-running interval.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
