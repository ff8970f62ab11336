//! Running store operations off the caller's thread.
//!
//! Database work is blocking, so it is moved to tokio's blocking pool.  The
//! store's own mutex still allows only one database operation at a time.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ClientError, Result};
use crate::state::NoteStore;

/// Run `op` against `store` on the blocking pool.
pub async fn run_blocking<F, T>(store: &NoteStore, op: F) -> Result<T>
where
    F: FnOnce(&NoteStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ClientError::Task(e.to_string()))?
}

/// Handle to a running periodic refresh.
pub struct RefreshTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Stop the task and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "refresh task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Shortest accepted refresh period.
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(10);

/// Refresh the store every `period` until stopped.  Ticks refresh only when
/// the database changed; ticks while disconnected are skipped.  Periods
/// below [`MIN_REFRESH_PERIOD`] are raised to it.
pub fn spawn_periodic_refresh(store: NoteStore, period: Duration) -> RefreshTask {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    if period < MIN_REFRESH_PERIOD {
        tracing::warn!(
            requested_ms = period.as_millis() as u64,
            "refresh period too short, using minimum"
        );
    }
    let period = period.max(MIN_REFRESH_PERIOD);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick completes immediately
        interval.tick().await;

        tracing::debug!(period_ms = period.as_millis() as u64, "periodic refresh started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match run_blocking(&store, |s| s.refresh_if_stale()).await {
                        Ok(true) => tracing::debug!(version = store.version(), "periodic refresh"),
                        Ok(false) | Err(ClientError::NotConnected) => {}
                        Err(e) => tracing::warn!(error = %e, "periodic refresh failed"),
                    }
                }
                // a stop request or a dropped handle both end the task
                _ = stop_rx.changed() => break,
            }
        }

        tracing::debug!("periodic refresh stopped");
    });

    RefreshTask { stop_tx, handle }
}

/// Spawn the periodic refresh configured for `store`, if any.
pub fn spawn_configured_refresh(
    store: &NoteStore,
    interval: Option<Duration>,
) -> Option<RefreshTask> {
    interval.map(|period| spawn_periodic_refresh(store.clone(), period))
}
