//! Periodic expiry of old margin alerts.
//!
//! Removes alerts older than the configured age from the shared engine on a
//! fixed interval using `tokio::time::interval`. The first tick fires
//! immediately, so a freshly started task purges right away.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::SharedEngine;

/// Run the alert purge loop.
///
/// Deletes alerts older than `max_age_days` every `interval`. Runs until
/// `cancel` is triggered.
pub async fn run(
    engine: SharedEngine,
    max_age_days: u32,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        max_age_days,
        interval_secs = interval.as_secs(),
        "Alert purge job started"
    );

    let mut interval = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Alert purge job stopping");
                break;
            }
            _ = interval.tick() => {
                let deleted = engine.lock().await.purge_older_than(max_age_days);
                if deleted > 0 {
                    tracing::info!(deleted, "Alert purge: removed expired alerts");
                } else {
                    tracing::debug!("Alert purge: nothing to remove");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PurgeTask
// ---------------------------------------------------------------------------

/// Handle to a spawned purge loop.
///
/// The loop is stopped by [`PurgeTask::shutdown`] or, at the latest, when
/// the handle is dropped.
pub struct PurgeTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PurgeTask {
    /// Spawn the purge loop on the current Tokio runtime.
    pub fn spawn(engine: SharedEngine, max_age_days: u32, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(engine, max_age_days, interval, cancel.clone()));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Alert purge job panicked");
            }
        }
    }
}

impl Drop for PurgeTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
