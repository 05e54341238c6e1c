//! Status poller: walks the tracked manifest IDs on an interval, fetches
//! each one's remote report, and upserts it into the local store.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::{Duration, interval};
use tracing::{debug, info, warn};

use crate::traits::{StatusClient, StatusStore};

/// Tuning knobs for the poller.
#[derive(Debug, Clone)]
pub struct StatusPollerConfig {
    /// How often to walk the tracked set (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for StatusPollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000,
        }
    }
}

/// Periodic reconciliation job.
///
/// Each tick reads the tracked IDs from the [`StatusStore`], fetches the
/// current report for each via the [`StatusClient`], and upserts what came
/// back. A failed fetch is logged and counted; it is retried naturally on
/// the next tick, never inside one.
pub struct StatusPoller {
    client: Arc<dyn StatusClient>,
    store: Arc<dyn StatusStore>,
    config: StatusPollerConfig,
    /// Reports fetched and upserted since the poller started.
    completed: Arc<AtomicU64>,
    /// Fetches or upserts that failed since the poller started.
    failed: Arc<AtomicU64>,
}

impl StatusPoller {
    pub fn new(
        client: Arc<dyn StatusClient>,
        store: Arc<dyn StatusStore>,
        config: StatusPollerConfig,
    ) -> Self {
        Self {
            client,
            store,
            config,
            completed: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the poll loop. Should be spawned as a background task.
    pub async fn run(&self) {
        info!(
            poll_interval_ms = self.config.poll_interval_ms,
            "status poller started"
        );
        let mut tick = interval(Duration::from_millis(self.config.poll_interval_ms));

        loop {
            tick.tick().await;
            self.run_once().await;
        }
    }

    /// One reconciliation pass over the tracked set.
    pub async fn run_once(&self) {
        let tracked = match self.store.tracked().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "failed to read tracked manifest ids");
                return;
            }
        };

        if tracked.is_empty() {
            return;
        }

        debug!(tracked = tracked.len(), "reconciling remote status");

        for manifest_id in tracked {
            match self.client.fetch(manifest_id).await {
                Ok(Some(report)) => {
                    let deals = report.deals.len();
                    let failed = report.content.failed;

                    if let Err(e) = self.store.upsert(report).await {
                        self.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(%manifest_id, error = %e, "failed to persist status report");
                        continue;
                    }

                    self.completed.fetch_add(1, Ordering::Relaxed);

                    if failed {
                        warn!(%manifest_id, deals, "remote service reports content failed");
                    } else {
                        debug!(%manifest_id, deals, "status report updated");
                    }
                }
                Ok(None) => {
                    debug!(%manifest_id, "remote service does not know this id yet");
                }
                Err(e) => {
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(%manifest_id, error = %e, "status fetch failed");
                }
            }
        }
    }

    /// Reports successfully fetched and stored since start.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Failed fetches or upserts since start.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
