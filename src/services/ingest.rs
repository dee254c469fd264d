//! Periodic telemetry ingestion.
//!
//! A single task polls the telemetry source on a fixed cadence and is the
//! only writer of the snapshot store. The fetch happens outside any lock;
//! only the in-memory update runs under the store's write lock. Shutdown is
//! cooperative, checked between cycles.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::providers::TelemetrySource;
use crate::store::SnapshotStore;

/// Run the ingestion loop until the shutdown signal flips. Designed to be
/// spawned once per process.
pub async fn run_ingest_loop(
    source: Arc<dyn TelemetrySource>,
    store: SnapshotStore,
    poll_interval: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval = ?poll_interval, "ingestion loop started");

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped sender means the process is tearing down.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let started = Instant::now();
                let outcome = source.fetch().await;
                let fetch_duration = started.elapsed();
                debug!(ok = outcome.is_ok(), ?fetch_duration, "telemetry cycle");
                store.update(outcome, fetch_duration);
            }
        }
    }

    info!("ingestion loop stopped");
}
