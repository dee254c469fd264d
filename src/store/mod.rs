//! Concurrently-readable store of current and recent telemetry.
//!
//! The store is the only structure touched by more than one concurrency
//! domain: the single ingestion task writes, the control loop and any export
//! paths read. It follows the lock discipline used throughout the crate:
//! `parking_lot::RwLock` guarding plain owned data, writers doing only
//! in-memory work under the lock, and every read handing back a defensive
//! copy so no caller can observe or corrupt internal state.

pub mod ring;
pub mod series;

mod store_tests;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::TargetId;
use crate::config::MonitorConfig;
use crate::error::ProviderError;
use crate::models::{ComplexLoad, HistoryEntry, LinkEvent, Snapshot, TargetView};
use crate::services::aggregate;
use crate::services::detector::{self, LossRecord};
use ring::BoundedRing;
use series::TargetSeries;

/// Read-side copy of the store: the latest snapshot with the aggregates that
/// were computed from it, plus fetch bookkeeping. Self-consistent by
/// construction, and independent of the store's internals.
#[derive(Debug, Clone, Serialize)]
pub struct StoreView {
    pub snapshot: Option<Snapshot>,
    /// Time of the last successful update.
    pub last_updated: Option<DateTime<Utc>>,
    /// Time of the last update attempt, successful or not.
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_fetch_duration: Option<std::time::Duration>,
    /// Error of the most recent attempt; cleared by the next success.
    pub last_error: Option<String>,
    pub loads: Vec<ComplexLoad>,
    pub targets: Vec<TargetView>,
}

struct StoreInner {
    latest: Option<Snapshot>,
    last_updated: Option<DateTime<Utc>>,
    last_attempt: Option<DateTime<Utc>>,
    last_fetch_duration: Option<std::time::Duration>,
    last_error: Option<String>,
    history: BoundedRing<HistoryEntry>,
    series: HashMap<TargetId, TargetSeries>,
    losses: HashMap<TargetId, LossRecord>,
    events: BoundedRing<LinkEvent>,
    loads: Vec<ComplexLoad>,
    targets: Vec<TargetView>,
}

/// Shared handle to the snapshot store. Cheap to clone; all clones observe
/// the same state.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreInner>>,
    series_capacity: usize,
    resume_grace: chrono::Duration,
}

impl SnapshotStore {
    pub fn new(cfg: &MonitorConfig) -> Self {
        SnapshotStore {
            inner: Arc::new(RwLock::new(StoreInner {
                latest: None,
                last_updated: None,
                last_attempt: None,
                last_fetch_duration: None,
                last_error: None,
                history: BoundedRing::new(cfg.history_capacity),
                series: HashMap::new(),
                losses: HashMap::new(),
                events: BoundedRing::new(cfg.event_capacity),
                loads: Vec::new(),
                targets: Vec::new(),
            })),
            series_capacity: cfg.series_capacity,
            resume_grace: cfg.resume_grace(),
        }
    }

    /// Record the outcome of one ingestion cycle. Exclusive-write.
    ///
    /// On failure only the error/attempt/duration bookkeeping changes; the
    /// last good snapshot, history, series, and events all stay as they were.
    /// On success the history ring, per-target series, event ring, and
    /// aggregates are all advanced atomically with respect to readers.
    pub fn update(
        &self,
        outcome: Result<Snapshot, ProviderError>,
        fetch_duration: std::time::Duration,
    ) {
        let now = Utc::now();
        let mut inner = self.inner.write();
        inner.last_attempt = Some(now);
        inner.last_fetch_duration = Some(fetch_duration);

        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "telemetry fetch failed; keeping previous snapshot");
                inner.last_error = Some(e.to_string());
                return;
            }
        };

        let previous = inner
            .latest
            .as_ref()
            .map(detector::link_map)
            .unwrap_or_default();
        let current = detector::link_map(&snapshot);
        let events = detector::detect_events(
            &previous,
            &current,
            &mut inner.losses,
            snapshot.timestamp,
            self.resume_grace,
        );
        for event in events {
            debug!(
                kind = ?event.kind,
                target = %event.target_name,
                station = ?event.station_of_record(),
                "link event"
            );
            inner.events.push(event);
        }

        for link in &snapshot.links {
            let entry = inner
                .series
                .entry(link.target_id)
                .or_insert_with(|| TargetSeries::new(self.series_capacity));
            if link.rtlt_seconds > 0.0 {
                entry.push_rtlt(snapshot.timestamp, link.rtlt_seconds);
            }
            if link.down_rate_bps > 0.0 {
                entry.push_down_rate(snapshot.timestamp, link.down_rate_bps);
            }
        }

        inner.history.push(HistoryEntry {
            at: snapshot.timestamp,
            snapshot: snapshot.clone(),
        });
        inner.loads = aggregate::complex_loads(&snapshot);
        inner.targets = aggregate::target_views(&snapshot);
        inner.latest = Some(snapshot);
        inner.last_updated = Some(now);
        inner.last_error = None;
    }

    /// Consistent copy of the current state. Mutating the returned view
    /// cannot affect the store.
    pub fn view(&self) -> StoreView {
        let inner = self.inner.read();
        StoreView {
            snapshot: inner.latest.clone(),
            last_updated: inner.last_updated,
            last_attempt: inner.last_attempt,
            last_fetch_duration: inner.last_fetch_duration,
            last_error: inner.last_error.clone(),
            loads: inner.loads.clone(),
            targets: inner.targets.clone(),
        }
    }

    /// Copy of one target's series, if any points have been recorded.
    pub fn series(&self, target: TargetId) -> Option<TargetSeries> {
        self.inner.read().series.get(&target).cloned()
    }

    /// Radial velocity estimate for a target, in km/s (positive = receding).
    /// Returns 0 for unknown targets or series with fewer than two points.
    pub fn estimate_velocity(&self, target: TargetId) -> f64 {
        self.inner
            .read()
            .series
            .get(&target)
            .map(|s| s.estimate_velocity())
            .unwrap_or(0.0)
    }

    /// The last `n` events, oldest of those first.
    pub fn recent_events(&self, n: usize) -> Vec<LinkEvent> {
        self.inner.read().events.recent(n)
    }

    /// Copy of the snapshot history ring, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.read().history.to_vec()
    }

    /// Identity of every target in the current snapshot, in view order.
    /// Used by the refresh loop to decide whose forecasts to keep warm.
    pub fn active_targets(&self) -> Vec<(TargetId, String)> {
        self.inner
            .read()
            .targets
            .iter()
            .map(|t| (t.target_id, t.target_name.clone()))
            .collect()
    }
}
