//! In-memory providers for tests and headless demos.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Duration;
use parking_lot::Mutex;

use crate::api::{TargetId, TimeWindow};
use crate::error::{ProviderError, ProviderResult};
use crate::models::{SkySample, Snapshot};
use crate::providers::{EphemerisSource, TelemetrySource};

/// Telemetry source that replays a scripted sequence of outcomes, then keeps
/// repeating the final one.
pub struct ScriptedTelemetry {
    script: Mutex<VecDeque<ProviderResult<Snapshot>>>,
    last: Mutex<Option<ProviderResult<Snapshot>>>,
}

impl ScriptedTelemetry {
    pub fn new(outcomes: Vec<ProviderResult<Snapshot>>) -> Self {
        ScriptedTelemetry {
            script: Mutex::new(outcomes.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TelemetrySource for ScriptedTelemetry {
    async fn fetch(&self) -> ProviderResult<Snapshot> {
        if let Some(next) = self.script.lock().pop_front() {
            *self.last.lock() = Some(next.clone());
            return next;
        }
        self.last
            .lock()
            .clone()
            .unwrap_or_else(|| Err(ProviderError::Upstream("script exhausted".to_string())))
    }
}

/// Ephemeris source backed by fixed per-target sample tracks.
#[derive(Default)]
pub struct StaticEphemeris {
    tracks: Mutex<HashMap<TargetId, Vec<SkySample>>>,
}

impl StaticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, target: TargetId, samples: Vec<SkySample>) {
        self.tracks.lock().insert(target, samples);
    }
}

#[async_trait]
impl EphemerisSource for StaticEphemeris {
    async fn track(
        &self,
        target: TargetId,
        window: TimeWindow,
        _step: Duration,
    ) -> ProviderResult<Vec<SkySample>> {
        let tracks = self.tracks.lock();
        let samples = tracks
            .get(&target)
            .ok_or(ProviderError::UnknownTarget(target))?;
        Ok(samples
            .iter()
            .filter(|s| window.contains(s.at))
            .copied()
            .collect())
    }
}
