//! Collaborator interfaces consumed by the core.
//!
//! The HTTP/XML telemetry feed, the ephemeris service, and the astronomical
//! coordinate-transform library all live outside this crate. The core talks
//! to them through the small capability traits here; concrete implementations
//! are selected once at startup by the excluded wiring layer. The in-memory
//! implementations in [`memory`] back tests and headless demos.

pub mod geometry;

#[cfg(any(test, feature = "memory-providers"))]
pub mod memory;

use async_trait::async_trait;
use chrono::Duration;

use crate::api::{TargetId, TimeWindow};
use crate::error::ProviderResult;
use crate::models::{SkySample, Snapshot};

pub use geometry::SkyGeometry;

/// Source of raw telemetry snapshots (one poll of the tracking network).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> ProviderResult<Snapshot>;
}

/// Source of ephemeris samples for a target over a time window.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    /// Ordered (time, right ascension, declination) samples covering `window`
    /// at roughly `step` spacing.
    async fn track(
        &self,
        target: TargetId,
        window: TimeWindow,
        step: Duration,
    ) -> ProviderResult<Vec<SkySample>>;
}
