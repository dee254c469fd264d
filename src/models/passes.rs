//! Geometric forecast products: visibility passes and elevation traces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Complex, TargetId, TimeWindow};

/// One ephemeris sample: where the target sits on the celestial sphere at an
/// instant. Produced by the ephemeris collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkySample {
    pub at: DateTime<Utc>,
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Horizontal coordinates of a sky sample as seen from one complex, plus the
/// angular separation from the sun. Produced by the geometry collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalSample {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub sun_separation_deg: f64,
}

/// Temporal classification of a pass relative to "now".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Past,
    Active,
    /// The chronologically first upcoming pass across all complexes.
    Next,
    Future,
}

/// A contiguous interval during which the target stays above the minimum
/// elevation at one complex. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub complex: Complex,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Instant of maximum elevation within the pass.
    pub peak_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    /// Minimum sun separation over the samples inside the pass.
    pub min_sun_separation_deg: f64,
    pub status: PassStatus,
}

/// All forecast passes for one target, sorted by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPlan {
    pub target_id: TargetId,
    pub target_name: String,
    pub generated_at: DateTime<Utc>,
    /// Window the underlying ephemeris samples were requested for.
    pub window: TimeWindow,
    pub passes: Vec<Pass>,
}

/// (time, elevation) point of an elevation trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub at: DateTime<Utc>,
    pub elevation_deg: f64,
}

/// Elevation over time for one target at one complex. No thresholding or
/// segmentation, just the raw curve for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationTrace {
    pub target_id: TargetId,
    pub complex: Complex,
    pub generated_at: DateTime<Utc>,
    pub samples: Vec<ElevationSample>,
}
