//! Shared identifier and time types used across the crate.
//!
//! This file consolidates the small value types every layer speaks: target
//! identifiers, the closed set of ground complexes, and time windows. All
//! types derive Serialize/Deserialize so the excluded presentation and export
//! layers can consume them as JSON.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a tracked target (spacecraft/mission).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub i64);

impl TargetId {
    pub fn new(value: i64) -> Self {
        TargetId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TargetId {
    fn from(value: i64) -> Self {
        TargetId(value)
    }
}

/// Geographic location of an observer (decimal degrees, meters above sea level).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
}

/// One of the three fixed ground-tracking complexes.
///
/// The set is closed: the network has exactly three complexes, so sites are an
/// enum rather than an open identifier space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complex {
    Goldstone,
    Canberra,
    Madrid,
}

impl Complex {
    /// All complexes in canonical order. Per-site iteration always uses this
    /// order so derived output is deterministic.
    pub const ALL: [Complex; 3] = [Complex::Goldstone, Complex::Canberra, Complex::Madrid];

    /// Short lowercase code as used by telemetry feeds.
    pub fn code(&self) -> &'static str {
        match self {
            Complex::Goldstone => "gdscc",
            Complex::Canberra => "cdscc",
            Complex::Madrid => "mdscc",
        }
    }

    /// Human-readable complex name.
    pub fn name(&self) -> &'static str {
        match self {
            Complex::Goldstone => "Goldstone",
            Complex::Canberra => "Canberra",
            Complex::Madrid => "Madrid",
        }
    }

    /// Observer location of the complex.
    pub fn location(&self) -> GeographicLocation {
        match self {
            Complex::Goldstone => GeographicLocation {
                latitude_deg: 35.4267,
                longitude_deg: -116.8900,
                elevation_m: 1001.0,
            },
            Complex::Canberra => GeographicLocation {
                latitude_deg: -35.4014,
                longitude_deg: 148.9817,
                elevation_m: 688.0,
            },
            Complex::Madrid => GeographicLocation {
                latitude_deg: 40.4314,
                longitude_deg: -4.2481,
                elevation_m: 720.0,
            },
        }
    }

    /// Parse a complex from its feed code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Complex> {
        match code.to_ascii_lowercase().as_str() {
            "gdscc" | "goldstone" => Some(Complex::Goldstone),
            "cdscc" | "canberra" => Some(Complex::Canberra),
            "mdscc" | "madrid" => Some(Complex::Madrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Half-open time window `[start, end)` in UTC.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
