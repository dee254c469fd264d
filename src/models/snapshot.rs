//! Raw telemetry snapshot model.
//!
//! A [`Snapshot`] is the parsed form of one poll of the tracking network feed:
//! the stations with their antennas plus every link active at that instant.
//! Snapshots are immutable once handed to the store; everything derived from
//! them (loads, per-target views, events) is recomputed wholesale on update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Complex, TargetId};

/// Speed of light in km/s, used to derive distance from round-trip light time.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Radio band of a link.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    S,
    X,
    K,
    Ka,
    Ku,
    L,
    Unknown,
}

impl Band {
    /// Parse a band from its feed code, case-insensitively.
    pub fn from_code(code: &str) -> Band {
        match code.to_ascii_uppercase().as_str() {
            "S" => Band::S,
            "X" => Band::X,
            "K" => Band::K,
            "KA" => Band::Ka,
            "KU" => Band::Ku,
            "L" => Band::L,
            _ => Band::Unknown,
        }
    }
}

/// One antenna at a complex, with its current pointing if reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Antenna {
    /// Dish designation, e.g. "DSS-14".
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azimuth_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_deg: Option<f64>,
}

/// An active link between an antenna and a target. Ephemeral: exists only
/// within the snapshot that reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub target_id: TargetId,
    /// Short target code, e.g. "VGR1".
    pub target_name: String,
    pub complex: Complex,
    /// Antenna serving the link, e.g. "DSS-43".
    pub antenna: String,
    pub band: Band,
    /// Downlink data rate in bits per second (0 when idle).
    pub down_rate_bps: f64,
    /// Uplink data rate in bits per second (0 when idle).
    pub up_rate_bps: f64,
    /// Round-trip light time in seconds (0 when not reported).
    pub rtlt_seconds: f64,
}

impl Link {
    /// One-way distance implied by the round-trip light time, in km.
    pub fn distance_km(&self) -> f64 {
        self.rtlt_seconds * SPEED_OF_LIGHT_KM_S / 2.0
    }
}

/// A complex and its antennas as reported in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    pub complex: Complex,
    pub antennas: Vec<Antenna>,
}

/// One poll of the tracking network: every station and every active link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub stations: Vec<StationStatus>,
    pub links: Vec<Link>,
}

/// (timestamp, snapshot) pair held in the bounded history ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

/// Per-complex load summary, recomputed wholesale on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexLoad {
    pub complex: Complex,
    /// Antennas at the complex, active or not.
    pub total_antennas: usize,
    /// Links currently served by the complex.
    pub active_links: usize,
}

/// Flattened per-target view joining all links sharing a target identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub target_id: TargetId,
    pub target_name: String,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_from_code() {
        assert_eq!(Band::from_code("x"), Band::X);
        assert_eq!(Band::from_code("Ka"), Band::Ka);
        assert_eq!(Band::from_code("Q"), Band::Unknown);
    }

    #[test]
    fn test_link_distance() {
        let link = Link {
            target_id: TargetId::new(32),
            target_name: "VGR2".to_string(),
            complex: Complex::Canberra,
            antenna: "DSS-43".to_string(),
            band: Band::X,
            down_rate_bps: 160.0,
            up_rate_bps: 16.0,
            rtlt_seconds: 2.0,
        };
        assert!((link.distance_km() - SPEED_OF_LIGHT_KM_S).abs() < 1e-9);
    }
}
