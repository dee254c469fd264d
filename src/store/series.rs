//! Per-target numeric time series derived from snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SPEED_OF_LIGHT_KM_S;
use crate::store::ring::BoundedRing;

/// One (timestamp, value) point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub at: DateTime<Utc>,
    pub value: f64,
}

/// Bounded RTLT and downlink-rate series for one target. The two rings are
/// capped independently: a link may report a rate without an RTLT and vice
/// versa.
#[derive(Debug, Clone)]
pub struct TargetSeries {
    rtlt: BoundedRing<SeriesPoint>,
    down_rate: BoundedRing<SeriesPoint>,
}

impl TargetSeries {
    pub fn new(capacity: usize) -> Self {
        TargetSeries {
            rtlt: BoundedRing::new(capacity),
            down_rate: BoundedRing::new(capacity),
        }
    }

    pub fn push_rtlt(&mut self, at: DateTime<Utc>, seconds: f64) {
        self.rtlt.push(SeriesPoint { at, value: seconds });
    }

    pub fn push_down_rate(&mut self, at: DateTime<Utc>, bps: f64) {
        self.down_rate.push(SeriesPoint { at, value: bps });
    }

    pub fn rtlt_points(&self) -> Vec<SeriesPoint> {
        self.rtlt.to_vec()
    }

    pub fn down_rate_points(&self) -> Vec<SeriesPoint> {
        self.down_rate.to_vec()
    }

    /// Signed radial velocity in km/s implied by the last two RTLT points
    /// (positive = receding). Returns 0 with fewer than two points or a
    /// non-positive elapsed time.
    pub fn estimate_velocity(&self) -> f64 {
        let points = self.rtlt_points();
        if points.len() < 2 {
            return 0.0;
        }
        let a = points[points.len() - 2];
        let b = points[points.len() - 1];
        let dt = (b.at - a.at).num_milliseconds() as f64 / 1000.0;
        if dt <= 0.0 {
            return 0.0;
        }
        let distance_delta_km = (b.value - a.value) * SPEED_OF_LIGHT_KM_S / 2.0;
        distance_delta_km / dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_velocity_needs_two_points() {
        let mut series = TargetSeries::new(8);
        assert_eq!(series.estimate_velocity(), 0.0);
        series.push_rtlt(t(0), 100.0);
        assert_eq!(series.estimate_velocity(), 0.0);
    }

    #[test]
    fn test_velocity_zero_on_non_positive_dt() {
        let mut series = TargetSeries::new(8);
        series.push_rtlt(t(10), 100.0);
        series.push_rtlt(t(10), 101.0);
        assert_eq!(series.estimate_velocity(), 0.0);
    }

    #[test]
    fn test_velocity_positive_when_receding() {
        let mut series = TargetSeries::new(8);
        // RTLT grows by 2 light-seconds over 100s: one-way distance grows by
        // one light-second, i.e. c km in 100 s.
        series.push_rtlt(t(0), 1000.0);
        series.push_rtlt(t(100), 1002.0);
        let v = series.estimate_velocity();
        assert!((v - SPEED_OF_LIGHT_KM_S / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_negative_when_approaching() {
        let mut series = TargetSeries::new(8);
        series.push_rtlt(t(0), 1000.0);
        series.push_rtlt(t(100), 998.0);
        assert!(series.estimate_velocity() < 0.0);
    }

    #[test]
    fn test_series_caps_independently() {
        let mut series = TargetSeries::new(2);
        for i in 0..5 {
            series.push_rtlt(t(i), i as f64);
        }
        series.push_down_rate(t(0), 2048.0);
        assert_eq!(series.rtlt_points().len(), 2);
        assert_eq!(series.down_rate_points().len(), 1);
    }
}
