//! Visibility pass planning.
//!
//! Pure functions: given ephemeris samples for one target and the current
//! time, produce the visibility windows at every complex with a temporal
//! classification, or the raw elevation curve for one complex. No shared
//! state, safe to call concurrently for different targets.

use chrono::{DateTime, Duration, Utc};

use crate::api::{Complex, TargetId, TimeWindow};
use crate::models::{ElevationSample, ElevationTrace, Pass, PassPlan, PassStatus, SkySample};
use crate::providers::SkyGeometry;

/// Minimum elevation for a target to count as visible from a complex.
pub const MIN_ELEVATION_DEG: f64 = 5.0;

/// Fewer samples than this yields an empty plan: the boundary interpolation
/// needs bracketing neighbours to mean anything.
pub const MIN_SAMPLES: usize = 3;

/// Compute the pass plan for one target across all complexes.
///
/// Passes are maximal contiguous runs of samples at or above
/// [`MIN_ELEVATION_DEG`]. Boundaries are linearly interpolated between the
/// bracketing samples; a pass still open at the end of the sampled window is
/// closed at the last sample's time. Classification is global across
/// complexes: exactly one not-yet-started pass is labelled `Next`.
pub fn plan_passes(
    target_id: TargetId,
    target_name: &str,
    samples: &[SkySample],
    window: TimeWindow,
    now: DateTime<Utc>,
    geometry: &dyn SkyGeometry,
) -> PassPlan {
    let mut passes = Vec::new();
    if samples.len() >= MIN_SAMPLES {
        for complex in Complex::ALL {
            passes.extend(site_passes(samples, complex, geometry));
        }
    }
    passes.sort_by_key(|p| p.start);
    classify(&mut passes, now);

    PassPlan {
        target_id,
        target_name: target_name.to_string(),
        generated_at: now,
        window,
        passes,
    }
}

/// Elevation curve for one target at one complex. Same geometry as the pass
/// planner, no thresholding.
pub fn elevation_trace(
    target_id: TargetId,
    complex: Complex,
    samples: &[SkySample],
    now: DateTime<Utc>,
    geometry: &dyn SkyGeometry,
) -> ElevationTrace {
    ElevationTrace {
        target_id,
        complex,
        generated_at: now,
        samples: samples
            .iter()
            .map(|s| ElevationSample {
                at: s.at,
                elevation_deg: geometry.horizontal(s, complex).elevation_deg,
            })
            .collect(),
    }
}

struct OpenPass {
    start: DateTime<Utc>,
    peak_time: DateTime<Utc>,
    max_elevation_deg: f64,
    min_sun_separation_deg: f64,
}

fn site_passes(samples: &[SkySample], complex: Complex, geometry: &dyn SkyGeometry) -> Vec<Pass> {
    let horizontal: Vec<_> = samples
        .iter()
        .map(|s| geometry.horizontal(s, complex))
        .collect();

    let mut passes = Vec::new();
    let mut open: Option<OpenPass> = None;

    for (i, h) in horizontal.iter().enumerate() {
        let at = samples[i].at;
        if h.elevation_deg >= MIN_ELEVATION_DEG {
            match open.as_mut() {
                None => {
                    let start = if i == 0 {
                        at
                    } else {
                        crossing_time(
                            samples[i - 1].at,
                            horizontal[i - 1].elevation_deg,
                            at,
                            h.elevation_deg,
                        )
                    };
                    open = Some(OpenPass {
                        start,
                        peak_time: at,
                        max_elevation_deg: h.elevation_deg,
                        min_sun_separation_deg: h.sun_separation_deg,
                    });
                }
                Some(pass) => {
                    if h.elevation_deg > pass.max_elevation_deg {
                        pass.max_elevation_deg = h.elevation_deg;
                        pass.peak_time = at;
                    }
                    pass.min_sun_separation_deg =
                        pass.min_sun_separation_deg.min(h.sun_separation_deg);
                }
            }
        } else if let Some(pass) = open.take() {
            let end = crossing_time(
                samples[i - 1].at,
                horizontal[i - 1].elevation_deg,
                at,
                h.elevation_deg,
            );
            passes.push(close_pass(pass, end, complex));
        }
    }

    // Still above threshold at the end of the window: close at the last
    // sample, no extrapolation.
    if let Some(pass) = open {
        passes.push(close_pass(pass, samples[samples.len() - 1].at, complex));
    }

    passes
}

fn close_pass(open: OpenPass, end: DateTime<Utc>, complex: Complex) -> Pass {
    Pass {
        complex,
        start: open.start,
        end,
        peak_time: open.peak_time,
        max_elevation_deg: open.max_elevation_deg,
        min_sun_separation_deg: open.min_sun_separation_deg,
        status: PassStatus::Future,
    }
}

/// Instant at which the elevation crosses the threshold, linearly
/// interpolated between the bracketing samples and clamped to the interval.
fn crossing_time(
    t0: DateTime<Utc>,
    e0: f64,
    t1: DateTime<Utc>,
    e1: f64,
) -> DateTime<Utc> {
    let span_ms = (t1 - t0).num_milliseconds();
    if span_ms <= 0 || (e1 - e0).abs() < f64::EPSILON {
        return t0;
    }
    let frac = ((MIN_ELEVATION_DEG - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t0 + Duration::milliseconds((frac * span_ms as f64).round() as i64)
}

fn classify(passes: &mut [Pass], now: DateTime<Utc>) {
    let mut next_taken = false;
    for pass in passes.iter_mut() {
        pass.status = if pass.end < now {
            PassStatus::Past
        } else if pass.start < now {
            PassStatus::Active
        } else if !next_taken {
            next_taken = true;
            PassStatus::Next
        } else {
            PassStatus::Future
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HorizontalSample;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(secs: i64, dec_deg: f64) -> SkySample {
        SkySample {
            at: t(secs),
            ra_deg: 0.0,
            dec_deg,
        }
    }

    /// Test geometry: Goldstone sees the declination as elevation directly,
    /// the other complexes always look below the horizon. Sun separation
    /// mirrors the right ascension so tests can steer it per sample.
    fn test_geometry() -> impl SkyGeometry {
        |s: &SkySample, site: Complex| HorizontalSample {
            elevation_deg: if site == Complex::Goldstone {
                s.dec_deg
            } else {
                -30.0
            },
            azimuth_deg: 180.0,
            sun_separation_deg: if s.ra_deg > 0.0 { s.ra_deg } else { 120.0 },
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::new(t(0), t(10_000))
    }

    #[test]
    fn test_too_few_samples_is_empty_plan() {
        let geometry = test_geometry();
        for n in 0..MIN_SAMPLES {
            let samples: Vec<_> = (0..n).map(|i| sample(i as i64 * 600, 45.0)).collect();
            let plan = plan_passes(
                TargetId::new(74),
                "MRO",
                &samples,
                window(),
                t(0),
                &geometry,
            );
            assert!(plan.passes.is_empty(), "expected empty plan for {} samples", n);
        }
    }

    #[test]
    fn test_interpolated_boundaries_between_samples() {
        let geometry = test_geometry();
        // Crosses 5 deg somewhere in (t0, t600) and back in (t600, t1200).
        let samples = vec![sample(0, 0.0), sample(600, 10.0), sample(1200, 0.0)];
        let plan = plan_passes(
            TargetId::new(74),
            "MRO",
            &samples,
            window(),
            t(0),
            &geometry,
        );

        assert_eq!(plan.passes.len(), 1);
        let pass = &plan.passes[0];
        assert!(pass.start > t(0) && pass.start < t(600));
        assert!(pass.end > t(600) && pass.end < t(1200));
        // 0 -> 10 deg over 600 s crosses 5 deg at the midpoint.
        assert_eq!(pass.start, t(300));
        assert_eq!(pass.end, t(900));
        assert_eq!(pass.peak_time, t(600));
        assert_eq!(pass.max_elevation_deg, 10.0);
    }

    #[test]
    fn test_pass_open_at_window_end_closes_at_last_sample() {
        let geometry = test_geometry();
        let samples = vec![sample(0, 0.0), sample(600, 20.0), sample(1200, 30.0)];
        let plan = plan_passes(
            TargetId::new(74),
            "MRO",
            &samples,
            window(),
            t(0),
            &geometry,
        );

        assert_eq!(plan.passes.len(), 1);
        assert_eq!(plan.passes[0].end, t(1200));
    }

    #[test]
    fn test_pass_above_threshold_from_first_sample() {
        let geometry = test_geometry();
        let samples = vec![sample(0, 50.0), sample(600, 40.0), sample(1200, 0.0)];
        let plan = plan_passes(
            TargetId::new(74),
            "MRO",
            &samples,
            window(),
            t(0),
            &geometry,
        );

        assert_eq!(plan.passes.len(), 1);
        // No sample before the first one to interpolate against.
        assert_eq!(plan.passes[0].start, t(0));
        assert_eq!(plan.passes[0].max_elevation_deg, 50.0);
    }

    #[test]
    fn test_min_sun_separation_tracked_within_pass() {
        let geometry = test_geometry();
        let mut samples = vec![sample(0, 0.0), sample(600, 30.0), sample(1200, 40.0), sample(1800, 0.0)];
        samples[1].ra_deg = 90.0;
        samples[2].ra_deg = 25.0; // tightest separation inside the pass
        let plan = plan_passes(
            TargetId::new(74),
            "MRO",
            &samples,
            window(),
            t(0),
            &geometry,
        );

        assert_eq!(plan.passes.len(), 1);
        assert_eq!(plan.passes[0].min_sun_separation_deg, 25.0);
    }

    #[test]
    fn test_classification_past_active_next_future() {
        let geometry = test_geometry();
        // Three disjoint passes; "now" sits inside the second one.
        let samples = vec![
            sample(0, 0.0),
            sample(600, 10.0),
            sample(1200, 0.0),
            sample(1800, 10.0),
            sample(2400, 0.0),
            sample(3000, 10.0),
            sample(3600, 0.0),
            sample(4200, 10.0),
            sample(4800, 0.0),
        ];
        let now = t(1800);
        let plan = plan_passes(TargetId::new(74), "MRO", &samples, window(), now, &geometry);

        let statuses: Vec<_> = plan.passes.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                PassStatus::Past,
                PassStatus::Active,
                PassStatus::Next,
                PassStatus::Future
            ]
        );
        // Exactly one pass carries the Next label.
        assert_eq!(
            plan.passes
                .iter()
                .filter(|p| p.status == PassStatus::Next)
                .count(),
            1
        );
    }

    #[test]
    fn test_two_separate_passes_detected() {
        let geometry = test_geometry();
        let samples = vec![
            sample(0, 0.0),
            sample(600, 10.0),
            sample(1200, 0.0),
            sample(1800, 0.0),
            sample(2400, 10.0),
            sample(3000, 0.0),
        ];
        let plan = plan_passes(
            TargetId::new(74),
            "MRO",
            &samples,
            window(),
            t(0),
            &geometry,
        );
        assert_eq!(plan.passes.len(), 2);
        assert!(plan.passes[0].end < plan.passes[1].start);
    }

    #[test]
    fn test_elevation_trace_is_raw_curve() {
        let geometry = test_geometry();
        let samples = vec![sample(0, -10.0), sample(600, 3.0), sample(1200, 40.0)];
        let trace = elevation_trace(
            TargetId::new(74),
            Complex::Goldstone,
            &samples,
            t(0),
            &geometry,
        );

        assert_eq!(trace.samples.len(), 3);
        // No thresholding: below-horizon points are kept.
        assert_eq!(trace.samples[0].elevation_deg, -10.0);
        assert_eq!(trace.samples[2].elevation_deg, 40.0);
    }
}
