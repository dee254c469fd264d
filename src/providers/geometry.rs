//! Geometry collaborator: equatorial-to-horizontal conversion.

use crate::api::Complex;
use crate::models::{HorizontalSample, SkySample};

/// Pure conversion from a sky position to horizontal coordinates for one
/// complex, including the angular separation from the sun. Implementations
/// must be side-effect free; the pass planner calls this for every sample at
/// every complex.
pub trait SkyGeometry: Send + Sync {
    fn horizontal(&self, sample: &SkySample, site: Complex) -> HorizontalSample;
}

impl<F> SkyGeometry for F
where
    F: Fn(&SkySample, Complex) -> HorizontalSample + Send + Sync,
{
    fn horizontal(&self, sample: &SkySample, site: Complex) -> HorizontalSample {
        self(sample, site)
    }
}
