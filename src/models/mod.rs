//! Domain data model: raw telemetry snapshots, derived link events, and
//! geometric forecast products.

pub mod events;
pub mod passes;
pub mod snapshot;

pub use events::{EventKind, LinkEvent};
pub use passes::{
    ElevationSample, ElevationTrace, HorizontalSample, Pass, PassPlan, PassStatus, SkySample,
};
pub use snapshot::{
    Antenna, Band, ComplexLoad, HistoryEntry, Link, Snapshot, StationStatus, TargetView,
    SPEED_OF_LIGHT_KM_S,
};
