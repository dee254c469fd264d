//! Service layer: pure derivation logic and the two background loops.
//!
//! The pure pieces (detector, aggregator, pass planner) carry no state and
//! are driven by the store and the refresh loop. The loops own the process's
//! two concurrency domains: periodic ingestion (sole writer of the store) and
//! the message-driven refresh control loop.

pub mod aggregate;

pub mod detector;

pub mod ingest;

pub mod pass_planner;

pub mod refresh;

pub use ingest::run_ingest_loop;
pub use pass_planner::{elevation_trace, plan_passes, MIN_ELEVATION_DEG};
pub use refresh::{run_refresh_loop, RefreshCommand, TargetForecast};
