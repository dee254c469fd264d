//! # DSN Watch Core
//!
//! Headless core of a deep-space ground-tracking network monitor. The crate
//! ingests periodic telemetry snapshots, keeps a consistent and concurrently
//! readable picture of "what is happening now and recently", derives link
//! events by diffing successive snapshots, and maintains a background-refreshed,
//! rate-limited cache of per-target geometric forecasts.
//!
//! ## Features
//!
//! - **Snapshot Store**: latest snapshot, bounded history ring, and bounded
//!   per-target RTLT/data-rate series behind a reader/writer lock
//! - **Event Detection**: new/lost/handoff/resumed link events from snapshot
//!   diffs, kept in a bounded ring
//! - **Aggregation**: per-complex load summaries and a flattened per-target
//!   view, recomputed wholesale on every update
//! - **Pass Planning**: interpolated visibility windows per complex with
//!   past/active/next/future classification, plus raw elevation traces
//! - **Forecast Cache**: staleness-aware per-target cache with explicit
//!   loading and error states
//! - **Refresh Scheduling**: prioritized, de-duplicated, single-flight queue
//!   pacing requests to the rate-limited forecast computation
//!
//! ## Architecture
//!
//! - [`api`]: shared identifier and time types
//! - [`models`]: snapshot, event, and forecast data model
//! - [`providers`]: traits for the excluded collaborators (telemetry feed,
//!   ephemeris service, coordinate geometry) and in-memory stand-ins
//! - [`store`]: the concurrently-readable snapshot store
//! - [`services`]: detection, aggregation, pass planning, and the two
//!   background loops
//! - [`cache`] / [`scheduler`]: derived-data cache and its refresh queue
//! - [`config`]: capacities, TTLs, and pacing policy
//!
//! The HTTP/XML ingestion, terminal rendering, and astronomical coordinate
//! transforms live outside this crate and plug in through [`providers`].

pub mod api;

pub mod cache;

pub mod config;

pub mod error;

pub mod models;

pub mod providers;

pub mod scheduler;

pub mod services;

pub mod store;
