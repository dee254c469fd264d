//! Error types for collaborator and configuration failures.
//!
//! Errors here are data: ingestion and forecast failures are recorded in the
//! store/cache last-error slots and retried by the caller's own cadence. The
//! only fatal class is an invalid configuration, surfaced at construction.

use crate::api::TargetId;

/// Result type for collaborator (telemetry/ephemeris) operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The upstream source does not know the requested target.
    #[error("target {0} is not known to the upstream source")]
    UnknownTarget(TargetId),
    /// The upstream request itself failed (network, rate limit, 5xx, ...).
    #[error("upstream request failed: {0}")]
    Upstream(String),
    /// The upstream answered but the payload could not be interpreted.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Invalid monitor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}
