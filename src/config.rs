//! Monitor configuration: ring capacities, staleness policy, and pacing.
//!
//! Values resolve in three layers: compiled defaults, an optional TOML
//! fragment, and `DSNWATCH_*` environment variables (highest precedence).
//! Policy constants the detector and cache depend on (resume grace window,
//! error retry interval) live here rather than in the components.
//!
//! # Environment Variables
//! - `DSNWATCH_HISTORY_CAPACITY`: snapshots kept in the history ring
//! - `DSNWATCH_SERIES_CAPACITY`: points kept per target series
//! - `DSNWATCH_EVENT_CAPACITY`: events kept in the event ring
//! - `DSNWATCH_RESUME_GRACE_SECS`: window in which a reappearing target counts
//!   as resumed rather than new
//! - `DSNWATCH_PLAN_TTL_SECS` / `DSNWATCH_TRACE_TTL_SECS`: forecast staleness
//! - `DSNWATCH_ERROR_RETRY_SECS`: delay before retrying a failed forecast
//! - `DSNWATCH_PACING_MS`: minimum delay between forecast dispatches
//! - `DSNWATCH_POLL_INTERVAL_SECS`: telemetry ingestion cadence
//! - `DSNWATCH_FORECAST_HORIZON_HOURS` / `DSNWATCH_FORECAST_STEP_SECS`:
//!   ephemeris window and sample step requested per forecast

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for the monitor core. All durations are stored in integral
/// units and exposed as typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub history_capacity: usize,
    pub series_capacity: usize,
    pub event_capacity: usize,
    pub resume_grace_secs: u64,
    pub plan_ttl_secs: u64,
    pub trace_ttl_secs: u64,
    pub error_retry_secs: u64,
    pub pacing_ms: u64,
    pub poll_interval_secs: u64,
    pub forecast_horizon_hours: u64,
    pub forecast_step_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            history_capacity: 60,
            series_capacity: 180,
            event_capacity: 100,
            resume_grace_secs: 300,
            plan_ttl_secs: 3600,
            trace_ttl_secs: 3600,
            error_retry_secs: 120,
            pacing_ms: 1500,
            poll_interval_secs: 5,
            forecast_horizon_hours: 24,
            forecast_step_secs: 600,
        }
    }
}

impl MonitorConfig {
    /// Defaults overridden by any `DSNWATCH_*` environment variables set.
    ///
    /// # Errors
    /// Returns an error if a variable is set but does not parse, or if the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = MonitorConfig::default();
        read_env("DSNWATCH_HISTORY_CAPACITY", &mut cfg.history_capacity)?;
        read_env("DSNWATCH_SERIES_CAPACITY", &mut cfg.series_capacity)?;
        read_env("DSNWATCH_EVENT_CAPACITY", &mut cfg.event_capacity)?;
        read_env("DSNWATCH_RESUME_GRACE_SECS", &mut cfg.resume_grace_secs)?;
        read_env("DSNWATCH_PLAN_TTL_SECS", &mut cfg.plan_ttl_secs)?;
        read_env("DSNWATCH_TRACE_TTL_SECS", &mut cfg.trace_ttl_secs)?;
        read_env("DSNWATCH_ERROR_RETRY_SECS", &mut cfg.error_retry_secs)?;
        read_env("DSNWATCH_PACING_MS", &mut cfg.pacing_ms)?;
        read_env("DSNWATCH_POLL_INTERVAL_SECS", &mut cfg.poll_interval_secs)?;
        read_env("DSNWATCH_FORECAST_HORIZON_HOURS", &mut cfg.forecast_horizon_hours)?;
        read_env("DSNWATCH_FORECAST_STEP_SECS", &mut cfg.forecast_step_secs)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML fragment; absent keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: MonitorConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the components treat as programmer errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives: [(&'static str, u64); 8] = [
            ("history_capacity", self.history_capacity as u64),
            ("series_capacity", self.series_capacity as u64),
            ("event_capacity", self.event_capacity as u64),
            ("pacing_ms", self.pacing_ms),
            ("poll_interval_secs", self.poll_interval_secs),
            ("forecast_horizon_hours", self.forecast_horizon_hours),
            ("forecast_step_secs", self.forecast_step_secs),
            ("plan_ttl_secs", self.plan_ttl_secs),
        ];
        for (field, value) in positives {
            if value == 0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        Ok(())
    }

    pub fn resume_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.resume_grace_secs as i64)
    }

    pub fn plan_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.plan_ttl_secs as i64)
    }

    pub fn trace_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.trace_ttl_secs as i64)
    }

    pub fn error_retry(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.error_retry_secs as i64)
    }

    pub fn pacing(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.pacing_ms as i64)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }

    pub fn forecast_horizon(&self) -> chrono::Duration {
        chrono::Duration::hours(self.forecast_horizon_hours as i64)
    }

    pub fn forecast_step(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.forecast_step_secs as i64)
    }
}

fn read_env<T: FromStr>(var: &'static str, slot: &mut T) -> Result<(), ConfigError> {
    if let Ok(raw) = env::var(var) {
        *slot = raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw })?;
    }
    Ok(())
}
