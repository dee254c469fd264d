//! Staleness-aware cache for expensive per-target forecasts.
//!
//! Two independently keyed cache maps (pass plans by target, elevation traces
//! by target and complex) share one generic entry lifecycle:
//! absent -> loading -> value or error. A failed refresh keeps the previous
//! value: stale-but-present data beats a blank display. Loading and error
//! states are explicit and queryable, never inferred from absence.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::api::{Complex, TargetId};
use crate::config::MonitorConfig;
use crate::error::ProviderError;
use crate::models::{ElevationTrace, PassPlan};

/// One cached value with its refresh lifecycle state.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<T> {
    /// Last successfully computed value, kept across later failures.
    pub value: Option<T>,
    /// When `value` was computed.
    pub generated_at: Option<DateTime<Utc>>,
    /// A computation for this key is in flight.
    pub loading: bool,
    /// Error of the most recent failed attempt; cleared on success.
    pub last_error: Option<String>,
    /// When the most recent failed attempt finished.
    pub failed_at: Option<DateTime<Utc>>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        CacheEntry {
            value: None,
            generated_at: None,
            loading: false,
            last_error: None,
            failed_at: None,
        }
    }
}

impl<T> CacheEntry<T> {
    /// Whether this entry is due for a refresh at `now`.
    ///
    /// Never true while a computation is in flight. After a failure the retry
    /// interval gates the next attempt regardless of value age.
    fn needs_refresh(&self, now: DateTime<Utc>, ttl: Duration, retry: Duration) -> bool {
        if self.loading {
            return false;
        }
        if let (Some(_), Some(failed_at)) = (&self.last_error, self.failed_at) {
            return now - failed_at >= retry;
        }
        match self.generated_at {
            None => true,
            Some(generated_at) => now - generated_at >= ttl,
        }
    }
}

/// Keyed collection of cache entries. Not internally locked; [`ForecastCache`]
/// owns the lock so plan and trace updates for one target stay atomic.
#[derive(Debug)]
struct CacheMap<K, T> {
    entries: HashMap<K, CacheEntry<T>>,
}

impl<K: Eq + Hash + Clone, T: Clone> CacheMap<K, T> {
    fn new() -> Self {
        CacheMap {
            entries: HashMap::new(),
        }
    }

    fn needs_refresh(&self, key: &K, now: DateTime<Utc>, ttl: Duration, retry: Duration) -> bool {
        match self.entries.get(key) {
            None => true,
            Some(entry) => entry.needs_refresh(now, ttl, retry),
        }
    }

    fn set_loading(&mut self, key: K) {
        self.entries.entry(key).or_default().loading = true;
    }

    fn store(&mut self, key: K, outcome: Result<T, &ProviderError>, now: DateTime<Utc>) {
        let entry = self.entries.entry(key).or_default();
        entry.loading = false;
        match outcome {
            Ok(value) => {
                entry.value = Some(value);
                entry.generated_at = Some(now);
                entry.last_error = None;
                entry.failed_at = None;
            }
            Err(e) => {
                // Previous value (if any) is deliberately left in place.
                entry.last_error = Some(e.to_string());
                entry.failed_at = Some(now);
            }
        }
    }

    fn get(&self, key: &K) -> Option<CacheEntry<T>> {
        self.entries.get(key).cloned()
    }
}

struct ForecastInner {
    plans: CacheMap<TargetId, PassPlan>,
    traces: CacheMap<(TargetId, Complex), ElevationTrace>,
}

/// Shared forecast cache: pass plans keyed by target, elevation traces keyed
/// by (target, complex). Written by the refresh loop, read by everyone;
/// reads copy out.
#[derive(Clone)]
pub struct ForecastCache {
    inner: Arc<RwLock<ForecastInner>>,
    plan_ttl: Duration,
    trace_ttl: Duration,
    error_retry: Duration,
}

impl ForecastCache {
    pub fn new(cfg: &MonitorConfig) -> Self {
        ForecastCache {
            inner: Arc::new(RwLock::new(ForecastInner {
                plans: CacheMap::new(),
                traces: CacheMap::new(),
            })),
            plan_ttl: cfg.plan_ttl(),
            trace_ttl: cfg.trace_ttl(),
            error_retry: cfg.error_retry(),
        }
    }

    /// Whether the target's pass plan is due for a refresh. This is the
    /// signal the scheduler keys off; false while a computation is loading,
    /// which is what suppresses duplicate concurrent work for a key.
    pub fn plan_needs_refresh(&self, target: TargetId, now: DateTime<Utc>) -> bool {
        self.inner
            .read()
            .plans
            .needs_refresh(&target, now, self.plan_ttl, self.error_retry)
    }

    /// Whether a trace is due for a refresh.
    pub fn trace_needs_refresh(&self, target: TargetId, complex: Complex, now: DateTime<Utc>) -> bool {
        self.inner.read().traces.needs_refresh(
            &(target, complex),
            now,
            self.trace_ttl,
            self.error_retry,
        )
    }

    /// Whether any forecast entry of the target (its plan or one of its
    /// traces) is due for a refresh. One dispatch recomputes all of them
    /// together, so this is the signal the refresh loop keys off; the plan
    /// and trace TTLs still age their entries independently.
    pub fn forecast_needs_refresh(&self, target: TargetId, now: DateTime<Utc>) -> bool {
        let inner = self.inner.read();
        if inner
            .plans
            .needs_refresh(&target, now, self.plan_ttl, self.error_retry)
        {
            return true;
        }
        Complex::ALL.iter().any(|&complex| {
            inner
                .traces
                .needs_refresh(&(target, complex), now, self.trace_ttl, self.error_retry)
        })
    }

    /// Mark every forecast entry of a target as loading, visible to readers
    /// immediately so the UI can show an indicator before the value lands.
    pub fn begin_target(&self, target: TargetId) {
        let mut inner = self.inner.write();
        inner.plans.set_loading(target);
        for complex in Complex::ALL {
            inner.traces.set_loading((target, complex));
        }
    }

    /// Store a successful forecast for a target: its plan plus the traces
    /// computed alongside it, atomically.
    pub fn store_success(
        &self,
        target: TargetId,
        plan: PassPlan,
        traces: Vec<ElevationTrace>,
        now: DateTime<Utc>,
    ) {
        let mut inner = self.inner.write();
        inner.plans.store(target, Ok(plan), now);
        for trace in traces {
            let complex = trace.complex;
            inner.traces.store((target, complex), Ok(trace), now);
        }
    }

    /// Record a failed forecast attempt for a target on its plan and all
    /// trace entries. Previously stored values stay readable.
    pub fn store_failure(&self, target: TargetId, error: &ProviderError, now: DateTime<Utc>) {
        let mut inner = self.inner.write();
        inner.plans.store(target, Err(error), now);
        for complex in Complex::ALL {
            inner.traces.store((target, complex), Err(error), now);
        }
    }

    /// Copy of a target's pass-plan entry.
    pub fn plan(&self, target: TargetId) -> Option<CacheEntry<PassPlan>> {
        self.inner.read().plans.get(&target)
    }

    /// Copy of a (target, complex) trace entry.
    pub fn trace(&self, target: TargetId, complex: Complex) -> Option<CacheEntry<ElevationTrace>> {
        self.inner.read().traces.get(&(target, complex))
    }
}
