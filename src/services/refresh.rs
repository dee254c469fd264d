//! Background forecast refresh loop.
//!
//! One logical control thread owns the scheduler and the cache writes. The
//! loop enqueues stale targets, dispatches at most one forecast computation
//! at a time, and receives completions as messages, so queue mutation is
//! single-threaded even though the computation itself runs concurrently. An
//! in-flight computation is never cancelled: a late result is keyed by target
//! and simply refreshes that target's entries when it lands.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{Complex, TargetId, TimeWindow};
use crate::cache::ForecastCache;
use crate::config::MonitorConfig;
use crate::error::ProviderResult;
use crate::models::{ElevationTrace, PassPlan};
use crate::providers::{EphemerisSource, SkyGeometry};
use crate::scheduler::RefreshScheduler;
use crate::services::pass_planner;
use crate::store::SnapshotStore;

/// Control messages accepted by the refresh loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshCommand {
    /// Enqueue a target for refresh if it is not already pending.
    Request(TargetId),
    /// Move a target to the head of the queue (user focused it).
    Focus(TargetId),
}

/// Everything computed for one target in one dispatch.
#[derive(Debug, Clone)]
pub struct TargetForecast {
    pub plan: PassPlan,
    pub traces: Vec<ElevationTrace>,
}

struct Completion {
    target: TargetId,
    outcome: ProviderResult<TargetForecast>,
}

/// Run the refresh loop until the shutdown signal flips.
pub async fn run_refresh_loop(
    cfg: MonitorConfig,
    store: SnapshotStore,
    cache: ForecastCache,
    ephemeris: Arc<dyn EphemerisSource>,
    geometry: Arc<dyn SkyGeometry>,
    mut commands: mpsc::Receiver<RefreshCommand>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut scheduler: RefreshScheduler<TargetId> = RefreshScheduler::new(cfg.pacing());
    let (done_tx, mut done_rx) = mpsc::channel::<Completion>(16);
    let mut ticker = tokio::time::interval(cfg.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("refresh loop started");

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped sender means the process is tearing down.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            Some(command) = commands.recv() => {
                match command {
                    RefreshCommand::Request(target) => scheduler.enqueue(target),
                    RefreshCommand::Focus(target) => scheduler.prioritize(target),
                }
            }
            Some(done) = done_rx.recv() => {
                let now = Utc::now();
                match done.outcome {
                    Ok(forecast) => {
                        debug!(target = %done.target, passes = forecast.plan.passes.len(), "forecast stored");
                        cache.store_success(done.target, forecast.plan, forecast.traces, now);
                    }
                    Err(e) => {
                        warn!(target = %done.target, error = %e, "forecast failed");
                        cache.store_failure(done.target, &e, now);
                    }
                }
                scheduler.complete(now);
            }
            _ = ticker.tick() => {
                // Keep every currently-tracked target's forecast warm. Plan
                // and trace entries age on their own TTLs; either going stale
                // enqueues the target.
                let now = Utc::now();
                for (target, _) in store.active_targets() {
                    if cache.forecast_needs_refresh(target, now) {
                        scheduler.enqueue(target);
                    }
                }
            }
        }

        try_dispatch(&cfg, &mut scheduler, &cache, &store, &ephemeris, &geometry, &done_tx);
    }

    info!("refresh loop stopped");
}

fn try_dispatch(
    cfg: &MonitorConfig,
    scheduler: &mut RefreshScheduler<TargetId>,
    cache: &ForecastCache,
    store: &SnapshotStore,
    ephemeris: &Arc<dyn EphemerisSource>,
    geometry: &Arc<dyn SkyGeometry>,
    done_tx: &mpsc::Sender<Completion>,
) {
    let now = Utc::now();
    let Some(target) = scheduler.next_dispatch(now, |t| cache.forecast_needs_refresh(*t, now)) else {
        return;
    };

    cache.begin_target(target);
    let target_name = store
        .active_targets()
        .into_iter()
        .find(|(id, _)| *id == target)
        .map(|(_, name)| name)
        .unwrap_or_else(|| target.to_string());
    let window = TimeWindow::new(now, now + cfg.forecast_horizon());
    let step = cfg.forecast_step();
    let ephemeris = Arc::clone(ephemeris);
    let geometry = Arc::clone(geometry);
    let done_tx = done_tx.clone();

    // Fire-and-forget: the result comes back as a message. If the loop is
    // gone by then, the send just fails silently.
    tokio::spawn(async move {
        let outcome = compute_forecast(
            target,
            &target_name,
            window,
            step,
            ephemeris.as_ref(),
            geometry.as_ref(),
        )
        .await;
        let _ = done_tx.send(Completion { target, outcome }).await;
    });
}

async fn compute_forecast(
    target: TargetId,
    target_name: &str,
    window: TimeWindow,
    step: chrono::Duration,
    ephemeris: &dyn EphemerisSource,
    geometry: &dyn SkyGeometry,
) -> ProviderResult<TargetForecast> {
    let samples = ephemeris.track(target, window, step).await?;
    let now = Utc::now();
    let plan = pass_planner::plan_passes(target, target_name, &samples, window, now, geometry);
    let traces = Complex::ALL
        .iter()
        .map(|&complex| pass_planner::elevation_trace(target, complex, &samples, now, geometry))
        .collect();
    Ok(TargetForecast { plan, traces })
}
