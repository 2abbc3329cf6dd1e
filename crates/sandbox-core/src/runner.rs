//! Simulation clock loop with operator controls.
//!
//! [`run_simulation`] drives [`run_tick`] at the configured rate until a
//! stop is requested or the tick bound is reached. Each iteration sleeps a
//! full period after the tick completes; a tick that overruns its period
//! delays every later tick rather than being skipped or batched.
//!
//! A failed tick leaves the world in its pre-step state and does not
//! advance the clock. The failure is logged and counted on the operator
//! state, and the next iteration retries from that state.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use sandbox_world::PhysicsBackend;
use tracing::{error, info, warn};

use crate::clock::SimulationClock;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::shared::SharedWorld;
use crate::tick::{self, TickSummary};

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks completed by this run.
    pub total_ticks: u64,
    /// Ticks that failed and were rolled back.
    pub failed_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The engine uses this to push snapshots to observers.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully, outside the world lock.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A tick callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Run the clock until a stop is requested or the tick bound is reached.
pub async fn run_simulation<B: PhysicsBackend>(
    world: &SharedWorld<B>,
    clock: &mut SimulationClock,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut failed_ticks: u64 = 0;
    let period = clock.period();

    info!(
        tick_rate_hz = clock.rate_hz(),
        max_ticks = operator.max_ticks(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!(tick = clock.tick(), "Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!(tick = clock.tick(), "Operator stop requested");
            let reason = SimulationEndReason::OperatorStop;
            operator.set_end_reason(reason.clone()).await;
            return SimulationResult {
                end_reason: reason,
                final_summary: last_summary,
                total_ticks,
                failed_ticks,
            };
        }

        // --- Execute tick ---
        let summary = match tick::run_shared_tick(world, clock).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(tick = clock.tick(), error = %e, "Tick failed, world rolled back");
                failed_ticks = failed_ticks.saturating_add(1);
                operator.record_tick_failure(e.to_string()).await;
                tokio::time::sleep(period).await;
                continue;
            }
        };

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            let reason = SimulationEndReason::MaxTicksReached;
            operator.set_end_reason(reason.clone()).await;
            return SimulationResult {
                end_reason: reason,
                final_summary: Some(summary),
                total_ticks,
                failed_ticks,
            };
        }

        last_summary = Some(summary);

        // --- Sleep one period ---
        tokio::time::sleep(period).await;
    }
}

/// Log the simulation end sequence.
///
/// Called after [`run_simulation`] returns. The HTTP server keeps running.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        failed_ticks = result.failed_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            particles = summary.particles,
            zones = summary.zones,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
