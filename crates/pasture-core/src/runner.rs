//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Extinction stop**: end the run once the herd is gone, if configured
//! - **Pacing**: wait `tick_interval_ms` of wall-clock time between ticks
//! - **Tick callbacks**: observers see every summary and the world after it
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it. Each tick itself stays synchronous.
//!
//! [`run_tick`]: crate::tick::run_tick

use tokio::time::{Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::SimulationBoundsConfig;
use crate::tick::{self, TickError, TickSummary};
use crate::world::World;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// No grazer is left alive.
    Extinction,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to log snapshots, feed a renderer or
/// collect statistics. The callback receives the tick summary and the
/// world as it stands after the tick.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, world: &World);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _world: &World) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// With `max_ticks == 0` and extinction stops disabled the loop never ends
/// on its own; callers race it against a shutdown signal. Unpaced runs
/// still yield to the scheduler between ticks so that race can be won.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation(
    world: &mut World,
    bounds: &SimulationBoundsConfig,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        tick_dt = bounds.tick_dt,
        tick_interval_ms = bounds.tick_interval_ms,
        stop_on_extinction = bounds.stop_on_extinction,
        grazers = world.herd().alive_count(),
        "Simulation starting"
    );

    let mut pacing = (bounds.tick_interval_ms > 0).then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(bounds.tick_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        // --- Wait for the next slot ---
        match pacing.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }

        // --- Execute tick ---
        let summary = tick::run_tick(world, bounds.tick_dt)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, world);

        // --- Check extinction ---
        if bounds.stop_on_extinction && summary.grazers_alive == 0 {
            info!(tick = summary.tick, "No grazers left -- extinction");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Extinction,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Check tick limit (after tick) ---
        if bounds.max_ticks > 0 && summary.tick >= bounds.max_ticks {
            info!(
                tick = summary.tick,
                max_ticks = bounds.max_ticks,
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_grazers_alive = result.final_summary.as_ref().map(|s| s.grazers_alive),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            elapsed = summary.elapsed,
            grazers_alive = summary.grazers_alive,
            predator = ?summary.predator_state,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
