//! Tick callback that logs periodic world snapshots.
//!
//! Every `snapshot_interval_ticks` ticks the output of [`World::view`] is
//! written to the log as JSON at debug level, and a one-line population
//! summary at info level. Running totals are kept for the shutdown report.

use pasture_core::World;
use pasture_core::runner::TickCallback;
use pasture_core::tick::TickSummary;
use tracing::{debug, info, warn};

/// Counts accumulated over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Offspring spawned.
    pub births: u64,
    /// Grazers that died.
    pub deaths: u64,
    /// Vegetation tiles eaten.
    pub meals: u64,
    /// Grazers bitten by the predator.
    pub bites: u64,
    /// Times the shepherd was stunned.
    pub stuns: u64,
}

/// Callback that logs snapshots and keeps [`RunTotals`].
pub struct SnapshotCallback {
    interval: u64,
    totals: RunTotals,
}

impl SnapshotCallback {
    /// Snapshot every `interval` ticks; 0 disables snapshots.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            totals: RunTotals {
                births: 0,
                deaths: 0,
                meals: 0,
                bites: 0,
                stuns: 0,
            },
        }
    }

    /// Totals so far.
    pub const fn totals(&self) -> RunTotals {
        self.totals
    }

    const fn snapshot_due(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.interval), Some(0))
    }

    fn record(&mut self, summary: &TickSummary) {
        let totals = &mut self.totals;
        totals.births = totals.births.saturating_add(count(summary.births.len()));
        totals.deaths = totals.deaths.saturating_add(count(summary.deaths.len()));
        totals.meals = totals.meals.saturating_add(u64::from(summary.meals));
        totals.bites = totals
            .bites
            .saturating_add(count(summary.grazers_bitten.len()));
        if summary.shepherd_stunned {
            totals.stuns = totals.stuns.saturating_add(1);
        }
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl TickCallback for SnapshotCallback {
    fn on_tick(&mut self, summary: &TickSummary, world: &World) {
        self.record(summary);
        if !self.snapshot_due(summary.tick) {
            return;
        }

        info!(
            tick = summary.tick,
            elapsed = summary.elapsed,
            grazers = summary.grazers_alive,
            vegetation = world.grid().vegetation_count(),
            deposits = world.deposits().active_count(),
            predator = ?summary.predator_state,
            births = self.totals.births,
            deaths = self.totals.deaths,
            "Population"
        );

        match serde_json::to_string(&world.view()) {
            Ok(json) => debug!(tick = summary.tick, snapshot = %json, "World snapshot"),
            Err(e) => warn!(tick = summary.tick, error = %e, "Failed to serialize world snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pasture_core::config::SimulationConfig;

    use super::*;

    #[test]
    fn snapshots_follow_the_interval() {
        let callback = SnapshotCallback::new(3);
        assert!(!callback.snapshot_due(1));
        assert!(!callback.snapshot_due(2));
        assert!(callback.snapshot_due(3));
        assert!(callback.snapshot_due(6));
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let callback = SnapshotCallback::new(0);
        assert!(!callback.snapshot_due(0));
        assert!(!callback.snapshot_due(600));
    }

    #[test]
    fn totals_accumulate_across_ticks() {
        let mut world = World::seeded(SimulationConfig::default()).unwrap();
        let mut callback = SnapshotCallback::new(2);
        let mut meals = 0_u64;
        for _ in 0..600 {
            let summary = world.tick(1.0 / 60.0).unwrap();
            meals += u64::from(summary.meals);
            callback.on_tick(&summary, &world);
        }
        assert_eq!(callback.totals().meals, meals);
    }
}
