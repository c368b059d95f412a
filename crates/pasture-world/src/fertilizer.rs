//! Fertilizer deposits left behind by grazers.
//!
//! Each tile holds at most one deposit. On its first update a deposit
//! fertilizes a random subset of its neighbors and makes the vegetation on
//! its own tile inedible. Once it reaches `max_duration` seconds it undoes
//! that for every neighbor and disappears.

use pasture_types::TileCoord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::Grid;
use crate::layout::WorldLayout;
use crate::random::RandomSource;

/// Fertilizer tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FertilizerConfig {
    /// Seconds a deposit lasts.
    pub max_duration: f32,
}

impl Default for FertilizerConfig {
    fn default() -> Self {
        Self { max_duration: 10.0 }
    }
}

/// A fertilizer deposit slot on one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerDeposit {
    /// Whether a deposit currently occupies the slot.
    pub exists: bool,
    /// Seconds since the deposit was placed.
    pub age: f32,
    /// Whether the one-shot spread already happened.
    pub has_spread: bool,
    /// Tile the slot belongs to.
    pub tile: TileCoord,
}

/// Counts from one fertilizer update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FertilizerReport {
    /// Neighbor tiles newly fertilized.
    pub fertilized: u32,
    /// Deposits that expired.
    pub expired: u32,
}

/// One deposit slot per tile.
#[derive(Debug, Clone)]
pub struct FertilizerField {
    layout: WorldLayout,
    deposits: Vec<FertilizerDeposit>,
}

impl FertilizerField {
    /// Create an empty field for `layout`.
    pub fn new(layout: WorldLayout) -> Self {
        let deposits = layout
            .coords()
            .map(|tile| FertilizerDeposit {
                exists: false,
                age: 0.0,
                has_spread: false,
                tile,
            })
            .collect();
        Self { layout, deposits }
    }

    /// The active deposit at `coord`, if any.
    pub fn deposit_at(&self, coord: TileCoord) -> Option<&FertilizerDeposit> {
        self.layout
            .index(coord)
            .and_then(|i| self.deposits.get(i))
            .filter(|d| d.exists)
    }

    /// Whether a deposit sits on `coord`.
    pub fn has_deposit(&self, coord: TileCoord) -> bool {
        self.deposit_at(coord).is_some()
    }

    /// Number of active deposits.
    pub fn active_count(&self) -> usize {
        self.deposits.iter().filter(|d| d.exists).count()
    }

    /// Place a fresh deposit on `coord`, replacing any existing one.
    ///
    /// Returns `false` for off-grid coordinates.
    pub fn place(&mut self, coord: TileCoord) -> bool {
        let Some(deposit) = self.layout.index(coord).and_then(|i| self.deposits.get_mut(i)) else {
            return false;
        };
        deposit.exists = true;
        deposit.age = 0.0;
        deposit.has_spread = false;
        true
    }

    /// Age every deposit by `dt` seconds, spreading or expiring as due.
    pub fn update(
        &mut self,
        dt: f32,
        grid: &mut Grid,
        config: &FertilizerConfig,
        rng: &mut dyn RandomSource,
    ) -> FertilizerReport {
        let mut report = FertilizerReport::default();
        for deposit in self.deposits.iter_mut().filter(|d| d.exists) {
            deposit.age += dt;
            let neighbors = deposit.tile.neighbors8();

            if deposit.age >= config.max_duration {
                for neighbor in neighbors {
                    if grid.layout().contains(neighbor) {
                        grid.defertilize(neighbor);
                    }
                }
                grid.set_edible(deposit.tile, true);
                deposit.exists = false;
                report.expired = report.expired.saturating_add(1);
                debug!(tile = %deposit.tile, "Fertilizer deposit expired");
            } else if !deposit.has_spread {
                for neighbor in neighbors {
                    if rng.coin_flip()
                        && grid.layout().contains(neighbor)
                        && !grid.is_fertilized(neighbor)
                    {
                        grid.fertilize(neighbor);
                        grid.set_edible(deposit.tile, false);
                        report.fertilized = report.fertilized.saturating_add(1);
                    }
                }
                deposit.has_spread = true;
            }
        }
        report
    }
}
