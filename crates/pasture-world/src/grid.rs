//! The tile grid: ground and vegetation arrays.
//!
//! Both arrays are allocated once, sized to the layout, and indexed
//! row-major. Every coordinate-taking method tolerates off-grid input:
//! queries return `false` and mutations do nothing.

use pasture_types::{TileCoord, Vec2, VegetationState};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::layout::WorldLayout;
use crate::random::RandomSource;
use crate::vegetation::{VegetationCell, VegetationConfig};

/// Ground under a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundCell {
    /// Whether agents may path through the tile.
    pub walkable: bool,
    /// Whether a nearby fertilizer deposit enriches the tile.
    pub fertilized: bool,
}

impl Default for GroundCell {
    fn default() -> Self {
        Self {
            walkable: true,
            fertilized: false,
        }
    }
}

/// Counts from one vegetation update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VegetationReport {
    /// Cells seeded by mature neighbors.
    pub spawned: u32,
    /// Cells that wilted away.
    pub despawned: u32,
}

/// Ground and vegetation for every tile.
#[derive(Debug, Clone)]
pub struct Grid {
    layout: WorldLayout,
    ground: Vec<GroundCell>,
    vegetation: Vec<VegetationCell>,
}

impl Grid {
    /// Create an all-walkable, vegetation-free grid.
    pub fn new(layout: WorldLayout) -> Self {
        let count = layout.tile_count();
        Self {
            layout,
            ground: vec![GroundCell::default(); count],
            vegetation: vec![VegetationCell::default(); count],
        }
    }

    /// Dimensions and pixel placement.
    pub const fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Ground at `coord`.
    pub fn ground_at(&self, coord: TileCoord) -> Option<&GroundCell> {
        self.layout.index(coord).and_then(|i| self.ground.get(i))
    }

    /// Vegetation at `coord`, alive or not.
    pub fn vegetation_at(&self, coord: TileCoord) -> Option<&VegetationCell> {
        self.layout.index(coord).and_then(|i| self.vegetation.get(i))
    }

    fn ground_mut(&mut self, coord: TileCoord) -> Option<&mut GroundCell> {
        self.layout.index(coord).and_then(|i| self.ground.get_mut(i))
    }

    fn vegetation_mut(&mut self, coord: TileCoord) -> Option<&mut VegetationCell> {
        self.layout.index(coord).and_then(|i| self.vegetation.get_mut(i))
    }

    /// The 8 tiles around the tile containing `position`.
    pub fn neighbors8(&self, position: Vec2) -> [TileCoord; 8] {
        self.layout.position_to_tile(position).neighbors8()
    }

    // -------------------------------------------------------------------
    // Ground
    // -------------------------------------------------------------------

    /// Whether agents may enter `coord`.
    pub fn is_walkable(&self, coord: TileCoord) -> bool {
        self.ground_at(coord).is_some_and(|g| g.walkable)
    }

    /// Mark a tile walkable or blocked.
    pub fn set_walkable(&mut self, coord: TileCoord, walkable: bool) {
        if let Some(ground) = self.ground_mut(coord) {
            ground.walkable = walkable;
        }
    }

    /// Whether the ground at `coord` is fertilized.
    pub fn is_fertilized(&self, coord: TileCoord) -> bool {
        self.ground_at(coord).is_some_and(|g| g.fertilized)
    }

    /// Fertilize the ground and boost the vegetation at `coord`.
    pub fn fertilize(&mut self, coord: TileCoord) {
        self.set_fertility(coord, true);
    }

    /// Undo [`Grid::fertilize`].
    pub fn defertilize(&mut self, coord: TileCoord) {
        self.set_fertility(coord, false);
    }

    fn set_fertility(&mut self, coord: TileCoord, fertile: bool) {
        if let Some(ground) = self.ground_mut(coord) {
            ground.fertilized = fertile;
        }
        if let Some(cell) = self.vegetation_mut(coord) {
            cell.is_fertilised = fertile;
        }
    }

    // -------------------------------------------------------------------
    // Vegetation
    // -------------------------------------------------------------------

    /// Whether live vegetation grows at `coord`.
    pub fn has_vegetation(&self, coord: TileCoord) -> bool {
        self.vegetation_at(coord).is_some_and(VegetationCell::is_alive)
    }

    /// Whether the vegetation at `coord` is in the `FullyGrown` stage.
    pub fn is_fully_grown(&self, coord: TileCoord) -> bool {
        self.vegetation_at(coord)
            .is_some_and(|v| v.is_alive() && v.state == VegetationState::FullyGrown)
    }

    /// Whether the vegetation at `coord` is flagged edible.
    pub fn is_edible(&self, coord: TileCoord) -> bool {
        self.vegetation_at(coord).is_some_and(|v| v.is_edible)
    }

    /// Set the edible flag at `coord`.
    pub fn set_edible(&mut self, coord: TileCoord, edible: bool) {
        if let Some(cell) = self.vegetation_mut(coord) {
            cell.is_edible = edible;
        }
    }

    /// Whether live, edible vegetation grows at `coord`.
    pub fn can_be_eaten(&self, coord: TileCoord) -> bool {
        self.vegetation_at(coord)
            .is_some_and(|v| v.is_alive() && v.is_edible)
    }

    /// Start vegetation at `coord`. Returns `false` if off the grid or
    /// already growing.
    pub fn spawn_vegetation(&mut self, coord: TileCoord) -> bool {
        match self.vegetation_mut(coord) {
            Some(cell) if !cell.is_alive() => {
                cell.spawn();
                true
            }
            _ => false,
        }
    }

    /// Remove vegetation at `coord`. Returns `false` if nothing was there.
    pub fn despawn_vegetation(&mut self, coord: TileCoord) -> bool {
        match self.vegetation_mut(coord) {
            Some(cell) if cell.is_alive() => {
                cell.despawn();
                true
            }
            _ => false,
        }
    }

    /// Force the vegetation age at `coord`.
    pub fn set_vegetation_age(&mut self, coord: TileCoord, age: f32) {
        if let Some(cell) = self.vegetation_mut(coord) {
            cell.set_age(age);
        }
    }

    /// Number of tiles with live vegetation.
    pub fn vegetation_count(&self) -> usize {
        self.vegetation.iter().filter(|v| v.is_alive()).count()
    }

    /// Grow every live cell by `dt` seconds.
    ///
    /// Cells that were fully grown at the start of their step and still hold
    /// seeds attempt one spread: they pick up fertility from any fertilized
    /// neighbor, then seed each neighbor that wins a coin flip and is
    /// walkable and empty.
    pub fn update_vegetation(
        &mut self,
        dt: f32,
        config: &VegetationConfig,
        rng: &mut dyn RandomSource,
    ) -> VegetationReport {
        let mut report = VegetationReport::default();
        for index in 0..self.vegetation.len() {
            let Some(cell) = self.vegetation.get_mut(index) else {
                continue;
            };
            if !cell.is_alive() {
                continue;
            }
            let Some(prior) = cell.grow(dt, config) else {
                report.despawned = report.despawned.saturating_add(1);
                continue;
            };
            if prior == VegetationState::FullyGrown && cell.has_seeds_available {
                let Some(coord) = self.layout.coord_at(index) else {
                    continue;
                };
                let seeded = self.spread_seeds(coord, rng);
                report.spawned = report.spawned.saturating_add(seeded);
            }
        }
        report
    }

    fn spread_seeds(&mut self, coord: TileCoord, rng: &mut dyn RandomSource) -> u32 {
        let neighbors = coord.neighbors8();
        if neighbors.iter().any(|n| self.is_fertilized(*n)) {
            if let Some(cell) = self.vegetation_mut(coord) {
                cell.is_fertilised = true;
            }
        }

        let picks: [bool; 8] = core::array::from_fn(|_| rng.coin_flip());
        let mut seeded = 0_u32;
        for (neighbor, picked) in neighbors.into_iter().zip(picks) {
            if picked
                && self.is_walkable(neighbor)
                && !self.has_vegetation(neighbor)
                && self.spawn_vegetation(neighbor)
            {
                seeded = seeded.saturating_add(1);
            }
        }

        if let Some(cell) = self.vegetation_mut(coord) {
            cell.has_seeds_available = false;
        }
        trace!(%coord, seeded, "Vegetation spread seeds");
        seeded
    }
}
