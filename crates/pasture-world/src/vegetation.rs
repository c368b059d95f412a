//! Vegetation cells: age, growth stage and one-shot flags.
//!
//! A cell's age runs from 0 (no vegetation) to 1 (despawn). The growth
//! stage is derived from the age and whether nearby fertilizer boosts the
//! cell:
//!
//! | Age          | Fertilised | Stage        |
//! |--------------|------------|--------------|
//! | `< 0.67`     | no         | `Growing`    |
//! | `< 0.67`     | yes        | `Fertilised` |
//! | `0.67..0.84` | either     | `FullyGrown` |
//! | `0.84..1.0`  | either     | `Wilting`    |
//!
//! Fertilised cells age five times faster by default.

use pasture_types::VegetationState;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Age given to freshly spawned vegetation.
pub const SPAWN_AGE: f32 = 0.01;

/// Age at which vegetation is fully grown.
pub const FULLY_GROWN_AGE: f32 = 0.67;

/// Age at which vegetation starts wilting.
pub const WILTING_AGE: f32 = 0.84;

/// Age at which vegetation despawns.
pub const DEATH_AGE: f32 = 1.0;

// ---------------------------------------------------------------------------
// VegetationConfig
// ---------------------------------------------------------------------------

/// Growth rates, in age units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Rate for unfertilised and mature vegetation.
    pub normal_grow_rate: f32,
    /// Rate for young vegetation next to fertilized ground.
    pub fertilised_grow_rate: f32,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            normal_grow_rate: 0.01,
            fertilised_grow_rate: 0.05,
        }
    }
}

/// Growth stage for a given age, or `None` when the cell is empty.
pub const fn classify(age: f32, is_fertilised: bool) -> Option<VegetationState> {
    if age <= 0.0 {
        None
    } else if age >= WILTING_AGE {
        Some(VegetationState::Wilting)
    } else if age >= FULLY_GROWN_AGE {
        Some(VegetationState::FullyGrown)
    } else if is_fertilised {
        Some(VegetationState::Fertilised)
    } else {
        Some(VegetationState::Growing)
    }
}

// ---------------------------------------------------------------------------
// VegetationCell
// ---------------------------------------------------------------------------

/// Vegetation on a single tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationCell {
    /// Age in `[0, 1]`; 0 means no vegetation.
    pub age: f32,
    /// Current growth stage.
    pub state: VegetationState,
    /// Whether the cell may still seed its neighbors this growth cycle.
    pub has_seeds_available: bool,
    /// Whether adjacent fertilizer boosts growth.
    pub is_fertilised: bool,
    /// Whether a grazer may eat it.
    pub is_edible: bool,
}

impl Default for VegetationCell {
    fn default() -> Self {
        Self {
            age: 0.0,
            state: VegetationState::Growing,
            has_seeds_available: true,
            is_fertilised: false,
            is_edible: false,
        }
    }
}

impl VegetationCell {
    /// Whether any vegetation is present.
    pub fn is_alive(&self) -> bool {
        self.age > 0.0
    }

    /// Start a new growth cycle.
    ///
    /// The fertility flag is left alone; it tracks adjacent ground, not the
    /// plant, and is picked up by the next growth step.
    pub const fn spawn(&mut self) {
        self.age = SPAWN_AGE;
        self.state = VegetationState::Growing;
        self.has_seeds_available = true;
        self.is_edible = true;
    }

    /// Remove the vegetation.
    pub const fn despawn(&mut self) {
        self.age = 0.0;
        self.state = VegetationState::Growing;
        self.has_seeds_available = true;
        self.is_edible = false;
    }

    /// Force the age, as done at world setup and by editor tools.
    ///
    /// A non-positive age despawns the cell.
    pub fn set_age(&mut self, age: f32) {
        if age <= 0.0 || age.is_nan() {
            self.despawn();
            return;
        }
        self.age = age.min(DEATH_AGE);
        self.has_seeds_available = true;
        self.is_edible = true;
        if let Some(state) = classify(self.age, self.is_fertilised) {
            self.state = state;
        }
    }

    /// Advance growth by `dt` seconds.
    ///
    /// Returns the stage the cell was in before growing, or `None` if the
    /// cell was empty or despawned during this step.
    pub fn grow(&mut self, dt: f32, config: &VegetationConfig) -> Option<VegetationState> {
        if !self.is_alive() {
            return None;
        }
        let prior = self.state;
        let rate = if prior == VegetationState::Fertilised {
            config.fertilised_grow_rate
        } else {
            config.normal_grow_rate
        };
        self.age += rate * dt;
        if self.age >= DEATH_AGE {
            self.despawn();
            return None;
        }
        if let Some(state) = classify(self.age, self.is_fertilised) {
            self.state = state;
        }
        Some(prior)
    }
}
