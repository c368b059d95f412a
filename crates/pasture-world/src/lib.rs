//! Grid resource model for the Pasture ecosystem simulation.
//!
//! This crate models the ground agents walk on: a rectangular tile grid with
//! walkability and fertility, vegetation that grows, seeds and wilts, and
//! fertilizer deposits that boost growth around them before decaying. It also
//! provides the A* search every mobile agent uses to get around.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world construction.
//! - [`fertilizer`] -- Per-tile fertilizer deposits with one-shot spread and
//!   timed expiry.
//! - [`grid`] -- [`Grid`] of ground and vegetation cells with bounds-safe
//!   queries and the per-tick vegetation update.
//! - [`layout`] -- [`WorldLayout`]: grid dimensions, pixel placement and
//!   position/tile conversion.
//! - [`pathfinding`] -- 8-directional A* over grid walkability.
//! - [`random`] -- The injectable [`RandomSource`] and its implementations.
//! - [`vegetation`] -- Vegetation cells, growth thresholds and rates.

pub mod error;
pub mod fertilizer;
pub mod grid;
pub mod layout;
pub mod pathfinding;
pub mod random;
pub mod vegetation;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use fertilizer::{FertilizerConfig, FertilizerDeposit, FertilizerField, FertilizerReport};
pub use grid::{GroundCell, Grid, VegetationReport};
pub use layout::{Bounds, WorldLayout};
pub use pathfinding::find_path;
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use vegetation::{
    DEATH_AGE, FULLY_GROWN_AGE, SPAWN_AGE, VegetationCell, VegetationConfig, WILTING_AGE, classify,
};
