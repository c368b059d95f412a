//! Shared type definitions for the Pasture ecosystem simulation.
//!
//! Every crate in the workspace speaks in these types: tile coordinates,
//! grazer handles, behavior states, and the read-only view handed to
//! renderers.
//!
//! # Modules
//!
//! - [`coords`] -- Integer tile coordinates and the 8-neighborhood.
//! - [`ids`] -- Generation-checked handles into the grazer arena.
//! - [`enums`] -- Behavior states and visual-intent discriminators.
//! - [`view`] -- Serializable render query surface.

pub mod coords;
pub mod enums;
pub mod ids;
pub mod view;

pub use coords::{NEIGHBOR_OFFSETS, TileCoord};
pub use enums::{AgentKind, GrazerState, PredatorState, ShepherdMode, Sprite, VegetationState};
pub use ids::GrazerId;
pub use view::{AgentView, TileView, WorldView};

/// 2D float vector used for positions and directions.
pub use glam::Vec2;
