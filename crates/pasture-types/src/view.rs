//! Render query surface.
//!
//! A [`WorldView`] is a read-only copy of everything a renderer needs to
//! draw one frame. The simulation never draws; it only produces these.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;
use crate::enums::{AgentKind, Sprite, VegetationState};
use crate::ids::GrazerId;

/// Snapshot of one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    /// Tile position.
    pub coord: TileCoord,
    /// Whether agents may path through it.
    pub walkable: bool,
    /// Whether the ground is fertilized.
    pub fertilized: bool,
    /// Vegetation age in `[0, 1]`; 0 means no vegetation.
    pub vegetation_age: f32,
    /// Growth stage, present only when vegetation is alive.
    pub vegetation_state: Option<VegetationState>,
    /// Whether a fertilizer deposit sits on the tile.
    pub has_deposit: bool,
}

/// Snapshot of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// What kind of agent this is.
    pub kind: AgentKind,
    /// Handle, for grazers only.
    pub id: Option<GrazerId>,
    /// World position in pixels.
    pub position: Vec2,
    /// Whether the sprite faces right.
    pub facing_right: bool,
    /// Remaining path, next waypoint first.
    pub path: Vec<TileCoord>,
    /// Tile the agent is heading for.
    pub target_tile: Option<TileCoord>,
    /// Visual intent.
    pub sprite: Sprite,
}

/// Snapshot of the whole world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    /// Completed ticks.
    pub tick: u64,
    /// Simulated seconds elapsed.
    pub elapsed: f64,
    /// Grid width in tiles.
    pub columns: i32,
    /// Grid height in tiles.
    pub rows: i32,
    /// Tile edge length in pixels.
    pub tile_size: f32,
    /// Pixel position of tile `(0, 0)`'s top-left corner.
    pub origin: Vec2,
    /// Predator den position in pixels.
    pub den_position: Vec2,
    /// Tiles in row-major order.
    pub tiles: Vec<TileView>,
    /// Live grazers followed by the predator and the shepherd.
    pub agents: Vec<AgentView>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn view_serializes_to_json() {
        let view = WorldView {
            tick: 3,
            elapsed: 0.5,
            columns: 1,
            rows: 1,
            tile_size: 32.0,
            origin: Vec2::ZERO,
            den_position: Vec2::new(16.0, 16.0),
            tiles: vec![TileView {
                coord: TileCoord::new(0, 0),
                walkable: true,
                fertilized: false,
                vegetation_age: 0.5,
                vegetation_state: Some(VegetationState::Growing),
                has_deposit: false,
            }],
            agents: vec![AgentView {
                kind: AgentKind::Grazer,
                id: Some(GrazerId::new(0, 0)),
                position: Vec2::new(10.0, 12.0),
                facing_right: true,
                path: vec![TileCoord::new(0, 0)],
                target_tile: None,
                sprite: Sprite::GrazerNormal,
            }],
        };
        let json = serde_json::to_string(&view).unwrap();
        let back: WorldView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
        assert!(json.contains("\"Growing\""));
    }
}
