//! The externally steered shepherd.
//!
//! The shepherd walks to whatever tile it is told to, replanning every tick.
//! When the predator attacks it is stunned for a while and ignores both new
//! targets and its path.

use pasture_types::{ShepherdMode, Sprite, TileCoord, Vec2};
use pasture_world::{Grid, WorldLayout};
use tracing::info;

use crate::config::ShepherdConfig;
use crate::motion::{Body, Navigator};

/// The two distance thresholds the predator checks against the shepherd.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShepherdProximity {
    /// Shepherd position.
    pub position: Vec2,
    /// Outer threshold: the predator runs away.
    pub nearby_radius: f32,
    /// Inner threshold: the predator attacks.
    pub too_close_radius: f32,
}

impl ShepherdProximity {
    /// Whether the center of `coord` is within the outer threshold.
    /// Off-grid coordinates count as nearby.
    pub fn is_nearby(&self, coord: TileCoord, layout: &WorldLayout) -> bool {
        self.within(coord, layout, self.nearby_radius)
    }

    /// Whether the center of `coord` is within the inner threshold.
    /// Off-grid coordinates count as too close.
    pub fn is_too_close(&self, coord: TileCoord, layout: &WorldLayout) -> bool {
        self.within(coord, layout, self.too_close_radius)
    }

    fn within(&self, coord: TileCoord, layout: &WorldLayout, radius: f32) -> bool {
        !layout.contains(coord) || layout.tile_center(coord).distance(self.position) <= radius
    }
}

/// The shepherd.
#[derive(Debug, Clone, PartialEq)]
pub struct Shepherd {
    /// Position, heading and speed.
    pub body: Body,
    /// Target and path.
    pub navigator: Navigator,
    /// Active or stunned.
    pub mode: ShepherdMode,
    /// Seconds spent stunned so far.
    pub stun_timer: f32,
    /// Visual intent.
    pub sprite: Sprite,
}

impl Shepherd {
    /// An active shepherd on the configured start tile, clamped into the
    /// grid.
    pub fn new(layout: &WorldLayout, config: &ShepherdConfig) -> Self {
        let start = layout.tile_center(layout.clamp_tile(config.start_tile));
        Self {
            body: Body::new(start, config.radius, config.speed),
            navigator: Navigator::new(),
            mode: ShepherdMode::Active,
            stun_timer: 0.0,
            sprite: Sprite::Shepherd,
        }
    }

    /// Walk toward `tile`. Ignored while stunned or for off-grid tiles.
    pub fn set_target(&mut self, tile: TileCoord, layout: &WorldLayout) -> bool {
        if self.mode == ShepherdMode::Stunned || !layout.contains(tile) {
            return false;
        }
        self.navigator.set_target(Some(tile));
        true
    }

    /// Knock the shepherd out for the configured duration.
    pub fn stun(&mut self) {
        self.mode = ShepherdMode::Stunned;
        self.stun_timer = 0.0;
        self.body.stop();
        info!("Shepherd stunned");
    }

    /// Thresholds for the predator's guards.
    pub const fn proximity(&self, config: &ShepherdConfig) -> ShepherdProximity {
        ShepherdProximity {
            position: self.body.position,
            nearby_radius: config.nearby_radius,
            too_close_radius: config.too_close_radius,
        }
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32, grid: &Grid, config: &ShepherdConfig) {
        if self.mode == ShepherdMode::Stunned {
            self.stun_timer += dt;
            if self.stun_timer < config.stun_duration {
                return;
            }
            self.mode = ShepherdMode::Active;
            self.stun_timer = 0.0;
            info!("Shepherd recovered");
        }

        if self.navigator.target().is_none() {
            return;
        }
        let layout = grid.layout();
        let here = layout.position_to_tile(self.body.position);
        self.navigator.replan_to_target(grid, here);
        self.navigator.steer(&mut self.body, layout);
        if self.navigator.has_arrived(&self.body, layout, 0.0) {
            self.body.stop();
        } else {
            self.body.integrate(dt);
        }
    }
}
