//! Circle bodies and path-following navigation shared by all agents.

use std::collections::VecDeque;

use pasture_types::{TileCoord, Vec2};
use pasture_world::{Bounds, Grid, WorldLayout, find_path};

/// A moving circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Center in pixels.
    pub position: Vec2,
    /// Unit heading, or zero when standing still.
    pub direction: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current speed in pixels per second.
    pub velocity: f32,
    /// Whether the sprite faces right.
    pub facing_right: bool,
}

impl Body {
    /// A stationary body.
    pub const fn new(position: Vec2, radius: f32, velocity: f32) -> Self {
        Self {
            position,
            direction: Vec2::ZERO,
            radius,
            velocity,
            facing_right: false,
        }
    }

    /// Move along the heading for `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.direction * self.velocity * dt;
        self.facing_right = self.direction.x > 0.0;
    }

    /// Head toward `point`.
    pub fn seek(&mut self, point: Vec2) {
        self.direction = (point - self.position).normalize_or_zero();
    }

    /// Stop moving.
    pub const fn stop(&mut self) {
        self.direction = Vec2::ZERO;
    }

    /// Distance from the center to `point`.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Keep the whole circle inside `bounds`, bouncing the heading off any
    /// edge it crossed.
    pub fn contain_within(&mut self, bounds: &Bounds) {
        if self.position.x - self.radius < bounds.min.x {
            self.position.x = bounds.min.x + self.radius;
            self.direction.x = -self.direction.x;
        } else if self.position.x + self.radius > bounds.max.x {
            self.position.x = bounds.max.x - self.radius;
            self.direction.x = -self.direction.x;
        }
        if self.position.y - self.radius < bounds.min.y {
            self.position.y = bounds.min.y + self.radius;
            self.direction.y = -self.direction.y;
        } else if self.position.y + self.radius > bounds.max.y {
            self.position.y = bounds.max.y - self.radius;
            self.direction.y = -self.direction.y;
        }
    }
}

/// Arrival radius on edge tiles, as a multiple of the body radius.
pub const DEFAULT_EDGE_ARRIVAL_FACTOR: f32 = 2.0;

/// Target tile plus the path leading to it.
///
/// Replanning writes into a scratch buffer and only replaces the current
/// path when the search succeeds, so a failed search keeps the old route.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    target: Option<TileCoord>,
    path: VecDeque<TileCoord>,
    scratch: Vec<TileCoord>,
    edge_arrival_factor: f32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// A navigator with no target.
    pub const fn new() -> Self {
        Self {
            target: None,
            path: VecDeque::new(),
            scratch: Vec::new(),
            edge_arrival_factor: DEFAULT_EDGE_ARRIVAL_FACTOR,
        }
    }

    /// Use `factor` times the body radius as the arrival radius on edge
    /// tiles.
    #[must_use]
    pub const fn with_edge_arrival_factor(mut self, factor: f32) -> Self {
        self.edge_arrival_factor = factor;
        self
    }

    /// Tile being headed for.
    pub const fn target(&self) -> Option<TileCoord> {
        self.target
    }

    /// Change the target. The path is kept until the next replan.
    pub const fn set_target(&mut self, target: Option<TileCoord>) {
        self.target = target;
    }

    /// Drop the target and the path.
    pub fn clear(&mut self) {
        self.target = None;
        self.path.clear();
    }

    /// Remaining waypoints, next first.
    pub const fn path(&self) -> &VecDeque<TileCoord> {
        &self.path
    }

    /// Search from `from` to `to`. Returns whether a path was found; on
    /// failure the previous path stays in place.
    pub fn replan(&mut self, grid: &Grid, from: TileCoord, to: TileCoord) -> bool {
        if !find_path(grid, from, to, &mut self.scratch) {
            return false;
        }
        self.path.clear();
        self.path.extend(self.scratch.drain(..));
        true
    }

    /// Search from `from` to the current target, if any.
    pub fn replan_to_target(&mut self, grid: &Grid, from: TileCoord) -> bool {
        match self.target {
            Some(target) => self.replan(grid, from, target),
            None => false,
        }
    }

    /// Point the body at the next waypoint.
    ///
    /// Waypoints whose center is already within the body's radius are
    /// consumed. With the path used up, a body standing on its target tile
    /// closes in on the tile center; any other body with an empty path stops.
    pub fn steer(&mut self, body: &mut Body, layout: &WorldLayout) {
        while let Some(&next) = self.path.front() {
            let center = layout.tile_center(next);
            if body.distance_to(center) < body.radius {
                self.path.pop_front();
                continue;
            }
            body.seek(center);
            return;
        }

        match self.target {
            Some(target) if layout.position_to_tile(body.position) == target => {
                let center = layout.tile_center(target);
                if body.distance_to(center) < body.radius {
                    body.stop();
                } else {
                    body.seek(center);
                }
            }
            _ => body.stop(),
        }
    }

    /// Whether the body is close enough to the target's center.
    ///
    /// The threshold is the radius plus `slack`. On edge tiles, where
    /// containment may keep the body off-center, it is the radius times the
    /// edge arrival factor instead.
    pub fn has_arrived(&self, body: &Body, layout: &WorldLayout, slack: f32) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let threshold = if layout.is_edge(target) {
            body.radius * self.edge_arrival_factor
        } else {
            body.radius + slack
        };
        body.distance_to(layout.tile_center(target)) < threshold
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn layout() -> WorldLayout {
        WorldLayout::from_grid(10, 10, 32.0).unwrap()
    }

    #[test]
    fn integrate_moves_and_sets_facing() {
        let mut body = Body::new(Vec2::ZERO, 5.0, 10.0);
        body.seek(Vec2::new(10.0, 0.0));
        body.integrate(0.5);
        assert_eq!(body.position, Vec2::new(5.0, 0.0));
        assert!(body.facing_right);
        body.seek(Vec2::new(-10.0, 0.0));
        body.integrate(0.1);
        assert!(!body.facing_right);
    }

    #[test]
    fn containment_clamps_and_reflects() {
        let bounds = layout().bounds();
        let mut body = Body::new(Vec2::new(-3.0, 400.0), 10.0, 50.0);
        body.direction = Vec2::new(-0.6, 0.8);
        body.contain_within(&bounds);
        assert_eq!(body.position, Vec2::new(10.0, 310.0));
        assert_eq!(body.direction, Vec2::new(0.6, -0.8));
    }

    #[test]
    fn failed_replan_keeps_old_path() {
        let mut grid = Grid::new(layout());
        let mut nav = Navigator::new();
        assert!(nav.replan(&grid, TileCoord::new(0, 0), TileCoord::new(3, 0)));
        assert_eq!(nav.path().len(), 3);
        grid.set_walkable(TileCoord::new(5, 5), false);
        assert!(!nav.replan(&grid, TileCoord::new(0, 0), TileCoord::new(5, 5)));
        assert_eq!(nav.path().len(), 3);
    }

    #[test]
    fn steer_consumes_reached_waypoints_and_stops_at_target() {
        let layout = layout();
        let grid = Grid::new(layout);
        let mut nav = Navigator::new();
        nav.set_target(Some(TileCoord::new(2, 0)));
        nav.replan_to_target(&grid, TileCoord::new(0, 0));

        let mut body = Body::new(layout.tile_center(TileCoord::new(1, 0)), 10.0, 50.0);
        nav.steer(&mut body, &layout);
        assert_eq!(nav.path().len(), 1);
        assert_eq!(body.direction, Vec2::X);

        body.position = layout.tile_center(TileCoord::new(2, 0));
        nav.steer(&mut body, &layout);
        assert!(nav.path().is_empty());
        assert_eq!(body.direction, Vec2::ZERO);
        assert!(nav.has_arrived(&body, &layout, 0.0));
    }

    #[test]
    fn empty_path_off_target_stands_still() {
        let layout = layout();
        let mut nav = Navigator::new();
        nav.set_target(Some(TileCoord::new(6, 6)));
        let mut body = Body::new(layout.tile_center(TileCoord::new(1, 1)), 10.0, 50.0);
        body.direction = Vec2::X;
        nav.steer(&mut body, &layout);
        assert_eq!(body.direction, Vec2::ZERO);
    }

    #[test]
    fn edge_targets_use_a_wider_arrival_radius() {
        let layout = layout();
        let mut nav = Navigator::new();
        let edge = TileCoord::new(0, 4);
        nav.set_target(Some(edge));
        let body = Body::new(layout.tile_center(edge) + Vec2::new(15.0, 0.0), 10.0, 0.0);
        assert!(nav.has_arrived(&body, &layout, 0.0));
        nav.set_target(Some(TileCoord::new(4, 4)));
        let body = Body::new(layout.tile_center(TileCoord::new(4, 4)) + Vec2::new(15.0, 0.0), 10.0, 0.0);
        assert!(!nav.has_arrived(&body, &layout, 0.0));
        assert!(nav.has_arrived(&body, &layout, 6.0));
    }

    #[test]
    fn edge_arrival_factor_is_adjustable() {
        let layout = layout();
        let edge = TileCoord::new(9, 0);
        let mut nav = Navigator::new().with_edge_arrival_factor(1.0);
        nav.set_target(Some(edge));
        let body = Body::new(layout.tile_center(edge) - Vec2::new(15.0, 0.0), 10.0, 0.0);
        assert!(!nav.has_arrived(&body, &layout, 0.0));
        let mut nav = nav.with_edge_arrival_factor(3.0);
        nav.set_target(Some(edge));
        assert!(nav.has_arrived(&body, &layout, 0.0));
    }
}
