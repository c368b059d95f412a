//! Integer tile coordinates.
//!
//! The grid is addressed by `(x, y)` with `y` growing downward, so "north"
//! is `y - 1`. Coordinates are signed so that neighbors of edge tiles can be
//! expressed and then rejected by bounds checks instead of wrapping.

use serde::{Deserialize, Serialize};

/// Neighbor offsets in the fixed order N, NE, E, SE, S, SW, W, NW.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// A tile position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TileCoord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The 8 surrounding coordinates in [`NEIGHBOR_OFFSETS`] order.
    ///
    /// No bounds filtering happens here; callers check validity.
    pub fn neighbors8(self) -> [Self; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Whether `other` is one of the 8 surrounding tiles.
    pub const fn is_adjacent(self, other: Self) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx <= 1 && dy <= 1 && (dx != 0 || dy != 0)
    }

    /// Euclidean distance in tile units.
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x.abs_diff(other.x) as f32;
        let dy = self.y.abs_diff(other.y) as f32;
        dx.hypot(dy)
    }
}

impl core::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_follow_compass_order() {
        let n = TileCoord::new(5, 5).neighbors8();
        assert_eq!(n[0], TileCoord::new(5, 4));
        assert_eq!(n[2], TileCoord::new(6, 5));
        assert_eq!(n[4], TileCoord::new(5, 6));
        assert_eq!(n[7], TileCoord::new(4, 4));
    }

    #[test]
    fn every_neighbor_is_adjacent() {
        let center = TileCoord::new(0, 0);
        for n in center.neighbors8() {
            assert!(center.is_adjacent(n));
        }
        assert!(!center.is_adjacent(center));
        assert!(!center.is_adjacent(TileCoord::new(2, 0)));
    }

    #[test]
    fn distance_is_euclidean() {
        let d = TileCoord::new(0, 0).distance(TileCoord::new(3, 4));
        assert!((d - 5.0).abs() < f32::EPSILON);
    }
}
