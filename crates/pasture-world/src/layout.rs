//! Grid dimensions and pixel placement.
//!
//! A [`WorldLayout`] fixes how many tiles the world has and where they sit in
//! pixel space. Positions are `f32` pixels; the grid starts at `origin` and
//! tiles are `tile_size` pixels square. Everything is fixed at construction.

use pasture_types::{TileCoord, Vec2};

use crate::error::WorldError;
use crate::random::RandomSource;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Whether `point` lies inside, edges included.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamp `point` into the rectangle.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Grid dimensions plus pixel placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldLayout {
    columns: i32,
    rows: i32,
    tile_size: f32,
    origin: Vec2,
}

impl WorldLayout {
    /// Derive a layout from a viewport.
    ///
    /// The grid gets `width / tile_size - padding_x` columns and
    /// `height / tile_size - padding_y` rows, centered in the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] if the tile size is zero or the
    /// padding leaves no columns or rows.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_viewport(
        width: u32,
        height: u32,
        tile_size: u32,
        padding_x: u32,
        padding_y: u32,
    ) -> Result<Self, WorldError> {
        if tile_size == 0 {
            return Err(WorldError::InvalidLayout {
                reason: "tile size must be positive",
            });
        }
        let columns = (width / tile_size)
            .checked_sub(padding_x)
            .filter(|c| *c > 0)
            .ok_or(WorldError::InvalidLayout {
                reason: "padding leaves no columns",
            })?;
        let rows = (height / tile_size)
            .checked_sub(padding_y)
            .filter(|r| *r > 0)
            .ok_or(WorldError::InvalidLayout {
                reason: "padding leaves no rows",
            })?;

        let margin_x = width.saturating_sub(columns.saturating_mul(tile_size)) / 2;
        let margin_y = height.saturating_sub(rows.saturating_mul(tile_size)) / 2;

        let columns = i32::try_from(columns).map_err(|_e| WorldError::InvalidLayout {
            reason: "too many columns",
        })?;
        let rows = i32::try_from(rows).map_err(|_e| WorldError::InvalidLayout {
            reason: "too many rows",
        })?;

        Ok(Self {
            columns,
            rows,
            tile_size: tile_size as f32,
            origin: Vec2::new(margin_x as f32, margin_y as f32),
        })
    }

    /// Build a layout with its origin at `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] if a dimension is not positive
    /// or the tile size is not a positive finite number.
    pub fn from_grid(columns: i32, rows: i32, tile_size: f32) -> Result<Self, WorldError> {
        if columns <= 0 || rows <= 0 {
            return Err(WorldError::InvalidLayout {
                reason: "grid dimensions must be positive",
            });
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(WorldError::InvalidLayout {
                reason: "tile size must be positive",
            });
        }
        Ok(Self {
            columns,
            rows,
            tile_size,
            origin: Vec2::ZERO,
        })
    }

    /// Grid width in tiles.
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Grid height in tiles.
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Tile edge length in pixels.
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Pixel position of the grid's top-left corner.
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> usize {
        usize::try_from(self.columns.saturating_mul(self.rows)).unwrap_or(0)
    }

    /// Whether `coord` lies on the grid.
    pub const fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.columns && coord.y < self.rows
    }

    /// Row-major index of `coord`, or `None` off the grid.
    pub fn index(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let flat = coord.y.checked_mul(self.columns)?.checked_add(coord.x)?;
        usize::try_from(flat).ok()
    }

    /// Coordinate of a row-major index, or `None` past the end.
    pub fn coord_at(&self, index: usize) -> Option<TileCoord> {
        let flat = i32::try_from(index).ok()?;
        let coord = TileCoord::new(flat.checked_rem(self.columns)?, flat.checked_div(self.columns)?);
        self.contains(coord).then_some(coord)
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |y| (0..columns).map(move |x| TileCoord::new(x, y)))
    }

    /// Tile containing a pixel position. May be off the grid.
    #[allow(clippy::cast_possible_truncation)]
    pub fn position_to_tile(&self, position: Vec2) -> TileCoord {
        let local = ((position - self.origin) / self.tile_size).floor();
        TileCoord::new(local.x as i32, local.y as i32)
    }

    /// Top-left pixel corner of a tile.
    #[allow(clippy::cast_precision_loss)]
    pub fn tile_to_position(&self, coord: TileCoord) -> Vec2 {
        Vec2::new(coord.x as f32, coord.y as f32) * self.tile_size + self.origin
    }

    /// Pixel center of a tile.
    pub fn tile_center(&self, coord: TileCoord) -> Vec2 {
        self.tile_to_position(coord) + Vec2::splat(self.tile_size * 0.5)
    }

    /// Pixel rectangle covered by the grid.
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> Bounds {
        let size = Vec2::new(self.columns as f32, self.rows as f32) * self.tile_size;
        Bounds {
            min: self.origin,
            max: self.origin + size,
        }
    }

    /// Whether `coord` is on the outermost ring of the grid.
    pub const fn is_edge(&self, coord: TileCoord) -> bool {
        coord.x == 0
            || coord.y == 0
            || coord.x == self.columns.saturating_sub(1)
            || coord.y == self.rows.saturating_sub(1)
    }

    /// Nearest on-grid coordinate.
    pub fn clamp_tile(&self, coord: TileCoord) -> TileCoord {
        TileCoord::new(
            coord.x.clamp(0, self.columns.saturating_sub(1)),
            coord.y.clamp(0, self.rows.saturating_sub(1)),
        )
    }

    // -------------------------------------------------------------------
    // Random placement
    // -------------------------------------------------------------------

    /// Random on-grid tile under a pixel drawn from the rectangle spanned by
    /// `a` and `b`, clamped into the world bounds first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn random_tile_between(&self, a: Vec2, b: Vec2, rng: &mut dyn RandomSource) -> TileCoord {
        let lo = a.min(b);
        let hi = a.max(b);
        let x = rng.range_inclusive(lo.x as i32, hi.x as i32);
        let y = rng.range_inclusive(lo.y as i32, hi.y as i32);
        let position = self.bounds().clamp(Vec2::new(x as f32, y as f32));
        self.clamp_tile(self.position_to_tile(position))
    }

    /// Random on-grid tile within `range` pixels (per axis) of `center`.
    pub fn random_tile_near(
        &self,
        center: Vec2,
        range: f32,
        rng: &mut dyn RandomSource,
    ) -> TileCoord {
        self.random_tile_between(center - Vec2::splat(range), center + Vec2::splat(range), rng)
    }

    /// Random whole-pixel position inside the world bounds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn random_position(&self, rng: &mut dyn RandomSource) -> Vec2 {
        let bounds = self.bounds();
        let x = rng.range_inclusive(bounds.min.x as i32, bounds.max.x as i32);
        let y = rng.range_inclusive(bounds.min.y as i32, bounds.max.y as i32);
        bounds.clamp(Vec2::new(x as f32, y as f32))
    }
}
