//! Coordinate types for tile cells and world positions.
//!
//! World space is continuous and measured in world units. The level grid
//! divides it into square tiles of side [`TILE_SIZE`]; cell `(i, j)` covers
//! `[i * T, (i + 1) * T) x [j * T, (j + 1) * T)`.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Side length of one tile in world units.
pub const TILE_SIZE: f32 = 64.0;

/// The eight neighbour offsets of a cell, axial first then diagonal.
///
/// The order is significant: breadth-first search expands neighbours in
/// this order, which decides between equally short paths.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// Integer coordinate of one tile in the level grid (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell containing a world position (floor division).
    #[must_use]
    pub fn from_world(pos: Vec2, tile_size: f32) -> Self {
        Self {
            x: (pos.x / tile_size).floor() as i32,
            y: (pos.y / tile_size).floor() as i32,
        }
    }

    /// Returns the cell offset by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Iterates the eight surrounding cells in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }

    /// World position of the cell's top-left corner.
    #[must_use]
    pub fn world_origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// World position of the cell's centre.
    #[must_use]
    pub fn world_center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * tile_size,
            (self.y as f32 + 0.5) * tile_size,
        )
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Converts a position given in tile units into world units.
#[must_use]
pub fn tiles_to_world(tx: f32, ty: f32, tile_size: f32) -> Vec2 {
    Vec2::new(tx * tile_size, ty * tile_size)
}
