//! Circle movement against the tile grid and other entities.
//!
//! Movers are circles. A candidate position is rejected when the circle
//! overlaps a blocking tile's square footprint or another entity's circle.
//! Moves are resolved one axis at a time so a mover pressed against a wall
//! keeps sliding along it.

use gridshot_common::{CellCoord, Vec2};
use serde::{Deserialize, Serialize};

/// Diagonal step scale so that diagonal speed equals axial speed.
pub const DIAGONAL_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Grid occupancy queried by the collision resolver and the visibility test.
///
/// Implemented by [`crate::GridMap`]; tests substitute lighter grids.
pub trait CollisionQuery {
    /// Checks if the cell blocks movement and sight.
    fn is_blocking(&self, cell: CellCoord) -> bool;

    /// Side length of one cell in world units.
    fn tile_size(&self) -> f32;
}

/// A circle another mover may not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre in world units
    pub center: Vec2,
    /// Radius in world units
    pub radius: f32,
}

impl Obstacle {
    /// Creates a new obstacle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether a circle at `center` with `radius` overlaps this obstacle.
    #[must_use]
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        let reach = self.radius + radius;
        center.distance_squared(self.center) < reach * reach
    }
}

/// Checks whether a circle at `candidate` overlaps any blocking tile.
///
/// The circle's bounding box selects the cell range; each blocking cell in
/// range is tested by clamping the centre onto the tile square.
pub fn hits_wall<C: CollisionQuery + ?Sized>(world: &C, candidate: Vec2, radius: f32) -> bool {
    let tile = world.tile_size();
    let min = CellCoord::from_world(candidate - Vec2::splat(radius), tile);
    let max = CellCoord::from_world(candidate + Vec2::splat(radius), tile);
    let r2 = radius * radius;

    for j in min.y..=max.y {
        for i in min.x..=max.x {
            let cell = CellCoord::new(i, j);
            if !world.is_blocking(cell) {
                continue;
            }
            let lo = cell.world_origin(tile);
            let hi = lo + Vec2::splat(tile);
            let closest = candidate.clamp(lo, hi);
            if candidate.distance_squared(closest) < r2 {
                return true;
            }
        }
    }
    false
}

/// Checks whether a circle may occupy `candidate`.
///
/// `obstacles` must already exclude dead entities and the mover itself.
pub fn can_step_to<C: CollisionQuery + ?Sized>(
    world: &C,
    candidate: Vec2,
    radius: f32,
    obstacles: &[Obstacle],
) -> bool {
    !hits_wall(world, candidate, radius) && !obstacles.iter().any(|o| o.overlaps(candidate, radius))
}

/// Resolves a displacement X first, then Y, and returns the new position.
///
/// Each axis is accepted only if the circle fits at the resulting point, so
/// blocked movement slides along walls instead of stopping dead.
pub fn resolve_move<C: CollisionQuery + ?Sized>(
    world: &C,
    position: Vec2,
    radius: f32,
    displacement: Vec2,
    obstacles: &[Obstacle],
) -> Vec2 {
    let mut pos = position;

    if displacement.x != 0.0 {
        let candidate = Vec2::new(pos.x + displacement.x, pos.y);
        if can_step_to(world, candidate, radius, obstacles) {
            pos = candidate;
        }
    }

    if displacement.y != 0.0 {
        let candidate = Vec2::new(pos.x, pos.y + displacement.y);
        if can_step_to(world, candidate, radius, obstacles) {
            pos = candidate;
        }
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;
    use proptest::prelude::*;

    const T: f32 = 64.0;

    /// Grid with an explicit set of blocking cells.
    #[derive(Debug, Default)]
    struct MockGrid {
        blocking: AHashSet<CellCoord>,
    }

    impl MockGrid {
        fn with_walls(cells: &[(i32, i32)]) -> Self {
            Self {
                blocking: cells.iter().map(|&(x, y)| CellCoord::new(x, y)).collect(),
            }
        }
    }

    impl CollisionQuery for MockGrid {
        fn is_blocking(&self, cell: CellCoord) -> bool {
            self.blocking.contains(&cell)
        }

        fn tile_size(&self) -> f32 {
            T
        }
    }

    /// Walls around a 3x3 open room spanning cells (1..=3, 1..=3).
    fn room() -> MockGrid {
        let mut walls = Vec::new();
        for i in 0..5 {
            walls.extend([(i, 0), (i, 4), (0, i), (4, i)]);
        }
        MockGrid::with_walls(&walls)
    }

    #[test]
    fn test_overlap_with_wall_footprint() {
        let grid = MockGrid::with_walls(&[(2, 2)]);
        // Inside the tile
        assert!(hits_wall(&grid, Vec2::new(150.0, 150.0), 10.0));
        // 5 units left of the tile's left edge with radius 10
        assert!(hits_wall(&grid, Vec2::new(123.0, 160.0), 10.0));
        // Just clear of the edge
        assert!(!hits_wall(&grid, Vec2::new(117.0, 160.0), 10.0));
        // Near a corner but outside the radius
        assert!(!hits_wall(&grid, Vec2::new(120.0, 120.0), 10.0));
    }

    #[test]
    fn test_open_room_centre_is_free() {
        let grid = room();
        assert!(can_step_to(&grid, Vec2::new(160.0, 160.0), 20.0, &[]));
        assert!(!can_step_to(&grid, Vec2::new(70.0, 160.0), 20.0, &[]));
    }

    #[test]
    fn test_obstacle_blocks_step() {
        let grid = MockGrid::default();
        let obstacles = [Obstacle::new(Vec2::new(100.0, 100.0), 20.0)];
        assert!(!can_step_to(&grid, Vec2::new(130.0, 100.0), 15.0, &obstacles));
        assert!(can_step_to(&grid, Vec2::new(136.0, 100.0), 15.0, &obstacles));
    }

    #[test]
    fn test_wall_sliding() {
        let grid = room();
        // Pressed against the right wall, moving diagonally down-right.
        let start = Vec2::new(3.0 * T + 40.0, 2.0 * T);
        let end = resolve_move(&grid, start, 20.0, Vec2::new(10.0, 10.0), &[]);
        assert!((end.x - start.x).abs() < f32::EPSILON);
        assert!((end.y - (start.y + 10.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resolve_move_x_before_y() {
        // A wall diagonally ahead: moving X alone is fine, then Y is blocked.
        let grid = MockGrid::with_walls(&[(3, 2)]);
        let start = Vec2::new(2.0 * T + 32.0, 1.0 * T + 32.0);
        let end = resolve_move(&grid, start, 20.0, Vec2::new(20.0, 20.0), &[]);
        assert!((end.x - (start.x + 20.0)).abs() < f32::EPSILON);
        assert!((end.y - start.y).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_resolved_position_never_overlaps_walls(
            x in 70.0f32..250.0,
            y in 70.0f32..250.0,
            dx in -8.0f32..8.0,
            dy in -8.0f32..8.0,
        ) {
            let grid = room();
            let start = Vec2::new(x, y);
            prop_assume!(!hits_wall(&grid, start, 15.0));
            let end = resolve_move(&grid, start, 15.0, Vec2::new(dx, dy), &[]);
            prop_assert!(!hits_wall(&grid, end, 15.0));
        }

        #[test]
        fn prop_interior_of_open_room_is_walkable(
            x in (T + 20.0)..(4.0 * T - 20.0),
            y in (T + 20.0)..(4.0 * T - 20.0),
        ) {
            prop_assert!(can_step_to(&room(), Vec2::new(x, y), 20.0, &[]));
        }
    }
}
