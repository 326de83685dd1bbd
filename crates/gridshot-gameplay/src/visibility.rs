//! Line-of-sight tests over the tile grid.
//!
//! Sight is discrete: both endpoints are snapped to their cells and the cells
//! between them are walked with Bresenham's line algorithm. The endpoint
//! cells themselves never block, so an entity standing against a wall can
//! still see and be seen.

use gridshot_common::{CellCoord, Vec2};

use crate::collision::CollisionQuery;

/// Iterator over the cells of a Bresenham line, both ends included.
#[derive(Debug, Clone)]
pub struct CellLine {
    current: CellCoord,
    end: CellCoord,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl CellLine {
    /// Creates a line from `start` to `end`.
    #[must_use]
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for CellLine {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.current.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(cell)
    }
}

/// Checks whether `to` is visible from `from`.
///
/// Returns `false` at the first blocking cell strictly between the two
/// endpoint cells.
pub fn check_visibility<C: CollisionQuery + ?Sized>(world: &C, from: Vec2, to: Vec2) -> bool {
    let tile = world.tile_size();
    let start = CellCoord::from_world(from, tile);
    let end = CellCoord::from_world(to, tile);

    CellLine::new(start, end)
        .filter(|&cell| cell != start && cell != end)
        .all(|cell| !world.is_blocking(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_map::GridMap;
    use proptest::prelude::*;

    fn line(a: (i32, i32), b: (i32, i32)) -> Vec<(i32, i32)> {
        CellLine::new(CellCoord::new(a.0, a.1), CellCoord::new(b.0, b.1))
            .map(|c| (c.x, c.y))
            .collect()
    }

    fn center(x: i32, y: i32) -> Vec2 {
        CellCoord::new(x, y).world_center(64.0)
    }

    #[test]
    fn test_line_single_cell() {
        assert_eq!(line((3, 3), (3, 3)), vec![(3, 3)]);
    }

    #[test]
    fn test_line_axial_and_diagonal() {
        assert_eq!(line((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line((2, 2), (0, 0)), vec![(2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn test_line_shallow_slope() {
        assert_eq!(
            line((0, 0), (4, 2)),
            vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2)]
        );
    }

    #[test]
    fn test_visible_in_open_room() {
        let map = GridMap::parse(&["11111", "1...1", "1...1", "1...1", "11111"])
            .expect("valid layout");
        assert!(check_visibility(&map, center(1, 1), center(3, 3)));
        assert!(check_visibility(&map, center(3, 1), center(1, 3)));
    }

    #[test]
    fn test_blocked_by_pillar() {
        let map = GridMap::parse(&["11111", "1...1", "1.1.1", "1...1", "11111"])
            .expect("valid layout");
        assert!(!check_visibility(&map, center(1, 2), center(3, 2)));
        assert!(!check_visibility(&map, center(1, 1), center(3, 3)));
        assert!(check_visibility(&map, center(1, 1), center(3, 1)));
    }

    #[test]
    fn test_endpoint_cells_never_block() {
        let map = GridMap::parse(&["1.1"]).expect("valid layout");
        assert!(check_visibility(&map, center(0, 0), center(2, 0)));
        assert!(check_visibility(&map, center(0, 0), center(0, 0)));
    }

    proptest! {
        #[test]
        fn prop_line_is_connected_and_ends_at_target(
            x0 in -20i32..20, y0 in -20i32..20, x1 in -20i32..20, y1 in -20i32..20,
        ) {
            let cells = line((x0, y0), (x1, y1));
            prop_assert_eq!(cells[0], (x0, y0));
            prop_assert_eq!(*cells.last().expect("non-empty line"), (x1, y1));
            let steps = (x1 - x0).abs().max((y1 - y0).abs()) as usize;
            prop_assert_eq!(cells.len(), steps + 1);
            for pair in cells.windows(2) {
                prop_assert!((pair[0].0 - pair[1].0).abs() <= 1);
                prop_assert!((pair[0].1 - pair[1].1).abs() <= 1);
            }
        }

        #[test]
        fn prop_visibility_is_total_in_empty_space(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
        ) {
            let map = GridMap::parse(&["."]).expect("valid layout");
            prop_assert!(check_visibility(&map, Vec2::new(ax, ay), Vec2::new(bx, by)));
        }
    }
}
