//! Static tile occupancy for one level.
//!
//! A [`GridMap`] is parsed once from a text layout and never changes while the
//! level runs. Only wall cells are stored; any cell not present is floor,
//! including every cell outside the layout rectangle.

use ahash::AHashMap;
use gridshot_common::{CellCoord, MapError, TILE_SIZE};

use crate::collision::CollisionQuery;

/// Wall-type id of a blocking tile (1 to 5).
pub type WallId = u8;

/// Immutable mapping from cell to wall-type id.
#[derive(Debug, Clone)]
pub struct GridMap {
    walls: AHashMap<CellCoord, WallId>,
    width: usize,
    height: usize,
    tile_size: f32,
}

impl GridMap {
    /// Parses a layout using the default tile size.
    ///
    /// Each row is one line of the map, top to bottom. `.` and `0` are floor,
    /// `1` to `5` are walls of that type.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        Self::parse_with_tile_size(rows, TILE_SIZE)
    }

    /// Parses a layout with an explicit tile size.
    pub fn parse_with_tile_size<S: AsRef<str>>(
        rows: &[S],
        tile_size: f32,
    ) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut walls = AHashMap::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let actual = line.chars().count();
            if actual != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }

            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '.' | '0' => {},
                    '1'..='5' => {
                        let id = ch as u8 - b'0';
                        walls.insert(CellCoord::new(col as i32, row as i32), id);
                    },
                    found => return Err(MapError::InvalidTile { row, col, found }),
                }
            }
        }

        Ok(Self {
            walls,
            width,
            height: rows.len(),
            tile_size,
        })
    }

    /// Wall id at a cell, or `None` for floor.
    #[must_use]
    pub fn wall_at(&self, cell: CellCoord) -> Option<WallId> {
        self.walls.get(&cell).copied()
    }

    /// Whether a cell holds a wall.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.walls.contains_key(&cell)
    }

    /// Whether a cell lies inside the layout rectangle.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Whether a cell is inside the layout and not a wall.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }

    /// Layout width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Layout height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of wall cells.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Iterates every cell of the layout rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| CellCoord::new(x as i32, y as i32))
        })
    }

    /// Iterates wall cells with their ids, in no particular order.
    pub fn walls(&self) -> impl Iterator<Item = (CellCoord, WallId)> + '_ {
        self.walls.iter().map(|(&cell, &id)| (cell, id))
    }
}

impl CollisionQuery for GridMap {
    fn is_blocking(&self, cell: CellCoord) -> bool {
        self.is_wall(cell)
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walls_and_floor() {
        let map = GridMap::parse(&["111", "1.2", "130"]).expect("valid layout");
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert_eq!(map.wall_count(), 7);
        assert_eq!(map.wall_at(CellCoord::new(2, 1)), Some(2));
        assert_eq!(map.wall_at(CellCoord::new(1, 2)), Some(3));
        assert_eq!(map.wall_at(CellCoord::new(1, 1)), None);
        assert!(map.is_floor(CellCoord::new(2, 2)));
    }

    #[test]
    fn test_outside_layout_is_not_wall() {
        let map = GridMap::parse(&["11", "11"]).expect("valid layout");
        assert!(!map.is_wall(CellCoord::new(-1, 0)));
        assert!(!map.is_wall(CellCoord::new(5, 5)));
        assert!(!map.is_floor(CellCoord::new(5, 5)));
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(GridMap::parse(&empty).expect_err("layout should be rejected"), MapError::Empty);
        assert_eq!(GridMap::parse(&[""]).expect_err("layout should be rejected"), MapError::Empty);
        assert_eq!(
            GridMap::parse(&["111", "11"]).expect_err("layout should be rejected"),
            MapError::RaggedRow {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            GridMap::parse(&["1x1"]).expect_err("layout should be rejected"),
            MapError::InvalidTile {
                row: 0,
                col: 1,
                found: 'x'
            }
        );
        assert!(matches!(
            GridMap::parse(&["161"]),
            Err(MapError::InvalidTile { found: '6', .. })
        ));
    }

    #[test]
    fn test_cells_cover_layout() {
        let map = GridMap::parse(&["1.1", "..."]).expect("valid layout");
        let cells: Vec<_> = map.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], CellCoord::new(0, 0));
        assert_eq!(cells[5], CellCoord::new(2, 1));
    }

    #[test]
    fn test_collision_query_impl() {
        let map = GridMap::parse_with_tile_size(&["1."], 32.0).expect("valid layout");
        assert!(map.is_blocking(CellCoord::new(0, 0)));
        assert!(!map.is_blocking(CellCoord::new(1, 0)));
        assert!((CollisionQuery::tile_size(&map) - 32.0).abs() < f32::EPSILON);
    }
}
