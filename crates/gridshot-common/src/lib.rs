//! # Gridshot Common
//!
//! Common types shared by every Gridshot crate.
//!
//! This crate provides the leaf types the simulation and the driver agree on:
//! - Coordinate types (tile cells, world positions, tile size)
//! - ID types (maps, NPCs)
//! - Schema versions for persisted files
//! - The error taxonomy
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cell_world_conversion() {
        let pos = tiles_to_world(1.5, 5.0, TILE_SIZE);
        assert_eq!(pos, Vec2::new(96.0, 320.0));
        assert_eq!(CellCoord::from_world(pos, TILE_SIZE), CellCoord::new(1, 5));
    }

    #[test]
    fn test_map_id_names() {
        assert_eq!(MapId::CASTLE.name(), "Castle");
        assert_eq!(MapId::ALL.len(), 3);
    }

    #[test]
    fn test_version_readability() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        assert!(v2.can_read(&v1));
        assert!(v1.can_read(&v2));
        assert!(!v1.can_read(&v3));
    }

    proptest! {
        #[test]
        fn prop_cell_center_maps_back(x in -500i32..500, y in -500i32..500) {
            let cell = CellCoord::new(x, y);
            prop_assert_eq!(CellCoord::from_world(cell.world_center(TILE_SIZE), TILE_SIZE), cell);
            prop_assert_eq!(CellCoord::from_world(cell.world_origin(TILE_SIZE), TILE_SIZE), cell);
        }
    }
}
