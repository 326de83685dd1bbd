//! The three canonical maps and their spawn tables.
//!
//! Positions are given in tile units and converted to world units when a
//! level is built. Every layout is 16x16 with a closed border.

use gridshot_common::MapId;

use crate::npc::NpcKind;

/// One NPC spawn entry, in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpcSpawn {
    /// Archetype to spawn
    pub kind: NpcKind,
    /// Column position in tiles
    pub x: f32,
    /// Row position in tiles
    pub y: f32,
}

impl NpcSpawn {
    /// Creates a spawn entry.
    #[must_use]
    pub const fn new(kind: NpcKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }
}

/// Static description of a canonical map.
#[derive(Debug, Clone, Copy)]
pub struct MapDefinition {
    /// Map id
    pub id: MapId,
    /// Layout rows, top to bottom
    pub layout: &'static [&'static str],
    /// Player start (column, row) in tiles
    pub player_start: (f32, f32),
    /// NPC spawns in list order
    pub spawns: &'static [NpcSpawn],
}

/// Player start used when a map id has no entry.
pub const DEFAULT_PLAYER_START: (f32, f32) = (1.5, 5.0);

const CASTLE_LAYOUT: &[&str] = &[
    "1111111111111111",
    "1..............1",
    "1..............1",
    "1..............1",
    "1....2222..33..1",
    "1....2.......3.1",
    "1....2.......3.1",
    "1..............1",
    "1..44....4.....1",
    "1..4...........1",
    "1..4.....555...1",
    "1........5.....1",
    "1........5.....1",
    "1..............1",
    "1..............1",
    "1111111111111111",
];

const LABYRINTH_LAYOUT: &[&str] = &[
    "1111111111111111",
    "1..............1",
    "1..............1",
    "1.22222..22222.1",
    "1.2..........2.1",
    "1.2..333333..2.1",
    "1....3....3....1",
    "1....3....3....1",
    "1....3....3....1",
    "1.2..33..33..2.1",
    "1.2..........2.1",
    "1.22222..22222.1",
    "1..............1",
    "1..............1",
    "1..............1",
    "1111111111111111",
];

const MILITARY_BASE_LAYOUT: &[&str] = &[
    "1111111111111111",
    "1..............1",
    "1..............1",
    "1..55......55..1",
    "1..............1",
    "1..............1",
    "1......44......1",
    "1.....4..4.....1",
    "1.....4........1",
    "1......4.4.....1",
    "1..............1",
    "1..............1",
    "1..55......55..1",
    "1..............1",
    "1..............1",
    "1111111111111111",
];

const CASTLE_SPAWNS: &[NpcSpawn] = &[
    NpcSpawn::new(NpcKind::Soldier, 3.5, 3.5),
    NpcSpawn::new(NpcKind::Soldier, 12.5, 5.5),
    NpcSpawn::new(NpcKind::CacoDemon, 8.5, 8.5),
    NpcSpawn::new(NpcKind::Soldier, 5.5, 12.5),
    NpcSpawn::new(NpcKind::CyberDemon, 14.5, 14.5),
];

const LABYRINTH_SPAWNS: &[NpcSpawn] = &[
    NpcSpawn::new(NpcKind::Soldier, 3.5, 2.5),
    NpcSpawn::new(NpcKind::Soldier, 12.5, 2.5),
    NpcSpawn::new(NpcKind::CacoDemon, 7.5, 7.5),
    NpcSpawn::new(NpcKind::Soldier, 2.5, 12.5),
    NpcSpawn::new(NpcKind::CyberDemon, 12.5, 12.5),
];

const MILITARY_BASE_SPAWNS: &[NpcSpawn] = &[
    NpcSpawn::new(NpcKind::Soldier, 4.5, 4.5),
    NpcSpawn::new(NpcKind::Soldier, 11.5, 4.5),
    NpcSpawn::new(NpcKind::CacoDemon, 4.5, 11.5),
    NpcSpawn::new(NpcKind::Soldier, 11.5, 11.5),
    NpcSpawn::new(NpcKind::CyberDemon, 8.5, 8.5),
];

static DEFINITIONS: [MapDefinition; 3] = [
    MapDefinition {
        id: MapId::CASTLE,
        layout: CASTLE_LAYOUT,
        player_start: (1.5, 5.0),
        spawns: CASTLE_SPAWNS,
    },
    MapDefinition {
        id: MapId::LABYRINTH,
        layout: LABYRINTH_LAYOUT,
        player_start: (1.5, 1.5),
        spawns: LABYRINTH_SPAWNS,
    },
    MapDefinition {
        id: MapId::MILITARY_BASE,
        layout: MILITARY_BASE_LAYOUT,
        player_start: (1.5, 7.5),
        spawns: MILITARY_BASE_SPAWNS,
    },
];

/// Looks up a canonical map.
#[must_use]
pub fn definition(id: MapId) -> Option<&'static MapDefinition> {
    DEFINITIONS.iter().find(|def| def.id == id)
}

/// Player start for a map in tiles, falling back to [`DEFAULT_PLAYER_START`].
#[must_use]
pub fn player_start(id: MapId) -> (f32, f32) {
    definition(id).map_or(DEFAULT_PLAYER_START, |def| def.player_start)
}

/// All canonical maps in id order.
#[must_use]
pub fn all() -> &'static [MapDefinition] {
    &DEFINITIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_map::GridMap;
    use gridshot_common::{tiles_to_world, CellCoord, TILE_SIZE};

    #[test]
    fn test_every_map_parses_with_closed_border() {
        for def in all() {
            let map = GridMap::parse(def.layout).expect("canonical layout parses");
            assert_eq!(map.width(), 16);
            assert_eq!(map.height(), 16);
            for i in 0..16 {
                assert!(map.is_wall(CellCoord::new(i, 0)), "{}", def.id);
                assert!(map.is_wall(CellCoord::new(i, 15)), "{}", def.id);
                assert!(map.is_wall(CellCoord::new(0, i)), "{}", def.id);
                assert!(map.is_wall(CellCoord::new(15, i)), "{}", def.id);
            }
        }
    }

    #[test]
    fn test_every_spawn_is_on_floor() {
        for def in all() {
            let map = GridMap::parse(def.layout).expect("canonical layout parses");
            let (px, py) = def.player_start;
            let player = CellCoord::from_world(tiles_to_world(px, py, TILE_SIZE), TILE_SIZE);
            assert!(map.is_floor(player), "player start blocked on {}", def.id);
            assert_eq!(def.spawns.len(), 5);
            for spawn in def.spawns {
                let cell = CellCoord::from_world(tiles_to_world(spawn.x, spawn.y, TILE_SIZE), TILE_SIZE);
                assert!(map.is_floor(cell), "{:?} blocked on {}", spawn, def.id);
            }
        }
    }

    #[test]
    fn test_player_start_table() {
        assert_eq!(player_start(MapId::CASTLE), (1.5, 5.0));
        assert_eq!(player_start(MapId::LABYRINTH), (1.5, 1.5));
        assert_eq!(player_start(MapId::MILITARY_BASE), (1.5, 7.5));
        assert_eq!(player_start(MapId::new(42)), DEFAULT_PLAYER_START);
    }

    #[test]
    fn test_unknown_map_has_no_definition() {
        assert!(definition(MapId::new(3)).is_none());
        assert_eq!(definition(MapId::LABYRINTH).map(|d| d.id), Some(MapId::LABYRINTH));
    }

    #[test]
    fn test_every_map_ends_with_cyber_demon() {
        for def in all() {
            let last = def.spawns.last().expect("spawn table is non-empty");
            assert_eq!(last.kind, NpcKind::CyberDemon);
        }
    }
}
