//! ID types for maps and entities.

use serde::{Deserialize, Serialize};

/// Identifier of one of the canonical maps shipped with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(u8);

impl MapId {
    /// Map 0.
    pub const CASTLE: Self = Self(0);
    /// Map 1.
    pub const LABYRINTH: Self = Self(1);
    /// Map 2.
    pub const MILITARY_BASE: Self = Self(2);

    /// All canonical maps in menu order.
    pub const ALL: [Self; 3] = [Self::CASTLE, Self::LABYRINTH, Self::MILITARY_BASE];

    /// Creates a map ID from a raw value. The value is not validated;
    /// level construction rejects unknown ids.
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Display name of the map.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            0 => "Castle",
            1 => "Labyrinth",
            2 => "Military Base",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map {} ({})", self.0, self.name())
    }
}

/// Index of an NPC inside its level's NPC list.
///
/// NPCs are never removed from a level, so an id stays valid for the
/// level's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(u32);

impl NpcId {
    /// Creates an NPC id from a list index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the list index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}
