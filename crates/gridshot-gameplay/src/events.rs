//! Observable side effects of a tick, for sound and UI collaborators.
//!
//! The level pushes events as they happen and the collaborator drains them
//! once per frame with [`crate::Level::drain_events`].

use gridshot_common::NpcId;
use serde::{Deserialize, Serialize};

use crate::npc::NpcKind;

/// Event types raised by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired the weapon
    ShotFired {
        /// Number of NPCs the shot damaged
        hits: u32,
    },
    /// NPC took damage and survived
    NpcHurt {
        /// NPC hit
        npc: NpcId,
        /// Damage amount
        damage: i32,
    },
    /// NPC health dropped to zero
    NpcKilled {
        /// NPC killed
        npc: NpcId,
        /// Its kind
        kind: NpcKind,
    },
    /// NPC attack roll succeeded
    NpcAttackLanded {
        /// Attacker
        npc: NpcId,
        /// Damage dealt to the player
        damage: i32,
    },
    /// Player took damage and survived
    PlayerHurt {
        /// Damage amount
        damage: i32,
        /// Health after the hit
        health: i32,
    },
    /// Player health dropped below one
    PlayerDied,
    /// Every NPC is dead
    LevelWon,
}

impl GameEvent {
    /// Sound cue a presentation layer would play for this event.
    #[must_use]
    pub const fn sound_cue(&self) -> Option<&'static str> {
        match self {
            Self::ShotFired { .. } => Some("shotgun"),
            Self::NpcHurt { .. } => Some("npc_pain"),
            Self::NpcKilled { .. } => Some("npc_death"),
            Self::NpcAttackLanded { .. } => Some("npc_attack"),
            Self::PlayerHurt { .. } | Self::PlayerDied => Some("player_pain"),
            Self::LevelWon => None,
        }
    }
}
