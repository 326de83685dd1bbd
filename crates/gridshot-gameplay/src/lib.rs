//! # Gridshot Gameplay
//!
//! The deterministic simulation core of Gridshot.
//!
//! This crate owns every rule of the game and nothing about presentation:
//! - Grid map parsing and wall queries
//! - Circle-versus-grid collision with per-axis sliding
//! - Bresenham line of sight
//! - BFS pathfinding with a per-level route cache
//! - Player and NPC simulation
//! - Shot effects, events, scoring and high scores
//! - The [`Level`] context that ties them together
//!
//! A driver feeds a [`TickInput`] and a time step to [`Level::simulate_tick`]
//! and reads HUD numbers and [`GameEvent`]s back out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod collision;
pub mod config;
pub mod effects;
pub mod events;
pub mod grid_map;
pub mod input;
pub mod level;
pub mod maps;
pub mod npc;
pub mod pathfinding;
pub mod player;
pub mod score;
pub mod visibility;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::collision::*;
    pub use crate::config::*;
    pub use crate::effects::*;
    pub use crate::events::*;
    pub use crate::grid_map::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::maps::{MapDefinition, NpcSpawn};
    pub use crate::npc::*;
    pub use crate::pathfinding::*;
    pub use crate::player::*;
    pub use crate::score::*;
    pub use crate::visibility::*;
}

pub use prelude::*;
