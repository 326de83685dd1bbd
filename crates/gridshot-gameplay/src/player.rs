//! The player avatar.
//!
//! The player moves under directional input, faces the pointer, regenerates
//! health slowly and dies for good when health drops below one. Shot damage
//! is resolved by the level, not here.

use gridshot_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::collision::{resolve_move, CollisionQuery, Obstacle};
use crate::config::SimConfig;
use crate::input::MoveIntent;

/// Player life state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Accepting input
    #[default]
    Alive,
    /// Terminal
    Dead,
}

/// The player avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    position: Vec2,
    radius: f32,
    speed: f32,
    angle: f32,
    health: i32,
    max_health: i32,
    state: PlayerState,
    shot_requested: bool,
    shots_fired: u32,
    damage_taken: u32,
    regen_accumulator_ms: f32,
    regen_interval_ms: f32,
}

impl Player {
    /// Creates a player at full health at a world position.
    #[must_use]
    pub fn new(position: Vec2, config: &SimConfig) -> Self {
        Self {
            position,
            radius: config.player_radius,
            speed: config.player_speed,
            angle: 0.0,
            health: config.player_max_health,
            max_health: config.player_max_health,
            state: PlayerState::Alive,
            shot_requested: false,
            shots_fired: 0,
            damage_taken: 0,
            regen_accumulator_ms: 0.0,
            regen_interval_ms: config.regen_interval_ms,
        }
    }

    /// Get position in world units.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Facing angle in radians, screen space.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Life state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether the player is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    /// Whether a shot is being resolved right now.
    #[must_use]
    pub fn shot_requested(&self) -> bool {
        self.shot_requested
    }

    /// Shots fired since the level started.
    #[must_use]
    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Total damage received since the level started.
    #[must_use]
    pub fn damage_taken(&self) -> u32 {
        self.damage_taken
    }

    /// Collision circle as seen by other movers.
    #[must_use]
    pub fn as_obstacle(&self) -> Obstacle {
        Obstacle::new(self.position, self.radius)
    }

    /// Moves one tick's worth in the held directions.
    ///
    /// `obstacles` are the alive NPCs. Each axis is committed only if the
    /// player fits there.
    pub fn move_by<C: CollisionQuery + ?Sized>(
        &mut self,
        world: &C,
        intent: MoveIntent,
        obstacles: &[Obstacle],
    ) {
        if !self.is_alive() {
            return;
        }
        let displacement = intent.displacement(self.speed);
        if displacement == Vec2::ZERO {
            return;
        }
        self.position = resolve_move(world, self.position, self.radius, displacement, obstacles);
        trace!("player moved to ({:.1}, {:.1})", self.position.x, self.position.y);
    }

    /// Faces the pointer, measured from the screen centre.
    pub fn aim(&mut self, target: Vec2, screen_center: Vec2) {
        let d = target - screen_center;
        self.angle = d.y.atan2(d.x);
    }

    /// Accumulates regeneration time and restores one point when due.
    ///
    /// The accumulator only resets when a point is restored, so time spent
    /// at full health is banked toward the next heal.
    pub fn recover_health(&mut self, dt: f32) {
        self.regen_accumulator_ms += dt * 1000.0;
        if self.regen_accumulator_ms > self.regen_interval_ms
            && self.is_alive()
            && self.health < self.max_health
        {
            self.regen_accumulator_ms = 0.0;
            self.health += 1;
        }
    }

    /// Applies damage. Returns `true` if this call killed the player.
    ///
    /// Health is clamped at zero. A dead player ignores further damage.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let amount = amount.max(0);
        self.health = (self.health - amount).max(0);
        self.damage_taken = self.damage_taken.saturating_add(amount as u32);
        if self.health < 1 {
            self.state = PlayerState::Dead;
            return true;
        }
        false
    }

    /// Marks a shot as in flight and counts it.
    pub fn request_shot(&mut self) {
        self.shot_requested = true;
        self.shots_fired += 1;
    }

    /// Clears the in-flight shot flag once damage is resolved.
    pub fn clear_shot(&mut self) {
        self.shot_requested = false;
    }
}
