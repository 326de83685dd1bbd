//! Hostile NPCs.
//!
//! All NPC kinds share one behaviour: walk straight at the player until
//! within attack range, and while the player is visible and in range roll a
//! small per-tick chance to attack. Kinds differ only in their tuning row.

use gridshot_common::{NpcId, Vec2, TILE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::{resolve_move, CollisionQuery, Obstacle};
use crate::visibility::check_visibility;

/// Collision radius shared by every NPC kind.
pub const NPC_RADIUS: f32 = 20.0;

/// NPC archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    /// Common mid-range shooter
    Soldier,
    /// Fast, close-range, hard-hitting
    CacoDemon,
    /// Long-range, very durable
    CyberDemon,
}

impl NpcKind {
    /// Every kind.
    pub const ALL: [Self; 3] = [Self::Soldier, Self::CacoDemon, Self::CyberDemon];

    /// Tuning row for this kind at the default tile size.
    #[must_use]
    pub fn tuning(self) -> NpcTuning {
        self.tuning_for_tile(TILE_SIZE)
    }

    /// Tuning row for this kind, with the attack range scaled to `tile_size`.
    #[must_use]
    pub fn tuning_for_tile(self, tile_size: f32) -> NpcTuning {
        let (range_tiles, max_health, damage, speed, hit_chance) = match self {
            Self::Soldier => (4.0, 100, 10, 1.5, 0.15),
            Self::CacoDemon => (2.0, 150, 25, 2.0, 0.35),
            Self::CyberDemon => (6.0, 350, 15, 1.8, 0.25),
        };
        NpcTuning {
            attack_range: range_tiles * tile_size,
            max_health,
            damage,
            speed,
            hit_chance,
            radius: NPC_RADIUS,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soldier => "Soldier",
            Self::CacoDemon => "Caco Demon",
            Self::CyberDemon => "Cyber Demon",
        }
    }
}

/// Per-kind combat and movement numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcTuning {
    /// Attack range in world units; the NPC stops advancing inside it
    pub attack_range: f32,
    /// Starting health
    pub max_health: i32,
    /// Damage per landed attack
    pub damage: i32,
    /// Movement per tick in world units
    pub speed: f32,
    /// Probability an attack roll lands
    pub hit_chance: f32,
    /// Collision radius
    pub radius: f32,
}

/// What a call to [`Npc::take_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// NPC was already dead
    Ignored,
    /// NPC survived the hit
    Hurt,
    /// This hit killed the NPC
    Killed,
}

/// One hostile NPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    id: NpcId,
    kind: NpcKind,
    tuning: NpcTuning,
    position: Vec2,
    health: i32,
    alive: bool,
    hurt_timer: f32,
}

impl Npc {
    /// Creates an NPC of `kind` at a world position with default tuning.
    #[must_use]
    pub fn new(id: NpcId, kind: NpcKind, position: Vec2) -> Self {
        Self::with_tuning(id, kind, position, kind.tuning())
    }

    /// Creates an NPC with explicit tuning.
    #[must_use]
    pub fn with_tuning(id: NpcId, kind: NpcKind, position: Vec2, tuning: NpcTuning) -> Self {
        Self {
            id,
            kind,
            tuning,
            position,
            health: tuning.max_health,
            alive: true,
            hurt_timer: 0.0,
        }
    }

    /// Index in the level's NPC list.
    #[must_use]
    pub fn id(&self) -> NpcId {
        self.id
    }

    /// Archetype.
    #[must_use]
    pub fn kind(&self) -> NpcKind {
        self.kind
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &NpcTuning {
        &self.tuning
    }

    /// Position in world units.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current health, never below zero.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Whether the NPC is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the NPC is showing its hurt reaction.
    #[must_use]
    pub fn is_hurt(&self) -> bool {
        self.alive && self.hurt_timer > 0.0
    }

    /// Distance from the NPC to a point.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Collision circle as seen by other movers.
    #[must_use]
    pub fn as_obstacle(&self) -> Obstacle {
        Obstacle::new(self.position, self.tuning.radius)
    }

    /// Counts down the hurt reaction.
    pub fn tick_hurt(&mut self, dt: f32) {
        self.hurt_timer = (self.hurt_timer - dt).max(0.0);
    }

    /// Steps toward the player unless already within attack range.
    ///
    /// `obstacles` are the other alive NPCs and the player. Returns whether
    /// the NPC moved.
    pub fn pursue<C: CollisionQuery + ?Sized>(
        &mut self,
        world: &C,
        player_pos: Vec2,
        obstacles: &[Obstacle],
    ) -> bool {
        if !self.alive {
            return false;
        }
        let to_player = player_pos - self.position;
        let distance = to_player.length();
        if distance <= 0.0 || distance <= self.tuning.attack_range {
            return false;
        }

        let step = to_player / distance * self.tuning.speed;
        let before = self.position;
        self.position = resolve_move(world, self.position, self.tuning.radius, step, obstacles);
        self.position != before
    }

    /// Rolls an attack on the player.
    ///
    /// Requires line of sight and distance strictly inside attack range.
    /// Then `attack_chance` gates a roll against the hit chance. Returns the
    /// damage to apply to the player if the attack lands.
    pub fn attempt_attack<C: CollisionQuery + ?Sized>(
        &self,
        world: &C,
        player_pos: Vec2,
        attack_chance: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<i32> {
        if !self.alive || !check_visibility(world, player_pos, self.position) {
            return None;
        }
        if self.distance_to(player_pos) >= self.tuning.attack_range {
            return None;
        }
        if rng.f32() >= attack_chance {
            return None;
        }
        if rng.f32() >= self.tuning.hit_chance {
            return None;
        }
        debug!("{} {} lands an attack for {}", self.kind.name(), self.id, self.tuning.damage);
        Some(self.tuning.damage)
    }

    /// Applies damage.
    ///
    /// Ignored when already dead; otherwise the NPC is hurt, and dies when
    /// health reaches zero. Negative amounts count as zero. The outcome
    /// tells the caller whether to fire death side effects.
    pub fn take_damage(&mut self, amount: i32, hurt_flash_secs: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount.max(0)).max(0);
        self.hurt_timer = hurt_flash_secs;
        if self.health <= 0 {
            self.alive = false;
            self.hurt_timer = 0.0;
            debug!("{} {} killed", self.kind.name(), self.id);
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }
}
