//! Simulation tunables.
//!
//! Every number the simulation uses that is not part of a map or the NPC
//! kind table lives here. The engine embeds this as the `[sim]` table of its
//! TOML file; missing keys take the defaults below.

use gridshot_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::pathfinding::BoundsPolicy;

/// Tick rate the default per-tick attack chance was tuned for.
pub const ASSUMED_TICK_RATE: f32 = 60.0;

/// Gameplay configuration for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Player ===
    /// Player movement per tick in world units
    pub player_speed: f32,
    /// Player collision radius in world units
    pub player_radius: f32,
    /// Player starting and maximum health
    pub player_max_health: i32,
    /// Milliseconds of accumulated time per regenerated health point
    pub regen_interval_ms: f32,

    // === Weapon ===
    /// Damage dealt to every visible NPC per shot
    pub weapon_damage: i32,

    // === NPC ===
    /// Chance per tick that an NPC in range rolls an attack
    pub attack_chance_per_tick: f32,
    /// Tick rate the per-tick attack chance was tuned for
    pub assumed_tick_rate: f32,
    /// Seconds an NPC shows as hurt after taking damage
    pub hurt_flash_secs: f32,

    // === Effects ===
    /// Muzzle flash lifetime in seconds
    pub effect_lifetime: f32,
    /// Muzzle flash starting radius
    pub effect_start_radius: f32,
    /// Muzzle flash radius growth per second
    pub effect_growth: f32,

    // === Presentation contract ===
    /// Viewport size in pixels; aim angles are measured from its centre
    pub viewport: Vec2,

    // === Determinism ===
    /// Seed for the level's random number generator
    pub seed: u64,
    /// Pathfinder treatment of cells outside the layout
    pub bounds_policy: BoundsPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_speed: 3.0,
            player_radius: 15.0,
            player_max_health: 100,
            regen_interval_ms: 700.0,

            weapon_damage: 50,

            attack_chance_per_tick: 0.01,
            assumed_tick_rate: ASSUMED_TICK_RATE,
            hurt_flash_secs: 0.2,

            effect_lifetime: 0.3,
            effect_start_radius: 20.0,
            effect_growth: 100.0,

            viewport: Vec2::new(1280.0, 720.0),

            seed: 0x5EED_0001,
            bounds_policy: BoundsPolicy::Unchecked,
        }
    }
}

impl SimConfig {
    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.player_speed = self.player_speed.clamp(0.0, 32.0);
        self.player_radius = self.player_radius.clamp(1.0, 31.0);
        self.player_max_health = self.player_max_health.clamp(1, 10_000);
        self.regen_interval_ms = self.regen_interval_ms.clamp(1.0, 600_000.0);

        self.weapon_damage = self.weapon_damage.clamp(0, 10_000);

        self.attack_chance_per_tick = self.attack_chance_per_tick.clamp(0.0, 1.0);
        self.assumed_tick_rate = self.assumed_tick_rate.clamp(1.0, 1000.0);
        self.hurt_flash_secs = self.hurt_flash_secs.clamp(0.0, 10.0);

        self.effect_lifetime = self.effect_lifetime.clamp(0.01, 10.0);
        self.effect_start_radius = self.effect_start_radius.clamp(0.0, 1000.0);
        self.effect_growth = self.effect_growth.clamp(0.0, 10_000.0);

        self.viewport = self.viewport.clamp(Vec2::splat(1.0), Vec2::splat(16_384.0));
    }

    /// Centre of the viewport, the reference point for aiming.
    #[must_use]
    pub fn screen_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Per-tick attack chance rescaled for a different tick rate so that the
    /// chance of at least one roll per second stays the same.
    #[must_use]
    pub fn attack_chance_at(&self, tick_rate: f32) -> f32 {
        rescale_per_tick_chance(self.attack_chance_per_tick, self.assumed_tick_rate, tick_rate)
    }
}

/// Converts a per-tick probability tuned at `from_rate` Hz into the
/// probability with the same per-second outcome at `to_rate` Hz.
#[must_use]
pub fn rescale_per_tick_chance(chance: f32, from_rate: f32, to_rate: f32) -> f32 {
    if !(to_rate > 0.0 && from_rate > 0.0) {
        return chance;
    }
    let chance = chance.clamp(0.0, 1.0);
    1.0 - (1.0 - chance).powf(from_rate / to_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert!((config.player_speed - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.player_max_health, 100);
        assert_eq!(config.weapon_damage, 50);
        assert_eq!(config.screen_center(), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig {
            attack_chance_per_tick: 3.0,
            player_max_health: 0,
            effect_lifetime: -1.0,
            ..SimConfig::default()
        };
        config.validate();
        assert!((config.attack_chance_per_tick - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.player_max_health, 1);
        assert!((config.effect_lifetime - 0.01).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rescale_identity_at_assumed_rate() {
        let config = SimConfig::default();
        assert!((config.attack_chance_at(60.0) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_rescale_halves_rate_roughly_doubles_chance() {
        let at_30 = rescale_per_tick_chance(0.01, 60.0, 30.0);
        assert!((at_30 - 0.0199).abs() < 1e-4);
        assert!((rescale_per_tick_chance(0.01, 60.0, 0.0) - 0.01).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "weapon_damage": 75 }"#).expect("valid json");
        assert_eq!(config.weapon_damage, 75);
        assert_eq!(config.player_max_health, 100);
        assert_eq!(config.bounds_policy, BoundsPolicy::Unchecked);
    }
}
