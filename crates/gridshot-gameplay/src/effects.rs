//! Short-lived visual effects owned by the level.

use gridshot_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Fully opaque.
pub const MAX_OPACITY: u8 = 255;

/// A muzzle flash that grows and fades out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotEffect {
    /// World position
    pub position: Vec2,
    /// Seconds left before removal
    pub life: f32,
    /// Current radius in world units
    pub radius: f32,
    /// Opacity, 0 (invisible) to 255 (opaque)
    pub opacity: u8,
    lifetime: f32,
    growth: f32,
}

impl ShotEffect {
    /// Creates a flash at `position` with the configured size and lifetime.
    #[must_use]
    pub fn muzzle_flash(position: Vec2, config: &SimConfig) -> Self {
        Self {
            position,
            life: config.effect_lifetime,
            radius: config.effect_start_radius,
            opacity: MAX_OPACITY,
            lifetime: config.effect_lifetime,
            growth: config.effect_growth,
        }
    }

    /// Advances the effect by `dt` seconds.
    ///
    /// Returns `false` once the effect has expired and should be removed.
    pub fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.radius += self.growth * dt;
        let fraction = (self.life / self.lifetime).clamp(0.0, 1.0);
        self.opacity = (f32::from(MAX_OPACITY) * fraction) as u8;
        self.life > 0.0
    }

    /// Whether the effect has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Decays every effect and drops the expired ones, preserving order.
pub fn update_effects(effects: &mut Vec<ShotEffect>, dt: f32) {
    effects.retain_mut(|effect| effect.update(dt));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_starts_full() {
        let flash = ShotEffect::muzzle_flash(Vec2::new(10.0, 20.0), &SimConfig::default());
        assert!((flash.radius - 20.0).abs() < f32::EPSILON);
        assert_eq!(flash.opacity, 255);
        assert!((flash.life - 0.3).abs() < f32::EPSILON);
        assert!(!flash.is_expired());
    }

    #[test]
    fn test_flash_grows_and_fades() {
        let mut flash = ShotEffect::muzzle_flash(Vec2::ZERO, &SimConfig::default());
        assert!(flash.update(0.1));
        assert!((flash.radius - 30.0).abs() < 1e-4);
        assert!((flash.life - 0.2).abs() < 1e-6);
        assert!((169..=170).contains(&flash.opacity));
    }

    #[test]
    fn test_flash_removed_after_lifetime() {
        let mut effects = vec![ShotEffect::muzzle_flash(Vec2::ZERO, &SimConfig::default())];
        update_effects(&mut effects, 0.2);
        assert_eq!(effects.len(), 1);
        update_effects(&mut effects, 0.15);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_zero_dt_keeps_effect() {
        let mut effects = vec![ShotEffect::muzzle_flash(Vec2::ZERO, &SimConfig::default())];
        update_effects(&mut effects, 0.0);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].opacity, 255);
    }
}
