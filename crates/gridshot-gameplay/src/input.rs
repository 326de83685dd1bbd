//! Per-tick player input.
//!
//! The core never reads devices. A presentation layer (or the headless
//! autopilot) fills a [`TickInput`] each frame and passes it to
//! [`crate::Level::simulate_tick`].
//!
//! World axes follow the layout text: +x is to the right along a row and +y
//! is down to the next row. "Up" therefore moves toward row 0.

use gridshot_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::DIAGONAL_SCALE;

/// Directional movement keys held during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// Toward row 0
    pub up: bool,
    /// Toward the last row
    pub down: bool,
    /// Toward column 0
    pub left: bool,
    /// Toward the last column
    pub right: bool,
}

impl MoveIntent {
    /// No movement.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Builds an intent that best approximates a direction vector.
    ///
    /// Each axis is pressed when its component exceeds `dead_zone` in
    /// magnitude.
    #[must_use]
    pub fn toward(direction: Vec2, dead_zone: f32) -> Self {
        Self {
            up: direction.y < -dead_zone,
            down: direction.y > dead_zone,
            left: direction.x < -dead_zone,
            right: direction.x > dead_zone,
        }
    }

    /// Whether any direction is held.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Displacement for one tick at `speed` world units.
    ///
    /// Opposite keys cancel. When both axes are active each component is
    /// scaled by 1/sqrt(2) so diagonal movement is no faster than axial.
    #[must_use]
    pub fn displacement(&self, speed: f32) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= speed;
        }
        if self.down {
            d.y += speed;
        }
        if self.left {
            d.x -= speed;
        }
        if self.right {
            d.x += speed;
        }
        if d.x != 0.0 && d.y != 0.0 {
            d *= DIAGONAL_SCALE;
        }
        d
    }
}

/// Everything the player controls in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement keys
    pub movement: MoveIntent,
    /// Pointer position in screen space, if known this tick
    pub aim: Option<Vec2>,
}

impl TickInput {
    /// No movement and no aim update.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            movement: MoveIntent::NONE,
            aim: None,
        }
    }

    /// Input with movement only.
    #[must_use]
    pub const fn moving(movement: MoveIntent) -> Self {
        Self {
            movement,
            aim: None,
        }
    }

    /// Sets the pointer position.
    #[must_use]
    pub fn with_aim(mut self, screen_point: Vec2) -> Self {
        self.aim = Some(screen_point);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_axial_displacement() {
        let up = MoveIntent {
            up: true,
            ..MoveIntent::NONE
        };
        assert_eq!(up.displacement(3.0), Vec2::new(0.0, -3.0));
        let right = MoveIntent {
            right: true,
            ..MoveIntent::NONE
        };
        assert_eq!(right.displacement(3.0), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let both = MoveIntent {
            left: true,
            right: true,
            ..MoveIntent::NONE
        };
        assert_eq!(both.displacement(3.0), Vec2::ZERO);
        assert!(both.is_moving());
    }

    #[test]
    fn test_toward_dead_zone() {
        let intent = MoveIntent::toward(Vec2::new(0.9, -0.1), 0.3);
        assert!(intent.right);
        assert!(!intent.up && !intent.down && !intent.left);
    }

    #[test]
    fn test_idle_input() {
        let input = TickInput::idle();
        assert!(!input.movement.is_moving());
        assert!(input.aim.is_none());
        let aimed = input.with_aim(Vec2::new(1.0, 2.0));
        assert_eq!(aimed.aim, Some(Vec2::new(1.0, 2.0)));
    }

    proptest! {
        #[test]
        fn prop_diagonal_speed_matches_axial(
            speed in 0.1f32..50.0,
            up in any::<bool>(),
            left in any::<bool>(),
        ) {
            let intent = MoveIntent { up, down: !up, left, right: !left };
            let d = intent.displacement(speed);
            prop_assert!((d.length() - speed).abs() < 1e-3 * speed);
        }
    }
}
