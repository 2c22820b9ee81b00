//! Horizontal movement model
//!
//! Accelerates the horizontal velocity toward the input direction and
//! bleeds it off when there is no input. Ground and air feel come from two
//! independent profiles that are swapped wholesale by grounded state,
//! never blended.

use serde::{Serialize, Deserialize};
use crate::math::ternary_sign;

/// Speed limits and rates for one movement context (ground or air).
///
/// All values are expected to be non-negative. Rates are in units per
/// second per second, `max_speed` in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    pub max_speed: f32,
    /// How fast speed builds while a direction is held
    pub acceleration: f32,
    /// How fast speed returns to zero with no input
    pub deceleration: f32,
}

impl MovementProfile {
    pub const fn new(max_speed: f32, acceleration: f32, deceleration: f32) -> Self {
        Self { max_speed, acceleration, deceleration }
    }

    /// Select the ground or air profile for this tick.
    pub fn select<'a>(grounded: bool, ground: &'a MovementProfile, air: &'a MovementProfile) -> &'a MovementProfile {
        if grounded { ground } else { air }
    }
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::new(8.0, 60.0, 80.0)
    }
}

/// Acceleration to use for this input given the current velocity.
///
/// When moving and the input points the other way, the character skids:
/// the rate is at least the profile's deceleration.
pub fn effective_acceleration(move_input: f32, velocity_x: f32, profile: &MovementProfile) -> f32 {
    if velocity_x != 0.0 && ternary_sign(move_input) != ternary_sign(velocity_x) {
        profile.acceleration.max(profile.deceleration)
    } else {
        profile.acceleration
    }
}

/// New horizontal velocity after one fixed tick of `dt` seconds.
pub fn step_horizontal(move_input: f32, velocity_x: f32, profile: &MovementProfile, dt: f32) -> f32 {
    if move_input == 0.0 {
        // Coasting above max_speed is not clamped, only decelerated.
        // Never overshoot past zero
        let decel = (profile.deceleration * dt).min(velocity_x.abs());
        velocity_x - ternary_sign(velocity_x) * decel
    } else {
        let acceleration = effective_acceleration(move_input, velocity_x, profile);
        let next = velocity_x + move_input * acceleration * dt;
        next.clamp(-profile.max_speed, profile.max_speed)
    }
}
