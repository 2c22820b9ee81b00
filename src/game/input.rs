//! Per-display-frame input capture
//!
//! The device layer (keyboard, gamepad) lives outside the core. It hands
//! the controller one `InputSnapshot` per display tick. Sampling at display
//! rate rather than physics rate is what keeps short taps from being lost
//! between two fixed steps.

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Horizontal move axis, -1 (left) to 1 (right)
    pub move_axis: f32,
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Jump is currently held
    pub jump_held: bool,
    /// Jump went up this frame
    pub jump_released: bool,
}

impl InputSnapshot {
    pub fn new(move_axis: f32, jump_pressed: bool, jump_held: bool, jump_released: bool) -> Self {
        Self {
            move_axis: clamp_axis(move_axis),
            jump_pressed,
            jump_held,
            jump_released,
        }
    }

    /// Snapshot with only a move axis and no jump activity
    pub fn moving(move_axis: f32) -> Self {
        Self::new(move_axis, false, false, false)
    }
}

#[cfg(test)]
impl InputSnapshot {
    /// Jump pressed this frame (and therefore held)
    pub fn jump_press(move_axis: f32) -> Self {
        Self::new(move_axis, true, true, false)
    }

    /// Jump held from an earlier frame
    pub fn jump_hold(move_axis: f32) -> Self {
        Self::new(move_axis, false, true, false)
    }

    /// Jump let go this frame
    pub fn jump_release(move_axis: f32) -> Self {
        Self::new(move_axis, false, false, true)
    }
}

/// Clamp an axis into [-1, 1]; NaN reads as no input.
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Derives press/release edges from a raw held signal sampled each frame.
///
/// Useful for device layers that only report "is down".
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdges {
    was_down: bool,
}

impl ButtonEdges {
    /// Returns (pressed, held, released) for this frame.
    pub fn update(&mut self, down: bool) -> (bool, bool, bool) {
        let pressed = down && !self.was_down;
        let released = !down && self.was_down;
        self.was_down = down;
        (pressed, down, released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_is_clamped() {
        assert_eq!(InputSnapshot::moving(3.0).move_axis, 1.0);
        assert_eq!(InputSnapshot::moving(-1.5).move_axis, -1.0);
        assert_eq!(InputSnapshot::moving(f32::NAN).move_axis, 0.0);
        assert_eq!(InputSnapshot::moving(0.3).move_axis, 0.3);
    }

    #[test]
    fn test_button_edges() {
        let mut edges = ButtonEdges::default();
        assert_eq!(edges.update(false), (false, false, false));
        assert_eq!(edges.update(true), (true, true, false));
        assert_eq!(edges.update(true), (false, true, false));
        assert_eq!(edges.update(false), (false, false, true));
        assert_eq!(edges.update(false), (false, false, false));
    }

    #[test]
    fn test_constructors_set_held_state() {
        assert!(InputSnapshot::jump_press(0.0).jump_held);
        assert!(InputSnapshot::jump_hold(0.0).jump_held);
        assert!(!InputSnapshot::jump_release(0.0).jump_held);
        assert!(InputSnapshot::jump_release(0.0).jump_released);
    }
}
