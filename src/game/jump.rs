//! Jump state machine
//!
//! Rules are evaluated once per fixed tick after gravity, first match wins:
//!
//! 1. grounded, not jumping, buffered press pending -> start jump
//! 2. grounded, jumping, not moving up              -> land
//! 3. jumping, button released, rising faster than the cut speed -> cut
//!
//! Landing is checked before a new jump can fire from the same state, so the
//! press buffer cannot relaunch the character on the tick it touches down.
//! Rules 2 and 3 look at the vertical velocity the body had when the tick
//! began, before this tick's gravity.

use serde::{Serialize, Deserialize};

/// Jump tuning, immutable for the life of a character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpTuning {
    /// Vertical speed set instantly when a jump starts
    pub burst_speed: f32,
    /// Vertical speed clamped to when the button is released early
    pub cut_speed: f32,
    /// Seconds before landing that a press still counts
    pub early_press_window: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            burst_speed: 14.0,
            cut_speed: 5.0,
            early_press_window: 0.12,
        }
    }
}

/// Observable jump state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    /// On the ground and not in a jump
    #[default]
    GroundedIdle,
    /// Left the ground through a jump, button still held
    Rising,
    /// Jump released early, velocity was cut
    Cut,
    /// In the air without having jumped (walked off a ledge)
    AirborneUnjumped,
}

impl JumpPhase {
    pub fn label(&self) -> &'static str {
        match self {
            JumpPhase::GroundedIdle => "grounded",
            JumpPhase::Rising => "rising",
            JumpPhase::Cut => "cut",
            JumpPhase::AirborneUnjumped => "falling",
        }
    }
}

/// Which rule fired this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTransition {
    Start,
    Land,
    Cut,
    /// No rule matched
    Hold,
}

/// Inputs the jump rules read each tick.
#[derive(Debug, Clone, Copy)]
pub struct JumpContext {
    pub grounded: bool,
    pub jumping: bool,
    pub jump_held: bool,
    pub early_jump_timer: f32,
    /// Vertical velocity at the start of the tick
    pub vertical_velocity: f32,
}

/// Pick the rule that applies, in priority order.
pub fn evaluate(ctx: &JumpContext, tuning: &JumpTuning) -> JumpTransition {
    if ctx.grounded && !ctx.jumping && ctx.early_jump_timer > 0.0 {
        JumpTransition::Start
    } else if ctx.grounded && ctx.jumping && ctx.vertical_velocity <= 0.0 {
        JumpTransition::Land
    } else if ctx.jumping && !ctx.jump_held && ctx.vertical_velocity > tuning.cut_speed {
        JumpTransition::Cut
    } else {
        JumpTransition::Hold
    }
}

/// Phase after a transition.
pub fn next_phase(previous: JumpPhase, transition: JumpTransition, grounded: bool, jumping: bool) -> JumpPhase {
    match transition {
        JumpTransition::Start => JumpPhase::Rising,
        JumpTransition::Land => JumpPhase::GroundedIdle,
        JumpTransition::Cut => JumpPhase::Cut,
        JumpTransition::Hold if jumping => match previous {
            JumpPhase::Cut => JumpPhase::Cut,
            _ => JumpPhase::Rising,
        },
        JumpTransition::Hold if grounded => JumpPhase::GroundedIdle,
        JumpTransition::Hold => JumpPhase::AirborneUnjumped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(grounded: bool, jumping: bool, jump_held: bool, timer: f32, vy: f32) -> JumpContext {
        JumpContext {
            grounded,
            jumping,
            jump_held,
            early_jump_timer: timer,
            vertical_velocity: vy,
        }
    }

    #[test]
    fn test_buffered_press_starts_jump_when_grounded() {
        let tuning = JumpTuning::default();
        assert_eq!(evaluate(&ctx(true, false, true, 0.05, 0.0), &tuning), JumpTransition::Start);
        assert_eq!(evaluate(&ctx(true, false, true, 0.0, 0.0), &tuning), JumpTransition::Hold);
        assert_eq!(evaluate(&ctx(true, false, true, -0.3, 0.0), &tuning), JumpTransition::Hold);
        assert_eq!(evaluate(&ctx(false, false, true, 0.05, -2.0), &tuning), JumpTransition::Hold);
    }

    #[test]
    fn test_landing_beats_buffered_press() {
        let tuning = JumpTuning::default();
        // Jumping and grounded with a pending buffer: landing wins
        assert_eq!(evaluate(&ctx(true, true, true, 0.1, -1.0), &tuning), JumpTransition::Land);
        assert_eq!(evaluate(&ctx(true, true, true, 0.1, 0.0), &tuning), JumpTransition::Land);
    }

    #[test]
    fn test_still_rising_is_not_landing() {
        let tuning = JumpTuning::default();
        assert_eq!(evaluate(&ctx(true, true, true, 0.1, 3.0), &tuning), JumpTransition::Hold);
    }

    #[test]
    fn test_cut_only_above_cut_speed() {
        let tuning = JumpTuning { burst_speed: 14.0, cut_speed: 5.0, early_press_window: 0.1 };
        assert_eq!(evaluate(&ctx(false, true, false, 0.0, 9.0), &tuning), JumpTransition::Cut);
        assert_eq!(evaluate(&ctx(false, true, false, 0.0, 5.0), &tuning), JumpTransition::Hold);
        assert_eq!(evaluate(&ctx(false, true, true, 0.0, 9.0), &tuning), JumpTransition::Hold);
        assert_eq!(evaluate(&ctx(false, false, false, 0.0, 9.0), &tuning), JumpTransition::Hold);
    }

    #[test]
    fn test_phase_follows_transitions() {
        use JumpPhase::*;
        assert_eq!(next_phase(GroundedIdle, JumpTransition::Start, true, true), Rising);
        assert_eq!(next_phase(Rising, JumpTransition::Cut, false, true), Cut);
        assert_eq!(next_phase(Cut, JumpTransition::Hold, false, true), Cut);
        assert_eq!(next_phase(Cut, JumpTransition::Land, true, false), GroundedIdle);
        assert_eq!(next_phase(GroundedIdle, JumpTransition::Hold, false, false), AirborneUnjumped);
        assert_eq!(next_phase(AirborneUnjumped, JumpTransition::Hold, true, false), GroundedIdle);
    }
}
