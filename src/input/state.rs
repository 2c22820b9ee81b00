//! Input state management
//!
//! Polls both keyboard (macroquad) and gamepad (gilrs) input, combining
//! them into a unified action-based API and a per-frame
//! [`InputSnapshot`] for the simulation.

use macroquad::prelude::*;
use platformer2d::game::input::{clamp_axis, ButtonEdges, InputSnapshot};

use super::gamepad::{button, Gamepad};
use super::Action;

/// Unified input state that handles both keyboard and gamepad
pub struct InputState {
    gamepad: Gamepad,
    jump: ButtonEdges,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            jump: ButtonEdges::default(),
        }
    }

    /// Call once per frame before checking actions
    pub fn poll(&mut self) {
        self.gamepad.poll();
    }

    /// Horizontal move axis from keys, d-pad, or left stick.
    /// Keys are digital; the stick wins when it is pushed further.
    pub fn move_axis(&self) -> f32 {
        let mut axis: f32 = 0.0;
        if self.action_down(Action::MoveLeft) { axis -= 1.0; }
        if self.action_down(Action::MoveRight) { axis += 1.0; }

        let stick = self.gamepad.left_stick().x;
        if stick.abs() > axis.abs() {
            axis = stick;
        }
        clamp_axis(axis)
    }

    /// Capture this frame for the simulation's display tick.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let (pressed, held, released) = self.jump.update(self.action_down(Action::Jump));
        InputSnapshot::new(self.move_axis(), pressed, held, released)
    }

    /// Check if action is currently held down
    pub fn action_down(&self, action: Action) -> bool {
        self.keyboard_down(action) || self.gamepad_down(action)
    }

    /// Check if action was just pressed this frame
    pub fn action_pressed(&self, action: Action) -> bool {
        self.keyboard_pressed(action) || self.gamepad_pressed(action)
    }

    fn keyboard_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            Action::MoveRight => is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            Action::Jump => {
                is_key_down(KeyCode::Space) || is_key_down(KeyCode::W) || is_key_down(KeyCode::Up)
            }
            _ => false,
        }
    }

    fn gamepad_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.gamepad.is_button_down(button::DPAD_LEFT),
            Action::MoveRight => self.gamepad.is_button_down(button::DPAD_RIGHT),
            Action::Jump => self.gamepad.is_button_down(button::A),
            _ => false,
        }
    }

    fn keyboard_pressed(&self, action: Action) -> bool {
        match action {
            Action::Pause => is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Escape),
            Action::Reset => is_key_pressed(KeyCode::R),
            Action::CycleDisplayRate => is_key_pressed(KeyCode::F),
            Action::StepPhysics => is_key_pressed(KeyCode::N),
            Action::ToggleHud => is_key_pressed(KeyCode::H),
            _ => false,
        }
    }

    fn gamepad_pressed(&self, action: Action) -> bool {
        match action {
            Action::Pause => self.gamepad.is_button_pressed(button::START),
            Action::Reset => self.gamepad.is_button_pressed(button::SELECT),
            Action::CycleDisplayRate => self.gamepad.is_button_pressed(button::Y),
            Action::StepPhysics => self.gamepad.is_button_pressed(button::B),
            _ => false,
        }
    }

    /// Check if any gamepad is connected
    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
