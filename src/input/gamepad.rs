//! Gamepad support
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: No gamepad, everything reads as released

use macroquad::prelude::Vec2;

// Standard gamepad button indices (Xbox layout, Web Gamepad API order)
pub mod button {
    pub const A: u32 = 0;           // ActionDown / South
    pub const B: u32 = 1;           // ActionRight / East
    pub const Y: u32 = 3;           // ActionUp / North
    pub const SELECT: u32 = 8;      // Back/Select
    pub const START: u32 = 9;       // Start/Options
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

// ============================================================================
// WASM Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    pub struct Gamepad {
        pub deadzone: f32,
    }

    impl Gamepad {
        pub fn new() -> Self {
            Self { deadzone: 0.15 }
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn is_button_down(&self, _button: u32) -> bool {
            false
        }

        pub fn is_button_pressed(&self, _button: u32) -> bool {
            false
        }

        pub fn left_stick(&self) -> Vec2 {
            Vec2::ZERO
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};
    use tracing::{info, warn};

    pub struct Gamepad {
        gilrs: Option<Gilrs>,
        pub deadzone: f32,
        /// Button masks for this frame and the one before, for edges
        buttons: u32,
        last_buttons: u32,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    warn!(error = %e, "gamepad support unavailable");
                    None
                }
            };
            Self {
                gilrs,
                deadzone: 0.15,
                buttons: 0,
                last_buttons: 0,
            }
        }

        /// Drain gilrs events and latch this frame's buttons. Once per frame.
        pub fn poll(&mut self) {
            if let Some(gilrs) = self.gilrs.as_mut() {
                while let Some(event) = gilrs.next_event() {
                    if let gilrs::EventType::Connected = event.event {
                        info!(id = %event.id, "gamepad connected");
                    }
                }
            }
            self.last_buttons = self.buttons;
            self.buttons = self.button_mask();
        }

        pub fn has_gamepad(&self) -> bool {
            self.active_gamepad().is_some()
        }

        fn active_gamepad(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        fn button_mask(&self) -> u32 {
            let Some(gp) = self.active_gamepad() else { return 0 };
            let mut mask = 0u32;

            if gp.is_pressed(GilrsButton::South) { mask |= 1 << super::button::A; }
            if gp.is_pressed(GilrsButton::East) { mask |= 1 << super::button::B; }
            if gp.is_pressed(GilrsButton::North) { mask |= 1 << super::button::Y; }
            if gp.is_pressed(GilrsButton::Select) { mask |= 1 << super::button::SELECT; }
            if gp.is_pressed(GilrsButton::Start) { mask |= 1 << super::button::START; }
            if gp.is_pressed(GilrsButton::DPadLeft) { mask |= 1 << super::button::DPAD_LEFT; }
            if gp.is_pressed(GilrsButton::DPadRight) { mask |= 1 << super::button::DPAD_RIGHT; }

            mask
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            (self.buttons & (1 << button)) != 0
        }

        pub fn is_button_pressed(&self, button: u32) -> bool {
            let bit = 1 << button;
            (self.buttons & bit) != 0 && (self.last_buttons & bit) == 0
        }

        pub fn left_stick(&self) -> Vec2 {
            let Some(gp) = self.active_gamepad() else { return Vec2::ZERO };
            let x = gp.value(Axis::LeftStickX);
            let y = gp.value(Axis::LeftStickY);
            apply_deadzone(x, y, self.deadzone)
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Apply radial deadzone with linear rescaling
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    // Rescale from deadzone..1.0 to 0.0..1.0
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

// Re-export the platform-specific implementation
pub use platform::Gamepad;
