//! Input handling with gamepad support
//!
//! Polls keyboard and gamepad once per rendered frame and folds both into
//! an [`InputSnapshot`](platformer2d::game::InputSnapshot) for the
//! simulation's display tick.
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: Keyboard only

mod actions;
mod gamepad;
mod state;

pub use actions::*;
pub use state::*;
