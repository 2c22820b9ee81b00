//! Demo action definitions
//!
//! Button mappings (Xbox/PlayStation):
//! - A/X = Jump
//! - D-pad or left stick = Move
//! - Start = Pause
//! - Select = Reset
//! - Y/Triangle = Cycle display rate
//! - B/O = Single physics step (paused)

/// Everything the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (analog - left stick / arrows / A-D)
    MoveLeft,
    MoveRight,

    Jump,

    // System
    Pause,
    Reset,
    CycleDisplayRate,
    StepPhysics,
    ToggleHud,
}
