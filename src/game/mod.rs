//! Platformer Simulation
//!
//! Engine-independent 2D platformer movement: a character controller with
//! buffered, variable-height jumps and a moving platform that carries
//! riders, plus the small ECS-style world that drives them.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data stored per entity in typed storages
//! - World: Container for all entities, runs the fixed physics tick
//! - Event: Cues and contact changes published for the driver
//! - Simulation: Interleaves display ticks with fixed physics steps
//!
//! Everything outside the core (collision backend, audio device, input
//! device, value transitions) is reached through a small capability trait
//! with a reference implementation alongside.

pub mod entity;
pub mod component;
pub mod event;
pub mod config;
pub mod transition;
pub mod input;
pub mod movement;
pub mod jump;
pub mod audio;
pub mod collision;
pub mod character;
pub mod platform;
pub mod physics;
pub mod world;
pub mod runtime;

// Re-export main types
pub use entity::Entity;
pub use world::World;
pub use event::Events;
pub use config::{load_level, load_level_from_str, save_level, ConfigError, LevelConfig};
pub use input::InputSnapshot;
pub use jump::JumpPhase;
pub use character::CharacterController;
pub use platform::MovingPlatform;
pub use runtime::{DisplayRate, Simulation};
