//! Platformer2D: deterministic 2D platformer movement
//!
//! Character and moving-platform controllers driven by two clocks: a
//! variable display tick for input and a fixed physics tick for motion.
//! The library has no windowing or audio dependency; the `platformer2d`
//! binary wraps it in a macroquad demo.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod math;
pub mod game;
