//! Simulation configuration
//!
//! Everything tunable is plain serde data stored as RON, the same format
//! levels are written in. Configuration is fixed once a simulation starts.
//!
//! Values built in code are trusted as-is (negative speeds and the like
//! are a caller bug). Files go through [`LevelConfig::validate`] on load.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::math::Vec2;
use super::collision::{layers, Layer, LayerMask};
use super::jump::JumpTuning;
use super::movement::MovementProfile;
use super::transition::{Easing, TransitionTiming};

/// Validation limits for loaded files
pub mod limits {
    /// Maximum number of static solids in a level
    pub const MAX_SOLIDS: usize = 4096;
    /// Maximum number of moving platforms in a level
    pub const MAX_PLATFORMS: usize = 256;
    /// Maximum absolute coordinate or rate
    pub const MAX_VALUE: f32 = 1_000_000.0;
    /// Physics rate bounds (Hz)
    pub const MIN_PHYSICS_HZ: u32 = 10;
    pub const MAX_PHYSICS_HZ: u32 = 1000;
}

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Tuning for one character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Downward acceleration, units per second squared
    pub gravity: f32,
    pub ground_profile: MovementProfile,
    pub air_profile: MovementProfile,
    pub jump: JumpTuning,
    /// Distance from the body center to its feet; also the ground probe distance
    pub half_height: f32,
    /// Ground probe box. Keep it narrower than `size` so walls never read as ground.
    pub ground_check_box: Vec2,
    /// Layers that count as ground. Must not include the character's own layer.
    pub ground_layers: LayerMask,
    /// Minimum seconds between repeated wall-bump sounds while pushing a wall
    pub wall_bump_repeat_time: f32,
    /// Seconds for the jump sound to fade out after a cut or ceiling bump
    pub jump_fade_time: f32,
    /// Volume the jump channel starts at
    pub jump_volume: f32,
    /// Collider size
    pub size: Vec2,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            gravity: 40.0,
            ground_profile: MovementProfile::new(8.0, 70.0, 90.0),
            air_profile: MovementProfile::new(7.0, 35.0, 12.0),
            jump: JumpTuning::default(),
            half_height: 0.5,
            ground_check_box: Vec2::new(0.55, 0.05),
            ground_layers: LayerMask::default(),
            wall_bump_repeat_time: 0.35,
            jump_fade_time: 0.15,
            jump_volume: 0.8,
            size: Vec2::new(0.6, 1.0),
        }
    }
}

/// A moving platform bouncing between `start` and `start + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub start: Vec2,
    pub offset: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub timing: TransitionTiming,
    #[serde(default)]
    pub easing: Easing,
}

/// Static level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidConfig {
    pub center: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub layer: Layer,
}

impl SolidConfig {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size, layer: layers::WORLD }
    }
}

/// A playable level: tick rates, the player, and the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Fixed physics rate
    pub physics_hz: u32,
    /// Upper bound on physics steps run for one display frame
    pub max_steps_per_frame: u32,
    pub spawn: Vec2,
    pub character: CharacterConfig,
    pub solids: Vec<SolidConfig>,
    pub platforms: Vec<PlatformConfig>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            physics_hz: 50,
            max_steps_per_frame: 8,
            spawn: Vec2::new(0.0, 2.0),
            character: CharacterConfig::default(),
            solids: vec![SolidConfig::new(Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0))],
            platforms: Vec::new(),
        }
    }
}

/// Check if a float is usable (finite and within limits)
fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_VALUE
}

fn check_float(name: &str, f: f32) -> Result<(), ConfigError> {
    if is_valid_float(f) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{} is not a valid number: {}", name, f)))
    }
}

fn check_non_negative(name: &str, f: f32) -> Result<(), ConfigError> {
    check_float(name, f)?;
    if f < 0.0 {
        return Err(ConfigError::Validation(format!("{} must not be negative: {}", name, f)));
    }
    Ok(())
}

fn check_vec(name: &str, v: Vec2) -> Result<(), ConfigError> {
    check_float(name, v.x)?;
    check_float(name, v.y)
}

fn check_size(name: &str, v: Vec2) -> Result<(), ConfigError> {
    check_vec(name, v)?;
    if v.x <= 0.0 || v.y <= 0.0 {
        return Err(ConfigError::Validation(format!("{} must be positive: {:?}", name, v)));
    }
    Ok(())
}

fn check_profile(name: &str, p: &MovementProfile) -> Result<(), ConfigError> {
    check_non_negative(&format!("{}.max_speed", name), p.max_speed)?;
    check_non_negative(&format!("{}.acceleration", name), p.acceleration)?;
    check_non_negative(&format!("{}.deceleration", name), p.deceleration)
}

fn check_timing(name: &str, timing: TransitionTiming) -> Result<(), ConfigError> {
    let (label, value) = match timing {
        TransitionTiming::Duration(s) => ("duration", s),
        TransitionTiming::Rate(r) => ("rate", r),
    };
    check_float(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::Validation(format!("{} {} must be positive: {}", name, label, value)));
    }
    Ok(())
}

impl CharacterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_float("gravity", self.gravity)?;
        check_profile("ground_profile", &self.ground_profile)?;
        check_profile("air_profile", &self.air_profile)?;
        check_float("jump.burst_speed", self.jump.burst_speed)?;
        check_float("jump.cut_speed", self.jump.cut_speed)?;
        check_non_negative("jump.early_press_window", self.jump.early_press_window)?;
        check_non_negative("half_height", self.half_height)?;
        check_size("ground_check_box", self.ground_check_box)?;
        check_non_negative("wall_bump_repeat_time", self.wall_bump_repeat_time)?;
        check_non_negative("jump_fade_time", self.jump_fade_time)?;
        check_non_negative("jump_volume", self.jump_volume)?;
        check_size("size", self.size)?;
        if self.ground_layers.contains(layers::PLAYER) {
            return Err(ConfigError::Validation(
                "ground_layers must not include the player layer".to_string(),
            ));
        }
        Ok(())
    }
}

impl LevelConfig {
    /// Reject files that would make the simulation misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(limits::MIN_PHYSICS_HZ..=limits::MAX_PHYSICS_HZ).contains(&self.physics_hz) {
            return Err(ConfigError::Validation(format!(
                "physics_hz {} outside {}..={}",
                self.physics_hz, limits::MIN_PHYSICS_HZ, limits::MAX_PHYSICS_HZ
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Validation("max_steps_per_frame must be at least 1".to_string()));
        }
        if self.solids.len() > limits::MAX_SOLIDS {
            return Err(ConfigError::Validation(format!("too many solids: {}", self.solids.len())));
        }
        if self.platforms.len() > limits::MAX_PLATFORMS {
            return Err(ConfigError::Validation(format!("too many platforms: {}", self.platforms.len())));
        }

        check_vec("spawn", self.spawn)?;
        self.character.validate()?;

        for (i, solid) in self.solids.iter().enumerate() {
            check_vec(&format!("solids[{}].center", i), solid.center)?;
            check_size(&format!("solids[{}].size", i), solid.size)?;
        }
        for (i, platform) in self.platforms.iter().enumerate() {
            check_vec(&format!("platforms[{}].start", i), platform.start)?;
            check_vec(&format!("platforms[{}].offset", i), platform.offset)?;
            check_size(&format!("platforms[{}].size", i), platform.size)?;
            check_timing(&format!("platforms[{}].timing", i), platform.timing)?;
        }
        Ok(())
    }

    /// Seconds per physics step
    pub fn physics_dt(&self) -> f32 {
        1.0 / self.physics_hz.max(1) as f32
    }
}

/// Load and validate a level from a RON string (embedded levels, tests)
pub fn load_level_from_str(s: &str) -> Result<LevelConfig, ConfigError> {
    let level: LevelConfig = ron::from_str(s)?;
    level.validate()?;
    Ok(level)
}

/// Load and validate a level file
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let level = load_level_from_str(&contents)?;
    info!(
        path = %path.display(),
        solids = level.solids.len(),
        platforms = level.platforms.len(),
        "loaded level"
    );
    Ok(level)
}

/// Serialize a level to pretty RON
pub fn level_to_string(level: &LevelConfig) -> Result<String, ConfigError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(level, config)?)
}

/// Save a level as pretty RON
pub fn save_level<P: AsRef<Path>>(level: &LevelConfig, path: P) -> Result<(), ConfigError> {
    let ron_string = level_to_string(level)?;
    fs::write(path, ron_string)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_valid() {
        assert!(LevelConfig::default().validate().is_ok());
        assert!((LevelConfig::default().physics_dt() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let level = load_level_from_str("(physics_hz: 60, spawn: (x: 1.0, y: 3.0))").unwrap();
        assert_eq!(level.physics_hz, 60);
        assert_eq!(level.spawn, Vec2::new(1.0, 3.0));
        assert_eq!(level.character, CharacterConfig::default());
    }

    #[test]
    fn test_platform_timing_parses() {
        let src = r#"(
            platforms: [
                (
                    start: (x: 0.0, y: 1.0),
                    offset: (x: 4.0, y: 0.0),
                    size: (x: 2.0, y: 0.5),
                    timing: Rate(2.0),
                    easing: SmoothStep,
                ),
            ],
        )"#;
        let level = load_level_from_str(src).unwrap();
        assert_eq!(level.platforms[0].timing, TransitionTiming::Rate(2.0));
        assert_eq!(level.platforms[0].easing, Easing::SmoothStep);
    }

    #[test]
    fn test_negative_profile_rejected() {
        let mut level = LevelConfig::default();
        level.character.air_profile.max_speed = -1.0;
        let err = level.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("air_profile.max_speed")));
    }

    #[test]
    fn test_ground_layers_must_exclude_player() {
        let mut level = LevelConfig::default();
        level.character.ground_layers = LayerMask::ALL;
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_zero_platform_duration_rejected() {
        let mut level = LevelConfig::default();
        level.platforms.push(PlatformConfig {
            start: Vec2::ZERO,
            offset: Vec2::new(1.0, 0.0),
            size: Vec2::ONE,
            timing: TransitionTiming::Duration(0.0),
            easing: Easing::Linear,
        });
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_bad_physics_rate_rejected() {
        let level = LevelConfig { physics_hz: 0, ..LevelConfig::default() };
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = load_level_from_str("(physics_hz: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.ron");

        let mut level = LevelConfig::default();
        level.platforms.push(PlatformConfig {
            start: Vec2::new(2.0, 1.0),
            offset: Vec2::new(0.0, 3.0),
            size: Vec2::new(2.0, 0.4),
            timing: TransitionTiming::Duration(1.5),
            easing: Easing::EaseInOutCubic,
        });
        save_level(&level, &path).unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded, level);
    }

    #[test]
    fn test_demo_level_parses() {
        let level = load_level_from_str(include_str!("../../assets/levels/demo.ron")).unwrap();
        assert_eq!(level.platforms.len(), 2);
        assert_eq!(level.character, CharacterConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_level(dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
