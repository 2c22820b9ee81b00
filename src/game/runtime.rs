//! Simulation Runtime
//!
//! Interleaves the two clocks: every rendered frame runs one display tick
//! (input sampling, cosmetic timers) and then however many fixed physics
//! steps the accumulated frame time pays for, capped per frame. Time past
//! the cap is dropped rather than carried, so a long stall costs a hitch
//! instead of a spiral of catch-up frames.

use tracing::{info, warn};

use super::config::LevelConfig;
use super::entity::Entity;
use super::input::InputSnapshot;
use super::world::World;

/// Display rate cap for the demo loop. The physics rate never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayRate {
    Fps30,
    #[default]
    Fps60,
    /// As fast as possible
    Uncapped,
}

impl DisplayRate {
    /// Target frame time in seconds (None = uncapped)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            DisplayRate::Fps30 => Some(1.0 / 30.0),
            DisplayRate::Fps60 => Some(1.0 / 60.0),
            DisplayRate::Uncapped => None,
        }
    }

    /// Cycle to next value
    pub fn next(self) -> Self {
        match self {
            DisplayRate::Fps30 => DisplayRate::Fps60,
            DisplayRate::Fps60 => DisplayRate::Uncapped,
            DisplayRate::Uncapped => DisplayRate::Fps30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayRate::Fps30 => "30",
            DisplayRate::Fps60 => "60",
            DisplayRate::Uncapped => "uncapped",
        }
    }
}

/// What one frame's worth of time buys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub steps: u32,
    /// Seconds discarded because the cap was hit
    pub dropped: f32,
}

/// Fixed-step accumulator.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Seconds per physics step
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add a frame's time and take out as many whole steps as allowed.
    pub fn plan(&mut self, frame_dt: f32) -> StepPlan {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        let mut dropped = 0.0;
        if self.accumulator >= self.step {
            dropped = self.accumulator;
            self.accumulator = 0.0;
        }
        StepPlan { steps, dropped }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl From<&LevelConfig> for FixedTimestep {
    fn from(level: &LevelConfig) -> Self {
        FixedTimestep::new(level.physics_dt(), level.max_steps_per_frame)
    }
}

/// A running level: the world, its player, and the fixed-step clock.
#[derive(Debug)]
pub struct Simulation {
    pub world: World,
    level: LevelConfig,
    clock: FixedTimestep,
    player: Entity,
    /// Paused simulations still clear events but run no ticks
    pub playing: bool,
}

impl Simulation {
    pub fn new(level: LevelConfig) -> Self {
        let mut world = World::new();
        let player = world.spawn_level(&level);
        let clock = FixedTimestep::from(&level);
        Self {
            world,
            level,
            clock,
            player,
            playing: true,
        }
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn clock(&self) -> &FixedTimestep {
        &self.clock
    }

    /// Run one rendered frame. Returns the number of physics steps taken.
    ///
    /// Events from the previous frame are cleared first, so after this
    /// returns `world.events` holds exactly this frame's events.
    pub fn frame(&mut self, dt: f32, input: &InputSnapshot) -> u32 {
        self.world.events.clear_all();
        if !self.playing {
            return 0;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.world.display_tick(dt, self.player, input);

        let plan = self.clock.plan(dt);
        if plan.dropped > 0.0 {
            warn!(
                dropped_ms = plan.dropped * 1000.0,
                max_steps = self.level.max_steps_per_frame,
                "physics step cap hit, dropping time"
            );
        }
        for _ in 0..plan.steps {
            self.world.physics_tick(self.clock.step());
        }
        plan.steps
    }

    /// Single physics step regardless of the clock, for stepping while paused.
    pub fn step_once(&mut self) {
        self.world.events.clear_all();
        self.world.physics_tick(self.clock.step());
    }

    /// Rebuild the world from the level.
    pub fn reset(&mut self) {
        self.world = World::new();
        self.player = self.world.spawn_level(&self.level);
        self.clock.reset();
        info!(player = %self.player, "simulation reset");
    }

    /// Swap in a different level and reset.
    pub fn load(&mut self, level: LevelConfig) {
        self.clock = FixedTimestep::from(&level);
        self.level = level;
        self.reset();
    }
}
