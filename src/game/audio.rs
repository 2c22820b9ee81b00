//! Audio triggers
//!
//! Controllers never touch an audio device. They emit [`Cue`]s into a
//! [`CueSink`]; a [`SoundBank`] maps each cue onto its own channel, one
//! per event type, through the [`AudioTrigger`] capability.

use serde::{Serialize, Deserialize};
use super::entity::Entity;

/// One playable channel.
pub trait AudioTrigger {
    fn play(&mut self);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// Channel selector, one per event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Jump,
    Land,
    WallBump,
    CeilingBump,
}

/// A sound request raised by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    /// Jump start; the jump channel restarts at this volume
    Jump { volume: f32 },
    Land,
    WallBump,
    CeilingBump,
}

impl Cue {
    pub fn channel(&self) -> Channel {
        match self {
            Cue::Jump { .. } => Channel::Jump,
            Cue::Land => Channel::Land,
            Cue::WallBump => Channel::WallBump,
            Cue::CeilingBump => Channel::CeilingBump,
        }
    }
}

/// A cue tagged with the body that raised it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub source: Entity,
    pub cue: Cue,
}

/// Anything that accepts cues: a bank for immediate playback, a Vec to defer.
pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

impl CueSink for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// The four channels of a character.
#[derive(Debug, Default)]
pub struct SoundBank<A> {
    pub jump: A,
    pub land: A,
    pub wall_bump: A,
    pub ceiling_bump: A,
}

impl<A: AudioTrigger> SoundBank<A> {
    pub fn new(jump: A, land: A, wall_bump: A, ceiling_bump: A) -> Self {
        Self { jump, land, wall_bump, ceiling_bump }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut A {
        match channel {
            Channel::Jump => &mut self.jump,
            Channel::Land => &mut self.land,
            Channel::WallBump => &mut self.wall_bump,
            Channel::CeilingBump => &mut self.ceiling_bump,
        }
    }

    /// Follow the jump fader. Call every display tick.
    pub fn set_jump_volume(&mut self, volume: f32) {
        self.jump.set_volume(volume);
    }
}

impl<A: AudioTrigger> CueSink for SoundBank<A> {
    fn cue(&mut self, cue: Cue) {
        let channel = self.channel_mut(cue.channel());
        if let Cue::Jump { volume } = cue {
            channel.set_volume(volume);
        }
        channel.play();
    }
}

/// Headless channel that only counts plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountingChannel {
    pub plays: u32,
    pub volume: f32,
}

impl Default for CountingChannel {
    fn default() -> Self {
        Self { plays: 0, volume: 1.0 }
    }
}

impl AudioTrigger for CountingChannel {
    fn play(&mut self) {
        self.plays += 1;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}
