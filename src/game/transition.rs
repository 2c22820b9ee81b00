//! Value transitions
//!
//! Time-based interpolation used for moving-platform travel and the jump
//! volume fade. The controllers only talk to the [`TransitionProvider`]
//! capability; [`Transition`] is the stock timer + lerp implementation.
//!
//! A transition does not attach itself to any clock. Whoever owns it calls
//! `advance(dt)` from the tick that should drive it (physics tick for
//! platforms, display tick for audio fades).

use serde::{Serialize, Deserialize};
use crate::math::Vec2;

/// Values that can be interpolated by a transition.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
    /// Distance used to derive a duration from a travel rate.
    fn distance(self, to: Self) -> f32;
}

impl Lerp for f32 {
    fn lerp(self, to: f32, t: f32) -> f32 {
        self + (to - self) * t
    }

    fn distance(self, to: f32) -> f32 {
        (to - self).abs()
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::lerp(self, to, t)
    }

    fn distance(self, to: Vec2) -> f32 {
        (to - self).len()
    }
}

/// Shape of the interpolation curve. `t` is clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    /// Hermite smoothstep, gentle start and stop
    SmoothStep,
    /// Slow start, fast middle, slow finish
    EaseInOutCubic,
    /// Fast start, slow finish
    EaseOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// How long a transition takes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransitionTiming {
    /// Fixed duration in seconds regardless of distance
    Duration(f32),
    /// Implicit duration: distance divided by units per second
    Rate(f32),
}

impl TransitionTiming {
    pub fn duration_for(self, distance: f32) -> f32 {
        match self {
            TransitionTiming::Duration(seconds) => seconds.max(0.0),
            TransitionTiming::Rate(rate) if rate > 0.0 => distance / rate,
            TransitionTiming::Rate(_) => 0.0,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        TransitionTiming::Duration(1.0)
    }
}

/// The transition capability consumed by the controllers.
pub trait TransitionProvider<T> {
    /// Abandon any transition in progress and start a new one from `from`.
    fn flash_from_to(&mut self, from: T, to: T);
    /// Start a transition from the current value.
    fn start_transition_to(&mut self, target: T);
    /// Snap to a value, cancelling any transition.
    fn set_value(&mut self, value: T);
    fn value(&self) -> T;
    fn is_transitioning(&self) -> bool;
    /// Move the transition forward by `dt` seconds of its driving clock.
    fn advance(&mut self, dt: f32);
}

/// Elapsed-time lerp between two values.
#[derive(Debug, Clone)]
pub struct Transition<T> {
    from: T,
    to: T,
    current: T,
    elapsed: f32,
    duration: f32,
    active: bool,
    pub timing: TransitionTiming,
    pub easing: Easing,
}

impl<T: Lerp> Transition<T> {
    /// Idle transition resting at `value`.
    pub fn new(value: T, timing: TransitionTiming, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            current: value,
            elapsed: 0.0,
            duration: 0.0,
            active: false,
            timing,
            easing,
        }
    }

    /// Destination of the current (or last) transition
    pub fn target(&self) -> T {
        self.to
    }
}

impl<T: Lerp> TransitionProvider<T> for Transition<T> {
    fn flash_from_to(&mut self, from: T, to: T) {
        self.from = from;
        self.to = to;
        self.current = from;
        self.elapsed = 0.0;
        self.duration = self.timing.duration_for(from.distance(to));
        self.active = self.duration > 0.0;
        if !self.active {
            self.current = to;
        }
    }

    fn start_transition_to(&mut self, target: T) {
        self.flash_from_to(self.current, target);
    }

    fn set_value(&mut self, value: T) {
        self.from = value;
        self.to = value;
        self.current = value;
        self.elapsed = 0.0;
        self.active = false;
    }

    fn value(&self) -> T {
        self.current
    }

    fn is_transitioning(&self) -> bool {
        self.active
    }

    fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.current = self.to;
            self.active = false;
        } else {
            let t = self.easing.apply(self.elapsed / self.duration);
            self.current = self.from.lerp(self.to, t);
        }
    }
}
