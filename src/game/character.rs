//! Character controller
//!
//! Owns one character's movement state and exposes the tick surface a
//! driver loop calls:
//!
//! - `on_display_tick` every rendered frame: input sampling and cosmetic
//!   timers (press buffer, wall-bump cooldown, jump volume fade)
//! - `on_physics_tick` every fixed step: gravity, jump rules, horizontal
//!   model; returns the velocity for the body integrator
//! - `on_collision_begin` / `_stay` / `_end` for contacts reported by the
//!   collision backend after integration
//!
//! The controller assumes its body has a collider; the world only attaches
//! one to entities that do.

use tracing::{debug, trace};

use crate::math::Vec2;
use super::audio::{Cue, CueSink};
use super::collision::{opposes_move, Contact, ContactKind, GroundProbe, GroundQuery};
use super::config::CharacterConfig;
use super::input::InputSnapshot;
use super::jump::{self, JumpContext, JumpPhase, JumpTransition};
use super::movement::{step_horizontal, MovementProfile};
use super::transition::{Easing, Transition, TransitionProvider, TransitionTiming};

/// Mutable per-character state.
///
/// `jumping` is true only between leaving the ground through a jump and the
/// next landing. Both timers count down in real time and go negative when
/// expired; they are only ever reset by being overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterState {
    pub velocity: Vec2,
    pub jumping: bool,
    /// Positive while a jump press is buffered
    pub early_jump_timer: f32,
    /// Positive while wall-bump sounds are on cooldown
    pub wall_bump_timer: f32,
    pub last_move_input: f32,
    pub jump_held: bool,
    /// Grounded result of the last physics tick
    pub grounded: bool,
    pub phase: JumpPhase,
}

/// Platformer movement for one character.
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: CharacterConfig,
    probe: GroundProbe,
    state: CharacterState,
    jump_fader: Transition<f32>,
}

impl CharacterController {
    pub fn new(config: CharacterConfig) -> Self {
        let probe = GroundProbe {
            size: config.ground_check_box,
            distance: config.half_height,
            mask: config.ground_layers,
        };
        let jump_fader = Transition::new(
            config.jump_volume,
            TransitionTiming::Duration(config.jump_fade_time),
            Easing::Linear,
        );
        Self {
            config,
            probe,
            state: CharacterState::default(),
            jump_fader,
        }
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// Current jump channel volume; copy it onto the channel every display tick.
    pub fn jump_volume(&self) -> f32 {
        self.jump_fader.value()
    }

    /// Profile that applies for the given grounded state.
    pub fn profile(&self, grounded: bool) -> &MovementProfile {
        MovementProfile::select(grounded, &self.config.ground_profile, &self.config.air_profile)
    }

    // =========================================================================
    // Display tick
    // =========================================================================

    /// Sample input and run real-time timers.
    pub fn on_display_tick(&mut self, dt: f32, input: &InputSnapshot) {
        self.state.last_move_input = input.move_axis;
        self.state.jump_held = input.jump_held;

        if input.jump_pressed {
            self.state.early_jump_timer = self.config.jump.early_press_window;
        } else {
            self.state.early_jump_timer -= dt;
        }

        // Runs on display time so walking into a wall, letting go and pushing
        // again responds immediately once the cooldown is over
        self.state.wall_bump_timer -= dt;

        self.jump_fader.advance(dt);
    }

    // =========================================================================
    // Physics tick
    // =========================================================================

    /// Advance one fixed step.
    ///
    /// `body_velocity` is the velocity the body ended the previous step with
    /// (after collision response). Returns the velocity to integrate.
    pub fn on_physics_tick<Q, S>(
        &mut self,
        dt: f32,
        position: Vec2,
        body_velocity: Vec2,
        ground: &Q,
        sink: &mut S,
    ) -> Vec2
    where
        Q: GroundQuery + ?Sized,
        S: CueSink + ?Sized,
    {
        let grounded = self.probe.is_grounded(ground, position);
        self.state.grounded = grounded;

        let mut velocity = body_velocity;
        velocity.y -= self.config.gravity * dt;

        let tuning = self.config.jump;
        let ctx = JumpContext {
            grounded,
            jumping: self.state.jumping,
            jump_held: self.state.jump_held,
            early_jump_timer: self.state.early_jump_timer,
            vertical_velocity: body_velocity.y,
        };
        let transition = jump::evaluate(&ctx, &tuning);
        match transition {
            JumpTransition::Start => {
                velocity.y = tuning.burst_speed;
                self.state.jumping = true;
                self.play_jump(sink);
                debug!(x = position.x, y = position.y, "jump start");
            }
            JumpTransition::Land => {
                self.state.jumping = false;
                debug!(x = position.x, y = position.y, "jump landed");
            }
            JumpTransition::Cut => {
                velocity.y = tuning.cut_speed;
                self.fade_out_jump();
                debug!(from = body_velocity.y, to = tuning.cut_speed, "jump cut");
            }
            JumpTransition::Hold => {}
        }
        self.state.phase = jump::next_phase(self.state.phase, transition, grounded, self.state.jumping);

        let profile = *self.profile(grounded);
        velocity.x = step_horizontal(self.state.last_move_input, body_velocity.x, &profile, dt);

        self.state.velocity = velocity;
        velocity
    }

    // =========================================================================
    // Collision events
    // =========================================================================

    /// First tick of contact with another body.
    pub fn on_collision_begin<S: CueSink + ?Sized>(&mut self, contact: &Contact, sink: &mut S) {
        match contact.kind() {
            ContactKind::Landing => {
                sink.cue(Cue::Land);
            }
            ContactKind::Ceiling => {
                sink.cue(Cue::CeilingBump);
                // No residual jump sound after hitting the ceiling
                self.fade_out_jump();
                debug!(other = %contact.other, "ceiling bump");
            }
            ContactKind::Wall => {
                if self.try_wall_bump(sink) {
                    debug!(other = %contact.other, nx = contact.normal.x, "wall bump");
                }
            }
        }
    }

    /// Contact persisting from an earlier tick.
    ///
    /// Holding into a wall repeats the bump sound, rate limited by the
    /// same cooldown as fresh wall contacts.
    pub fn on_collision_stay<S: CueSink + ?Sized>(&mut self, contact: &Contact, sink: &mut S) {
        if !opposes_move(contact.normal, self.state.last_move_input) {
            return;
        }

        if self.try_wall_bump(sink) {
            trace!(other = %contact.other, "wall bump repeat");
        }
    }

    /// Contact with another body ended. Characters keep no per-contact state.
    pub fn on_collision_end(&mut self, contact: &Contact) {
        trace!(other = %contact.other, "contact end");
    }

    // =========================================================================
    // Audio
    // =========================================================================

    /// Play the wall-bump cue and re-arm the cooldown, unless it is still
    /// running. Every wall cue, fresh contact or held, shares one cooldown.
    fn try_wall_bump<S: CueSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if self.state.wall_bump_timer > 0.0 {
            return false;
        }
        self.state.wall_bump_timer = self.config.wall_bump_repeat_time;
        sink.cue(Cue::WallBump);
        true
    }

    fn play_jump<S: CueSink + ?Sized>(&mut self, sink: &mut S) {
        let volume = self.config.jump_volume;
        self.jump_fader.set_value(volume);
        sink.cue(Cue::Jump { volume });
    }

    fn fade_out_jump(&mut self) {
        self.jump_fader.start_transition_to(0.0);
    }
}
