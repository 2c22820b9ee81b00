//! Moving platforms
//!
//! A platform ping-pongs between two waypoints, `start` and
//! `start + offset`, driven by a position transition. Whenever the
//! transition is idle on a physics tick the platform flips its direction
//! flag and flashes a new transition from where it is toward the other
//! waypoint.
//!
//! Riding is a plain association, rider -> platform, kept in
//! [`CarryRelation`]. It is set when a character lands on top of a platform
//! and cleared when that contact ends. Nothing owns anything: despawning
//! either side just forgets the edge.

use tracing::{debug, trace};

use crate::math::Vec2;
use super::collision::Contact;
use super::component::ComponentStorage;
use super::config::PlatformConfig;
use super::entity::Entity;
use super::transition::{Transition, TransitionProvider};

/// Two-waypoint moving platform.
#[derive(Debug, Clone)]
pub struct MovingPlatform<P = Transition<Vec2>> {
    start_position: Vec2,
    offset: Vec2,
    /// True while heading for `start + offset`
    traveling_to_offset: bool,
    mover: P,
}

impl MovingPlatform<Transition<Vec2>> {
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(
            config.start,
            config.offset,
            Transition::new(config.start, config.timing, config.easing),
        )
    }
}

impl<P: TransitionProvider<Vec2>> MovingPlatform<P> {
    /// Platform resting at `start`. The first retarget heads for the offset.
    pub fn new(start_position: Vec2, offset: Vec2, mut mover: P) -> Self {
        mover.set_value(start_position);
        Self {
            start_position,
            offset,
            traveling_to_offset: false,
            mover,
        }
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn traveling_to_offset(&self) -> bool {
        self.traveling_to_offset
    }

    /// Both ends of the path
    pub fn waypoints(&self) -> (Vec2, Vec2) {
        (self.start_position, self.start_position + self.offset)
    }

    /// Waypoint the platform is currently heading for
    pub fn current_target(&self) -> Vec2 {
        if self.traveling_to_offset {
            self.start_position + self.offset
        } else {
            self.start_position
        }
    }

    pub fn position(&self) -> Vec2 {
        self.mover.value()
    }

    /// Advance one fixed step and return the position to apply this tick.
    pub fn on_physics_tick(&mut self, dt: f32) -> Vec2 {
        self.mover.advance(dt);

        if !self.mover.is_transitioning() {
            self.traveling_to_offset = !self.traveling_to_offset;
            let from = self.mover.value();
            let to = self.current_target();
            self.mover.flash_from_to(from, to);
            trace!(from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "platform retarget");
        }

        self.mover.value()
    }

    /// Should this new contact start carrying `contact.other`?
    ///
    /// Only a character touching from above counts; the normal then points
    /// from the rider down into the platform.
    pub fn on_collision_begin(&self, contact: &Contact, other_is_character: bool) -> bool {
        other_is_character && contact.normal == Vec2::DOWN
    }
}

/// Carry events raised when the relation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryEvent {
    Attached { rider: Entity, platform: Entity },
    Detached { rider: Entity, platform: Entity },
}

/// Which platform, if any, carries each rider. At most one per rider.
#[derive(Debug, Default)]
pub struct CarryRelation {
    carriers: ComponentStorage<Entity>,
}

impl CarryRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carry `rider` on `platform`, replacing any previous carrier.
    /// Returns the carrier it replaced.
    pub fn attach(&mut self, rider: Entity, platform: Entity) -> Option<Entity> {
        let previous = self.carriers.remove(rider);
        self.carriers.insert(rider, platform);
        debug!(%rider, %platform, "carry attach");
        previous
    }

    /// Stop carrying `rider`, but only if `platform` is its carrier.
    pub fn detach(&mut self, rider: Entity, platform: Entity) -> bool {
        if self.carriers.get(rider) != Some(&platform) {
            return false;
        }
        self.carriers.remove(rider);
        debug!(%rider, %platform, "carry detach");
        true
    }

    pub fn carrier_of(&self, rider: Entity) -> Option<Entity> {
        self.carriers.get(rider).copied()
    }

    pub fn riders_of(&self, platform: Entity) -> Vec<Entity> {
        self.carriers
            .iter()
            .filter(|(_, carrier)| **carrier == platform)
            .map(|(rider, _)| rider)
            .collect()
    }

    /// Drop every edge touching `entity`, as rider or as platform.
    pub fn forget(&mut self, entity: Entity) {
        self.carriers.remove(entity);
        for rider in self.riders_of(entity) {
            self.carriers.remove(rider);
        }
    }

    pub fn clear(&mut self) {
        self.carriers.clear();
    }

    pub fn len(&self) -> usize {
        self.carriers.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
