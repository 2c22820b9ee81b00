//! Axis-aligned physics
//!
//! A small box world, just enough to drive the controllers:
//!
//! - `Static` bodies never move (level geometry)
//! - `Kinematic` bodies are moved by their owner (platforms); they push
//!   dynamic bodies but never get pushed
//! - `Dynamic` bodies integrate their velocity and are pushed out of
//!   everything non-dynamic
//!
//! Dynamic bodies move x first, then y. Each axis pass pushes the body back
//! out of whatever it entered, zeroes that velocity component and records
//! one cardinal contact normal per (body, other) pair. Dynamic bodies do not
//! collide with each other.

use std::collections::BTreeMap;

use crate::math::Vec2;
use super::collision::{Contact, GroundQuery, Layer, LayerMask};
use super::component::ComponentStorage;
use super::entity::Entity;

/// Penetration below this is treated as touching, not overlapping.
pub const SKIN: f32 = 1e-4;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap, ignoring anything thinner than [`SKIN`]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - SKIN
            && self.max.x > other.min.x + SKIN
            && self.min.y < other.max.y - SKIN
            && self.max.y > other.min.y + SKIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Kinematic,
    Dynamic,
}

/// A box collider with a velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub half_extents: Vec2,
    pub velocity: Vec2,
    pub kind: BodyKind,
    pub layer: Layer,
}

impl Body {
    pub fn new(kind: BodyKind, position: Vec2, size: Vec2, layer: Layer) -> Self {
        Self {
            position,
            half_extents: size * 0.5,
            velocity: Vec2::ZERO,
            kind,
            layer,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }
}

/// One side of a touching pair; `normal` points from `other` toward `body`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    pub body: Entity,
    pub other: Entity,
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Move every dynamic body by its velocity and resolve overlaps.
///
/// Returns both sides of every contact: the dynamic body's and the
/// mirrored one for the body it hit.
pub fn integrate(bodies: &mut ComponentStorage<Body>, dt: f32) -> Vec<ContactPair> {
    let obstacles: Vec<(Entity, Aabb)> = bodies
        .iter()
        .filter(|(_, b)| b.kind != BodyKind::Dynamic)
        .map(|(e, b)| (e, b.aabb()))
        .collect();

    let mut pairs = Vec::new();
    for (entity, body) in bodies.iter_mut() {
        if body.kind != BodyKind::Dynamic {
            continue;
        }
        body.position.x += body.velocity.x * dt;
        resolve_axis(entity, body, &obstacles, Axis::X, &mut pairs);
        body.position.y += body.velocity.y * dt;
        resolve_axis(entity, body, &obstacles, Axis::Y, &mut pairs);
    }
    pairs
}

fn resolve_axis(
    entity: Entity,
    body: &mut Body,
    obstacles: &[(Entity, Aabb)],
    axis: Axis,
    pairs: &mut Vec<ContactPair>,
) {
    for &(other, aabb) in obstacles {
        if !body.aabb().overlaps(&aabb) {
            continue;
        }

        let (velocity, position, center) = match axis {
            Axis::X => (body.velocity.x, body.position.x, aabb.center().x),
            Axis::Y => (body.velocity.y, body.position.y, aabb.center().y),
        };
        // Moving bodies are pushed back the way they came; a body that was
        // moved into (velocity zero) goes out the nearer side
        let push_positive = if velocity != 0.0 { velocity < 0.0 } else { position >= center };

        let normal = match (axis, push_positive) {
            (Axis::X, true) => {
                body.position.x = aabb.max.x + body.half_extents.x;
                Vec2::RIGHT
            }
            (Axis::X, false) => {
                body.position.x = aabb.min.x - body.half_extents.x;
                Vec2::LEFT
            }
            (Axis::Y, true) => {
                body.position.y = aabb.max.y + body.half_extents.y;
                Vec2::UP
            }
            (Axis::Y, false) => {
                body.position.y = aabb.min.y - body.half_extents.y;
                Vec2::DOWN
            }
        };
        match axis {
            Axis::X => body.velocity.x = 0.0,
            Axis::Y => body.velocity.y = 0.0,
        }

        pairs.push(ContactPair { body: entity, other, normal });
        pairs.push(ContactPair { body: other, other: entity, normal: -normal });
    }
}

/// Whether a contact started, persisted, or ended this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    Stay,
    End,
}

/// A contact event delivered to `body`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub body: Entity,
    pub contact: Contact,
}

/// Turns per-tick contact sets into begin / stay / end events.
///
/// Keyed by (body, other), so each body sees at most one contact per
/// distinct other body per tick; the first normal recorded wins.
#[derive(Debug, Default)]
pub struct ContactTracker {
    previous: BTreeMap<(Entity, Entity), Vec2>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this tick's pairs against the last tick's. Events come out
    /// ordered by body then other, begins and stays before ends.
    pub fn update(&mut self, pairs: &[ContactPair]) -> Vec<ContactEvent> {
        let mut current: BTreeMap<(Entity, Entity), Vec2> = BTreeMap::new();
        for pair in pairs {
            current.entry((pair.body, pair.other)).or_insert(pair.normal);
        }

        let mut events = Vec::with_capacity(current.len());
        for (&(body, other), &normal) in &current {
            let phase = if self.previous.contains_key(&(body, other)) {
                ContactPhase::Stay
            } else {
                ContactPhase::Begin
            };
            events.push(ContactEvent { phase, body, contact: Contact::new(other, normal) });
        }
        for (&(body, other), &normal) in &self.previous {
            if !current.contains_key(&(body, other)) {
                events.push(ContactEvent {
                    phase: ContactPhase::End,
                    body,
                    contact: Contact::new(other, normal),
                });
            }
        }

        self.previous = current;
        events
    }

    /// Drop remembered contacts involving `entity` without raising events.
    pub fn forget(&mut self, entity: Entity) {
        self.previous.retain(|&(body, other), _| body != entity && other != entity);
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

/// Box cast over a body set. The box of `size` centered at `origin` is
/// swept `distance` downward; any body on a masked layer overlapping the
/// swept area is a hit.
pub fn box_cast_down(
    bodies: &ComponentStorage<Body>,
    origin: Vec2,
    size: Vec2,
    distance: f32,
    mask: LayerMask,
) -> bool {
    let half = size * 0.5;
    let swept = Aabb::new(
        Vec2::new(origin.x - half.x, origin.y - distance - half.y),
        Vec2::new(origin.x + half.x, origin.y + half.y),
    );
    bodies
        .iter()
        .any(|(_, body)| mask.contains(body.layer) && swept.overlaps(&body.aabb()))
}

/// [`GroundQuery`] over a borrowed body set.
#[derive(Clone, Copy)]
pub struct BodyQuery<'a> {
    bodies: &'a ComponentStorage<Body>,
}

impl<'a> BodyQuery<'a> {
    pub fn new(bodies: &'a ComponentStorage<Body>) -> Self {
        Self { bodies }
    }
}

impl GroundQuery for BodyQuery<'_> {
    fn box_cast_down(&self, origin: Vec2, size: Vec2, distance: f32, mask: LayerMask) -> bool {
        box_cast_down(self.bodies, origin, size, distance, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collision::layers;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.0001
    }

    /// Floor top at y = 0, 20 wide
    fn floor_world() -> (ComponentStorage<Body>, Entity) {
        let mut bodies = ComponentStorage::new();
        let floor = Entity::new(0, 0);
        bodies.insert(
            floor,
            Body::new(BodyKind::Static, Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0), layers::WORLD),
        );
        (bodies, floor)
    }

    #[test]
    fn test_aabb_touching_is_not_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let touching = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::ONE);
        let inside = Aabb::from_center(Vec2::new(1.5, 0.5), Vec2::ONE);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_falling_body_lands_with_up_normal() {
        let (mut bodies, floor) = floor_world();
        let player = Entity::new(1, 0);
        let mut body = Body::new(BodyKind::Dynamic, Vec2::new(0.0, 0.55), Vec2::ONE, layers::PLAYER);
        body.velocity = Vec2::new(0.0, -5.0);
        bodies.insert(player, body);

        let pairs = integrate(&mut bodies, 0.02);
        let body = bodies.get(player).unwrap();
        assert!(approx(body.position.y, 0.5));
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(pairs, vec![
            ContactPair { body: player, other: floor, normal: Vec2::UP },
            ContactPair { body: floor, other: player, normal: Vec2::DOWN },
        ]);
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let (mut bodies, _) = floor_world();
        let wall = Entity::new(1, 0);
        bodies.insert(wall, Body::new(BodyKind::Static, Vec2::new(2.0, 2.0), Vec2::new(1.0, 4.0), layers::WORLD));
        let player = Entity::new(2, 0);
        let mut body = Body::new(BodyKind::Dynamic, Vec2::new(0.95, 0.5), Vec2::ONE, layers::PLAYER);
        body.velocity = Vec2::new(5.0, 0.0);
        bodies.insert(player, body);

        let pairs = integrate(&mut bodies, 0.02);
        let body = bodies.get(player).unwrap();
        assert!(approx(body.position.x, 1.0));
        assert_eq!(body.velocity.x, 0.0);
        assert!(pairs.contains(&ContactPair { body: player, other: wall, normal: Vec2::LEFT }));
    }

    #[test]
    fn test_resting_body_keeps_touching() {
        let (mut bodies, floor) = floor_world();
        let player = Entity::new(1, 0);
        bodies.insert(player, Body::new(BodyKind::Dynamic, Vec2::new(3.0, 0.5), Vec2::ONE, layers::PLAYER));

        for _ in 0..10 {
            if let Some(body) = bodies.get_mut(player) {
                body.velocity.y -= 40.0 * 0.02;
            }
            let pairs = integrate(&mut bodies, 0.02);
            assert!(pairs.iter().any(|p| p.body == player && p.other == floor && p.normal == Vec2::UP));
        }
        assert!(approx(bodies.get(player).unwrap().position.y, 0.5));
    }

    #[test]
    fn test_tracker_begin_stay_end() {
        let body = Entity::new(1, 0);
        let other = Entity::new(2, 0);
        let pair = ContactPair { body, other, normal: Vec2::UP };
        let mut tracker = ContactTracker::new();

        let events = tracker.update(&[pair, pair]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, ContactPhase::Begin);

        let events = tracker.update(&[pair]);
        assert_eq!(events[0].phase, ContactPhase::Stay);

        let events = tracker.update(&[]);
        assert_eq!(events, vec![ContactEvent {
            phase: ContactPhase::End,
            body,
            contact: Contact::new(other, Vec2::UP),
        }]);
        assert!(tracker.update(&[]).is_empty());
    }

    #[test]
    fn test_tracker_forget_is_silent() {
        let body = Entity::new(1, 0);
        let other = Entity::new(2, 0);
        let mut tracker = ContactTracker::new();
        tracker.update(&[ContactPair { body, other, normal: Vec2::UP }]);
        tracker.forget(other);
        assert!(tracker.update(&[]).is_empty());
    }

    #[test]
    fn test_box_cast_filters_layers() {
        let (mut bodies, _) = floor_world();
        bodies.insert(
            Entity::new(1, 0),
            Body::new(BodyKind::Dynamic, Vec2::new(0.0, 0.5), Vec2::ONE, layers::PLAYER),
        );
        let probe = Vec2::new(0.55, 0.05);

        // Standing on the floor, probing half a height down
        assert!(box_cast_down(&bodies, Vec2::new(0.0, 0.5), probe, 0.5, LayerMask::default()));
        // Same spot but only looking at the player layer: still hits the player itself
        assert!(box_cast_down(&bodies, Vec2::new(0.0, 0.5), probe, 0.5, LayerMask::of(&[layers::PLAYER])));
        // Well above the floor
        assert!(!box_cast_down(&bodies, Vec2::new(0.0, 2.0), probe, 0.5, LayerMask::default()));

        let query = BodyQuery::new(&bodies);
        assert!(query.box_cast_down(Vec2::new(0.0, 0.5), probe, 0.5, LayerMask::default()));
    }
}
