//! Contact classification and ground probing
//!
//! Contacts arrive from whatever collision backend drives the simulation.
//! Everything here assumes axis-aligned geometry: only the four cardinal
//! normals carry meaning. A contact's normal points from the other body
//! toward the body receiving the event, so a character standing on a floor
//! sees `UP` and the floor sees `DOWN`.

use serde::{Serialize, Deserialize};
use crate::math::{Vec2, ternary_sign};
use super::entity::Entity;

/// Collision layer a body lives on (0..32).
pub type Layer = u8;

/// Well-known layers.
pub mod layers {
    use super::Layer;
    pub const WORLD: Layer = 0;
    pub const PLAYER: Layer = 1;
    pub const PLATFORM: Layer = 2;
}

/// Bit set of layers used to filter queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    pub fn of(layers: &[Layer]) -> Self {
        LayerMask(layers.iter().fold(0, |mask, &l| mask | (1u32 << (l & 31))))
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & (1u32 << (layer & 31)) != 0
    }
}

impl Default for LayerMask {
    /// Everything the player can stand on
    fn default() -> Self {
        LayerMask::of(&[layers::WORLD, layers::PLATFORM])
    }
}

/// One contact with another body during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: Entity,
    /// Unit normal pointing from `other` toward the receiving body
    pub normal: Vec2,
}

impl Contact {
    pub fn new(other: Entity, normal: Vec2) -> Self {
        Self { other, normal }
    }

    pub fn kind(&self) -> ContactKind {
        ContactKind::classify(self.normal)
    }
}

/// What a contact means for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Surface below, pushing up
    Landing,
    /// Surface above, pushing down
    Ceiling,
    /// Anything lateral
    Wall,
}

impl ContactKind {
    pub fn classify(normal: Vec2) -> Self {
        if normal == Vec2::UP {
            ContactKind::Landing
        } else if normal == Vec2::DOWN {
            ContactKind::Ceiling
        } else {
            ContactKind::Wall
        }
    }
}

/// True when `normal` pushes straight back against the held move direction.
pub fn opposes_move(normal: Vec2, move_input: f32) -> bool {
    let dir = ternary_sign(move_input);
    dir != 0.0 && normal == Vec2::new(-dir, 0.0)
}

/// Downward box cast against ground geometry.
pub trait GroundQuery {
    /// Does a box of `size` centered at `origin`, swept down by `distance`,
    /// touch anything on a layer in `mask`?
    fn box_cast_down(&self, origin: Vec2, size: Vec2, distance: f32, mask: LayerMask) -> bool;
}

impl<F> GroundQuery for F
where
    F: Fn(Vec2, Vec2, f32, LayerMask) -> bool,
{
    fn box_cast_down(&self, origin: Vec2, size: Vec2, distance: f32, mask: LayerMask) -> bool {
        self(origin, size, distance, mask)
    }
}

/// The grounded check of a character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// Box swept downward; narrower than the collider so walls never count
    pub size: Vec2,
    pub distance: f32,
    pub mask: LayerMask,
}

impl GroundProbe {
    pub fn is_grounded<Q: GroundQuery + ?Sized>(&self, query: &Q, position: Vec2) -> bool {
        query.box_cast_down(position, self.size, self.distance, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_cardinal_normals() {
        assert_eq!(ContactKind::classify(Vec2::UP), ContactKind::Landing);
        assert_eq!(ContactKind::classify(Vec2::DOWN), ContactKind::Ceiling);
        assert_eq!(ContactKind::classify(Vec2::LEFT), ContactKind::Wall);
        assert_eq!(ContactKind::classify(Vec2::RIGHT), ContactKind::Wall);
    }

    #[test]
    fn test_opposes_move() {
        // Wall on the right pushes left
        assert!(opposes_move(Vec2::LEFT, 1.0));
        assert!(opposes_move(Vec2::LEFT, 0.4));
        assert!(opposes_move(Vec2::RIGHT, -1.0));
        assert!(!opposes_move(Vec2::RIGHT, 1.0));
        assert!(!opposes_move(Vec2::LEFT, 0.0));
        assert!(!opposes_move(Vec2::UP, 1.0));
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::default();
        assert!(mask.contains(layers::WORLD));
        assert!(mask.contains(layers::PLATFORM));
        assert!(!mask.contains(layers::PLAYER));
        assert!(LayerMask::ALL.contains(layers::PLAYER));
        assert!(!LayerMask::NONE.contains(layers::WORLD));
    }

    #[test]
    fn test_probe_forwards_to_query() {
        let probe = GroundProbe { size: Vec2::new(1.0, 0.1), distance: 0.5, mask: LayerMask::default() };
        let below_zero = |origin: Vec2, _size: Vec2, distance: f32, _mask: LayerMask| origin.y - distance <= 0.0;
        assert!(probe.is_grounded(&below_zero, Vec2::new(0.0, 0.5)));
        assert!(!probe.is_grounded(&below_zero, Vec2::new(0.0, 2.0)));
    }
}
