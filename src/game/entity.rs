//! Entity ids with generational indices
//!
//! Every body in the simulation (characters, moving platforms, static
//! solids) is addressed by an `Entity`. Contacts, carry relations and
//! sound cues all refer to bodies by id instead of by reference, so a
//! despawned platform can never be reached through a stale rider edge:
//! the slot's generation moves on and the old id stops matching.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Identifier for a simulated body.
///
/// `index` selects the storage slot, `generation` tells apart successive
/// occupants of the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Only the allocator (and tests) mint ids.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Storage slot of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Placeholder id that never belongs to a live body.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Hands out entity ids and recycles freed slots.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    /// Freed slots, reused LIFO
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity, reusing a freed slot if one exists.
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was bumped when the slot was freed
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity::new(index, 0)
        }
    }

    /// Free an entity. Returns false if it was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.generations[entity.index as usize] += 1;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&gen| gen == entity.generation)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let player = alloc.allocate();
        let platform = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(player));
        assert!(!alloc.free(player));
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(player));
        assert!(alloc.is_alive(platform));
    }

    #[test]
    fn test_stale_id_does_not_match_reused_slot() {
        let mut alloc = EntityAllocator::new();

        let old_platform = alloc.allocate();
        alloc.free(old_platform);
        let new_platform = alloc.allocate();

        assert_eq!(new_platform.index(), old_platform.index());
        assert_ne!(new_platform, old_platform);
        assert!(!alloc.is_alive(old_platform));
        assert!(alloc.is_alive(new_platform));
    }

    #[test]
    fn test_null_entity() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::NULL));
        assert!(Entity::NULL.is_null());
        assert_eq!(Entity::new(3, 1).to_string(), "3v1");
    }
}
