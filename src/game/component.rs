//! Component Storage
//!
//! Sparse per-type storage indexed by entity slot. Each occupied slot
//! remembers the full entity id it was inserted for, so lookups through a
//! stale id (old generation) miss instead of returning the new occupant.

use super::entity::Entity;

/// Sparse storage for one component type.
#[derive(Debug)]
pub struct ComponentStorage<T> {
    data: Vec<Option<(Entity, T)>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component, replacing whatever occupied the slot.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some((entity, component));
    }

    /// Remove and return the component for `entity`, if it has one.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.data.get_mut(entity.index() as usize)?;
        match slot {
            Some((owner, _)) if *owner == entity => slot.take().map(|(_, c)| c),
            _ => None,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.data.get(entity.index() as usize)? {
            Some((owner, c)) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.data.get_mut(entity.index() as usize)? {
            Some((owner, c)) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate over all (entity, component) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(e, c)| (*e, c)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.data
            .iter_mut()
            .filter_map(|slot| slot.as_mut().map(|(e, c)| (*e, c)))
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage: ComponentStorage<f32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 4.5);
        assert_eq!(storage.get(entity), Some(&4.5));
        assert!(storage.contains(entity));
        assert_eq!(storage.count(), 1);
    }

    #[test]
    fn test_stale_generation_misses() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        let old = Entity::new(2, 0);
        let new = Entity::new(2, 1);

        storage.insert(new, "platform");
        assert_eq!(storage.get(old), None);
        assert_eq!(storage.remove(old), None);
        assert_eq!(storage.remove(new), Some("platform"));
        assert!(!storage.contains(new));
    }

    #[test]
    fn test_iteration_in_slot_order() {
        let mut storage: ComponentStorage<u8> = ComponentStorage::new();
        storage.insert(Entity::new(4, 0), 4);
        storage.insert(Entity::new(1, 0), 1);

        let items: Vec<_> = storage.iter().map(|(e, c)| (e.index(), *c)).collect();
        assert_eq!(items, vec![(1, 1), (4, 4)]);

        for (_, c) in storage.iter_mut() {
            *c *= 2;
        }
        assert_eq!(storage.get(Entity::new(4, 0)), Some(&8));
        assert_eq!(storage.count(), 2);
    }
}
