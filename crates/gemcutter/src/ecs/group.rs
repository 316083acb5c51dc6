//! A hand-maintained set of entities, independent of the index.

use super::entity::Entity;
use super::world::World;

/// An ordered collection of distinct entity handles.
///
/// Membership is not tracked by the world: destroying an entity leaves its
/// handle in every group until [`EntityGroup::retain_alive`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityGroup {
    entities: Vec<Entity>,
}

impl EntityGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the entity is already in the group.
    pub fn add(&mut self, entity: Entity) {
        assert!(
            !self.has(entity),
            "{entity:?} is already a member of this group"
        );
        self.entities.push(entity);
    }

    /// Returns `false` if the entity was not a member.
    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|&e| e == entity) {
            Some(pos) => {
                self.entities.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Members in the order they were added.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop handles to entities that no longer exist in `world`.
    pub fn retain_alive(&mut self, world: &World) {
        self.entities.retain(|&e| world.is_alive(e));
    }
}
