//! # Index — Secondary Lookup Tables
//!
//! Two tables answer "who has X?" without scanning every entity:
//!
//! ```text
//! entities:   ComponentId → Vec<Entity>        sorted, one entry per active
//!                                               component instance or tag
//! components: ComponentId → Vec<ComponentKey>  unordered, one entry per
//!                                               active component instance
//! ```
//!
//! The entity tables are kept sorted so that several of them can be
//! intersected in a single merge pass; inserts and removals use binary search.
//! Component tables are never combined, so they are append-only with
//! swap-remove on unindex.
//!
//! The index is owned by a [`World`](super::World); two worlds never share
//! tables.

use std::collections::HashMap;

use super::component::{ComponentId, ComponentKey};
use super::entity::Entity;

#[derive(Default)]
pub(crate) struct Index {
    entities: HashMap<ComponentId, Vec<Entity>>,
    components: HashMap<ComponentId, Vec<ComponentKey>>,
}

impl Index {
    // ── Entity tables ────────────────────────────────────────────────

    pub fn index_entity(&mut self, id: ComponentId, entity: Entity) {
        let table = self.entities.entry(id).or_default();
        let pos = table.partition_point(|&e| e < entity);
        table.insert(pos, entity);
    }

    pub fn unindex_entity(&mut self, id: ComponentId, entity: Entity) {
        let Some(table) = self.entities.get_mut(&id) else {
            log::warn!("Unindexing {entity:?} from empty table {id:?}");
            return;
        };
        match table.binary_search(&entity) {
            Ok(pos) => {
                table.remove(pos);
            }
            Err(_) => log::warn!("{entity:?} was not in the entity table for {id:?}"),
        }
    }

    /// The sorted table for `id`; empty if nothing was ever indexed under it.
    pub fn entities(&self, id: ComponentId) -> &[Entity] {
        self.entities.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every entry for `id` from the entity table.
    pub fn clear_entities(&mut self, id: ComponentId) {
        if let Some(table) = self.entities.get_mut(&id) {
            table.clear();
        }
    }

    // ── Component tables ─────────────────────────────────────────────

    /// Register a component instance in both tables.
    pub fn index_component(&mut self, id: ComponentId, key: ComponentKey) {
        self.index_entity(id, key.entity);
        self.components.entry(id).or_default().push(key);
    }

    /// Remove a component instance from both tables.
    pub fn unindex_component(&mut self, id: ComponentId, key: ComponentKey) {
        self.unindex_entity(id, key.entity);

        let Some(table) = self.components.get_mut(&id) else {
            log::warn!("Unindexing {key:?} from empty component table {id:?}");
            return;
        };
        if let Some(pos) = table.iter().position(|k| *k == key) {
            table.swap_remove(pos);
        } else {
            log::warn!("{key:?} was not in the component table for {id:?}");
        }
    }

    pub fn components(&self, id: ComponentId) -> &[ComponentKey] {
        self.components.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// `(table count, total entries)` of the entity tables.
    #[cfg(feature = "diagnostics")]
    pub fn entity_table_stats(&self) -> (usize, usize) {
        let entries = self.entities.values().map(Vec::len).sum();
        (self.entities.len(), entries)
    }

    /// `(table count, total entries)` of the component tables.
    #[cfg(feature = "diagnostics")]
    pub fn component_table_stats(&self) -> (usize, usize) {
        let entries = self.components.values().map(Vec::len).sum();
        (self.components.len(), entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::component_id;

    struct Marker;
    struct Other;

    fn entity(index: u32) -> Entity {
        Entity {
            index,
            generation: 0,
        }
    }

    fn key(index: u32, serial: u64) -> ComponentKey {
        ComponentKey {
            entity: entity(index),
            serial,
        }
    }

    #[test]
    fn entity_tables_stay_sorted() {
        let mut index = Index::default();
        let id = component_id::<Marker>();
        for i in [5, 1, 9, 3, 7] {
            index.index_entity(id, entity(i));
        }
        let indices: Vec<u32> = index.entities(id).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 3, 5, 7, 9]);

        index.unindex_entity(id, entity(5));
        let indices: Vec<u32> = index.entities(id).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 3, 7, 9]);
    }

    #[test]
    fn unknown_ids_read_as_empty() {
        let index = Index::default();
        assert!(index.entities(component_id::<Other>()).is_empty());
        assert!(index.components(component_id::<Other>()).is_empty());
    }

    #[test]
    fn component_tables_swap_remove() {
        let mut index = Index::default();
        let id = component_id::<Marker>();
        index.index_component(id, key(0, 10));
        index.index_component(id, key(1, 11));
        index.index_component(id, key(2, 12));

        index.unindex_component(id, key(0, 10));

        // The last key moved into the freed slot.
        assert_eq!(index.components(id), &[key(2, 12), key(1, 11)]);
        assert_eq!(index.entities(id), &[entity(1), entity(2)]);
    }

    #[test]
    fn duplicate_entries_are_removed_one_at_a_time() {
        let mut index = Index::default();
        let id = component_id::<Marker>();
        index.index_component(id, key(4, 1));
        index.index_component(id, key(4, 2));
        assert_eq!(index.entities(id).len(), 2);

        index.unindex_component(id, key(4, 1));
        assert_eq!(index.entities(id), &[entity(4)]);
        assert_eq!(index.components(id), &[key(4, 2)]);
    }

    #[test]
    fn unindexing_missing_entry_is_harmless() {
        let mut index = Index::default();
        let id = component_id::<Marker>();
        index.unindex_entity(id, entity(1));
        index.index_entity(id, entity(2));
        index.unindex_entity(id, entity(1));
        assert_eq!(index.entities(id), &[entity(2)]);
    }

    #[test]
    fn clear_entities_empties_one_table() {
        let mut index = Index::default();
        let marker = component_id::<Marker>();
        let other = component_id::<Other>();
        index.index_entity(marker, entity(1));
        index.index_entity(other, entity(1));

        index.clear_entities(marker);
        assert!(index.entities(marker).is_empty());
        assert_eq!(index.entities(other), &[entity(1)]);
    }
}
