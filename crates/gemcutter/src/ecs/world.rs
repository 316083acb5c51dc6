//! # World — The Entity Database
//!
//! The [`World`] owns every entity record and the secondary [`Index`] that
//! answers queries. It is the single place where components are attached,
//! enabled, disabled, and destroyed, which is what keeps the index in step
//! with the records.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ World                                                    │
//! │                                                          │
//! │  EntityAllocator: generational handle lifecycle          │
//! │                                                          │
//! │  records: HashMap<u32, EntityRecord>                     │
//! │    components: Vec<ComponentSlot>  (insertion order)     │
//! │    tags:       Vec<ComponentId>                          │
//! │    enabled, transform, parent, children                  │
//! │                                                          │
//! │  index: Index                                            │
//! │    entities:   ComponentId → sorted Vec<Entity>          │
//! │    components: ComponentId → Vec<ComponentKey>           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Visibility
//!
//! A component instance is in the index exactly when its owner is enabled and
//! the component's own flag is set. Every mutation below updates the index
//! before returning, so a query issued right after [`World::add`] already sees
//! the new component.
//!
//! ```text
//!                 owner enabled   owner disabled
//! comp enabled      Indexed         NotIndexed
//! comp disabled     NotIndexed      NotIndexed
//! ```
//!
//! ## Teardown
//!
//! Removal always unindexes first, then detaches the slot from the entity,
//! then runs [`Component::on_remove`] with full world access, then drops the
//! value. Because the hook may remove siblings, [`World::remove_all_components`]
//! walks the list backwards and re-checks bounds after every removal.

use std::collections::HashMap;

use super::component::{Component, ComponentId, ComponentKey, ComponentSlot, Tag, component_id};
use super::entity::{Entity, EntityAllocator};
use super::index::Index;
use crate::math::Transform;
use crate::settings::WorldSettings;

/// Everything the world knows about one entity.
pub(crate) struct EntityRecord {
    /// The live handle for this slot; used to reject stale handles.
    pub entity: Entity,
    pub components: Vec<ComponentSlot>,
    pub tags: Vec<ComponentId>,
    pub enabled: bool,
    pub transform: Transform,
    pub parent: Option<Entity>,
    pub children: Vec<Entity>,
    /// Whether children compose their transform with this entity's.
    pub propagate_transform: bool,
}

impl EntityRecord {
    fn new(entity: Entity, transform: Transform) -> Self {
        Self {
            entity,
            components: Vec::new(),
            tags: Vec::new(),
            enabled: true,
            transform,
            parent: None,
            children: Vec::new(),
            propagate_transform: true,
        }
    }
}

/// A snapshot of world bookkeeping, see [`World::stats`].
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WorldStats {
    pub alive_entities: usize,
    pub free_slots: usize,
    pub entity_tables: usize,
    pub entity_entries: usize,
    pub component_tables: usize,
    pub component_entries: usize,
    /// Entities created since the previous call to [`World::stats`].
    pub spawned: u32,
    /// Entities destroyed since the previous call to [`World::stats`].
    pub destroyed: u32,
}

/// The container for all entities, their components, and the query index.
pub struct World {
    allocator: EntityAllocator,
    pub(crate) records: HashMap<u32, EntityRecord>,
    pub(crate) index: Index,
    next_serial: u64,
    settings: WorldSettings,
    #[cfg(feature = "diagnostics")]
    spawned: u32,
    #[cfg(feature = "diagnostics")]
    destroyed: u32,
}

impl World {
    pub fn new() -> Self {
        Self::with_settings(WorldSettings::default())
    }

    pub fn with_settings(settings: WorldSettings) -> Self {
        Self {
            allocator: EntityAllocator::with_capacity(settings.entity_capacity),
            records: HashMap::with_capacity(settings.entity_capacity),
            index: Index::default(),
            next_serial: 0,
            settings,
            #[cfg(feature = "diagnostics")]
            spawned: 0,
            #[cfg(feature = "diagnostics")]
            destroyed: 0,
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    // ── Record access ────────────────────────────────────────────────

    pub(crate) fn record(&self, entity: Entity) -> Option<&EntityRecord> {
        self.records
            .get(&entity.index)
            .filter(|record| record.entity == entity)
    }

    pub(crate) fn record_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        live_mut(&mut self.records, entity)
    }

    pub(crate) fn expect_record(&self, entity: Entity, action: &str) -> &EntityRecord {
        self.record(entity)
            .unwrap_or_else(|| panic!("Cannot {action} on dead entity {entity:?}"))
    }

    pub(crate) fn expect_record_mut(&mut self, entity: Entity, action: &str) -> &mut EntityRecord {
        live_mut(&mut self.records, entity)
            .unwrap_or_else(|| panic!("Cannot {action} on dead entity {entity:?}"))
    }

    // ── Entity lifecycle ─────────────────────────────────────────────

    /// Create an enabled entity with no components at the origin.
    pub fn make_new(&mut self) -> Entity {
        self.make_new_with_transform(Transform::IDENTITY)
    }

    /// Create an enabled entity with the given local pose.
    pub fn make_new_with_transform(&mut self, transform: Transform) -> Entity {
        let entity = self.allocator.allocate();
        self.records
            .insert(entity.index, EntityRecord::new(entity, transform));
        #[cfg(feature = "diagnostics")]
        {
            self.spawned += 1;
        }
        log::debug!("Created {entity:?}");
        entity
    }

    /// Create an entity and attach a bundle of components to it.
    ///
    /// ```ignore
    /// let e = world.make_new_with((Light::default(), Name::new("sun")));
    /// ```
    pub fn make_new_with<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.make_new();
        bundle.add_to(self, entity);
        entity
    }

    /// Destroy an entity and, recursively, all of its children.
    ///
    /// Components are removed (running their [`Component::on_remove`] hooks)
    /// and tags unindexed before the slot is released. Returns `false` if the
    /// handle was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.remove_all_components(entity);
        // A removal hook may have destroyed the entity already.
        if !self.is_alive(entity) {
            return true;
        }
        self.remove_all_tags(entity);
        self.detach_from_parent(entity);

        let children = match live_mut(&mut self.records, entity) {
            Some(record) => std::mem::take(&mut record.children),
            None => Vec::new(),
        };
        for child in children {
            if let Some(record) = live_mut(&mut self.records, child) {
                record.parent = None;
            }
            self.destroy(child);
        }

        self.records.remove(&entity.index);
        self.allocator.deallocate(entity);
        #[cfg(feature = "diagnostics")]
        {
            self.destroyed += 1;
        }
        log::debug!("Destroyed {entity:?}");
        true
    }

    /// Destroy every entity in the world.
    pub fn destroy_all(&mut self) {
        let mut all: Vec<Entity> = self.records.values().map(|r| r.entity).collect();
        all.sort();
        for entity in all {
            self.destroy(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity) && self.record(entity).is_some()
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// All live entities, enabled or not, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.records.values().map(|record| record.entity)
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a component and return it.
    ///
    /// If the entity is enabled the component is queryable as soon as this
    /// returns. Several components of the same type are allowed unless
    /// [`WorldSettings::allow_duplicate_components`] is `false`.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead, or if it already has a `T` and duplicates
    /// are disallowed.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> &mut T {
        let slot = self.insert_boxed(entity, Box::new(component));
        slot.downcast_mut::<T>()
            .expect("a freshly inserted slot holds the added type")
    }

    /// Attach every component of a tuple.
    pub fn add_bundle<B: Bundle>(&mut self, entity: Entity, bundle: B) {
        bundle.add_to(self, entity);
    }

    /// Return the existing `T`, adding a default one first if there is none.
    pub fn require<T: Component + Default>(&mut self, entity: Entity) -> &mut T {
        if self.has::<T>(entity) {
            return self.get_mut::<T>(entity);
        }
        self.add(entity, T::default())
    }

    pub(crate) fn insert_boxed(&mut self, entity: Entity, value: Box<dyn Component>) -> &mut ComponentSlot {
        let slot = ComponentSlot::new(self.next_serial(), value);
        self.insert_slot(entity, slot)
    }

    pub(crate) fn insert_slot(&mut self, entity: Entity, slot: ComponentSlot) -> &mut ComponentSlot {
        let allow_duplicates = self.settings.allow_duplicate_components;
        let Some(record) = live_mut(&mut self.records, entity) else {
            panic!(
                "Cannot add component `{}` to dead entity {entity:?}",
                slot.component().type_name()
            );
        };

        if !allow_duplicates && record.components.iter().any(|s| s.id == slot.id) {
            panic!(
                "Component `{}` already exists on {entity:?}",
                slot.component().type_name()
            );
        }

        if record.enabled && slot.enabled {
            self.index.index_component(
                slot.id,
                ComponentKey {
                    entity,
                    serial: slot.serial,
                },
            );
        }

        record.components.push(slot);
        let last = record.components.len() - 1;
        &mut record.components[last]
    }

    fn next_serial(&mut self) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    /// The first `T` on the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead or has no `T`. Use [`World::try_get`] when
    /// absence is expected.
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.try_get::<T>(entity).unwrap_or_else(|| {
            panic!(
                "{entity:?} does not have component `{}`",
                std::any::type_name::<T>()
            )
        })
    }

    /// Mutable counterpart of [`World::get`].
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead or has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.try_get_mut::<T>(entity).unwrap_or_else(|| {
            panic!(
                "{entity:?} does not have component `{}`",
                std::any::type_name::<T>()
            )
        })
    }

    /// The first `T` on the entity, or `None`.
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = component_id::<T>();
        self.record(entity)?
            .components
            .iter()
            .find(|slot| slot.id == id)?
            .downcast_ref::<T>()
    }

    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = component_id::<T>();
        live_mut(&mut self.records, entity)?
            .components
            .iter_mut()
            .find(|slot| slot.id == id)?
            .downcast_mut::<T>()
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.try_get::<T>(entity).is_some()
    }

    /// Every component on the entity, enabled or not, in insertion order.
    pub fn components(&self, entity: Entity) -> impl Iterator<Item = (ComponentId, &dyn Component)> + '_ {
        self.record(entity)
            .into_iter()
            .flat_map(|record| record.components.iter().map(|slot| (slot.id, slot.component())))
    }

    /// Remove the first `T` from the entity.
    ///
    /// Returns `false` if the entity is dead or has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        let id = component_id::<T>();
        let Some(record) = live_mut(&mut self.records, entity) else {
            return false;
        };
        let Some(pos) = record.components.iter().position(|slot| slot.id == id) else {
            return false;
        };

        let slot = record.components.remove(pos);
        if record.enabled && slot.enabled {
            self.index.unindex_component(
                slot.id,
                ComponentKey {
                    entity,
                    serial: slot.serial,
                },
            );
        }
        self.finish_removal(entity, slot);
        true
    }

    /// Remove every component from the entity.
    ///
    /// Safe against [`Component::on_remove`] hooks that remove other
    /// components of the same entity.
    pub fn remove_all_components(&mut self, entity: Entity) {
        let Some(record) = self.record(entity) else {
            return;
        };
        let mut i = record.components.len();

        while i > 0 {
            i -= 1;
            let Some(record) = live_mut(&mut self.records, entity) else {
                return;
            };
            // Earlier hooks may have shrunk the list past our cursor.
            if i >= record.components.len() {
                i = record.components.len();
                continue;
            }

            let slot = record.components.remove(i);
            if record.enabled && slot.enabled {
                self.index.unindex_component(
                    slot.id,
                    ComponentKey {
                        entity,
                        serial: slot.serial,
                    },
                );
            }
            self.finish_removal(entity, slot);
        }
    }

    fn finish_removal(&mut self, owner: Entity, mut slot: ComponentSlot) {
        slot.component_mut().on_remove(self, owner);
    }

    /// Copy the first `T` of `from` onto `to`. The copy keeps the source's
    /// own enabled flag.
    ///
    /// If `to` already has a `T`, the copy takes its place in the component
    /// list: the old value is unindexed, then dropped after its
    /// [`Component::on_remove`] runs. No enable/disable hooks fire on either
    /// value.
    ///
    /// Returns `false` if `from` has no `T` or `T` cannot be duplicated.
    ///
    /// # Panics
    ///
    /// Panics if `to` is dead, or if `T::duplicate` returns another type.
    pub fn copy_component<T: Component>(&mut self, from: Entity, to: Entity) -> bool {
        let id = component_id::<T>();
        let Some(source) = self
            .record(from)
            .and_then(|record| record.components.iter().find(|slot| slot.id == id))
        else {
            return false;
        };
        let source_enabled = source.enabled;
        let Some(copy) = checked_duplicate(self, source, to) else {
            log::warn!(
                "Component `{}` could not be copied; it does not implement `duplicate`",
                std::any::type_name::<T>()
            );
            return false;
        };

        let Some(record) = live_mut(&mut self.records, to) else {
            panic!("Cannot copy a component on dead entity {to:?}");
        };
        let owner_enabled = record.enabled;
        let Some(pos) = record.components.iter().position(|slot| slot.id == id) else {
            let mut slot = ComponentSlot::new(self.next_serial(), copy);
            slot.enabled = source_enabled;
            self.insert_slot(to, slot);
            return true;
        };
        let existing = &mut record.components[pos];

        let key = ComponentKey {
            entity: to,
            serial: existing.serial,
        };
        let was_active = owner_enabled && existing.enabled;
        let mut old = std::mem::replace(&mut existing.value, copy);
        existing.enabled = source_enabled;

        match (was_active, owner_enabled && source_enabled) {
            (true, false) => self.index.unindex_component(id, key),
            (false, true) => self.index.index_component(id, key),
            _ => {}
        }
        old.on_remove(self, to);
        true
    }

    // ── Enable / Disable ─────────────────────────────────────────────

    /// Make the entity, its enabled components and its tags visible to
    /// queries again. Does nothing if it is already enabled.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn enable(&mut self, entity: Entity) {
        let Some(record) = live_mut(&mut self.records, entity) else {
            panic!("Cannot enable dead entity {entity:?}");
        };
        if record.enabled {
            return;
        }

        for slot in record.components.iter_mut().filter(|slot| slot.enabled) {
            self.index.index_component(
                slot.id,
                ComponentKey {
                    entity,
                    serial: slot.serial,
                },
            );
            slot.component_mut().on_enable();
        }
        for &tag in &record.tags {
            self.index.index_entity(tag, entity);
        }

        record.enabled = true;
    }

    /// Hide the entity, its components and its tags from queries without
    /// destroying anything. Does nothing if it is already disabled.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn disable(&mut self, entity: Entity) {
        let Some(record) = live_mut(&mut self.records, entity) else {
            panic!("Cannot disable dead entity {entity:?}");
        };
        if !record.enabled {
            return;
        }

        for slot in record.components.iter_mut().filter(|slot| slot.enabled) {
            self.index.unindex_component(
                slot.id,
                ComponentKey {
                    entity,
                    serial: slot.serial,
                },
            );
            slot.component_mut().on_disable();
        }
        for &tag in &record.tags {
            self.index.unindex_entity(tag, entity);
        }

        record.enabled = false;
    }

    /// Whether the entity is visible to queries. `false` for dead handles.
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.record(entity).is_some_and(|record| record.enabled)
    }

    /// Set the first `T`'s own flag. It becomes visible to queries if the
    /// owner is enabled too.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead or has no `T`.
    pub fn enable_component<T: Component>(&mut self, entity: Entity) {
        self.set_component_enabled::<T>(entity, true);
    }

    /// Clear the first `T`'s own flag, hiding it from queries.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead or has no `T`.
    pub fn disable_component<T: Component>(&mut self, entity: Entity) {
        self.set_component_enabled::<T>(entity, false);
    }

    fn set_component_enabled<T: Component>(&mut self, entity: Entity, enabled: bool) {
        let id = component_id::<T>();
        let Some(record) = live_mut(&mut self.records, entity) else {
            panic!("Cannot toggle a component on dead entity {entity:?}");
        };
        let owner_enabled = record.enabled;
        let Some(slot) = record.components.iter_mut().find(|slot| slot.id == id) else {
            panic!(
                "{entity:?} does not have component `{}`",
                std::any::type_name::<T>()
            );
        };

        // The flag always changes; the index only follows while the owner is enabled.
        let was_enabled = slot.enabled;
        slot.enabled = enabled;
        if !owner_enabled || was_enabled == enabled {
            return;
        }

        let key = ComponentKey {
            entity,
            serial: slot.serial,
        };
        if enabled {
            self.index.index_component(id, key);
            slot.component_mut().on_enable();
        } else {
            self.index.unindex_component(id, key);
            slot.component_mut().on_disable();
        }
    }

    /// The first `T`'s own flag, regardless of the owner. `false` if absent.
    pub fn is_component_enabled<T: Component>(&self, entity: Entity) -> bool {
        let id = component_id::<T>();
        self.record(entity)
            .and_then(|record| record.components.iter().find(|slot| slot.id == id))
            .is_some_and(|slot| slot.enabled)
    }

    /// Whether the first `T` is visible to queries: its own flag and its
    /// owner are both enabled.
    pub fn is_component_active<T: Component>(&self, entity: Entity) -> bool {
        self.is_enabled(entity) && self.is_component_enabled::<T>(entity)
    }

    // ── Tags ─────────────────────────────────────────────────────────

    /// Tag the entity with `T`. Does nothing if the tag is already present.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn tag<T: Tag>(&mut self, entity: Entity) {
        self.tag_id(entity, component_id::<T>());
    }

    /// Tag the entity with every tag of a tuple.
    pub fn tag_all<S: TagSet>(&mut self, entity: Entity) {
        for id in S::ids() {
            self.tag_id(entity, id);
        }
    }

    pub(crate) fn tag_id(&mut self, entity: Entity, id: ComponentId) {
        let Some(record) = live_mut(&mut self.records, entity) else {
            panic!("Cannot tag dead entity {entity:?}");
        };
        if record.tags.contains(&id) {
            return;
        }
        if record.enabled {
            self.index.index_entity(id, entity);
        }
        record.tags.push(id);
    }

    /// Returns `false` if the entity did not have the tag.
    pub fn remove_tag<T: Tag>(&mut self, entity: Entity) -> bool {
        let id = component_id::<T>();
        let Some(record) = live_mut(&mut self.records, entity) else {
            return false;
        };
        let Some(pos) = record.tags.iter().position(|&tag| tag == id) else {
            return false;
        };

        record.tags.swap_remove(pos);
        if record.enabled {
            self.index.unindex_entity(id, entity);
        }
        true
    }

    pub fn remove_all_tags(&mut self, entity: Entity) {
        let Some(record) = live_mut(&mut self.records, entity) else {
            return;
        };
        if record.enabled {
            for &tag in &record.tags {
                self.index.unindex_entity(tag, entity);
            }
        }
        record.tags.clear();
    }

    pub fn has_tag<T: Tag>(&self, entity: Entity) -> bool {
        let id = component_id::<T>();
        self.record(entity)
            .is_some_and(|record| record.tags.contains(&id))
    }

    /// The entity's tag ids; empty for dead handles.
    pub fn tags(&self, entity: Entity) -> &[ComponentId] {
        self.record(entity)
            .map(|record| record.tags.as_slice())
            .unwrap_or(&[])
    }

    /// Remove tag `T` from every entity in the world, enabled or not.
    pub fn global_remove_tag<T: Tag>(&mut self) {
        let id = component_id::<T>();
        for record in self.records.values_mut() {
            if let Some(pos) = record.tags.iter().position(|&tag| tag == id) {
                record.tags.swap_remove(pos);
            }
        }
        self.index.clear_entities(id);
    }

    // ── Duplication ──────────────────────────────────────────────────

    /// Create a copy of `source`.
    ///
    /// The copy gets the same local transform, the same parent (children are
    /// not copied), the same tags, a copy of every component that implements
    /// [`Component::duplicate`], and the same enabled state. Components that
    /// report [`Component::copy_before_siblings`] are copied first; the rest
    /// follow in insertion order. Each copy keeps its source's own enabled
    /// flag.
    ///
    /// # Panics
    ///
    /// Panics if `source` is dead, or if a `duplicate` implementation returns
    /// a different component type.
    pub fn duplicate(&mut self, source: Entity) -> Entity {
        let record = self.expect_record(source, "duplicate");
        let transform = record.transform;
        let parent = record.parent;
        let enabled = record.enabled;
        let propagate_transform = record.propagate_transform;
        let tags = record.tags.clone();

        let mut order: Vec<(u64, bool)> = record
            .components
            .iter()
            .map(|slot| (slot.serial, slot.component().copy_before_siblings()))
            .collect();
        // Stable, so insertion order survives within each group.
        order.sort_by_key(|&(_, first)| !first);

        let copy = self.make_new_with_transform(transform);
        if let Some(record) = live_mut(&mut self.records, copy) {
            record.propagate_transform = propagate_transform;
        }
        // Disabling before anything is attached keeps the copy out of the index.
        if !enabled {
            self.disable(copy);
        }
        if let Some(parent) = parent {
            self.attach(parent, copy);
        }
        for tag in tags {
            self.tag_id(copy, tag);
        }

        // One at a time, so each copy sees the ones attached before it.
        for (serial, _) in order {
            let Some(slot) = self
                .record(source)
                .and_then(|record| record.components.iter().find(|slot| slot.serial == serial))
            else {
                continue;
            };
            let component_enabled = slot.enabled;
            let type_name = slot.component().type_name();

            match checked_duplicate(self, slot, copy) {
                Some(value) => {
                    let mut slot = ComponentSlot::new(self.next_serial(), value);
                    slot.enabled = component_enabled;
                    self.insert_slot(copy, slot);
                }
                None => log::warn!(
                    "Component `{type_name}` on {source:?} could not be copied; it does not implement `duplicate`"
                ),
            }
        }

        log::debug!("Duplicated {source:?} into {copy:?}");
        copy
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Collect a bookkeeping snapshot and reset the spawn/destroy counters.
    #[cfg(feature = "diagnostics")]
    pub fn stats(&mut self) -> WorldStats {
        let (entity_tables, entity_entries) = self.index.entity_table_stats();
        let (component_tables, component_entries) = self.index.component_table_stats();
        let stats = WorldStats {
            alive_entities: self.allocator.alive_count(),
            free_slots: self.allocator.free_count(),
            entity_tables,
            entity_entries,
            component_tables,
            component_entries,
            spawned: self.spawned,
            destroyed: self.destroyed,
        };
        self.spawned = 0;
        self.destroyed = 0;
        stats
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    /// Run every component's teardown hook on shutdown.
    fn drop(&mut self) {
        self.destroy_all();
    }
}

fn live_mut(records: &mut HashMap<u32, EntityRecord>, entity: Entity) -> Option<&mut EntityRecord> {
    records
        .get_mut(&entity.index)
        .filter(|record| record.entity == entity)
}

/// Duplicate a slot's value for `new_owner`, asserting the copy has the same
/// concrete type.
fn checked_duplicate(world: &World, slot: &ComponentSlot, new_owner: Entity) -> Option<Box<dyn Component>> {
    let source = slot.component();
    let copy = source.duplicate(world, new_owner)?;
    let copied: &dyn Component = &*copy;
    assert!(
        copied.component_id() == slot.id,
        "Assignment between incompatible components: `{}` duplicated into `{}`",
        source.type_name(),
        copied.type_name()
    );
    Some(copy)
}

// ── Bundles (tuple support) ─────────────────────────────────────────────

/// A tuple of components that can be attached in one call.
///
/// Implemented for tuples of up to 8 components.
pub trait Bundle {
    fn add_to(self, world: &mut World, entity: Entity);
}

/// A tuple of tag types, see [`World::tag_all`].
pub trait TagSet {
    fn ids() -> Vec<ComponentId>;
}

macro_rules! impl_bundle {
    ($($T:ident),+) => {
        impl<$($T: Component),+> Bundle for ($($T,)+) {
            #[allow(non_snake_case)]
            fn add_to(self, world: &mut World, entity: Entity) {
                let ($($T,)+) = self;
                $(
                    world.add(entity, $T);
                )+
            }
        }

        impl<$($T: Tag),+> TagSet for ($($T,)+) {
            fn ids() -> Vec<ComponentId> {
                vec![$(component_id::<$T>()),+]
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
