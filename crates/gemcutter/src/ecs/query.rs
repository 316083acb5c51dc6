//! # Query — Finding Entities by Component Type
//!
//! Queries read straight from the world's [`Index`](super::index), so their
//! cost depends on how many entities match, not on how many exist.
//!
//! ```text
//! world.all::<Light>()               → (Entity, &Light) per active Light
//! world.with::<Enemy>()              → Entity per entity tagged/owning Enemy
//! world.with_all::<(Light, Enemy)>() → Entity that has both
//! ```
//!
//! ## Live views and snapshots
//!
//! The iterators borrow the world, so the borrow checker rules out adding,
//! removing, enabling or disabling anything while one is alive. When the loop
//! body needs to mutate the world, take a snapshot first with
//! [`World::capture_with`] and iterate the returned `Vec`.
//!
//! ## Intersections
//!
//! [`World::with_all`] walks the smallest entity table and binary-searches
//! the others, which are kept sorted by the index. An entity that owns
//! several instances of a type appears once in the result.

use std::marker::PhantomData;

use super::component::{Component, ComponentId, ComponentKey, component_id};
use super::entity::Entity;
use super::world::World;

/// A tuple of component or tag types, see [`World::with_all`].
pub trait QuerySet {
    fn ids() -> Vec<ComponentId>;
}

macro_rules! impl_query_set {
    ($($T:ident),+) => {
        impl<$($T: 'static),+> QuerySet for ($($T,)+) {
            fn ids() -> Vec<ComponentId> {
                vec![$(component_id::<$T>()),+]
            }
        }
    };
}

impl_query_set!(A);
impl_query_set!(A, B);
impl_query_set!(A, B, C);
impl_query_set!(A, B, C, D);
impl_query_set!(A, B, C, D, E);
impl_query_set!(A, B, C, D, E, F);
impl_query_set!(A, B, C, D, E, F, G);
impl_query_set!(A, B, C, D, E, F, G, H);

/// Iterator returned by [`World::all`].
pub struct All<'w, T> {
    world: &'w World,
    keys: std::slice::Iter<'w, ComponentKey>,
    _marker: PhantomData<fn() -> T>,
}

impl<'w, T: Component> Iterator for All<'w, T> {
    type Item = (Entity, &'w T);

    fn next(&mut self) -> Option<Self::Item> {
        let world = self.world;
        self.keys.find_map(|key| {
            let slot = world
                .record(key.entity)?
                .components
                .iter()
                .find(|slot| slot.serial == key.serial)?;
            Some((key.entity, slot.downcast_ref::<T>()?))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.keys.size_hint().1)
    }
}

/// Yields each entity of a sorted table once.
pub struct Distinct<'w> {
    entities: &'w [Entity],
    last: Option<Entity>,
}

impl<'w> Distinct<'w> {
    fn new(entities: &'w [Entity]) -> Self {
        Self {
            entities,
            last: None,
        }
    }
}

impl Iterator for Distinct<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        while let Some((&first, rest)) = self.entities.split_first() {
            self.entities = rest;
            if self.last != Some(first) {
                self.last = Some(first);
                return Some(first);
            }
        }
        None
    }
}

impl World {
    /// Every active `T` instance together with its owner.
    ///
    /// An entity with two `T`s is yielded twice. Order is unspecified.
    pub fn all<T: Component>(&self) -> All<'_, T> {
        All {
            world: self,
            keys: self.index.components(component_id::<T>()).iter(),
            _marker: PhantomData,
        }
    }

    /// Run `f` on every active `T` instance.
    pub fn for_each_mut<T: Component>(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        for key in self.index.components(component_id::<T>()) {
            let Some(record) = self
                .records
                .get_mut(&key.entity.index)
                .filter(|record| record.entity == key.entity)
            else {
                continue;
            };
            if let Some(component) = record
                .components
                .iter_mut()
                .find(|slot| slot.serial == key.serial)
                .and_then(|slot| slot.downcast_mut::<T>())
            {
                f(key.entity, component);
            }
        }
    }

    /// Every enabled entity that owns an active `T` or carries tag `T`.
    ///
    /// Yielded in handle order, each entity once.
    pub fn with<T: 'static>(&self) -> Distinct<'_> {
        Distinct::new(self.index.entities(component_id::<T>()))
    }

    /// Every enabled entity that matches all types of `Q`.
    ///
    /// ```ignore
    /// for e in world.with_all::<(Light, Enemy)>() { /* ... */ }
    /// ```
    pub fn with_all<Q: QuerySet>(&self) -> impl Iterator<Item = Entity> + '_ {
        let mut tables: Vec<&[Entity]> = Q::ids()
            .into_iter()
            .map(|id| self.index.entities(id))
            .collect();

        let smallest = match (0..tables.len()).min_by_key(|&i| tables[i].len()) {
            Some(i) => tables.swap_remove(i),
            None => &[][..],
        };

        Distinct::new(smallest)
            .filter(move |entity| tables.iter().all(|table| table.binary_search(entity).is_ok()))
    }

    /// A snapshot of [`World::with_all`] that does not borrow the world.
    pub fn capture_with<Q: QuerySet>(&self) -> Vec<Entity> {
        self.with_all::<Q>().collect()
    }

    /// The raw component table for `T`: one key per active instance.
    pub fn component_index<T: Component>(&self) -> &[ComponentKey] {
        self.index.components(component_id::<T>())
    }

    /// The raw, sorted entity table for `T`.
    pub fn entity_index<T: 'static>(&self) -> &[Entity] {
        self.index.entities(component_id::<T>())
    }
}
