//! # Entity — Handles to Scene Objects
//!
//! An [`Entity`] is a small copyable handle. The [`World`](super::World) owns
//! the record behind it: components, tags, transform, and hierarchy links.
//! Handles can only be produced by the world's factory functions
//! ([`World::make_new`](super::World::make_new) and friends), so there is no
//! way to build an entity outside of a world.
//!
//! ## Generations
//!
//! Slots are recycled after [`World::destroy`](super::World::destroy). Each
//! slot carries a generation counter that is bumped on release, so a stale
//! handle to a destroyed entity never aliases the entity that reuses its slot:
//!
//! ```text
//! Entity { index: 5, generation: 0 }  ← original
//! Entity { index: 5, generation: 1 }  ← after recycle
//! ```
//!
//! ## Ordering
//!
//! Handles are totally ordered by `(index, generation)`. The entity index keeps
//! its tables sorted by this order, which is what makes binary-search
//! insert/remove and merge-style intersection of several tables possible. The
//! order depends only on slot allocation, never on memory addresses.

use std::fmt;

/// A lightweight handle to an entity in a [`World`](super::World).
///
/// Only valid for the world that created it, and only while its generation
/// matches the slot's current generation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    /// Slot index in the allocator. Recycled after destruction.
    pub(crate) index: u32,
    /// Bumped each time the slot is released.
    pub(crate) generation: u32,
}

impl Entity {
    /// Returns the raw slot index. Useful for diagnostics, not for general use.
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Hands out entity slots and recycles released ones.
///
/// ```text
/// generations: [0, 1, 0, 2, 0]   ← one generation per slot ever allocated
/// free_list:   [1, 3]             ← slots available for reuse
/// ```
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl EntityAllocator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Allocate a handle, reusing a released slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            // The generation was already bumped on release.
            let generation = self.generations[index as usize];
            Entity { index, generation }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Release a handle. Returns `false` if it was already stale.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free_list.push(entity.index);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&generation| generation == entity.generation)
    }

    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = EntityAllocator::with_capacity(4);
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        assert_eq!((e0.index, e0.generation), (0, 0));
        assert_eq!((e1.index, e1.generation), (1, 0));
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut alloc = EntityAllocator::with_capacity(0);
        let e0 = alloc.allocate();
        assert!(alloc.deallocate(e0));
        let reused = alloc.allocate();
        assert_eq!(reused.index, 0);
        assert_eq!(reused.generation, 1);
        assert_ne!(reused, e0);
    }

    #[test]
    fn stale_handle_and_double_free() {
        let mut alloc = EntityAllocator::with_capacity(0);
        let e0 = alloc.allocate();
        assert!(alloc.is_alive(e0));
        assert!(alloc.deallocate(e0));
        assert!(!alloc.is_alive(e0));
        assert!(!alloc.deallocate(e0));
    }

    #[test]
    fn counts() {
        let mut alloc = EntityAllocator::with_capacity(0);
        let e0 = alloc.allocate();
        let _e1 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);
        alloc.deallocate(e0);
        assert_eq!(alloc.alive_count(), 1);
        assert_eq!(alloc.free_count(), 1);
    }

    #[test]
    fn ordering_is_by_index_then_generation() {
        let a = Entity { index: 1, generation: 5 };
        let b = Entity { index: 2, generation: 0 };
        let c = Entity { index: 2, generation: 1 };
        assert!(a < b);
        assert!(b < c);

        let mut handles = vec![c, a, b];
        handles.sort();
        assert_eq!(handles, vec![a, b, c]);
    }

    #[test]
    fn debug_and_display() {
        let e = Entity { index: 3, generation: 2 };
        assert_eq!(format!("{e:?}"), "Entity(3v2)");
        assert_eq!(format!("{e}"), "3v2");
    }
}
