//! # Component — Type Identity and Type-Erased Slots
//!
//! Components are the data and behaviour attached to an entity: a light, a
//! name, a sound source. The [`World`](super::World) stores *any* component
//! type without knowing it at compile time, so every component lives in a
//! [`ComponentSlot`] as a `Box<dyn Component>`.
//!
//! ## Type ids
//!
//! Both indices are keyed by a small integer per concrete type, the
//! [`ComponentId`]. Ids are handed out lazily by [`component_id`] the first
//! time a type is seen, starting at 1, and cached in a process-wide table
//! keyed by [`TypeId`]. Components and [`Tag`]s share the same id space.
//!
//! ```text
//! component_id::<Light>()  → ComponentId(1)   first use assigns
//! component_id::<Enemy>()  → ComponentId(2)
//! component_id::<Light>()  → ComponentId(1)   cached
//! ```
//!
//! The table sits behind an `RwLock`; the common path is a shared read.
//!
//! ## Copying
//!
//! [`World::duplicate`](super::World::duplicate) copies every component of an
//! entity without naming their concrete types. Each component type opts in by
//! returning a boxed copy of itself from [`Component::duplicate`]; types that
//! return `None` are skipped with a warning. The hook sees the world and the
//! entity receiving the copy, including every component copied onto it so far.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{LazyLock, PoisonError, RwLock};

use super::entity::Entity;
use super::world::World;

/// A process-wide unique identifier for a component or tag type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u32);

impl ComponentId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({}: {})", self.0, component_name(*self))
    }
}

#[derive(Default)]
struct TypeTable {
    ids: HashMap<TypeId, ComponentId>,
    names: HashMap<ComponentId, &'static str>,
}

static TYPE_TABLE: LazyLock<RwLock<TypeTable>> = LazyLock::new(Default::default);
static NEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Returns the [`ComponentId`] of `T`, assigning one on first use.
///
/// Stable for the lifetime of the process and never shared between two types.
pub fn component_id<T: 'static>() -> ComponentId {
    let type_id = TypeId::of::<T>();
    {
        let table = TYPE_TABLE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(&id) = table.ids.get(&type_id) {
            return id;
        }
    }

    let mut table = TYPE_TABLE.write().unwrap_or_else(PoisonError::into_inner);
    // Another thread may have registered the type between the two locks.
    if let Some(&id) = table.ids.get(&type_id) {
        return id;
    }
    let id = ComponentId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
    table.ids.insert(type_id, id);
    table.names.insert(id, std::any::type_name::<T>());
    id
}

/// The Rust type name recorded for `id`, or `"<unknown>"`.
pub fn component_name(id: ComponentId) -> &'static str {
    TYPE_TABLE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names
        .get(&id)
        .copied()
        .unwrap_or("<unknown>")
}

/// Object-safe access to the concrete type behind a `dyn Component`.
///
/// Implemented for every `'static` type; you never implement it by hand.
pub trait AnyComponent: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// The [`ComponentId`] of the concrete type.
    fn component_id(&self) -> ComponentId;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AnyComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn component_id(&self) -> ComponentId {
        component_id::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Data or behaviour attached to an entity.
///
/// All hooks have no-op defaults, so a plain data type only needs an empty
/// impl:
///
/// ```ignore
/// #[derive(Clone)]
/// struct Light { color: Vec3 }
///
/// impl Component for Light {
///     fn duplicate(&self, _world: &World, _new_owner: Entity) -> Option<Box<dyn Component>> {
///         Some(Box::new(self.clone()))
///     }
/// }
/// ```
pub trait Component: AnyComponent {
    /// Called when the component becomes visible to queries because it or its
    /// owner was enabled. Not called on [`World::add`](super::World::add).
    fn on_enable(&mut self) {}

    /// Called when the component stops being visible to queries because it or
    /// its owner was disabled. Not called on removal.
    fn on_disable(&mut self) {}

    /// Called after the component has been unindexed and detached from
    /// `owner`, right before it is dropped. The world is fully usable here,
    /// including removing other components from `owner`.
    fn on_remove(&mut self, _world: &mut World, _owner: Entity) {}

    /// A boxed copy of this component for `new_owner`, or `None` if it cannot
    /// be copied.
    ///
    /// Called after the components copied earlier have been attached to
    /// `new_owner`, so the copy can inspect them through `world`. The returned
    /// value must be of the same concrete type.
    fn duplicate(&self, _world: &World, _new_owner: Entity) -> Option<Box<dyn Component>> {
        None
    }

    /// Components returning `true` are copied before their siblings during
    /// [`World::duplicate`](super::World::duplicate), so the copies that follow
    /// find them on the new entity (e.g. a material that later components
    /// configure themselves from).
    fn copy_before_siblings(&self) -> bool {
        false
    }
}

/// A zero-payload marker used to categorize entities.
///
/// Tags share the component id space but are only ever indexed by entity;
/// they have no instance to fetch.
pub trait Tag: 'static {}

/// Identifies a single component instance in the component index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentKey {
    pub entity: Entity,
    pub(crate) serial: u64,
}

/// One component owned by an entity.
pub(crate) struct ComponentSlot {
    pub id: ComponentId,
    /// World-unique instance number, referenced by the component index.
    pub serial: u64,
    /// The component's own flag, independent of the owner.
    pub enabled: bool,
    pub value: Box<dyn Component>,
}

impl ComponentSlot {
    pub fn new(serial: u64, value: Box<dyn Component>) -> Self {
        let component: &dyn Component = &*value;
        Self {
            id: component.component_id(),
            serial,
            enabled: true,
            value,
        }
    }

    pub fn component(&self) -> &dyn Component {
        &*self.value
    }

    pub fn component_mut(&mut self) -> &mut dyn Component {
        &mut *self.value
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.component().as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component_mut().as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;
    struct Gamma;
    impl Component for Alpha {}
    impl Tag for Gamma {}

    #[test]
    fn ids_are_stable_and_distinct() {
        let a = component_id::<Alpha>();
        let b = component_id::<Beta>();
        let g = component_id::<Gamma>();

        assert_eq!(a, component_id::<Alpha>());
        assert_eq!(b, component_id::<Beta>());
        assert_ne!(a, b);
        assert_ne!(a, g);
        assert_ne!(b, g);
        assert!(a.get() >= 1 && b.get() >= 1 && g.get() >= 1);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        struct Late0;
        struct Late1;
        struct Late2;
        struct Late3;

        let handles = vec![
            std::thread::spawn(component_id::<Late0>),
            std::thread::spawn(component_id::<Late1>),
            std::thread::spawn(component_id::<Late2>),
            std::thread::spawn(component_id::<Late3>),
        ];
        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn names_are_recorded() {
        let id = component_id::<Alpha>();
        assert!(component_name(id).ends_with("Alpha"));
        assert!(format!("{id:?}").contains("Alpha"));
    }

    #[test]
    fn slot_downcasts_to_concrete_type() {
        let mut slot = ComponentSlot::new(7, Box::new(Alpha));
        assert_eq!(slot.id, component_id::<Alpha>());
        assert!(slot.enabled);
        assert!(slot.downcast_ref::<Alpha>().is_some());
        assert!(slot.downcast_mut::<Alpha>().is_some());
    }

    #[test]
    fn dyn_component_reports_concrete_identity() {
        let mut world = World::new();
        let owner = world.make_new();
        let boxed: Box<dyn Component> = Box::new(Alpha);
        let component: &dyn Component = &*boxed;
        assert_eq!(component.component_id(), component_id::<Alpha>());
        assert!(component.type_name().ends_with("Alpha"));
        assert!(component.duplicate(&world, owner).is_none());
        assert!(!component.copy_before_siblings());
    }
}
