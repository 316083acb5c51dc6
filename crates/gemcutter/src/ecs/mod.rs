//! # Entity/Component Core
//!
//! Entities are handles into a [`World`]. Components are arbitrary `'static`
//! types attached to them, tags are payload-free markers, and a secondary
//! index answers "which enabled entities have X?" without scanning.
//!
//! ## Module Overview
//!
//! - [`entity`] — Generational entity handles
//! - [`component`] — Component trait, tags, and process-wide type ids
//! - `index` — Sorted entity tables and component instance tables
//! - [`world`] — Entity records, component/tag management, enable/disable
//! - [`query`] — Iterators over the index
//! - [`hierarchy`] — Parent/child links and world transforms
//! - [`group`] — Hand-maintained entity sets

pub mod component;
pub mod entity;
pub mod group;
pub mod hierarchy;
pub(crate) mod index;
pub mod query;
pub mod world;

pub use component::{AnyComponent, Component, ComponentId, ComponentKey, Tag, component_id, component_name};
pub use entity::Entity;
pub use group::EntityGroup;
pub use hierarchy::HierarchyError;
pub use query::{All, Distinct, QuerySet};
#[cfg(feature = "diagnostics")]
pub use world::WorldStats;
pub use world::{Bundle, TagSet, World};
