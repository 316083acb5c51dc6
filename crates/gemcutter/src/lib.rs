//! # Gemcutter — Entity/Component Core
//!
//! The scene-object layer of the gemcutter engine: entities with a local
//! transform and a parent/child hierarchy, arbitrary components and tags
//! attached to them, and index-backed queries over everything that is
//! currently enabled.
//!
//! Start with `use gemcutter::prelude::*` and create a
//! [`World`](ecs::World).

pub mod ecs;
pub mod math;
pub mod name;
pub mod prelude;
pub mod settings;
