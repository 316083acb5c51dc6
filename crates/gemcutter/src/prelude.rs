//! Convenience re-exports — `use gemcutter::prelude::*` for the common items.

pub use crate::ecs::{
    Bundle, Component, ComponentId, Entity, EntityGroup, HierarchyError, QuerySet, Tag, TagSet,
    World, component_id,
};
#[cfg(feature = "diagnostics")]
pub use crate::ecs::WorldStats;
pub use crate::math::{Mat4, Quat, Transform, Vec3, Vec4};
pub use crate::name::{Name, find_child, find_entity, log_scene_graph};
pub use crate::settings::{SettingsError, WorldSettings};
