//! # Entity Hierarchies — Parent/Child Relationships
//!
//! Every entity carries a local [`Transform`] and optional parent/children
//! links. The world transform is composed on demand by walking up the chain:
//!
//! ```text
//! world(child) = world(parent) * local(child)
//! ```
//!
//! A parent with `propagate_transform == false` does not contribute, so its
//! children are positioned as if they were roots.
//!
//! ## Usage
//!
//! ```ignore
//! let parent = world.make_new();
//! let child = world.create_child(parent);
//! world.transform_mut(child).translation = Vec3::X;
//! world.transform_mut(parent).translation = Vec3::new(5.0, 0.0, 0.0);
//! assert_eq!(world.world_position(child), Vec3::new(6.0, 0.0, 0.0));
//! ```
//!
//! Destroying a parent destroys its children, see
//! [`World::destroy`](super::World::destroy).

use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::math::{Mat4, Quat, Transform, Vec3};

/// Why [`World::add_child`] refused to link two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),
    #[error("entity {0} cannot be its own parent")]
    SelfParent(Entity),
    #[error("entity {child} is already a child of {parent}")]
    AlreadyChild { parent: Entity, child: Entity },
    #[error("making {child} a child of {parent} would create a cycle")]
    Cycle { parent: Entity, child: Entity },
}

impl World {
    // ── Transform access ─────────────────────────────────────────────

    /// The entity's local transform.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn transform(&self, entity: Entity) -> &Transform {
        &self.expect_record(entity, "read the transform").transform
    }

    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn transform_mut(&mut self, entity: Entity) -> &mut Transform {
        &mut self.expect_record_mut(entity, "write the transform").transform
    }

    /// Whether children compose their transform with this entity's.
    pub fn set_propagate_transform(&mut self, entity: Entity, propagate: bool) {
        self.expect_record_mut(entity, "set transform propagation")
            .propagate_transform = propagate;
    }

    pub fn propagates_transform(&self, entity: Entity) -> bool {
        self.record(entity)
            .is_some_and(|record| record.propagate_transform)
    }

    /// The parent whose transform this entity's local transform is relative to.
    fn propagating_parent(&self, entity: Entity) -> Option<Entity> {
        self.record(entity)
            .and_then(|record| record.parent)
            .and_then(|parent| self.record(parent))
            .filter(|parent| parent.propagate_transform)
            .map(|parent| parent.entity)
    }

    /// The space the entity's local transform is expressed in.
    fn parent_world_transform(&self, entity: Entity) -> Mat4 {
        self.propagating_parent(entity)
            .map_or(Mat4::IDENTITY, |parent| self.world_transform(parent))
    }

    /// Local transform composed with every propagating ancestor. Computed on
    /// each call.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn world_transform(&self, entity: Entity) -> Mat4 {
        let local = self.transform(entity).matrix();
        self.parent_world_transform(entity) * local
    }

    /// Local rotation composed with every propagating ancestor's rotation.
    /// Ancestor scale is ignored, so a non-uniform scale never skews it.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead.
    pub fn world_rotation(&self, entity: Entity) -> Quat {
        let local = self.transform(entity).rotation;
        match self.propagating_parent(entity) {
            Some(parent) => (self.world_rotation(parent) * local).normalize(),
            None => local,
        }
    }

    pub fn world_position(&self, entity: Entity) -> Vec3 {
        self.world_transform(entity).w_axis.truncate()
    }

    /// Move the entity to `position` and face `target`, both in the entity's
    /// local (parent) space.
    pub fn look_at(&mut self, entity: Entity, position: Vec3, target: Vec3, up: Vec3) {
        self.transform_mut(entity).look_at(position, target, up);
    }

    /// Face another entity, wherever it sits in the hierarchy.
    ///
    /// # Panics
    ///
    /// Panics if either entity is dead or if `entity == target`.
    pub fn look_at_entity(&mut self, entity: Entity, target: Entity, up: Vec3) {
        assert!(entity != target, "{entity:?} cannot look at itself");

        let target_world = self.world_position(target);
        let target_local = self
            .parent_world_transform(entity)
            .inverse()
            .transform_point3(target_world);
        let position = self.transform(entity).translation;
        self.look_at(entity, position, target_local, up);
    }

    // ── Links ────────────────────────────────────────────────────────

    /// Make `child` a child of `parent`, detaching it from any previous
    /// parent first.
    pub fn add_child(&mut self, parent: Entity, child: Entity) -> Result<(), HierarchyError> {
        for entity in [parent, child] {
            if !self.is_alive(entity) {
                return Err(HierarchyError::DeadEntity(entity));
            }
        }
        if parent == child {
            return Err(HierarchyError::SelfParent(child));
        }
        if self.parent(child) == Some(parent) {
            return Err(HierarchyError::AlreadyChild { parent, child });
        }
        if self.is_descendant_of(parent, child) {
            return Err(HierarchyError::Cycle { parent, child });
        }

        self.detach_from_parent(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Link two live entities that are known not to be linked yet.
    pub(crate) fn attach(&mut self, parent: Entity, child: Entity) {
        if let Some(record) = self.record_mut(child) {
            record.parent = Some(parent);
        }
        if let Some(record) = self.record_mut(parent) {
            record.children.push(child);
        }
        log::debug!("Attached {child:?} to {parent:?}");
    }

    /// Returns `false` if `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: Entity, child: Entity) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach_from_parent(child)
    }

    /// Turn the entity into a root. Returns `false` if it had no parent.
    pub fn detach_from_parent(&mut self, child: Entity) -> bool {
        let Some(parent) = self.record_mut(child).and_then(|record| record.parent.take()) else {
            return false;
        };
        if let Some(record) = self.record_mut(parent) {
            record.children.retain(|&c| c != child);
        }
        log::debug!("Detached {child:?} from {parent:?}");
        true
    }

    /// Detach every child, leaving them alive as roots.
    pub fn clear_children(&mut self, parent: Entity) {
        let children = match self.record_mut(parent) {
            Some(record) => std::mem::take(&mut record.children),
            None => return,
        };
        for child in children {
            if let Some(record) = self.record_mut(child) {
                record.parent = None;
            }
        }
    }

    /// Create a new entity as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is dead.
    pub fn create_child(&mut self, parent: Entity) -> Entity {
        self.expect_record(parent, "create a child");
        let child = self.make_new();
        self.attach(parent, child);
        child
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.record(entity).and_then(|record| record.parent)
    }

    /// Direct children in attachment order; empty for dead handles.
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.record(entity)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    /// The topmost ancestor, or the entity itself if it is a root.
    pub fn root(&self, entity: Entity) -> Entity {
        let mut current = entity;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Number of ancestors; 0 for roots.
    pub fn depth(&self, entity: Entity) -> usize {
        std::iter::successors(self.parent(entity), |&e| self.parent(e)).count()
    }

    pub fn is_root(&self, entity: Entity) -> bool {
        self.parent(entity).is_none()
    }

    pub fn is_leaf(&self, entity: Entity) -> bool {
        self.children(entity).is_empty()
    }

    pub fn is_child_of(&self, entity: Entity, parent: Entity) -> bool {
        self.parent(entity) == Some(parent)
    }

    /// Whether `ancestor` appears anywhere above `entity`.
    pub fn is_descendant_of(&self, entity: Entity, ancestor: Entity) -> bool {
        std::iter::successors(self.parent(entity), |&e| self.parent(e)).any(|e| e == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn moving_parent_moves_child() {
        let mut world = World::new();
        let parent = world.make_new();
        let child = world.create_child(parent);
        world.transform_mut(child).translation = Vec3::new(1.0, 0.0, 0.0);

        world.transform_mut(parent).translation = Vec3::new(5.0, 0.0, 0.0);
        assert!(approx(world.world_position(child), Vec3::new(6.0, 0.0, 0.0)));
        assert!(approx(world.transform(child).translation, Vec3::X));
    }

    #[test]
    fn deep_hierarchy_composes() {
        let mut world = World::new();
        let a = world.make_new_with_transform(Transform::from_xyz(1.0, 0.0, 0.0));
        let b = world.create_child(a);
        *world.transform_mut(b) = Transform::from_xyz(2.0, 0.0, 0.0);
        let c = world.create_child(b);
        *world.transform_mut(c) = Transform::from_xyz(3.0, 0.0, 0.0);

        assert!(approx(world.world_position(c), Vec3::new(6.0, 0.0, 0.0)));
        assert_eq!(world.depth(c), 2);
        assert_eq!(world.root(c), a);
        assert!(world.is_descendant_of(c, a));
        assert!(!world.is_child_of(c, a));
        assert!(world.is_leaf(c));
        assert!(!world.is_leaf(a));
    }

    #[test]
    fn rotation_and_scale_propagate() {
        let mut world = World::new();
        let parent = world.make_new();
        world.transform_mut(parent).rotate_z(90.0);
        world.transform_mut(parent).scale = Vec3::splat(2.0);
        let child = world.create_child(parent);
        world.transform_mut(child).translation = Vec3::X;

        assert!(approx(world.world_position(child), Vec3::new(0.0, 2.0, 0.0)));
        let forward = world.world_rotation(child) * Vec3::X;
        assert!(approx(forward, Vec3::Y));
    }

    #[test]
    fn world_rotation_ignores_non_uniform_parent_scale() {
        let mut world = World::new();
        let parent = world.make_new();
        world.transform_mut(parent).scale = Vec3::new(4.0, 1.0, 1.0);
        let child = world.create_child(parent);
        world.transform_mut(child).rotate_z(45.0);

        let local = world.transform(child).rotation;
        let rotation = world.world_rotation(child);
        assert!(rotation.angle_between(local) < 1e-4);
        assert!((rotation.length() - 1.0).abs() < 1e-5);

        world.transform_mut(parent).rotate_x(90.0);
        let expected = world.transform(parent).rotation * local;
        assert!(world.world_rotation(child).angle_between(expected) < 1e-4);

        world.set_propagate_transform(parent, false);
        assert!(world.world_rotation(child).angle_between(local) < 1e-4);
    }

    #[test]
    fn non_propagating_parent_is_skipped() {
        let mut world = World::new();
        let parent = world.make_new_with_transform(Transform::from_xyz(10.0, 0.0, 0.0));
        let child = world.create_child(parent);
        world.transform_mut(child).translation = Vec3::Y;

        world.set_propagate_transform(parent, false);
        assert!(!world.propagates_transform(parent));
        assert!(approx(world.world_position(child), Vec3::Y));

        world.set_propagate_transform(parent, true);
        assert!(approx(world.world_position(child), Vec3::new(10.0, 1.0, 0.0)));
    }

    #[test]
    fn add_child_reparents() {
        let mut world = World::new();
        let a = world.make_new();
        let b = world.make_new();
        let child = world.create_child(a);

        assert_eq!(world.add_child(b, child), Ok(()));
        assert_eq!(world.parent(child), Some(b));
        assert!(world.children(a).is_empty());
        assert_eq!(world.children(b), &[child]);
    }

    #[test]
    fn add_child_rejects_bad_links() {
        let mut world = World::new();
        let a = world.make_new();
        let b = world.create_child(a);
        let c = world.create_child(b);
        let dead = world.make_new();
        world.destroy(dead);

        assert_eq!(world.add_child(a, a), Err(HierarchyError::SelfParent(a)));
        assert_eq!(
            world.add_child(a, b),
            Err(HierarchyError::AlreadyChild { parent: a, child: b })
        );
        assert_eq!(
            world.add_child(c, a),
            Err(HierarchyError::Cycle { parent: c, child: a })
        );
        assert_eq!(world.add_child(a, dead), Err(HierarchyError::DeadEntity(dead)));
        assert_eq!(world.add_child(dead, a), Err(HierarchyError::DeadEntity(dead)));

        let message = HierarchyError::SelfParent(a).to_string();
        assert!(message.contains("own parent"));
    }

    #[test]
    fn detach_and_clear() {
        let mut world = World::new();
        let parent = world.make_new_with_transform(Transform::from_xyz(3.0, 0.0, 0.0));
        let a = world.create_child(parent);
        let b = world.create_child(parent);
        let stranger = world.make_new();

        assert!(!world.remove_child(stranger, a));
        assert!(world.remove_child(parent, a));
        assert!(world.is_root(a));
        assert!(!world.detach_from_parent(a));
        assert!(approx(world.world_position(a), Vec3::ZERO));

        world.clear_children(parent);
        assert!(world.is_root(b));
        assert!(world.is_leaf(parent));
        assert!(world.is_alive(b));
    }

    #[test]
    fn destroy_cascades_to_children() {
        let mut world = World::new();
        let parent = world.make_new();
        let child = world.create_child(parent);
        let grandchild = world.create_child(child);
        let sibling = world.create_child(parent);

        world.destroy(child);
        assert!(!world.is_alive(child));
        assert!(!world.is_alive(grandchild));
        assert_eq!(world.children(parent), &[sibling]);

        world.destroy(parent);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn duplicate_joins_same_parent_without_children() {
        let mut world = World::new();
        let parent = world.make_new();
        let original = world.create_child(parent);
        world.create_child(original);

        let copy = world.duplicate(original);
        assert_eq!(world.parent(copy), Some(parent));
        assert_eq!(world.children(parent), &[original, copy]);
        assert!(world.is_leaf(copy));
    }

    #[test]
    fn look_at_entity_faces_target_in_world_space() {
        let mut world = World::new();
        let rig = world.make_new_with_transform(Transform::from_xyz(0.0, 0.0, 10.0));
        let camera = world.create_child(rig);
        let target = world.make_new_with_transform(Transform::from_xyz(0.0, 0.0, -5.0));

        world.look_at_entity(camera, target, Vec3::Y);
        let forward = world.world_rotation(camera) * Vec3::NEG_Z;
        assert!(approx(forward, Vec3::NEG_Z));

        // The target sits to the camera's right once the rig moves left.
        world.transform_mut(rig).translation = Vec3::new(-10.0, 0.0, -5.0);
        world.look_at_entity(camera, target, Vec3::Y);
        let forward = world.world_rotation(camera) * Vec3::NEG_Z;
        assert!(approx(forward, Vec3::X));
    }

    #[test]
    fn look_at_sets_local_pose() {
        let mut world = World::new();
        let e = world.make_new();
        world.look_at(e, Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(approx(world.transform(e).translation, Vec3::new(5.0, 0.0, 0.0)));
        assert!(approx(world.transform(e).rotation * Vec3::NEG_Z, Vec3::NEG_X));
    }

    #[test]
    #[should_panic(expected = "cannot look at itself")]
    fn look_at_self_panics() {
        let mut world = World::new();
        let e = world.make_new();
        world.look_at_entity(e, e, Vec3::Y);
    }
}
