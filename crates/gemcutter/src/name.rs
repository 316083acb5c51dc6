//! Human-readable entity names and scene-graph utilities.
//!
//! ```ignore
//! let player = world.make_new_named("Player");
//! let weapon = world.create_named_child(player, "Sword");
//! assert_eq!(find_child(&world, player, "Sword"), Some(weapon));
//! log_scene_graph(&world);
//! ```

use std::fmt;

use crate::ecs::{Component, Entity, World};

/// A display name. Not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Component for Name {
    /// Copies are suffixed with `_Copy` so they can be told apart.
    fn duplicate(&self, _world: &World, _new_owner: Entity) -> Option<Box<dyn Component>> {
        Some(Box::new(Name(format!("{}_Copy", self.0))))
    }
}

impl World {
    /// Create an entity with a [`Name`].
    pub fn make_new_named(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.make_new();
        self.add(entity, Name::new(name));
        entity
    }

    /// Create a named entity as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is dead.
    pub fn create_named_child(&mut self, parent: Entity, name: impl Into<String>) -> Entity {
        let child = self.create_child(parent);
        self.add(child, Name::new(name));
        child
    }

    /// The entity's first [`Name`], if it has one.
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.try_get::<Name>(entity).map(Name::as_str)
    }
}

/// The first enabled entity with an active [`Name`] equal to `name`.
pub fn find_entity(world: &World, name: &str) -> Option<Entity> {
    world
        .all::<Name>()
        .find(|(_, n)| n.as_str() == name)
        .map(|(entity, _)| entity)
}

/// Search below `root` for a descendant named `name`.
///
/// Direct children are checked before any grandchild, then each child's
/// subtree is searched in order.
pub fn find_child(world: &World, root: Entity, name: &str) -> Option<Entity> {
    let children = world.children(root);
    children
        .iter()
        .copied()
        .find(|&child| world.name(child) == Some(name))
        .or_else(|| {
            children
                .iter()
                .find_map(|&child| find_child(world, child, name))
        })
}

/// One line per entity, roots in handle order, children indented below
/// their parent:
///
/// ```text
/// |- Player
///   |- Sword
///   |- NO_NAME
/// |- Camera
/// ```
pub fn scene_graph_lines(world: &World) -> Vec<String> {
    let mut roots: Vec<Entity> = world.entities().filter(|&e| world.is_root(e)).collect();
    roots.sort();

    let mut lines = Vec::new();
    for root in roots {
        push_lines(world, root, 0, &mut lines);
    }
    lines
}

fn push_lines(world: &World, entity: Entity, depth: usize, lines: &mut Vec<String>) {
    let name = world.name(entity).unwrap_or("NO_NAME");
    lines.push(format!("{}|- {name}", "  ".repeat(depth)));
    for &child in world.children(entity) {
        push_lines(world, child, depth + 1, lines);
    }
}

/// Write [`scene_graph_lines`] to the `info` log.
pub fn log_scene_graph(world: &World) {
    for line in scene_graph_lines(world) {
        log::info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_entities_are_found() {
        let mut world = World::new();
        let player = world.make_new_named("Player");
        world.make_new_named("Camera");

        assert_eq!(world.name(player), Some("Player"));
        assert_eq!(find_entity(&world, "Player"), Some(player));
        assert_eq!(find_entity(&world, "Nobody"), None);

        world.disable(player);
        assert_eq!(find_entity(&world, "Player"), None);
    }

    #[test]
    fn find_child_prefers_direct_children() {
        let mut world = World::new();
        let root = world.make_new_named("Root");
        let arm = world.create_named_child(root, "Arm");
        let deep_hand = world.create_named_child(arm, "Hand");
        let hand = world.create_named_child(root, "Hand");

        assert_eq!(find_child(&world, root, "Hand"), Some(hand));
        assert_eq!(find_child(&world, arm, "Hand"), Some(deep_hand));
        assert_eq!(find_child(&world, root, "Root"), None);
    }

    #[test]
    fn find_child_recurses() {
        let mut world = World::new();
        let root = world.make_new();
        let a = world.create_child(root);
        let b = world.create_child(a);
        let target = world.create_named_child(b, "Gem");

        assert_eq!(find_child(&world, root, "Gem"), Some(target));
    }

    #[test]
    fn duplicated_name_gets_suffix() {
        let mut world = World::new();
        let e = world.make_new_named("Crate");
        let copy = world.duplicate(e);
        assert_eq!(world.name(copy), Some("Crate_Copy"));
    }

    #[test]
    fn scene_graph_is_indented() {
        let mut world = World::new();
        let player = world.make_new_named("Player");
        world.create_named_child(player, "Sword");
        world.create_child(player);
        world.make_new_named("Camera");

        assert_eq!(
            scene_graph_lines(&world),
            vec!["|- Player", "  |- Sword", "  |- NO_NAME", "|- Camera"]
        );
    }
}
