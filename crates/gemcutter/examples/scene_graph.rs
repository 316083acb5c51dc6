//! Scene graph — solar system demo.
//!
//! Builds a sun with orbiting planets and moons, steps the orbits a few
//! times, duplicates and destroys planets, and logs the hierarchy.
//!
//! Run with: `RUST_LOG=info cargo run -p gemcutter --example scene_graph`

use gemcutter::prelude::*;

// ── Markers ──────────────────────────────────────────────────────────────

struct Planet;
impl Tag for Planet {}

struct Moon;
impl Tag for Moon {}

// ── Orbit component ─────────────────────────────────────────────────────

/// Spins the entity about Y; children ride along.
#[derive(Clone)]
struct Orbit {
    degrees_per_tick: f32,
}

impl Component for Orbit {
    fn duplicate(&self, _world: &World, _new_owner: Entity) -> Option<Box<dyn Component>> {
        Some(Box::new(self.clone()))
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new();
    let sun = world.make_new_named("Sun");

    let planets = [("Mercury", 4.0, 8.0), ("Earth", 10.0, 3.0), ("Mars", 15.0, 2.0)];
    for (name, distance, speed) in planets {
        spawn_planet(&mut world, sun, name, distance, speed);
    }

    for _ in 0..10 {
        let spinning: Vec<(Entity, f32)> = world
            .all::<Orbit>()
            .map(|(e, orbit)| (e, orbit.degrees_per_tick))
            .collect();
        for (entity, degrees) in spinning {
            world.transform_mut(entity).rotate_y(degrees);
        }
    }

    for planet in world.capture_with::<(Planet, Orbit)>() {
        let name = world.name(planet).unwrap_or("NO_NAME");
        log::info!("{name} is at {}", world.world_position(planet));
    }

    // Mars gets a twin, then Mercury falls into the sun.
    if let Some(mars) = find_entity(&world, "Mars") {
        let twin = world.duplicate(mars);
        world.transform_mut(twin).translation.x += 5.0;
    }
    if let Some(mercury) = find_entity(&world, "Mercury") {
        world.destroy(mercury);
    }

    log::info!(
        "{} planets, {} moons",
        world.with::<Planet>().count(),
        world.with::<Moon>().count()
    );
    log_scene_graph(&world);
    log::info!("{:?}", world.stats());
}

fn spawn_planet(world: &mut World, sun: Entity, name: &str, distance: f32, speed: f32) {
    // A pivot at the sun's center carries the orbit; the planet sits on its rim.
    let pivot = world.create_named_child(sun, format!("{name}Orbit"));
    world.add(pivot, Orbit { degrees_per_tick: speed });

    let planet = world.create_named_child(pivot, name);
    world.transform_mut(planet).translation = Vec3::new(distance, 0.0, 0.0);
    world.add(planet, Orbit { degrees_per_tick: speed * 4.0 });
    world.tag::<Planet>(planet);

    let moon = world.create_named_child(planet, format!("{name}Moon"));
    world.transform_mut(moon).translation = Vec3::new(1.0, 0.0, 0.0);
    world.tag::<Moon>(moon);
}
