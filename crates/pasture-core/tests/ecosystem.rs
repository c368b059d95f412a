//! End-to-end scenarios driving a whole [`World`] through its tick sequence.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use pasture_core::World;
use pasture_core::config::SimulationConfig;
use pasture_types::{GrazerState, TileCoord};
use pasture_world::{FixedRandom, WorldLayout, find_path};

const DT: f32 = 0.1;

// =============================================================================
// Helpers
// =============================================================================

/// A config whose predator never notices grazers and sits in a far corner.
fn peaceful_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.predator.hunting_radius = 0.0;
    config.predator.spawn_tile = TileCoord::new(9, 9);
    config
}

fn open_world(config: SimulationConfig) -> World {
    let layout = WorldLayout::from_grid(10, 10, 32.0).unwrap();
    World::empty(layout, config, Box::new(FixedRandom::new(0)))
}

fn plant(world: &mut World, tile: TileCoord) {
    world.grid_mut().spawn_vegetation(tile);
    world.grid_mut().set_vegetation_age(tile, 0.3);
}

// =============================================================================
// Grazing
// =============================================================================

#[test]
fn grazer_eats_three_tiles_and_becomes_satiated() {
    let mut world = open_world(peaceful_config());
    let food = [TileCoord::new(3, 2), TileCoord::new(2, 4), TileCoord::new(4, 3)];
    for tile in food {
        plant(&mut world, tile);
    }
    let start = world.layout().tile_center(TileCoord::new(2, 2));
    let id = world.spawn_grazer(start);

    let mut satiated = false;
    for _ in 0..2_000 {
        world.tick(DT).unwrap();
        if world.herd().get(id).unwrap().state == GrazerState::Satiated {
            satiated = true;
            break;
        }
    }

    assert!(satiated, "grazer never became satiated");
    let grazer = world.herd().get(id).unwrap();
    assert_eq!(grazer.grass_eaten, 3);
    assert!(grazer.is_alive);
    for tile in food {
        assert!(!world.grid().has_vegetation(tile));
    }
}

#[test]
fn starved_grazer_slot_is_reused_with_a_fresh_handle() {
    let mut config = peaceful_config();
    config.grazer.time_before_damage = 0.0;
    config.grazer.starvation_damage_rate = 1_000.0;
    let mut world = open_world(config);
    let first = world.spawn_grazer(world.layout().tile_center(TileCoord::new(5, 5)));

    for _ in 0..20 {
        world.tick(DT).unwrap();
    }
    assert!(world.herd().get(first).is_none());

    let second = world.spawn_grazer(world.layout().tile_center(TileCoord::new(5, 5)));
    assert_ne!(first, second);
    assert!(world.herd().get(first).is_none());
    assert!(world.herd().get(second).is_some());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn same_seed_gives_the_same_world() {
    let run = || {
        let mut world = World::seeded(SimulationConfig::default()).unwrap();
        for _ in 0..300 {
            world.tick(1.0 / 60.0).unwrap();
        }
        world.view()
    };

    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(a.tick, 300);
}

#[test]
fn different_seeds_give_different_worlds() {
    let mut config = SimulationConfig::default();
    let a = World::seeded(config.clone()).unwrap().view();
    config.world.seed = config.world.seed.wrapping_add(1);
    let b = World::seeded(config).unwrap().view();
    assert_ne!(a.tiles, b.tiles);
}

// =============================================================================
// Pathfinding on the world grid
// =============================================================================

#[test]
fn path_to_own_tile_is_empty() {
    let world = open_world(peaceful_config());
    let mut path = Vec::new();
    assert!(find_path(
        world.grid(),
        TileCoord::new(0, 0),
        TileCoord::new(0, 0),
        &mut path
    ));
    assert!(path.is_empty());
}

#[test]
fn diagonal_path_across_open_grid() {
    let world = open_world(peaceful_config());
    let mut path = Vec::new();
    assert!(find_path(
        world.grid(),
        TileCoord::new(0, 0),
        TileCoord::new(9, 9),
        &mut path
    ));
    assert_eq!(path.len(), 9);
    assert_eq!(path.last(), Some(&TileCoord::new(9, 9)));
}

#[test]
fn walls_placed_through_the_world_redirect_paths() {
    let mut world = open_world(peaceful_config());
    for y in 0..9 {
        world.set_walkable(TileCoord::new(5, y), false);
    }
    let mut path = Vec::new();
    assert!(find_path(
        world.grid(),
        TileCoord::new(0, 0),
        TileCoord::new(9, 0),
        &mut path
    ));
    assert!(path.contains(&TileCoord::new(5, 9)));
    assert!(path.iter().all(|tile| world.grid().is_walkable(*tile)));

    world.set_walkable(TileCoord::new(5, 9), false);
    assert!(!find_path(
        world.grid(),
        TileCoord::new(0, 0),
        TileCoord::new(9, 0),
        &mut path
    ));
    assert!(path.is_empty());
}
