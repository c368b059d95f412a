//! The per-tick sequence.
//!
//! Every tick runs the same fixed order, once, with no suspension points:
//!
//! 1. **Vegetation** -- grow, seed and wilt every live cell.
//! 2. **Grazers** -- each grazer in herd order runs Sense/Think/Act against a
//!    [`GrazerContext`] and is contained within the world bounds. The effects
//!    it returns are applied before the next grazer runs.
//! 3. **Fertilizer** -- age deposits, spreading fertility or expiring them.
//! 4. **Predator** -- Sense/Think/Act against a [`PredatorContext`], then
//!    bounds containment.
//! 5. **Shepherd** -- stun recovery and path following.
//! 6. **Herd post-pass** -- reclaim dead grazers, spawn queued offspring and
//!    advance the clock.
//!
//! Given the same starting world and random source the sequence is fully
//! deterministic.

use pasture_agents::{GrazerContext, GrazerEffect, PredatorContext, PredatorEffect};
use pasture_types::{GrazerId, PredatorState};
use pasture_world::{FertilizerReport, VegetationReport};
use tracing::debug;

use crate::clock::{ClockError, SimClock};
use crate::world::World;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated seconds at the end of the tick.
    pub elapsed: f64,
    /// Live grazers at the end of the tick.
    pub grazers_alive: usize,
    /// Offspring spawned in the post-pass.
    pub births: Vec<GrazerId>,
    /// Grazers that died this tick.
    pub deaths: Vec<GrazerId>,
    /// Vegetation tiles eaten by grazers.
    pub meals: u32,
    /// Fertilizer deposits dropped by grazers.
    pub deposits_placed: u32,
    /// Vegetation spread and wilting.
    pub vegetation: VegetationReport,
    /// Fertilizer spread and expiry.
    pub fertilizer: FertilizerReport,
    /// Predator state after its update.
    pub predator_state: PredatorState,
    /// Grazers the predator bit.
    pub grazers_bitten: Vec<GrazerId>,
    /// The predator attacked the shepherd this tick.
    pub shepherd_stunned: bool,
}

/// Run one tick of `dt` seconds against `world`.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if `dt` is negative or not finite (checked
/// before anything moves) or if the tick counter would overflow.
pub fn run_tick(world: &mut World, dt: f32) -> Result<TickSummary, TickError> {
    SimClock::validate(dt)?;

    // 1. Vegetation
    let vegetation = world
        .grid
        .update_vegetation(dt, &world.config.vegetation, world.rng.as_mut());

    // 2. Grazers
    let mut grazers = GrazerPhase::default();
    run_grazers(world, dt, &mut grazers);

    // 3. Fertilizer
    let fertilizer = world.deposits.update(
        dt,
        &mut world.grid,
        &world.config.fertilizer,
        world.rng.as_mut(),
    );

    // 4. Predator
    let mut grazers_bitten = Vec::new();
    let mut shepherd_stunned = false;
    let proximity = world.shepherd.proximity(&world.config.shepherd);
    let effects = {
        let mut ctx = PredatorContext {
            grid: &world.grid,
            herd: &mut world.herd,
            shepherd: proximity,
            config: &world.config.predator,
            rng: world.rng.as_mut(),
        };
        world.predator.update(dt, &mut ctx)
    };
    let bounds = world.grid.layout().bounds();
    world.predator.body.contain_within(&bounds);
    for effect in effects {
        match effect {
            PredatorEffect::AttackedShepherd => {
                world.shepherd.stun();
                shepherd_stunned = true;
            }
            PredatorEffect::Ate(prey) => grazers_bitten.push(prey),
        }
    }

    // 5. Shepherd
    world
        .shepherd
        .update(dt, &world.grid, &world.config.shepherd);
    world.shepherd.body.contain_within(&bounds);

    // 6. Herd post-pass
    let commit = world.herd.commit(&world.config.grazer);
    let tick = world.clock.advance(dt)?;

    let summary = TickSummary {
        tick,
        elapsed: world.clock.elapsed(),
        grazers_alive: world.herd.alive_count(),
        births: commit.born,
        deaths: grazers.deaths,
        meals: grazers.meals,
        deposits_placed: grazers.deposits_placed,
        vegetation,
        fertilizer,
        predator_state: world.predator.state,
        grazers_bitten,
        shepherd_stunned,
    };

    debug!(
        tick = summary.tick,
        grazers = summary.grazers_alive,
        births = summary.births.len(),
        deaths = summary.deaths.len(),
        meals = summary.meals,
        predator = ?summary.predator_state,
        "Tick complete"
    );

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Grazer phase
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct GrazerPhase {
    deaths: Vec<GrazerId>,
    meals: u32,
    deposits_placed: u32,
}

/// Update each live grazer in herd order, applying its effects before the
/// next one runs. Grazers born this tick are not updated until the next.
fn run_grazers(world: &mut World, dt: f32, phase: &mut GrazerPhase) {
    let bounds = world.grid.layout().bounds();
    let predator_position = world.predator.body.position;
    let ids: Vec<GrazerId> = world.herd.ids().collect();

    for id in ids {
        if !world.herd.is_alive(id) {
            continue;
        }
        let Some(mut grazer) = world.herd.take(id) else {
            continue;
        };
        let effects = {
            let mut ctx = GrazerContext {
                id,
                grid: &world.grid,
                deposits: &world.deposits,
                herd: &world.herd,
                predator_position,
                config: &world.config.grazer,
                rng: world.rng.as_mut(),
            };
            grazer.update(dt, &mut ctx)
        };
        if grazer.is_alive {
            grazer.body.contain_within(&bounds);
        }
        world.herd.restore(id, grazer);

        for effect in effects {
            apply_grazer_effect(world, id, effect, phase);
        }
    }
}

fn apply_grazer_effect(world: &mut World, id: GrazerId, effect: GrazerEffect, phase: &mut GrazerPhase) {
    match effect {
        GrazerEffect::Ate(tile) => {
            if world.grid.despawn_vegetation(tile) {
                phase.meals = phase.meals.saturating_add(1);
            }
        }
        GrazerEffect::Defecated(tile) => {
            if world.deposits.place(tile) {
                phase.deposits_placed = phase.deposits_placed.saturating_add(1);
            }
        }
        GrazerEffect::ClaimedMate(mate) => {
            world.herd.claim_mate(mate, id);
        }
        GrazerEffect::ReleasedMate(mate) => {
            world.herd.release_mate(mate, id, &world.config.grazer, false);
        }
        GrazerEffect::LostMate(mate) => {
            world.herd.release_mate(mate, id, &world.config.grazer, true);
        }
        GrazerEffect::GaveBirth(position) => world.herd.queue_birth(position),
        GrazerEffect::Died => phase.deaths.push(id),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use pasture_types::{GrazerState, TileCoord, Vec2};
    use pasture_world::{FixedRandom, WorldLayout};

    use super::*;
    use crate::config::SimulationConfig;

    fn quiet_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.predator.hunting_radius = 0.0;
        config.predator.spawn_tile = TileCoord::new(9, 9);
        config.shepherd.start_tile = TileCoord::new(0, 9);
        config
    }

    fn world(config: SimulationConfig) -> World {
        let layout = WorldLayout::from_grid(10, 10, 32.0).unwrap();
        World::empty(layout, config, Box::new(FixedRandom::new(0)))
    }

    #[test]
    fn invalid_delta_changes_nothing() {
        let mut world = world(quiet_config());
        let position = world.predator.body.position;
        assert!(matches!(
            world.tick(f32::NAN),
            Err(TickError::Clock {
                source: ClockError::InvalidDelta { .. }
            })
        ));
        assert_eq!(world.clock.tick(), 0);
        assert_eq!(world.predator.body.position, position);
    }

    #[test]
    fn summary_counts_the_tick() {
        let mut world = world(quiet_config());
        world.spawn_grazer(Vec2::new(80.0, 80.0));
        let first = world.tick(0.1).unwrap();
        let second = world.tick(0.1).unwrap();
        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert!((second.elapsed - 0.2).abs() < 1e-6);
        assert_eq!(second.grazers_alive, 1);
        assert_eq!(second.predator_state, PredatorState::Hungry);
    }

    #[test]
    fn eaten_vegetation_is_removed_from_the_grid() {
        let mut world = world(quiet_config());
        let tile = TileCoord::new(3, 3);
        world.grid.spawn_vegetation(tile);
        world.grid.set_vegetation_age(tile, 0.5);
        let center = world.layout().tile_center(tile);
        world.spawn_grazer(center);

        let mut meals = 0;
        for _ in 0..120 {
            meals += world.tick(0.1).unwrap().meals;
        }
        assert_eq!(meals, 1);
        assert!(!world.grid.has_vegetation(tile));
    }

    #[test]
    fn starved_grazer_is_reported_and_reclaimed() {
        let mut config = quiet_config();
        config.grazer.time_before_damage = 0.0;
        config.grazer.starvation_damage_rate = 1_000.0;
        let mut world = world(config);
        let id = world.spawn_grazer(Vec2::new(80.0, 80.0));

        let mut deaths = Vec::new();
        for _ in 0..20 {
            deaths.extend(world.tick(0.1).unwrap().deaths);
        }
        assert_eq!(deaths, vec![id]);
        assert!(world.herd.get(id).is_none());
        assert_eq!(world.herd.alive_count(), 0);
    }

    #[test]
    fn claimer_keeps_reproduce_flag_when_its_mate_dies() {
        let mut world = world(quiet_config());
        let mate = world.spawn_grazer(Vec2::new(80.0, 80.0));
        let claimer = world.spawn_grazer(Vec2::new(200.0, 200.0));
        let max_health = world.config.grazer.max_health;
        {
            let grazer = world.herd.get_mut(claimer).unwrap();
            grazer.state = GrazerState::Reproducing;
            grazer.can_reproduce = true;
            grazer.health = max_health - 2.0;
            grazer.mate = Some(mate);
        }
        world.herd.get_mut(mate).unwrap().state = GrazerState::Reproducing;
        assert!(world.herd.claim_mate(mate, claimer));
        world.herd.get_mut(mate).unwrap().health = 0.0;

        let summary = world.tick(0.1).unwrap();
        assert_eq!(summary.deaths, vec![mate]);
        let grazer = world.herd.get(claimer).unwrap();
        assert_eq!(grazer.state, GrazerState::Satiated);
        assert!(grazer.can_reproduce);
        assert!(!grazer.is_mated_with);
        assert_eq!(grazer.mate, None);
    }

    #[test]
    fn queued_births_spawn_in_the_post_pass() {
        let mut world = world(quiet_config());
        world.herd.queue_birth(Vec2::new(100.0, 100.0));
        let summary = world.tick(0.1).unwrap();
        assert_eq!(summary.births.len(), 1);
        assert_eq!(summary.grazers_alive, 1);
        let born = world.herd.get(summary.births[0]).unwrap();
        assert_eq!(born.state, GrazerState::Hungry);
    }

    #[test]
    fn grazers_stay_inside_the_world() {
        let mut world = world(quiet_config());
        let bounds = world.layout().bounds();
        for offset in [0.0, 20.0, 40.0, 60.0] {
            world.spawn_grazer(Vec2::new(bounds.min.x + offset, bounds.min.y));
        }
        for _ in 0..200 {
            world.tick(0.1).unwrap();
        }
        for (_, grazer) in world.herd.iter() {
            assert!(bounds.contains(grazer.body.position));
        }
    }

    #[test]
    fn predator_attack_stuns_the_shepherd() {
        let mut config = SimulationConfig::default();
        config.predator.spawn_tile = TileCoord::new(4, 4);
        config.shepherd.start_tile = TileCoord::new(5, 4);
        let mut world = world(config);

        let mut stunned = false;
        for _ in 0..20 {
            stunned |= world.tick(0.1).unwrap().shepherd_stunned;
        }
        assert!(stunned);
        assert_ne!(world.predator.state, PredatorState::Hungry);
    }
}
