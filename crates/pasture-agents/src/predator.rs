//! Predator behavior machine.
//!
//! The predator hunts while Hungry, walks back to its den while Satiated,
//! and sleeps there while Asleep. The shepherd shapes the hunt: near it
//! the predator gives up its prey and runs, and too close to it the
//! predator attacks, which also ends the hunt.

use pasture_types::{GrazerId, PredatorState, Sprite, TileCoord, Vec2};
use pasture_world::{Grid, RandomSource, WorldLayout};
use tracing::{debug, info};

use crate::cadence::Cadence;
use crate::config::PredatorConfig;
use crate::herd::Herd;
use crate::motion::{Body, Navigator};
use crate::shepherd::ShepherdProximity;

/// Inputs to the predator transition guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredatorSignals {
    /// The predator attacked the shepherd this Think.
    pub attacked_shepherd: bool,
    /// Grazers eaten since waking.
    pub satiated_count: u32,
    /// Meals needed to become satiated.
    pub satiation_count: u32,
    /// Within radius of the sleep position.
    pub at_sleep_position: bool,
    /// Slept for the full duration.
    pub slept_enough: bool,
}

/// Next predator state.
pub const fn next_state(state: PredatorState, signals: &PredatorSignals) -> PredatorState {
    match state {
        PredatorState::Hungry
            if signals.attacked_shepherd || signals.satiated_count >= signals.satiation_count =>
        {
            PredatorState::Satiated
        }
        PredatorState::Satiated if signals.at_sleep_position => PredatorState::Asleep,
        PredatorState::Asleep if signals.slept_enough => PredatorState::Hungry,
        other => other,
    }
}

/// What the predator may observe and touch during its update.
pub struct PredatorContext<'a> {
    /// Ground, for pathfinding.
    pub grid: &'a Grid,
    /// Prey. The predator flags and bites grazers directly.
    pub herd: &'a mut Herd,
    /// Where the shepherd is and how close counts.
    pub shepherd: ShepherdProximity,
    /// Predator tunables.
    pub config: &'a PredatorConfig,
    /// Source for wander and retreat targets.
    pub rng: &'a mut dyn RandomSource,
}

/// Something the predator did that the orchestrator has to act on or
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredatorEffect {
    /// Attacked the shepherd; stun it.
    AttackedShepherd,
    /// Bit a grazer.
    Ate(GrazerId),
}

/// The single predator.
#[derive(Debug, Clone, PartialEq)]
pub struct Predator {
    /// Position, heading and speed.
    pub body: Body,
    /// Target and path.
    pub navigator: Navigator,
    /// Behavior state.
    pub state: PredatorState,
    /// Grazers eaten since waking.
    pub satiated_count: u32,
    /// Seconds since the last meal or attack.
    pub eat_cooldown: f32,
    /// Seconds asleep.
    pub sleep_timer: f32,
    /// Top-left pixel of the den.
    pub den_position: Vec2,
    /// Where the predator lies down.
    pub sleep_position: Vec2,
    /// Tile containing the sleep position.
    pub sleep_tile: TileCoord,
    /// Grazer being pursued.
    pub hunt_target: Option<GrazerId>,
    /// Visual intent.
    pub sprite: Sprite,
    sense: Cadence,
    think: Cadence,
}

impl Predator {
    /// A hungry predator on its spawn tile. Spawn, den and sleep tiles are
    /// clamped into the grid.
    pub fn new(layout: &WorldLayout, config: &PredatorConfig) -> Self {
        let sleep_tile = layout.clamp_tile(config.sleep_tile);
        Self {
            body: Body::new(
                layout.tile_center(layout.clamp_tile(config.spawn_tile)),
                config.radius,
                config.walking_speed,
            ),
            navigator: Navigator::new().with_edge_arrival_factor(config.edge_arrival_factor),
            state: PredatorState::Hungry,
            satiated_count: 0,
            eat_cooldown: config.eat_delay,
            sleep_timer: 0.0,
            den_position: layout.tile_to_position(layout.clamp_tile(config.den_tile)),
            sleep_position: layout.tile_center(sleep_tile),
            sleep_tile,
            hunt_target: None,
            sprite: Sprite::PredatorHungry,
            sense: Cadence::new(config.sense_interval),
            think: Cadence::new(config.think_interval),
        }
    }

    /// Run one tick: Sense and Think on their cadences, then Act.
    pub fn update(&mut self, dt: f32, ctx: &mut PredatorContext<'_>) -> Vec<PredatorEffect> {
        let mut effects = Vec::new();
        if self.sense.tick(dt) {
            self.sense(ctx);
        }
        if self.think.tick(dt) {
            self.think(ctx, &mut effects);
        }
        self.act(dt);
        effects
    }

    /// Stop pursuing the current prey and clear its hunted flag.
    fn drop_hunt(&mut self, herd: &mut Herd) {
        if let Some(prey) = self.hunt_target.take() {
            herd.clear_hunted(prey);
        }
    }

    // -------------------------------------------------------------------
    // Sense
    // -------------------------------------------------------------------

    fn sense(&mut self, ctx: &mut PredatorContext<'_>) {
        let layout = *ctx.grid.layout();
        let here = layout.position_to_tile(self.body.position);
        let config = ctx.config;

        match self.state {
            PredatorState::Hungry => {
                if self.navigator.target().is_none()
                    || self.navigator.has_arrived(&self.body, &layout, 0.0)
                {
                    let wander =
                        layout.random_tile_near(self.body.position, config.wandering_radius, ctx.rng);
                    self.navigator.set_target(Some(wander));
                }

                let shepherd_nearby = ctx.shepherd.is_nearby(here, &layout);
                if shepherd_nearby {
                    self.drop_hunt(ctx.herd);
                    let retreat = self.retreat_tile(ctx, &layout);
                    self.navigator.set_target(Some(retreat));
                }
                if ctx.shepherd.is_too_close(here, &layout) {
                    let shepherd_tile = layout.position_to_tile(ctx.shepherd.position);
                    self.navigator.set_target(Some(shepherd_tile));
                }

                if self.hunt_target.is_none() && !shepherd_nearby {
                    self.hunt_target = ctx
                        .herd
                        .nearest_huntable(self.body.position, config.hunting_radius);
                }

                let prey_tile = self
                    .hunt_target
                    .and_then(|prey| ctx.herd.get(prey))
                    .filter(|g| g.is_alive)
                    .map(|g| layout.position_to_tile(g.body.position));
                match prey_tile {
                    Some(tile) => {
                        self.navigator.replan(ctx.grid, here, tile);
                    }
                    None => {
                        self.hunt_target = None;
                        self.navigator.replan_to_target(ctx.grid, here);
                    }
                }
            }
            PredatorState::Satiated => {
                self.navigator.set_target(Some(self.sleep_tile));
                self.navigator.replan_to_target(ctx.grid, here);
            }
            PredatorState::Asleep => {}
        }
    }

    /// Random tile in the quadrant facing away from the shepherd.
    fn retreat_tile(&self, ctx: &mut PredatorContext<'_>, layout: &WorldLayout) -> TileCoord {
        let position = self.body.position;
        let reach = Vec2::splat(ctx.config.hunting_radius);
        let mut lo = position - reach;
        let mut hi = position + reach;
        let threat = ctx.shepherd.position;
        if threat.x < position.x {
            lo.x = position.x;
        } else {
            hi.x = position.x;
        }
        if threat.y < position.y {
            lo.y = position.y;
        } else {
            hi.y = position.y;
        }
        layout.random_tile_between(lo, hi, ctx.rng)
    }

    // -------------------------------------------------------------------
    // Think
    // -------------------------------------------------------------------

    fn think(&mut self, ctx: &mut PredatorContext<'_>, effects: &mut Vec<PredatorEffect>) {
        let layout = *ctx.grid.layout();
        let here = layout.position_to_tile(self.body.position);
        let config = ctx.config;
        let mut attacked_shepherd = false;

        match self.state {
            PredatorState::Hungry => {
                self.body.velocity = if ctx.shepherd.is_nearby(here, &layout) {
                    config.running_speed
                } else {
                    config.walking_speed
                };

                if ctx.shepherd.is_too_close(here, &layout) {
                    self.attack_shepherd(ctx, effects);
                    attacked_shepherd = true;
                } else {
                    self.hunt(ctx, &layout, effects);
                }
            }
            PredatorState::Satiated => {
                self.navigator.steer(&mut self.body, &layout);
                self.sprite = Sprite::PredatorSatiated;
            }
            PredatorState::Asleep => {
                self.sprite = Sprite::PredatorSleeping;
            }
        }

        let signals = PredatorSignals {
            attacked_shepherd,
            satiated_count: self.satiated_count,
            satiation_count: config.satiation_count,
            at_sleep_position: self.body.distance_to(self.sleep_position) < self.body.radius,
            slept_enough: self.sleep_timer >= config.sleep_duration,
        };
        let next = next_state(self.state, &signals);
        if next != self.state {
            self.enter(next, config);
        }
    }

    fn attack_shepherd(&mut self, ctx: &mut PredatorContext<'_>, effects: &mut Vec<PredatorEffect>) {
        effects.push(PredatorEffect::AttackedShepherd);
        self.body.velocity = ctx.config.walking_speed;
        self.eat_cooldown = 0.0;
        self.drop_hunt(ctx.herd);
        self.navigator.clear();
        info!("Predator attacked the shepherd");
    }

    fn hunt(
        &mut self,
        ctx: &mut PredatorContext<'_>,
        layout: &WorldLayout,
        effects: &mut Vec<PredatorEffect>,
    ) {
        let config = ctx.config;
        self.navigator.steer(&mut self.body, layout);
        let Some(prey) = self.hunt_target else {
            return;
        };
        self.body.velocity = config.running_speed;
        self.sprite = Sprite::PredatorHungry;
        ctx.herd.mark_hunted(prey);
        if self.eat_cooldown < config.eat_delay {
            return;
        }

        let in_reach = ctx
            .herd
            .get(prey)
            .is_some_and(|g| g.body.distance_to(self.body.position) <= self.body.radius + g.body.radius);
        if in_reach && ctx.herd.bite(prey, config.bite_damage) {
            effects.push(PredatorEffect::Ate(prey));
            self.body.velocity = config.walking_speed;
            self.eat_cooldown = 0.0;
            self.satiated_count = self.satiated_count.saturating_add(1);
            self.hunt_target = None;
            self.navigator.clear();
            debug!(grazer = %prey, eaten = self.satiated_count, "Predator ate a grazer");
        }
    }

    fn enter(&mut self, next: PredatorState, config: &PredatorConfig) {
        let from = self.state;
        match next {
            PredatorState::Satiated => {
                self.body.velocity = config.walking_speed;
                self.sprite = Sprite::PredatorSatiated;
                self.navigator.clear();
                self.navigator.set_target(Some(self.sleep_tile));
            }
            PredatorState::Asleep => {
                self.body.stop();
                self.navigator.clear();
                self.sleep_timer = 0.0;
                self.sprite = Sprite::PredatorSleeping;
            }
            PredatorState::Hungry => {
                self.sleep_timer = 0.0;
                self.satiated_count = 0;
                self.navigator.clear();
                self.sprite = Sprite::PredatorHungry;
            }
        }
        self.state = next;
        info!(from = ?from, to = ?next, "Predator changed state");
    }

    // -------------------------------------------------------------------
    // Act
    // -------------------------------------------------------------------

    fn act(&mut self, dt: f32) {
        match self.state {
            PredatorState::Hungry => {
                self.eat_cooldown += dt;
                self.body.integrate(dt);
            }
            PredatorState::Satiated => self.body.integrate(dt),
            PredatorState::Asleep => self.sleep_timer += dt,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pasture_types::GrazerState;
    use pasture_world::FixedRandom;

    use super::*;
    use crate::config::GrazerConfig;

    struct Fixture {
        grid: Grid,
        herd: Herd,
        config: PredatorConfig,
        rng: FixedRandom,
        shepherd: Vec2,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                grid: Grid::new(WorldLayout::from_grid(20, 20, 32.0).unwrap()),
                herd: Herd::new(),
                config: PredatorConfig::default(),
                rng: FixedRandom::new(50),
                shepherd: Vec2::new(10_000.0, 10_000.0),
            }
        }

        fn ctx(&mut self) -> PredatorContext<'_> {
            PredatorContext {
                grid: &self.grid,
                herd: &mut self.herd,
                shepherd: ShepherdProximity {
                    position: self.shepherd,
                    nearby_radius: 125.0,
                    too_close_radius: 75.0,
                },
                config: &self.config,
                rng: &mut self.rng,
            }
        }
    }

    fn signals() -> PredatorSignals {
        PredatorSignals {
            attacked_shepherd: false,
            satiated_count: 0,
            satiation_count: 3,
            at_sleep_position: false,
            slept_enough: false,
        }
    }

    #[test]
    fn transition_table() {
        let base = signals();
        assert_eq!(next_state(PredatorState::Hungry, &base), PredatorState::Hungry);
        let attacked = PredatorSignals { attacked_shepherd: true, ..base };
        assert_eq!(next_state(PredatorState::Hungry, &attacked), PredatorState::Satiated);
        let full = PredatorSignals { satiated_count: 3, ..base };
        assert_eq!(next_state(PredatorState::Hungry, &full), PredatorState::Satiated);
        let home = PredatorSignals { at_sleep_position: true, ..base };
        assert_eq!(next_state(PredatorState::Satiated, &home), PredatorState::Asleep);
        assert_eq!(next_state(PredatorState::Satiated, &base), PredatorState::Satiated);
        let rested = PredatorSignals { slept_enough: true, ..base };
        assert_eq!(next_state(PredatorState::Asleep, &rested), PredatorState::Hungry);
        assert_eq!(next_state(PredatorState::Asleep, &base), PredatorState::Asleep);
    }

    #[test]
    fn spawn_and_den_tiles_are_clamped() {
        let layout = WorldLayout::from_grid(3, 3, 32.0).unwrap();
        let predator = Predator::new(&layout, &PredatorConfig::default());
        assert_eq!(layout.position_to_tile(predator.body.position), TileCoord::new(2, 2));
        assert_eq!(predator.sleep_tile, TileCoord::new(2, 2));
        assert_eq!(predator.den_position, layout.tile_to_position(TileCoord::new(2, 2)));
        assert!((predator.eat_cooldown - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn bites_grazer_in_reach() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        let prey = fx.herd.spawn(predator.body.position, &GrazerConfig::default());

        let effects = predator.update(0.5, &mut fx.ctx());
        assert_eq!(effects, vec![PredatorEffect::Ate(prey)]);
        assert_eq!(predator.satiated_count, 1);
        assert_eq!(predator.hunt_target, None);

        let grazer = fx.herd.get(prey).unwrap();
        assert!(grazer.health <= 0.0);
        assert!(!grazer.is_being_hunted);
        assert_eq!(grazer.state, GrazerState::Hungry);
    }

    #[test]
    fn flags_prey_while_chasing() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        let prey = fx
            .herd
            .spawn(predator.body.position + Vec2::new(150.0, 0.0), &GrazerConfig::default());

        let effects = predator.update(0.5, &mut fx.ctx());
        assert!(effects.is_empty());
        assert_eq!(predator.hunt_target, Some(prey));
        assert!(fx.herd.get(prey).unwrap().is_being_hunted);
        assert!(predator.body.direction.x > 0.0);
    }

    #[test]
    fn flags_prey_during_eat_cooldown_without_biting() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        predator.eat_cooldown = 0.0;
        let prey = fx.herd.spawn(predator.body.position, &GrazerConfig::default());

        let effects = predator.update(0.5, &mut fx.ctx());
        assert!(effects.is_empty());
        assert_eq!(predator.hunt_target, Some(prey));
        assert_eq!(predator.satiated_count, 0);
        let grazer = fx.herd.get(prey).unwrap();
        assert!(grazer.is_being_hunted);
        assert!((grazer.health - GrazerConfig::default().max_health).abs() < f32::EPSILON);
        assert!((predator.body.velocity - fx.config.running_speed).abs() < f32::EPSILON);
    }

    #[test]
    fn third_meal_satiates_and_waking_resets_the_count() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);

        for meal in 1..=3 {
            predator.eat_cooldown = fx.config.eat_delay;
            let prey = fx.herd.spawn(predator.body.position, &GrazerConfig::default());
            let effects = predator.update(0.5, &mut fx.ctx());
            assert_eq!(effects, vec![PredatorEffect::Ate(prey)]);
            assert_eq!(predator.satiated_count, meal);
            let expected = if meal < 3 {
                PredatorState::Hungry
            } else {
                PredatorState::Satiated
            };
            assert_eq!(predator.state, expected, "after meal {meal}");
            fx.herd.get_mut(prey).unwrap().is_alive = false;
        }

        predator.body.position = predator.sleep_position;
        predator.update(0.25, &mut fx.ctx());
        assert_eq!(predator.state, PredatorState::Asleep);
        for _ in 0..40 {
            predator.update(0.25, &mut fx.ctx());
        }
        assert_eq!(predator.state, PredatorState::Hungry);
        assert_eq!(predator.satiated_count, 0);
    }

    #[test]
    fn shepherd_nearby_ends_the_hunt() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        let prey = fx
            .herd
            .spawn(predator.body.position + Vec2::new(150.0, 0.0), &GrazerConfig::default());
        predator.update(0.5, &mut fx.ctx());
        assert!(fx.herd.get(prey).unwrap().is_being_hunted);

        fx.shepherd = predator.body.position + Vec2::new(0.0, 100.0);
        predator.update(0.5, &mut fx.ctx());
        assert_eq!(predator.hunt_target, None);
        assert!(!fx.herd.get(prey).unwrap().is_being_hunted);
        assert!((predator.body.velocity - fx.config.running_speed).abs() < f32::EPSILON);
    }

    #[test]
    fn attacking_the_shepherd_satiates() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        fx.shepherd = predator.body.position + Vec2::new(20.0, 0.0);

        let effects = predator.update(0.25, &mut fx.ctx());
        assert_eq!(effects, vec![PredatorEffect::AttackedShepherd]);
        assert_eq!(predator.state, PredatorState::Satiated);
        assert_eq!(predator.navigator.target(), Some(predator.sleep_tile));
    }

    #[test]
    fn sleeps_at_den_then_wakes_hungry() {
        let mut fx = Fixture::new();
        let mut predator = Predator::new(fx.grid.layout(), &fx.config);
        predator.state = PredatorState::Satiated;
        predator.satiated_count = 3;
        predator.body.position = predator.sleep_position;

        predator.update(0.25, &mut fx.ctx());
        assert_eq!(predator.state, PredatorState::Asleep);
        assert_eq!(predator.sprite, Sprite::PredatorSleeping);

        for _ in 0..40 {
            predator.update(0.25, &mut fx.ctx());
        }
        assert_eq!(predator.state, PredatorState::Hungry);
        assert_eq!(predator.satiated_count, 0);
        assert_eq!(predator.sprite, Sprite::PredatorHungry);
    }
}
