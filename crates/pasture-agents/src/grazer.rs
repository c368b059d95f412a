//! Grazer behavior machine.
//!
//! A grazer forages while Hungry, wanders while Satiated, looks for a mate
//! while Reproducing, and flees while Afraid. Guards live in the pure
//! [`next_state`] function; [`Grazer::update`] gathers the inputs, performs
//! the per-state actions and applies entry actions on each transition.
//!
//! The grazer never mutates shared state. Eating, defecating, claiming or
//! releasing a mate, and giving birth come back as [`GrazerEffect`]s for
//! the orchestrator to apply right after this grazer's update.

use pasture_types::{GrazerId, GrazerState, Sprite, TileCoord, Vec2};
use pasture_world::{FertilizerField, Grid, RandomSource, WorldLayout};
use tracing::{debug, info};

use crate::cadence::Cadence;
use crate::config::GrazerConfig;
use crate::herd::Herd;
use crate::motion::{Body, Navigator};

// ---------------------------------------------------------------------------
// Transition guards
// ---------------------------------------------------------------------------

/// Outcome of the mate search in one Think.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MateStatus {
    /// No mate chosen yet.
    #[default]
    Absent,
    /// Claimed by another grazer; waiting in place.
    Waiting,
    /// The chosen mate died or its handle went stale.
    Lost,
    /// The chosen mate is alive but no longer available.
    Unavailable,
    /// Moving toward a claimed mate.
    Approaching,
    /// Close enough to reproduce.
    InRange,
}

/// Inputs to the grazer transition guards.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrazerSignals {
    /// The predator has flagged this grazer.
    pub is_being_hunted: bool,
    /// Meals since the last defecation.
    pub grass_eaten: u32,
    /// Meals needed to become satiated.
    pub satiation_count: u32,
    /// Health is at its cap.
    pub health_full: bool,
    /// The grazer has eaten its fill since last reproducing.
    pub can_reproduce: bool,
    /// Enough time passed since the last meal for the idle sprite.
    pub idle: bool,
    /// Satiated long enough to defecate.
    pub satiety_elapsed: bool,
    /// Mate search outcome.
    pub mate: MateStatus,
}

/// Next state for a living grazer.
pub const fn next_state(state: GrazerState, signals: &GrazerSignals) -> GrazerState {
    if signals.is_being_hunted {
        return GrazerState::Afraid;
    }
    match state {
        GrazerState::Afraid => GrazerState::Hungry,
        GrazerState::Hungry if signals.grass_eaten >= signals.satiation_count => {
            GrazerState::Satiated
        }
        GrazerState::Hungry => GrazerState::Hungry,
        GrazerState::Satiated if signals.health_full && signals.can_reproduce && signals.idle => {
            GrazerState::Reproducing
        }
        GrazerState::Satiated if signals.satiety_elapsed => GrazerState::Hungry,
        GrazerState::Satiated => GrazerState::Satiated,
        GrazerState::Reproducing => match signals.mate {
            MateStatus::Lost | MateStatus::InRange => GrazerState::Satiated,
            MateStatus::Absent
            | MateStatus::Waiting
            | MateStatus::Unavailable
            | MateStatus::Approaching => GrazerState::Reproducing,
        },
    }
}

// ---------------------------------------------------------------------------
// Context and effects
// ---------------------------------------------------------------------------

/// What a grazer may observe during its update.
pub struct GrazerContext<'a> {
    /// Handle of the grazer being updated.
    pub id: GrazerId,
    /// Ground and vegetation.
    pub grid: &'a Grid,
    /// Fertilizer deposits; grazers will not eat on a deposit.
    pub deposits: &'a FertilizerField,
    /// The rest of the herd.
    pub herd: &'a Herd,
    /// Where the predator is.
    pub predator_position: Vec2,
    /// Grazer tunables.
    pub config: &'a GrazerConfig,
    /// Source for random wander and flee targets.
    pub rng: &'a mut dyn RandomSource,
}

/// A change to shared state requested by a grazer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrazerEffect {
    /// Consume the vegetation on a tile.
    Ate(TileCoord),
    /// Leave a fertilizer deposit on a tile.
    Defecated(TileCoord),
    /// Claim another grazer as mate.
    ClaimedMate(GrazerId),
    /// Return a mate to Satiated and clear its pairing.
    ReleasedMate(GrazerId),
    /// Return a mate to Satiated after its partner died, keeping
    /// `can_reproduce`.
    LostMate(GrazerId),
    /// Add a newborn at a position.
    GaveBirth(Vec2),
    /// The grazer died this update.
    Died,
}

// ---------------------------------------------------------------------------
// Grazer
// ---------------------------------------------------------------------------

/// A member of the herd.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct Grazer {
    /// Position, heading and speed.
    pub body: Body,
    /// Target and path.
    pub navigator: Navigator,
    /// Behavior state.
    pub state: GrazerState,
    /// Health in `[0, max_health]`.
    pub health: f32,
    /// Seconds alive.
    pub age: f32,
    /// Meals since the last defecation.
    pub grass_eaten: u32,
    /// Seconds spent Satiated since becoming satiated.
    pub satiety_timer: f32,
    /// Seconds since the last meal.
    pub eat_cooldown: f32,
    /// Cleared once, when health reaches zero.
    pub is_alive: bool,
    /// Set on becoming satiated, cleared by reproducing or fleeing.
    pub can_reproduce: bool,
    /// Set by the predator while it targets this grazer.
    pub is_being_hunted: bool,
    /// Another grazer has claimed this one as mate.
    pub is_mated_with: bool,
    /// Chosen or claiming mate.
    pub mate: Option<GrazerId>,
    /// Visual intent.
    pub sprite: Sprite,
    calm_sprite: Sprite,
    sense: Cadence,
    think: Cadence,
}

impl Grazer {
    /// A hungry grazer at full health.
    pub const fn new(position: Vec2, config: &GrazerConfig) -> Self {
        Self {
            body: Body::new(position, config.radius, config.walking_speed),
            navigator: Navigator::new().with_edge_arrival_factor(config.edge_arrival_factor),
            state: GrazerState::Hungry,
            health: config.max_health,
            age: 0.0,
            grass_eaten: 0,
            satiety_timer: 0.0,
            eat_cooldown: 0.0,
            is_alive: true,
            can_reproduce: false,
            is_being_hunted: false,
            is_mated_with: false,
            mate: None,
            sprite: Sprite::GrazerNormal,
            calm_sprite: Sprite::GrazerNormal,
            sense: Cadence::new(config.sense_interval),
            think: Cadence::new(config.think_interval),
        }
    }

    // -------------------------------------------------------------------
    // Vitals and visuals
    // -------------------------------------------------------------------

    /// Restore health, capped at `max`.
    pub fn heal(&mut self, amount: f32, max: f32) {
        self.health = (self.health + amount).min(max);
    }

    /// Lose health, floored at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Whether `other` is close enough to mate with.
    pub fn is_in_mating_range(&self, other: Vec2, config: &GrazerConfig) -> bool {
        let reach = self.body.radius * 2.0;
        self.body.position.distance_squared(other) <= reach.mul_add(reach, config.mating_range_slack)
    }

    /// Show `sprite` and remember it as the calm sprite.
    pub const fn set_sprite(&mut self, sprite: Sprite) {
        self.sprite = sprite;
        self.calm_sprite = sprite;
    }

    /// Show the afraid sprite without forgetting the calm one.
    pub const fn show_fear(&mut self) {
        self.sprite = Sprite::GrazerAfraid;
    }

    /// Stop being hunted and go back to the calm sprite.
    pub const fn calm_down(&mut self) {
        self.is_being_hunted = false;
        self.sprite = self.calm_sprite;
    }

    // -------------------------------------------------------------------
    // Pairing, driven by the herd
    // -------------------------------------------------------------------

    /// Accept a claim by `claimer`: stop and wait in Reproducing.
    pub fn accept_claim(&mut self, claimer: GrazerId) {
        self.is_mated_with = true;
        self.mate = Some(claimer);
        self.state = GrazerState::Reproducing;
        self.set_sprite(Sprite::GrazerReproducing);
        self.navigator.clear();
        self.body.stop();
    }

    /// Leave a pairing and settle back into Satiated. `can_reproduce` is
    /// cleared unless `keep_reproduce` is set.
    pub fn reset_mate(&mut self, config: &GrazerConfig, keep_reproduce: bool) {
        self.body.velocity = config.walking_speed;
        self.set_sprite(Sprite::GrazerSatiated);
        self.navigator.clear();
        self.can_reproduce = self.can_reproduce && keep_reproduce;
        self.is_mated_with = false;
        self.mate = None;
        self.state = GrazerState::Satiated;
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    /// Run one tick: alarm check, Sense and Think on their cadences, then
    /// Act.
    pub fn update(&mut self, dt: f32, ctx: &mut GrazerContext<'_>) -> Vec<GrazerEffect> {
        let mut effects = Vec::new();
        if !self.is_alive {
            return effects;
        }
        if self.health <= 0.0 {
            self.die(ctx.id, &mut effects);
            return effects;
        }

        let tile = ctx.grid.layout().position_to_tile(self.body.position);
        if self.is_being_hunted != (self.state == GrazerState::Afraid) {
            let next = if self.is_being_hunted {
                GrazerState::Afraid
            } else {
                GrazerState::Hungry
            };
            self.enter(next, tile, ctx.id, ctx.config, &mut effects);
        }

        if self.sense.tick(dt) {
            self.sense(ctx);
        }
        if self.think.tick(dt) {
            self.think(ctx, &mut effects);
        }
        self.act(dt);
        effects
    }

    fn die(&mut self, id: GrazerId, effects: &mut Vec<GrazerEffect>) {
        self.is_alive = false;
        self.health = 0.0;
        self.is_mated_with = false;
        self.is_being_hunted = false;
        self.body.stop();
        self.navigator.clear();
        if let Some(mate) = self.mate.take() {
            effects.push(GrazerEffect::LostMate(mate));
        }
        effects.push(GrazerEffect::Died);
        info!(grazer = %id, age = self.age, "Grazer died");
    }

    fn signals(&self, config: &GrazerConfig, mate: MateStatus) -> GrazerSignals {
        GrazerSignals {
            is_being_hunted: self.is_being_hunted,
            grass_eaten: self.grass_eaten,
            satiation_count: config.satiation_count,
            health_full: self.health >= config.max_health,
            can_reproduce: self.can_reproduce,
            idle: self.eat_cooldown > config.idle_sprite_delay,
            satiety_elapsed: self.satiety_timer >= config.defecate_delay,
            mate,
        }
    }

    /// Entry actions for a transition out of the current state.
    fn enter(
        &mut self,
        next: GrazerState,
        tile: TileCoord,
        id: GrazerId,
        config: &GrazerConfig,
        effects: &mut Vec<GrazerEffect>,
    ) {
        let from = self.state;
        match (from, next) {
            (_, GrazerState::Afraid) => {
                self.navigator.clear();
                self.is_mated_with = false;
                self.show_fear();
            }
            (GrazerState::Afraid, _) => {
                self.body.velocity = config.walking_speed;
                self.navigator.clear();
                self.sprite = self.calm_sprite;
            }
            (GrazerState::Hungry, GrazerState::Satiated) => {
                self.can_reproduce = true;
                self.satiety_timer = 0.0;
            }
            (GrazerState::Satiated, GrazerState::Hungry) => {
                effects.push(GrazerEffect::Defecated(tile));
                self.grass_eaten = 0;
                self.eat_cooldown = 0.0;
                self.satiety_timer = 0.0;
                self.set_sprite(Sprite::GrazerNormal);
            }
            (GrazerState::Satiated, GrazerState::Reproducing) => {
                self.set_sprite(Sprite::GrazerReproducing);
            }
            (GrazerState::Reproducing, _) => {
                self.body.velocity = config.walking_speed;
                self.navigator.clear();
                self.mate = None;
                self.is_mated_with = false;
                self.set_sprite(Sprite::GrazerSatiated);
            }
            _ => {}
        }
        self.state = next;
        debug!(grazer = %id, from = ?from, to = ?next, "Grazer changed state");
    }

    // -------------------------------------------------------------------
    // Sense
    // -------------------------------------------------------------------

    fn sense(&mut self, ctx: &mut GrazerContext<'_>) {
        let layout = *ctx.grid.layout();
        let here = layout.position_to_tile(self.body.position);
        let config = ctx.config;

        match self.state {
            GrazerState::Hungry => {
                if let Some(food) = self.nearest_forage(ctx, &layout) {
                    self.navigator.set_target(Some(food));
                } else if self.needs_new_target(&layout, 0.0) {
                    let wander =
                        layout.random_tile_near(self.body.position, config.forage_range, ctx.rng);
                    self.navigator.set_target(Some(wander));
                }
            }
            GrazerState::Satiated => {
                if self.needs_new_target(&layout, config.arrival_slack) {
                    let wander =
                        layout.random_tile_near(self.body.position, config.forage_range, ctx.rng);
                    self.navigator.set_target(Some(wander));
                }
            }
            GrazerState::Reproducing => {
                if self.is_mated_with {
                    return;
                }
                if self.mate.is_none() {
                    self.mate = ctx.herd.find_mate(ctx.id);
                }
                let partner_tile = self
                    .mate
                    .and_then(|m| ctx.herd.get(m))
                    .filter(|g| g.is_alive)
                    .map(|g| layout.position_to_tile(g.body.position));
                if let Some(partner_tile) = partner_tile {
                    self.navigator.set_target(Some(partner_tile));
                } else if self.needs_new_target(&layout, config.arrival_slack) {
                    let wander =
                        layout.random_tile_near(self.body.position, config.forage_range, ctx.rng);
                    self.navigator.set_target(Some(wander));
                }
            }
            GrazerState::Afraid => {
                if self.needs_new_target(&layout, config.arrival_slack) {
                    let refuge = self.flee_tile(ctx, &layout);
                    self.navigator.set_target(Some(refuge));
                }
            }
        }

        self.navigator.replan_to_target(ctx.grid, here);
    }

    fn needs_new_target(&self, layout: &WorldLayout, slack: f32) -> bool {
        self.navigator.target().is_none() || self.navigator.has_arrived(&self.body, layout, slack)
    }

    /// Closest edible, deposit-free tile within foraging range.
    fn nearest_forage(&self, ctx: &GrazerContext<'_>, layout: &WorldLayout) -> Option<TileCoord> {
        let position = self.body.position;
        let range = ctx.config.forage_range;
        let reach = Vec2::splat(range);
        let lo = layout.clamp_tile(layout.position_to_tile(position - reach));
        let hi = layout.clamp_tile(layout.position_to_tile(position + reach));

        let mut best: Option<(f32, TileCoord)> = None;
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let tile = TileCoord::new(x, y);
                if !ctx.grid.is_walkable(tile)
                    || !ctx.grid.can_be_eaten(tile)
                    || ctx.deposits.has_deposit(tile)
                {
                    continue;
                }
                let distance = position.distance(layout.tile_center(tile));
                if distance <= range && best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, tile));
                }
            }
        }
        best.map(|(_, tile)| tile)
    }

    /// Random tile in the quadrant facing away from the predator.
    fn flee_tile(&self, ctx: &mut GrazerContext<'_>, layout: &WorldLayout) -> TileCoord {
        let position = self.body.position;
        let reach = Vec2::splat(ctx.config.flee_range);
        let mut lo = position - reach;
        let mut hi = position + reach;
        let threat = ctx.predator_position;
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

    fn think(&mut self, ctx: &GrazerContext<'_>, effects: &mut Vec<GrazerEffect>) {
        let layout = *ctx.grid.layout();
        let tile = layout.position_to_tile(self.body.position);
        let config = ctx.config;
        let mut mate = MateStatus::Absent;

        match self.state {
            GrazerState::Hungry => {
                self.navigator.steer(&mut self.body, &layout);
                if self.eat_cooldown >= config.eat_delay
                    && ctx.grid.can_be_eaten(tile)
                    && !ctx.deposits.has_deposit(tile)
                {
                    self.eat(tile, config, effects);
                }
                if self.eat_cooldown > config.idle_sprite_delay {
                    self.set_sprite(Sprite::GrazerNormal);
                    if self.eat_cooldown >= config.time_before_damage {
                        self.take_damage(config.starvation_damage_rate * config.think_interval);
                    }
                }
            }
            GrazerState::Satiated => {
                if self.eat_cooldown > config.idle_sprite_delay {
                    self.set_sprite(Sprite::GrazerSatiated);
                }
                self.navigator.steer(&mut self.body, &layout);
            }
            GrazerState::Reproducing => {
                mate = self.seek_mate(ctx, &layout, effects);
            }
            GrazerState::Afraid => {
                self.run_away(config, &layout, effects);
            }
        }

        let next = next_state(self.state, &self.signals(config, mate));
        if next != self.state {
            self.enter(next, tile, ctx.id, config, effects);
        }
    }

    fn eat(&mut self, tile: TileCoord, config: &GrazerConfig, effects: &mut Vec<GrazerEffect>) {
        effects.push(GrazerEffect::Ate(tile));
        self.grass_eaten = self.grass_eaten.saturating_add(1);
        self.eat_cooldown = 0.0;
        self.heal(config.health_regeneration, config.max_health);
        self.set_sprite(Sprite::GrazerEating);
    }

    fn seek_mate(
        &mut self,
        ctx: &GrazerContext<'_>,
        layout: &WorldLayout,
        effects: &mut Vec<GrazerEffect>,
    ) -> MateStatus {
        let config = ctx.config;
        self.set_sprite(Sprite::GrazerReproducing);
        if self.is_mated_with {
            self.body.stop();
            return MateStatus::Waiting;
        }
        let Some(mate) = self.mate else {
            self.navigator.steer(&mut self.body, layout);
            return MateStatus::Absent;
        };
        let Some(partner) = ctx.herd.get(mate).filter(|g| g.is_alive) else {
            return MateStatus::Lost;
        };
        if !ctx.herd.can_mate(mate, ctx.id) {
            self.mate = None;
            self.navigator.clear();
            self.body.velocity = config.walking_speed;
            return MateStatus::Unavailable;
        }

        if !partner.is_mated_with {
            effects.push(GrazerEffect::ClaimedMate(mate));
        }
        let partner_position = partner.body.position;
        self.body.velocity = config.running_speed;
        self.navigator.steer(&mut self.body, layout);

        if self.is_in_mating_range(partner_position, config) {
            self.can_reproduce = false;
            effects.push(GrazerEffect::ReleasedMate(mate));
            effects.push(GrazerEffect::GaveBirth(self.body.position));
            return MateStatus::InRange;
        }
        MateStatus::Approaching
    }

    fn run_away(
        &mut self,
        config: &GrazerConfig,
        layout: &WorldLayout,
        effects: &mut Vec<GrazerEffect>,
    ) {
        self.can_reproduce = false;
        self.body.velocity = config.running_speed;
        self.show_fear();
        self.is_mated_with = false;
        if let Some(mate) = self.mate.take() {
            effects.push(GrazerEffect::ReleasedMate(mate));
        }
        if self.navigator.target().is_some() {
            self.navigator.steer(&mut self.body, layout);
        }
    }

    // -------------------------------------------------------------------
    // Act
    // -------------------------------------------------------------------

    fn act(&mut self, dt: f32) {
        self.age += dt;
        self.eat_cooldown += dt;
        if self.state == GrazerState::Satiated {
            self.satiety_timer += dt;
        }
        self.body.integrate(dt);
    }
}
