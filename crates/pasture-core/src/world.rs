//! The world: sole owner of the grid, the deposits and every agent.
//!
//! Agents never hold references back into the world. The tick sequence in
//! [`crate::tick`] lends them what they may observe for the duration of one
//! update and applies what they ask for afterwards. Outside the tick the
//! world offers spatial queries, the input intents a front end may send,
//! and [`World::view`] for renderers.

use pasture_agents::{Body, Grazer, Herd, Navigator, Predator, Shepherd};
use pasture_types::{AgentKind, AgentView, GrazerId, Sprite, TileCoord, TileView, Vec2, WorldView};
use pasture_world::{
    FertilizerField, Grid, RandomSource, SeededRandom, WorldError, WorldLayout,
};
use tracing::{info, warn};

use crate::clock::SimClock;
use crate::config::SimulationConfig;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur while building a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldInitError {
    /// The configured viewport does not produce a usable grid.
    #[error("world layout error: {source}")]
    Layout {
        /// The underlying layout error.
        #[from]
        source: WorldError,
    },
}

/// Random source owned by the world.
pub type WorldRandom = Box<dyn RandomSource + Send>;

/// Complete simulation state.
pub struct World {
    pub(crate) config: SimulationConfig,
    pub(crate) grid: Grid,
    pub(crate) deposits: FertilizerField,
    pub(crate) herd: Herd,
    pub(crate) predator: Predator,
    pub(crate) shepherd: Shepherd,
    pub(crate) clock: SimClock,
    pub(crate) rng: WorldRandom,
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.clock.tick())
            .field("columns", &self.grid.layout().columns())
            .field("rows", &self.grid.layout().rows())
            .field("grazers_alive", &self.herd.alive_count())
            .field("predator", &self.predator.state)
            .field("shepherd", &self.shepherd.mode)
            .finish_non_exhaustive()
    }
}

impl World {
    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    /// Build a populated world from the configured viewport.
    ///
    /// Every tile gets vegetation with even odds at a random age, the
    /// starting grazers are scattered over the grid, and the predator and
    /// shepherd are placed on their configured tiles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldInitError::Layout`] if the viewport, tile size and
    /// padding leave no grid.
    pub fn new(config: SimulationConfig, rng: WorldRandom) -> Result<Self, WorldInitError> {
        let world_config = &config.world;
        let layout = WorldLayout::from_viewport(
            world_config.viewport_width,
            world_config.viewport_height,
            world_config.tile_size,
            world_config.padding_x,
            world_config.padding_y,
        )?;
        let starting_grazers = world_config.starting_grazers;

        let mut world = Self::empty(layout, config, rng);
        world.seed_vegetation();
        for _ in 0..starting_grazers {
            let position = layout.random_position(world.rng.as_mut());
            world.spawn_grazer(position);
        }

        info!(
            columns = layout.columns(),
            rows = layout.rows(),
            vegetation = world.grid.vegetation_count(),
            grazers = world.herd.alive_count(),
            "World built"
        );
        Ok(world)
    }

    /// Build a populated world drawing from a [`SeededRandom`] seeded with
    /// `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldInitError::Layout`] if the configured layout is
    /// unusable.
    pub fn seeded(config: SimulationConfig) -> Result<Self, WorldInitError> {
        let rng = Box::new(SeededRandom::new(config.world.seed));
        Self::new(config, rng)
    }

    /// Build a bare world on `layout`: walkable ground, no vegetation and
    /// no grazers. The predator and shepherd are placed as usual.
    pub fn empty(layout: WorldLayout, config: SimulationConfig, rng: WorldRandom) -> Self {
        let predator = Predator::new(&layout, &config.predator);
        let shepherd = Shepherd::new(&layout, &config.shepherd);
        Self {
            grid: Grid::new(layout),
            deposits: FertilizerField::new(layout),
            herd: Herd::new(),
            predator,
            shepherd,
            clock: SimClock::new(),
            rng,
            config,
        }
    }

    fn seed_vegetation(&mut self) {
        for coord in self.grid.layout().coords() {
            if self.rng.range_inclusive(0, 100) > 50 {
                let age = random_age(self.rng.as_mut());
                self.grid.spawn_vegetation(coord);
                self.grid.set_vegetation_age(coord, age);
            }
        }
    }

    /// Add a grazer at `position` right away. Positions outside the world
    /// are clamped into it.
    pub fn spawn_grazer(&mut self, position: Vec2) -> GrazerId {
        let bounds = self.grid.layout().bounds();
        let placed = bounds.clamp(position);
        if placed != position {
            warn!(x = position.x, y = position.y, "Grazer spawn position outside the world, clamped");
        }
        let id = self.herd.spawn(placed, &self.config.grazer);
        info!(grazer = %id, x = placed.x, y = placed.y, "Grazer spawned");
        id
    }

    /// Run one tick of `dt` seconds. See [`tick::run_tick`].
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if `dt` is unusable or the clock overflows.
    pub fn tick(&mut self, dt: f32) -> Result<TickSummary, TickError> {
        tick::run_tick(self, dt)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Configuration the world was built with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Grid dimensions and placement.
    pub const fn layout(&self) -> &WorldLayout {
        self.grid.layout()
    }

    /// Ground and vegetation.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Ground and vegetation, mutably, for editor tooling and scenarios.
    pub const fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Fertilizer deposits.
    pub const fn deposits(&self) -> &FertilizerField {
        &self.deposits
    }

    /// All grazers.
    pub const fn herd(&self) -> &Herd {
        &self.herd
    }

    /// All grazers, mutably.
    pub const fn herd_mut(&mut self) -> &mut Herd {
        &mut self.herd
    }

    /// The predator.
    pub const fn predator(&self) -> &Predator {
        &self.predator
    }

    /// The predator, mutably.
    pub const fn predator_mut(&mut self) -> &mut Predator {
        &mut self.predator
    }

    /// The shepherd.
    pub const fn shepherd(&self) -> &Shepherd {
        &self.shepherd
    }

    /// Completed ticks and elapsed time.
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    // -------------------------------------------------------------------
    // Spatial queries
    // -------------------------------------------------------------------

    /// Whether the shepherd is within the outer threshold of `coord`.
    pub fn is_shepherd_nearby(&self, coord: TileCoord) -> bool {
        self.shepherd
            .proximity(&self.config.shepherd)
            .is_nearby(coord, self.grid.layout())
    }

    /// Whether the shepherd is within the inner threshold of `coord`.
    pub fn is_shepherd_too_close(&self, coord: TileCoord) -> bool {
        self.shepherd
            .proximity(&self.config.shepherd)
            .is_too_close(coord, self.grid.layout())
    }

    /// First grazer `caller` could mate with.
    pub fn find_mate(&self, caller: GrazerId) -> Option<GrazerId> {
        self.herd.find_mate(caller)
    }

    /// First live grazer within the predator's hunting radius.
    ///
    /// Grazers scanned before the match lose their hunted flag.
    pub fn nearest_huntable(&mut self) -> Option<GrazerId> {
        self.herd.nearest_huntable(
            self.predator.body.position,
            self.config.predator.hunting_radius,
        )
    }

    // -------------------------------------------------------------------
    // Input intents
    // -------------------------------------------------------------------

    /// Send the shepherd toward `tile`. Returns `false` while it is
    /// stunned or for off-grid tiles.
    pub fn set_shepherd_target(&mut self, tile: TileCoord) -> bool {
        let layout = *self.grid.layout();
        self.shepherd.set_target(tile, &layout)
    }

    /// Mark `tile` walkable or blocked.
    pub fn set_walkable(&mut self, tile: TileCoord, walkable: bool) {
        self.grid.set_walkable(tile, walkable);
    }

    /// Grow vegetation on `tile` at a random age, or clear it. Growing is a
    /// no-op where vegetation is already alive.
    pub fn set_vegetation_alive(&mut self, tile: TileCoord, alive: bool) {
        if !alive {
            self.grid.despawn_vegetation(tile);
            return;
        }
        if self.grid.layout().contains(tile) && !self.grid.has_vegetation(tile) {
            let age = random_age(self.rng.as_mut());
            self.grid.spawn_vegetation(tile);
            self.grid.set_vegetation_age(tile, age);
        }
    }

    // -------------------------------------------------------------------
    // Render query surface
    // -------------------------------------------------------------------

    /// Snapshot everything a renderer needs.
    pub fn view(&self) -> WorldView {
        let layout = self.grid.layout();
        let tiles = layout
            .coords()
            .map(|coord| {
                let ground = self.grid.ground_at(coord);
                let vegetation = self.grid.vegetation_at(coord);
                TileView {
                    coord,
                    walkable: ground.is_some_and(|g| g.walkable),
                    fertilized: ground.is_some_and(|g| g.fertilized),
                    vegetation_age: vegetation.map_or(0.0, |v| v.age),
                    vegetation_state: vegetation.filter(|v| v.is_alive()).map(|v| v.state),
                    has_deposit: self.deposits.has_deposit(coord),
                }
            })
            .collect();

        let mut agents: Vec<AgentView> = self
            .herd
            .iter()
            .filter(|(_, g)| g.is_alive)
            .map(|(id, g)| grazer_view(id, g))
            .collect();
        agents.push(agent_view(
            AgentKind::Predator,
            None,
            &self.predator.body,
            &self.predator.navigator,
            self.predator.sprite,
        ));
        agents.push(agent_view(
            AgentKind::Shepherd,
            None,
            &self.shepherd.body,
            &self.shepherd.navigator,
            self.shepherd.sprite,
        ));

        WorldView {
            tick: self.clock.tick(),
            elapsed: self.clock.elapsed(),
            columns: layout.columns(),
            rows: layout.rows(),
            tile_size: layout.tile_size(),
            origin: layout.origin(),
            den_position: self.predator.den_position,
            tiles,
            agents,
        }
    }
}

/// Vegetation age drawn as `random(1, 100) / 100`.
#[allow(clippy::cast_precision_loss)]
fn random_age(rng: &mut dyn RandomSource) -> f32 {
    rng.range_inclusive(1, 100) as f32 / 100.0
}

fn grazer_view(id: GrazerId, grazer: &Grazer) -> AgentView {
    agent_view(
        AgentKind::Grazer,
        Some(id),
        &grazer.body,
        &grazer.navigator,
        grazer.sprite,
    )
}

fn agent_view(
    kind: AgentKind,
    id: Option<GrazerId>,
    body: &Body,
    navigator: &Navigator,
    sprite: Sprite,
) -> AgentView {
    AgentView {
        kind,
        id,
        position: body.position,
        facing_right: body.facing_right,
        path: navigator.path().iter().copied().collect(),
        target_tile: navigator.target(),
        sprite,
    }
}
