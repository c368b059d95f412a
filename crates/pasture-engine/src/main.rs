//! Headless engine binary for the Pasture ecosystem simulation.
//!
//! This is the main entry point that wires together configuration,
//! logging, world construction and the run loop. Nothing is drawn; the
//! world is observed through the log.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pasture-config.yaml` (or `PASTURE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the world from the configured viewport and seed
//! 4. Run the simulation loop until a bound is hit or Ctrl-C arrives
//! 5. Log the result

mod error;
mod snapshot_callback;

use std::path::PathBuf;

use pasture_core::World;
use pasture_core::config::SimulationConfig;
use pasture_core::runner;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_callback::SnapshotCallback;

/// Config file used when `PASTURE_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "pasture-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, world construction or the
/// simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging depends on it, so this comes first.
    let (config, config_path, found) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("pasture-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        viewport_width = config.world.viewport_width,
        viewport_height = config.world.viewport_height,
        starting_grazers = config.world.starting_grazers,
        tick_dt = config.simulation.tick_dt,
        max_ticks = config.simulation.max_ticks,
        "Configuration"
    );

    // 3. Build the world.
    let bounds = config.simulation.clone();
    let mut callback = SnapshotCallback::new(config.logging.snapshot_interval_ticks);
    let mut world = World::seeded(config).map_err(EngineError::from)?;

    // 4. Run until a bound is hit or the operator interrupts.
    let finished = tokio::select! {
        result = runner::run_simulation(&mut world, &bounds, &mut callback) => Some(result),
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(EngineError::from)?;
            None
        }
    };
    match finished {
        Some(result) => {
            let result = result.map_err(EngineError::from)?;
            runner::log_simulation_end(&result);
        }
        None => info!(tick = world.clock().tick(), "Interrupted, stopping"),
    }

    // 5. Log results.
    let totals = callback.totals();
    info!(
        ticks = world.clock().tick(),
        elapsed = world.clock().elapsed(),
        grazers_alive = world.herd().alive_count(),
        births = totals.births,
        deaths = totals.deaths,
        meals = totals.meals,
        bites = totals.bites,
        shepherd_stuns = totals.stuns,
        "pasture-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// The path comes from `PASTURE_CONFIG`, falling back to
/// `pasture-config.yaml` in the working directory. A missing file yields
/// the defaults. Returns the config, the path tried and whether it existed.
fn load_config() -> Result<(SimulationConfig, PathBuf, bool), EngineError> {
    let path = std::env::var_os("PASTURE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, path, true))
    } else {
        let mut config = SimulationConfig::default();
        config.world.apply_env_overrides();
        Ok((config, path, false))
    }
}
