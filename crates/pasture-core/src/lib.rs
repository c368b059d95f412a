//! World orchestration for the Pasture ecosystem simulation.
//!
//! This crate owns the [`World`] and the fixed per-tick sequence that drives
//! it: vegetation, grazers, fertilizer, predator, shepherd, then the herd
//! post-pass and the clock.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and elapsed simulated time.
//! - [`config`] -- Configuration loading from `pasture-config.yaml` into
//!   strongly-typed structs.
//! - [`runner`] -- Async run loop with pacing, bounds and tick callbacks.
//! - [`tick`] -- The per-tick sequence and its summary.
//! - [`world`] -- [`World`]: grid, herd, predator, shepherd, queries and
//!   input intents.
//!
//! [`World`]: world::World

pub mod clock;
pub mod config;
pub mod runner;
pub mod tick;
pub mod world;

pub use world::World;
