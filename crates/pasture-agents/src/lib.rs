//! Behavior machines for the agents of the Pasture ecosystem simulation.
//!
//! Every agent runs three phases per tick. *Sense* re-validates its target
//! and replans a path, *Think* evaluates transition guards and picks intent,
//! and *Act* integrates motion and timers. Sense and Think fire on their own
//! cadences; Act runs every tick.
//!
//! Agents never reach into the world directly. Each update receives a
//! context with read access to what it may observe, and returns effects
//! that the orchestrator applies to shared state.
//!
//! # Modules
//!
//! - [`cadence`] -- Fixed-interval timers for Sense and Think.
//! - [`config`] -- Per-kind tunables ([`GrazerConfig`], [`PredatorConfig`],
//!   [`ShepherdConfig`]).
//! - [`grazer`] -- The grazer state machine and its effects.
//! - [`herd`] -- [`Herd`]: generation-checked arena of grazers with mate and
//!   prey lookups.
//! - [`motion`] -- Circle bodies and path-following navigation.
//! - [`predator`] -- The predator state machine.
//! - [`shepherd`] -- The shepherd controller and its proximity thresholds.

pub mod cadence;
pub mod config;
pub mod grazer;
pub mod herd;
pub mod motion;
pub mod predator;
pub mod shepherd;

// Re-export primary types at crate root for convenience.
pub use cadence::Cadence;
pub use config::{GrazerConfig, PredatorConfig, ShepherdConfig};
pub use grazer::{Grazer, GrazerContext, GrazerEffect, GrazerSignals, MateStatus};
pub use herd::{Herd, HerdCommit};
pub use motion::{Body, DEFAULT_EDGE_ARRIVAL_FACTOR, Navigator};
pub use predator::{Predator, PredatorContext, PredatorEffect, PredatorSignals};
pub use shepherd::{Shepherd, ShepherdProximity};
