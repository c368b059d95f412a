//! Behavior states and visual-intent discriminators.

use serde::{Deserialize, Serialize};

/// Growth stage of a vegetation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VegetationState {
    /// Young growth at the normal rate.
    #[default]
    Growing,
    /// Young growth boosted by nearby fertilizer.
    Fertilised,
    /// Mature; may seed neighbors once.
    FullyGrown,
    /// Past maturity; despawns when its age reaches 1.
    Wilting,
}

/// Behavior state of a grazer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrazerState {
    /// Looking for vegetation to eat.
    #[default]
    Hungry,
    /// Fed; wandering until it defecates or seeks a mate.
    Satiated,
    /// Seeking or waiting for a mate.
    Reproducing,
    /// Fleeing the predator.
    Afraid,
}

/// Behavior state of the predator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PredatorState {
    /// Hunting grazers or wandering.
    #[default]
    Hungry,
    /// Returning to the den.
    Satiated,
    /// Sleeping at the den.
    Asleep,
}

/// Control mode of the shepherd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShepherdMode {
    /// Follows the externally supplied target.
    #[default]
    Active,
    /// Recovering from a predator attack; ignores input.
    Stunned,
}

/// Kind of agent in a render view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// A member of the herd.
    Grazer,
    /// The predator.
    Predator,
    /// The shepherd.
    Shepherd,
}

/// Visual intent of an agent, mapped to a sprite region by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sprite {
    /// Grazer idle or walking.
    #[default]
    GrazerNormal,
    /// Grazer just ate.
    GrazerEating,
    /// Grazer is being hunted.
    GrazerAfraid,
    /// Grazer is full.
    GrazerSatiated,
    /// Grazer is looking for a mate.
    GrazerReproducing,
    /// Predator hunting.
    PredatorHungry,
    /// Predator heading home.
    PredatorSatiated,
    /// Predator asleep.
    PredatorSleeping,
    /// Shepherd.
    Shepherd,
}
