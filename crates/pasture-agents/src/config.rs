//! Tunables for each agent kind.
//!
//! Speeds and distances are in pixels, durations in seconds. Every struct
//! deserializes with missing fields filled from [`Default`], so a config
//! file only needs to name what it changes.

use pasture_types::TileCoord;
use serde::{Deserialize, Serialize};

use crate::motion::DEFAULT_EDGE_ARRIVAL_FACTOR;

/// Grazer tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrazerConfig {
    /// Speed while wandering or foraging (default: 50).
    pub walking_speed: f32,
    /// Speed while fleeing or approaching a mate (default: 70).
    pub running_speed: f32,
    /// Body radius (default: 20).
    pub radius: f32,
    /// Health cap and starting health (default: 10).
    pub max_health: f32,
    /// Meals needed to become satiated (default: 3).
    pub satiation_count: u32,
    /// Seconds satiated before defecating (default: 3).
    pub defecate_delay: f32,
    /// Minimum seconds between meals (default: 2).
    pub eat_delay: f32,
    /// Seconds without a meal before starvation sets in (default: 5).
    pub time_before_damage: f32,
    /// Health restored per meal (default: 2).
    pub health_regeneration: f32,
    /// Health lost per second while starving (default: 0.1).
    pub starvation_damage_rate: f32,
    /// How far to look for vegetation and wander (default: 150).
    pub forage_range: f32,
    /// How far to flee from the predator (default: 300).
    pub flee_range: f32,
    /// Seconds between Sense phases (default: 0.25).
    pub sense_interval: f32,
    /// Seconds between Think phases (default: 0.5).
    pub think_interval: f32,
    /// Seconds after a meal before the idle sprite returns (default: 0.3).
    pub idle_sprite_delay: f32,
    /// Added to `(2 * radius)^2` for the squared mating range (default: 10).
    pub mating_range_slack: f32,
    /// Extra arrival distance outside the Hungry state (default: 2).
    pub arrival_slack: f32,
    /// Arrival radius on edge tiles as a multiple of `radius` (default: 2).
    pub edge_arrival_factor: f32,
}

impl Default for GrazerConfig {
    fn default() -> Self {
        Self {
            walking_speed: 50.0,
            running_speed: 70.0,
            radius: 20.0,
            max_health: 10.0,
            satiation_count: 3,
            defecate_delay: 3.0,
            eat_delay: 2.0,
            time_before_damage: 5.0,
            health_regeneration: 2.0,
            starvation_damage_rate: 0.1,
            forage_range: 150.0,
            flee_range: 300.0,
            sense_interval: 0.25,
            think_interval: 0.5,
            idle_sprite_delay: 0.3,
            mating_range_slack: 10.0,
            arrival_slack: 2.0,
            edge_arrival_factor: DEFAULT_EDGE_ARRIVAL_FACTOR,
        }
    }
}

/// Predator tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    /// Speed while wandering (default: 50).
    pub walking_speed: f32,
    /// Speed while chasing or near the shepherd (default: 75).
    pub running_speed: f32,
    /// Body radius (default: 19).
    pub radius: f32,
    /// Distance within which grazers are noticed (default: 200).
    pub hunting_radius: f32,
    /// Range of random wander targets (default: 300).
    pub wandering_radius: f32,
    /// Seconds spent asleep (default: 10).
    pub sleep_duration: f32,
    /// Minimum seconds between meals (default: 3).
    pub eat_delay: f32,
    /// Meals needed to become satiated (default: 3).
    pub satiation_count: u32,
    /// Damage dealt per bite (default: 10).
    pub bite_damage: f32,
    /// Seconds between Sense phases (default: 0.5).
    pub sense_interval: f32,
    /// Seconds between Think phases (default: 0.25).
    pub think_interval: f32,
    /// Tile the predator starts on (default: (4, 5)).
    pub spawn_tile: TileCoord,
    /// Tile of the den (default: (3, 3)).
    pub den_tile: TileCoord,
    /// Tile in front of the den where it sleeps (default: (4, 4)).
    pub sleep_tile: TileCoord,
    /// Arrival radius on edge tiles as a multiple of `radius` (default: 2).
    pub edge_arrival_factor: f32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            walking_speed: 50.0,
            running_speed: 75.0,
            radius: 19.0,
            hunting_radius: 200.0,
            wandering_radius: 300.0,
            sleep_duration: 10.0,
            eat_delay: 3.0,
            satiation_count: 3,
            bite_damage: 10.0,
            sense_interval: 0.5,
            think_interval: 0.25,
            spawn_tile: TileCoord::new(4, 5),
            den_tile: TileCoord::new(3, 3),
            sleep_tile: TileCoord::new(4, 4),
            edge_arrival_factor: DEFAULT_EDGE_ARRIVAL_FACTOR,
        }
    }
}

/// Shepherd tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShepherdConfig {
    /// Walking speed (default: 70).
    pub speed: f32,
    /// Body radius (default: 25).
    pub radius: f32,
    /// Seconds stunned after an attack (default: 4).
    pub stun_duration: f32,
    /// Tile the shepherd starts on (default: (21, 21)).
    pub start_tile: TileCoord,
    /// Predator within this distance runs from the shepherd (default: 125).
    pub nearby_radius: f32,
    /// Predator within this distance attacks the shepherd (default: 75).
    pub too_close_radius: f32,
}

impl Default for ShepherdConfig {
    fn default() -> Self {
        Self {
            speed: 70.0,
            radius: 25.0,
            stun_duration: 4.0,
            start_tile: TileCoord::new(21, 21),
            nearby_radius: 125.0,
            too_close_radius: 75.0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "running_speed: 90\nden_tile: { x: 1, y: 2 }\n";
        let config: PredatorConfig = serde_yml::from_str(yaml).unwrap();
        assert!((config.running_speed - 90.0).abs() < f32::EPSILON);
        assert_eq!(config.den_tile, TileCoord::new(1, 2));
        assert_eq!(config.satiation_count, 3);
    }

    #[test]
    fn shepherd_thresholds_are_nested() {
        let config = ShepherdConfig::default();
        assert!(config.too_close_radius < config.nearby_radius);
    }
}
