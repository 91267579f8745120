//! Behavior configuration for both agent kinds.
//!
//! Mirrors the `behavior` section of `savanna-config.yaml`. All fields
//! default to the canonical simulation constants so an absent section
//! still produces a runnable world.

use serde::Deserialize;

/// Energy dynamics and decision parameters for prey and predators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    /// Energy below which an agent becomes active (hungry). `H` in the
    /// hysteresis rule: passive again only above `1.5 × H`.
    #[serde(default = "default_hunger_threshold")]
    pub hunger_threshold: f64,

    /// Energy above which an agent may attempt reproduction.
    #[serde(default = "default_reproduction_threshold")]
    pub reproduction_threshold: f64,

    /// Energy deducted locally when an agent reproduces.
    #[serde(default = "default_reproduction_cost")]
    pub reproduction_cost: f64,

    /// Starting energy for a new prey.
    #[serde(default = "default_prey_initial_energy")]
    pub prey_initial_energy: f64,

    /// Starting energy for a new predator.
    #[serde(default = "default_predator_initial_energy")]
    pub predator_initial_energy: f64,

    /// Energy lost by a prey each cycle.
    #[serde(default = "default_prey_energy_decay")]
    pub prey_energy_decay: f64,

    /// Energy lost by a predator each cycle.
    #[serde(default = "default_predator_energy_decay")]
    pub predator_energy_decay: f64,

    /// Energy gained per unit of granted grass.
    #[serde(default = "default_prey_grass_gain_per_unit")]
    pub prey_grass_gain_per_unit: f64,

    /// Energy gained by a predator from a successful hunt.
    #[serde(default = "default_predator_eat_gain")]
    pub predator_eat_gain: f64,

    /// Probability per cycle that an active prey requests to eat.
    #[serde(default = "default_prey_eat_prob")]
    pub prey_eat_prob: f64,

    /// Probability per cycle that a well-fed prey reproduces.
    #[serde(default = "default_prey_repro_prob")]
    pub prey_repro_prob: f64,

    /// Probability per cycle that an active predator requests a hunt.
    #[serde(default = "default_predator_hunt_prob")]
    pub predator_hunt_prob: f64,

    /// Probability per cycle that a well-fed predator reproduces.
    #[serde(default = "default_predator_repro_prob")]
    pub predator_repro_prob: f64,

    /// Smallest grass amount a prey will request.
    #[serde(default = "default_prey_min_eat")]
    pub prey_min_eat: u32,

    /// Largest grass amount a prey will request.
    #[serde(default = "default_prey_max_eat")]
    pub prey_max_eat: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            hunger_threshold: default_hunger_threshold(),
            reproduction_threshold: default_reproduction_threshold(),
            reproduction_cost: default_reproduction_cost(),
            prey_initial_energy: default_prey_initial_energy(),
            predator_initial_energy: default_predator_initial_energy(),
            prey_energy_decay: default_prey_energy_decay(),
            predator_energy_decay: default_predator_energy_decay(),
            prey_grass_gain_per_unit: default_prey_grass_gain_per_unit(),
            predator_eat_gain: default_predator_eat_gain(),
            prey_eat_prob: default_prey_eat_prob(),
            prey_repro_prob: default_prey_repro_prob(),
            predator_hunt_prob: default_predator_hunt_prob(),
            predator_repro_prob: default_predator_repro_prob(),
            prey_min_eat: default_prey_min_eat(),
            prey_max_eat: default_prey_max_eat(),
        }
    }
}

const fn default_hunger_threshold() -> f64 {
    30.0
}

const fn default_reproduction_threshold() -> f64 {
    60.0
}

const fn default_reproduction_cost() -> f64 {
    20.0
}

const fn default_prey_initial_energy() -> f64 {
    40.0
}

const fn default_predator_initial_energy() -> f64 {
    40.0
}

const fn default_prey_energy_decay() -> f64 {
    1.0
}

const fn default_predator_energy_decay() -> f64 {
    2.0
}

const fn default_prey_grass_gain_per_unit() -> f64 {
    1.0
}

const fn default_predator_eat_gain() -> f64 {
    30.0
}

const fn default_prey_eat_prob() -> f64 {
    0.8
}

const fn default_prey_repro_prob() -> f64 {
    0.2
}

const fn default_predator_hunt_prob() -> f64 {
    0.8
}

const fn default_predator_repro_prob() -> f64 {
    0.2
}

const fn default_prey_min_eat() -> u32 {
    1
}

// Twice the reproduction threshold, matching the historical request cap.
const fn default_prey_max_eat() -> u32 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_simulation_constants() {
        let cfg = BehaviorConfig::default();
        assert!((cfg.hunger_threshold - 30.0).abs() < f64::EPSILON);
        assert!((cfg.reproduction_threshold - 60.0).abs() < f64::EPSILON);
        assert!((cfg.predator_energy_decay - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.prey_min_eat, 1);
        assert_eq!(cfg.prey_max_eat, 120);
    }
}
