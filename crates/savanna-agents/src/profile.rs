//! Per-kind behavior profiles.
//!
//! An [`AgentProfile`] flattens the behavior configuration into the
//! numbers one agent loop actually needs. The loop itself never
//! branches on kind; the profile carries the difference.

use savanna_types::AgentKind;

use crate::config::BehaviorConfig;

/// The full parameterization of one agent's behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    /// Which kind of agent this profile drives.
    pub kind: AgentKind,
    /// Starting energy.
    pub initial_energy: f64,
    /// Energy lost each cycle.
    pub decay: f64,
    /// Activity threshold `H`: active below this energy.
    pub hunger_threshold: f64,
    /// Hysteresis upper bound: passive again above this energy.
    pub passive_threshold: f64,
    /// Reproduction threshold `R`.
    pub reproduction_threshold: f64,
    /// Energy paid locally per reproduction.
    pub reproduction_cost: f64,
    /// Probability of requesting the kind's action while active.
    pub action_probability: f64,
    /// Probability of reproducing while above `R`.
    pub reproduction_probability: f64,
    /// Energy gained per granted grass unit (prey; zero for predators).
    pub grass_gain_per_unit: f64,
    /// Energy gained per successful hunt (predators; zero for prey).
    pub eat_gain: f64,
    /// Smallest grass request (prey only).
    pub min_eat: u32,
    /// Largest grass request (prey only).
    pub max_eat: u32,
}

impl AgentProfile {
    /// Build the prey profile from the behavior configuration.
    pub fn prey(config: &BehaviorConfig) -> Self {
        Self {
            kind: AgentKind::Prey,
            initial_energy: config.prey_initial_energy,
            decay: config.prey_energy_decay,
            hunger_threshold: config.hunger_threshold,
            passive_threshold: config.hunger_threshold * 1.5,
            reproduction_threshold: config.reproduction_threshold,
            reproduction_cost: config.reproduction_cost,
            action_probability: config.prey_eat_prob.clamp(0.0, 1.0),
            reproduction_probability: config.prey_repro_prob.clamp(0.0, 1.0),
            grass_gain_per_unit: config.prey_grass_gain_per_unit,
            eat_gain: 0.0,
            min_eat: config.prey_min_eat,
            max_eat: config.prey_max_eat.max(config.prey_min_eat),
        }
    }

    /// Build the predator profile from the behavior configuration.
    pub fn predator(config: &BehaviorConfig) -> Self {
        Self {
            kind: AgentKind::Predator,
            initial_energy: config.predator_initial_energy,
            decay: config.predator_energy_decay,
            hunger_threshold: config.hunger_threshold,
            passive_threshold: config.hunger_threshold * 1.5,
            reproduction_threshold: config.reproduction_threshold,
            reproduction_cost: config.reproduction_cost,
            action_probability: config.predator_hunt_prob.clamp(0.0, 1.0),
            reproduction_probability: config.predator_repro_prob.clamp(0.0, 1.0),
            grass_gain_per_unit: 0.0,
            eat_gain: config.predator_eat_gain,
            min_eat: 0,
            max_eat: 0,
        }
    }

    /// Build the profile for `kind`.
    pub fn for_kind(kind: AgentKind, config: &BehaviorConfig) -> Self {
        match kind {
            AgentKind::Prey => Self::prey(config),
            AgentKind::Predator => Self::predator(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prey_profile_carries_prey_numbers() {
        let p = AgentProfile::prey(&BehaviorConfig::default());
        assert_eq!(p.kind, AgentKind::Prey);
        assert!((p.decay - 1.0).abs() < f64::EPSILON);
        assert!((p.passive_threshold - 45.0).abs() < f64::EPSILON);
        assert!((p.grass_gain_per_unit - 1.0).abs() < f64::EPSILON);
        assert!(p.eat_gain.abs() < f64::EPSILON);
    }

    #[test]
    fn predator_profile_carries_predator_numbers() {
        let p = AgentProfile::predator(&BehaviorConfig::default());
        assert_eq!(p.kind, AgentKind::Predator);
        assert!((p.decay - 2.0).abs() < f64::EPSILON);
        assert!((p.eat_gain - 30.0).abs() < f64::EPSILON);
        assert!(p.grass_gain_per_unit.abs() < f64::EPSILON);
    }

    #[test]
    fn max_eat_never_drops_below_min_eat() {
        let cfg = BehaviorConfig {
            prey_min_eat: 50,
            prey_max_eat: 10,
            ..BehaviorConfig::default()
        };
        let p = AgentProfile::prey(&cfg);
        assert_eq!(p.max_eat, 50);
    }

    #[test]
    fn probabilities_are_clamped_to_unit_interval() {
        let cfg = BehaviorConfig {
            prey_eat_prob: 1.7,
            prey_repro_prob: -0.3,
            ..BehaviorConfig::default()
        };
        let p = AgentProfile::prey(&cfg);
        assert!((p.action_probability - 1.0).abs() < f64::EPSILON);
        assert!(p.reproduction_probability.abs() < f64::EPSILON);
    }
}
