//! Pure per-cycle agent logic: control absorption, decay, activity
//! hysteresis, and probabilistic decisions.
//!
//! Everything here is deterministic given an RNG, so the decision
//! rules are tested with a seeded [`rand::rngs::StdRng`] without any
//! channels or timers involved.

use rand::Rng;
use savanna_types::{AgentKind, Control};

use crate::profile::AgentProfile;

/// Outcome of absorbing one control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Keep living.
    Continue,
    /// A die directive arrived; terminate now.
    Die,
}

/// The action an agent chose to request this cycle, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    /// Prey: request this many units of grass.
    Eat(u32),
    /// Predator: request a hunt.
    Hunt,
}

/// The full decision output of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDecision {
    /// The resource/action request to send, if any.
    pub action: Option<ActionChoice>,
    /// Whether to request one offspring (and pay the cost).
    pub reproduce: bool,
}

/// An agent's private mutable state: energy and activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentVitals {
    /// Current energy. The agent dies when this reaches zero.
    pub energy: f64,
    /// Whether the agent is active (hungry). Starts passive.
    pub active: bool,
}

impl AgentVitals {
    /// Fresh vitals at the profile's initial energy, passive.
    pub const fn new(profile: &AgentProfile) -> Self {
        Self {
            energy: profile.initial_energy,
            active: false,
        }
    }

    /// Absorb one control message: grants increase energy, a die
    /// directive ends the agent. Grant messages for the other kind's
    /// action contribute nothing (their gain factor is zero).
    pub fn absorb(&mut self, profile: &AgentProfile, control: Control) -> Fate {
        match control {
            Control::Die => Fate::Die,
            Control::GrassGrant { granted } => {
                self.energy += f64::from(granted) * profile.grass_gain_per_unit;
                Fate::Continue
            }
            Control::HuntResult { success } => {
                if success {
                    self.energy += profile.eat_gain;
                }
                Fate::Continue
            }
        }
    }

    /// Apply the fixed per-cycle energy decay.
    pub fn decay(&mut self, profile: &AgentProfile) {
        self.energy -= profile.decay;
    }

    /// Recompute activity with hysteresis: active below `H`, passive
    /// above `1.5 × H`, otherwise hold the previous state.
    pub fn refresh_activity(&mut self, profile: &AgentProfile) {
        if self.energy < profile.hunger_threshold {
            self.active = true;
        } else if self.energy > profile.passive_threshold {
            self.active = false;
        }
    }

    /// Whether the agent has starved.
    pub fn exhausted(&self) -> bool {
        self.energy <= 0.0
    }
}

/// Decide this cycle's requests.
///
/// While active, the agent rolls its action probability: prey pick a
/// uniform grass amount in `[min_eat, max_eat]`, predators request a
/// hunt. Independently, an agent above the reproduction threshold
/// rolls its reproduction probability.
pub fn decide_cycle<R: Rng>(
    profile: &AgentProfile,
    vitals: &AgentVitals,
    rng: &mut R,
) -> CycleDecision {
    let action = if vitals.active && rng.random_bool(profile.action_probability) {
        match profile.kind {
            AgentKind::Prey => {
                let amount = rng.random_range(profile.min_eat..=profile.max_eat);
                Some(ActionChoice::Eat(amount))
            }
            AgentKind::Predator => Some(ActionChoice::Hunt),
        }
    } else {
        None
    };

    let reproduce = vitals.energy > profile.reproduction_threshold
        && rng.random_bool(profile.reproduction_probability);

    CycleDecision { action, reproduce }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::BehaviorConfig;

    fn prey() -> AgentProfile {
        AgentProfile::prey(&BehaviorConfig::default())
    }

    fn predator() -> AgentProfile {
        AgentProfile::predator(&BehaviorConfig::default())
    }

    #[test]
    fn starts_passive_at_initial_energy() {
        let p = prey();
        let v = AgentVitals::new(&p);
        assert!(!v.active);
        assert!((v.energy - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hysteresis_activates_below_threshold() {
        let p = prey();
        let mut v = AgentVitals::new(&p);
        v.energy = 29.0;
        v.refresh_activity(&p);
        assert!(v.active);
    }

    #[test]
    fn hysteresis_holds_between_thresholds() {
        let p = prey();
        let mut v = AgentVitals::new(&p);

        // Became active low, then recovered into the dead band: stays active.
        v.energy = 20.0;
        v.refresh_activity(&p);
        assert!(v.active);
        v.energy = 40.0;
        v.refresh_activity(&p);
        assert!(v.active, "should hold active inside the dead band");

        // Crosses the upper bound: passive again.
        v.energy = 46.0;
        v.refresh_activity(&p);
        assert!(!v.active);

        // Falls back into the dead band from above: stays passive.
        v.energy = 40.0;
        v.refresh_activity(&p);
        assert!(!v.active, "should hold passive inside the dead band");
    }

    #[test]
    fn grass_grant_feeds_prey_only() {
        let prey_profile = prey();
        let mut v = AgentVitals::new(&prey_profile);
        let fate = v.absorb(&prey_profile, Control::GrassGrant { granted: 25 });
        assert_eq!(fate, Fate::Continue);
        assert!((v.energy - 65.0).abs() < f64::EPSILON);

        // A predator's grass gain factor is zero.
        let pred_profile = predator();
        let mut v = AgentVitals::new(&pred_profile);
        let _ = v.absorb(&pred_profile, Control::GrassGrant { granted: 25 });
        assert!((v.energy - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hunt_success_feeds_predator() {
        let p = predator();
        let mut v = AgentVitals::new(&p);
        let _ = v.absorb(&p, Control::HuntResult { success: true });
        assert!((v.energy - 70.0).abs() < f64::EPSILON);
        let _ = v.absorb(&p, Control::HuntResult { success: false });
        assert!((v.energy - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn die_control_is_fatal() {
        let p = prey();
        let mut v = AgentVitals::new(&p);
        assert_eq!(v.absorb(&p, Control::Die), Fate::Die);
    }

    #[test]
    fn decay_uses_profile_rate() {
        let p = predator();
        let mut v = AgentVitals::new(&p);
        v.decay(&p);
        assert!((v.energy - 38.0).abs() < f64::EPSILON);
    }

    #[test]
    fn passive_agents_never_request_actions() {
        let p = prey();
        let v = AgentVitals {
            energy: 50.0,
            active: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = decide_cycle(&p, &v, &mut rng);
            assert!(d.action.is_none());
        }
    }

    #[test]
    fn active_prey_request_bounded_amounts() {
        let p = prey();
        let v = AgentVitals {
            energy: 10.0,
            active: true,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut saw_action = false;
        for _ in 0..200 {
            if let Some(ActionChoice::Eat(amount)) = decide_cycle(&p, &v, &mut rng).action {
                saw_action = true;
                assert!(amount >= p.min_eat && amount <= p.max_eat);
            }
        }
        assert!(saw_action, "0.8 probability should fire within 200 cycles");
    }

    #[test]
    fn active_predators_request_hunts() {
        let p = predator();
        let v = AgentVitals {
            energy: 10.0,
            active: true,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let saw_hunt = (0..200)
            .any(|_| decide_cycle(&p, &v, &mut rng).action == Some(ActionChoice::Hunt));
        assert!(saw_hunt);
    }

    #[test]
    fn reproduction_needs_energy_above_threshold() {
        let p = prey();
        let mut rng = StdRng::seed_from_u64(7);

        let starving = AgentVitals {
            energy: 59.0,
            active: false,
        };
        for _ in 0..200 {
            assert!(!decide_cycle(&p, &starving, &mut rng).reproduce);
        }

        let flourishing = AgentVitals {
            energy: 80.0,
            active: false,
        };
        let reproduced = (0..200).any(|_| decide_cycle(&p, &flourishing, &mut rng).reproduce);
        assert!(reproduced, "0.2 probability should fire within 200 cycles");
    }

    #[test]
    fn exhaustion_at_zero_energy() {
        let p = prey();
        let mut v = AgentVitals::new(&p);
        assert!(!v.exhausted());
        v.energy = 0.0;
        assert!(v.exhausted());
        v.energy = -1.0;
        assert!(v.exhausted());
    }
}
