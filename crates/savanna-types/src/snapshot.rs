//! The per-tick snapshot published by the orchestrator.
//!
//! A [`Snapshot`] is an immutable projection of world state plus the
//! telemetry mirrors, produced once per tick after arbitration and
//! growth. Delivery is best-effort: a slow consumer may miss snapshots
//! and must tolerate gaps in tick numbers.

use serde::{Deserialize, Serialize};

/// Aggregate energy statistics for one agent kind.
///
/// All fields are zero when no agents of that kind are alive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyStats {
    /// Lowest mirrored energy.
    pub min: f64,
    /// Mean mirrored energy.
    pub avg: f64,
    /// Highest mirrored energy.
    pub max: f64,
}

impl EnergyStats {
    /// Compute min/avg/max over a set of energy values.
    ///
    /// Returns the zero stats for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        let mut iter = values.iter().copied();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let mut min = first;
        let mut max = first;
        let mut sum = first;
        for v in iter {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        // values is non-empty here, so the division is well-defined.
        #[allow(clippy::cast_precision_loss)]
        let avg = sum / values.len() as f64;
        Self { min, avg, max }
    }
}

/// Static decision probabilities for one agent kind, echoed into every
/// snapshot so the dashboard can display them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionProbs {
    /// Probability of requesting the kind's action (eat or hunt) per cycle
    /// while active.
    pub action: f64,
    /// Probability of requesting reproduction per cycle while above the
    /// reproduction threshold.
    pub reproduce: f64,
}

/// Immutable projection of the world published once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The tick this snapshot was produced at.
    pub tick: u64,
    /// Live prey count.
    pub prey: u32,
    /// Live predator count.
    pub predators: u32,
    /// Current grass quantity.
    pub grass: u32,
    /// Whether drought mode is active.
    pub drought: bool,
    /// Energy statistics over the prey mirrors.
    pub prey_energy: EnergyStats,
    /// Energy statistics over the predator mirrors.
    pub predator_energy: EnergyStats,
    /// Prey decision probabilities (eat, reproduce).
    pub prey_probs: DecisionProbs,
    /// Predator decision probabilities (hunt, reproduce).
    pub predator_probs: DecisionProbs,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_empty_slice_are_zero() {
        let stats = EnergyStats::from_values(&[]);
        assert!(stats.min.abs() < f64::EPSILON);
        assert!(stats.avg.abs() < f64::EPSILON);
        assert!(stats.max.abs() < f64::EPSILON);
    }

    #[test]
    fn stats_over_values() {
        let stats = EnergyStats::from_values(&[10.0, 20.0, 30.0]);
        assert!((stats.min - 10.0).abs() < f64::EPSILON);
        assert!((stats.avg - 20.0).abs() < f64::EPSILON);
        assert!((stats.max - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_value_stats() {
        let stats = EnergyStats::from_values(&[7.5]);
        assert!((stats.min - 7.5).abs() < f64::EPSILON);
        assert!((stats.avg - 7.5).abs() < f64::EPSILON);
        assert!((stats.max - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = Snapshot {
            tick: 42,
            prey: 3,
            predators: 1,
            grass: 180,
            drought: false,
            prey_energy: EnergyStats::from_values(&[40.0]),
            predator_energy: EnergyStats::default(),
            prey_probs: DecisionProbs { action: 0.8, reproduce: 0.2 },
            predator_probs: DecisionProbs { action: 0.8, reproduce: 0.2 },
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["tick"], 42);
        assert_eq!(json["grass"], 180);
        assert_eq!(json["prey_probs"]["action"], 0.8);
    }
}
