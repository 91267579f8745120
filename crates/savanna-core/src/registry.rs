//! Mirrored agent records and the hunt reservation mechanism.
//!
//! The registry is the orchestrator's private view of the living
//! agents: last reported energy and activity, plus the control handle
//! for directives. Records live in a `BTreeMap` keyed by the
//! time-ordered agent ID, so iteration (and hunt selection) is
//! deterministic.
//!
//! The `reserved` flag is the sole synchronization for hunts: a
//! reserved prey is invisible to further hunt scans until its own
//! death telemetry removes the record. All of this runs on the single
//! orchestrator task, so a plain bool suffices.

use std::collections::BTreeMap;

use tokio::sync::mpsc;
use tracing::debug;

use savanna_types::{AgentId, AgentKind, Control, EnergyStats};

/// The orchestrator's mirror of one living agent.
#[derive(Debug)]
pub struct AgentRecord {
    /// The agent's kind.
    pub kind: AgentKind,
    /// Last reported energy.
    pub energy: f64,
    /// Last reported activity (hungry) state.
    pub active: bool,
    /// Whether a hunt has claimed this prey pending its death.
    pub reserved: bool,
    /// Directive channel into the agent task.
    control: mpsc::UnboundedSender<Control>,
}

/// All living agents, keyed by ID in creation order.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    records: BTreeMap<AgentId, AgentRecord>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Add a record for a freshly spawned agent.
    pub fn insert(
        &mut self,
        id: AgentId,
        kind: AgentKind,
        initial_energy: f64,
        control: mpsc::UnboundedSender<Control>,
    ) {
        self.records.insert(
            id,
            AgentRecord {
                kind,
                energy: initial_energy,
                active: false,
                reserved: false,
                control,
            },
        );
    }

    /// Update the mirror from a status report. Unknown IDs (already
    /// removed) are ignored.
    pub fn update_status(&mut self, id: AgentId, energy: f64, active: bool) {
        if let Some(record) = self.records.get_mut(&id) {
            record.energy = energy;
            record.active = active;
        }
    }

    /// Drop a record, returning it so the caller can update counters.
    pub fn remove(&mut self, id: AgentId) -> Option<AgentRecord> {
        self.records.remove(&id)
    }

    /// Number of records of `kind`.
    #[must_use]
    pub fn count(&self, kind: AgentKind) -> usize {
        self.records.values().filter(|r| r.kind == kind).count()
    }

    /// Whether no agents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Send a control message to one agent. A closed channel means the
    /// agent is mid-death; the failure is swallowed.
    pub fn send_control(&self, id: AgentId, message: Control) -> bool {
        let Some(record) = self.records.get(&id) else {
            return false;
        };
        let delivered = record.control.send(message).is_ok();
        if !delivered {
            debug!(%id, "control channel closed, agent presumed dying");
        }
        delivered
    }

    /// Ask every registered agent to die. Closed channels are skipped.
    pub fn broadcast_die(&self) {
        for (id, record) in &self.records {
            if record.control.send(Control::Die).is_err() {
                debug!(%id, "die directive undeliverable");
            }
        }
    }

    /// Claim one prey for a hunt.
    ///
    /// Scans in ID order for the first prey that is active, not yet
    /// reserved, and still reachable; marks it reserved and inactive
    /// and sends it a die directive. If the directive cannot be
    /// delivered the reservation is rolled back and the scan ends as a
    /// miss. The record itself stays until the prey's own death
    /// telemetry arrives.
    pub fn claim_prey_for_hunt(&mut self) -> Option<AgentId> {
        let target = self
            .records
            .iter()
            .find(|(_, r)| r.kind == AgentKind::Prey && r.active && !r.reserved)
            .map(|(id, _)| *id)?;

        if let Some(record) = self.records.get_mut(&target) {
            record.reserved = true;
            record.active = false;
            if record.control.send(Control::Die).is_err() {
                debug!(id = %target, "hunted prey unreachable, releasing reservation");
                record.reserved = false;
                return None;
            }
        }
        Some(target)
    }

    /// Energy statistics over all records of `kind`.
    #[must_use]
    pub fn energy_stats(&self, kind: AgentKind) -> EnergyStats {
        let energies: Vec<f64> = self
            .records
            .values()
            .filter(|r| r.kind == kind)
            .map(|r| r.energy)
            .collect();
        EnergyStats::from_values(&energies)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry_with(kinds: &[AgentKind]) -> (AgentRegistry, Vec<(AgentId, mpsc::UnboundedReceiver<Control>)>) {
        let mut registry = AgentRegistry::new();
        let mut handles = Vec::new();
        for kind in kinds {
            let (tx, rx) = mpsc::unbounded_channel();
            let id = AgentId::new();
            registry.insert(id, *kind, 40.0, tx);
            handles.push((id, rx));
        }
        (registry, handles)
    }

    #[test]
    fn counts_are_per_kind() {
        let (registry, _handles) =
            registry_with(&[AgentKind::Prey, AgentKind::Prey, AgentKind::Predator]);
        assert_eq!(registry.count(AgentKind::Prey), 2);
        assert_eq!(registry.count(AgentKind::Predator), 1);
    }

    #[test]
    fn status_updates_touch_only_known_ids() {
        let (mut registry, handles) = registry_with(&[AgentKind::Prey]);
        let (id, _rx) = handles.first().unwrap();
        registry.update_status(*id, 12.5, true);
        assert!((registry.energy_stats(AgentKind::Prey).avg - 12.5).abs() < f64::EPSILON);
        registry.update_status(AgentId::new(), 99.0, false);
        assert!((registry.energy_stats(AgentKind::Prey).avg - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn hunt_claims_exactly_one_prey() {
        let (mut registry, mut handles) = registry_with(&[AgentKind::Prey, AgentKind::Prey]);
        for (id, _) in &handles {
            registry.update_status(*id, 10.0, true);
        }

        let first = registry.claim_prey_for_hunt().unwrap();
        // Only one eligible prey remains; the reserved one is skipped.
        let second = registry.claim_prey_for_hunt().unwrap();
        assert_ne!(first, second);
        // Both reserved now: a third hunt misses.
        assert!(registry.claim_prey_for_hunt().is_none());

        // Each claimed prey received exactly one die directive.
        for (_, rx) in &mut handles {
            assert_eq!(rx.try_recv().unwrap(), Control::Die);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn passive_prey_are_not_huntable() {
        let (mut registry, _handles) = registry_with(&[AgentKind::Prey]);
        assert!(registry.claim_prey_for_hunt().is_none());
    }

    #[test]
    fn unreachable_prey_rolls_back_the_reservation() {
        let (mut registry, handles) = registry_with(&[AgentKind::Prey]);
        let (id, rx) = handles.into_iter().next().unwrap();
        registry.update_status(id, 10.0, true);
        drop(rx);

        assert!(registry.claim_prey_for_hunt().is_none());
        // The rollback leaves the record, unreserved.
        let record = registry.remove(id).unwrap();
        assert!(!record.reserved);
    }

    #[test]
    fn claimed_prey_survive_until_removed() {
        let (mut registry, handles) = registry_with(&[AgentKind::Prey]);
        let (id, _rx) = handles.first().unwrap();
        registry.update_status(*id, 10.0, true);

        let claimed = registry.claim_prey_for_hunt().unwrap();
        assert_eq!(claimed, *id);
        assert_eq!(registry.count(AgentKind::Prey), 1);
        registry.remove(claimed).unwrap();
        assert_eq!(registry.count(AgentKind::Prey), 0);
    }

    #[test]
    fn energy_stats_are_zero_when_empty() {
        let registry = AgentRegistry::new();
        let stats = registry.energy_stats(AgentKind::Predator);
        assert!(stats.min.abs() < f64::EPSILON);
        assert!(stats.avg.abs() < f64::EPSILON);
        assert!(stats.max.abs() < f64::EPSILON);
    }

    #[test]
    fn broadcast_die_reaches_every_agent() {
        let (registry, mut handles) =
            registry_with(&[AgentKind::Prey, AgentKind::Predator]);
        registry.broadcast_die();
        for (_, rx) in &mut handles {
            assert_eq!(rx.try_recv().unwrap(), Control::Die);
        }
    }
}
