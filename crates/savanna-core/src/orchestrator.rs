//! The Environment Orchestrator: single owner of the world, one tick
//! at a time.
//!
//! Per tick, in strict order: stamp the tick number, drain commands,
//! drain telemetry, drain requests (arbitration), apply grass growth,
//! publish a snapshot, then sleep out the remainder of the tick
//! period. Every drain is non-blocking; the whole pass is one atomic
//! critical section because nothing else can touch the state.
//!
//! Arbitration guarantees at-most-once allocation: a grass grant
//! decrements the pool in the same pass that computes it, and a hunt
//! reservation marks the prey before the kill directive is sent, so
//! two requests arriving in the same tick can never both take the
//! same resource.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use savanna_agents::BehaviorConfig;
use savanna_types::{
    AgentId, AgentKind, Command, Control, DecisionProbs, Request, Snapshot, Telemetry,
};
use savanna_world::WorldState;

use crate::config::SimulationConfig;
use crate::host::AgentHost;
use crate::journal::Journal;
use crate::registry::AgentRegistry;

/// How often the shutdown grace loop polls for death confirmations.
const GRACE_POLL: Duration = Duration::from_millis(10);

/// Capacity of the snapshot broadcast channel. Slow consumers lag and
/// miss snapshots rather than backpressure the tick loop.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 256;

/// The inbound message fabrics the orchestrator drains each tick.
pub struct OrchestratorChannels {
    /// External commands (dashboard, signals, drought timer).
    pub commands: mpsc::UnboundedReceiver<Command>,
    /// Agent status and death reports.
    pub telemetry: mpsc::UnboundedReceiver<Telemetry>,
    /// Agent resource and spawn requests.
    pub requests: mpsc::UnboundedReceiver<Request>,
}

/// The orchestrator task state.
pub struct Orchestrator<H> {
    state: WorldState,
    registry: AgentRegistry,
    host: H,
    channels: OrchestratorChannels,
    snapshots: broadcast::Sender<Snapshot>,
    journal: Journal,
    behavior: BehaviorConfig,
    growth_per_tick: u32,
    drought_growth_pct: u32,
    tick_period: Duration,
    shutdown_grace: Duration,
}

impl<H: AgentHost> Orchestrator<H> {
    /// Build an orchestrator over a fresh world.
    pub fn new(
        config: &SimulationConfig,
        host: H,
        channels: OrchestratorChannels,
        snapshots: broadcast::Sender<Snapshot>,
        journal: Journal,
    ) -> Self {
        Self {
            state: WorldState::new(config.limits.to_world_limits()),
            registry: AgentRegistry::new(),
            host,
            channels,
            snapshots,
            journal,
            behavior: config.behavior.clone(),
            growth_per_tick: config.world.grass_growth_per_tick,
            drought_growth_pct: config.drought.growth_pct,
            tick_period: Duration::from_millis(config.world.tick_interval_ms),
            shutdown_grace: Duration::from_millis(config.world.shutdown_grace_ms),
        }
    }

    /// The world as the orchestrator currently sees it.
    #[must_use]
    pub const fn state(&self) -> &WorldState {
        &self.state
    }

    /// Run ticks until a quit command stops the world, then shut every
    /// agent down and return.
    pub async fn run(mut self) {
        info!(
            grass = self.state.grass(),
            period = ?self.tick_period,
            "orchestrator started"
        );
        self.journal.record("environment started");

        while self.state.running() {
            let started = Instant::now();
            self.run_tick().await;
            let elapsed = started.elapsed();
            if let Some(remaining) = self.tick_period.checked_sub(elapsed) {
                sleep(remaining).await;
            } else {
                debug!(?elapsed, "tick overran its period");
            }
        }

        self.shutdown_agents().await;
        self.journal.record("environment stopped");
        info!(tick = self.state.tick(), "orchestrator stopped");
    }

    /// Execute one full tick pass.
    pub async fn run_tick(&mut self) {
        self.state.set_tick(self.state.tick().saturating_add(1));

        while let Ok(command) = self.channels.commands.try_recv() {
            self.apply_command(command).await;
            if !self.state.running() {
                return;
            }
        }

        self.drain_telemetry();
        self.drain_requests();
        self.state
            .apply_growth(self.growth_per_tick, self.drought_growth_pct);
        self.publish_snapshot();
    }

    /// Apply one external command atomically.
    async fn apply_command(&mut self, command: Command) {
        match command {
            Command::Reset => {
                self.journal.record("reset requested");
                self.shutdown_agents().await;
                self.state.reset();
                self.journal.record("world reset to initial state");
            }
            Command::Quit => {
                self.journal.record("quit requested");
                self.state.stop();
            }
            Command::AddPrey { value } => {
                self.spawn_agents(AgentKind::Prey, value);
            }
            Command::AddPredator { value } => {
                self.spawn_agents(AgentKind::Predator, value);
            }
            Command::SetGrass { value } => {
                self.state.set_grass(value);
                self.journal
                    .record(format!("grass set to {}", self.state.grass()));
            }
            Command::TriggerDrought => {
                let entered = self.state.toggle_drought();
                let line = if entered {
                    format!("drought started, grass halved to {}", self.state.grass())
                } else {
                    "drought ended".to_owned()
                };
                self.journal.record(line);
            }
        }
    }

    /// Create up to `requested` agents of `kind`, bounded by the
    /// remaining headroom. Counters move before any task runs, so the
    /// cap can never be oversold. A zero grant is silent.
    fn spawn_agents(&mut self, kind: AgentKind, requested: u32) -> u32 {
        let granted = self.state.grant_spawn(kind, requested);
        if granted < requested {
            debug!(
                kind = kind.as_str(),
                requested, granted, "spawn clipped by population cap"
            );
        }
        let initial_energy = match kind {
            AgentKind::Prey => self.behavior.prey_initial_energy,
            AgentKind::Predator => self.behavior.predator_initial_energy,
        };
        for _ in 0..granted {
            let (control_tx, control_rx) = mpsc::unbounded_channel();
            let id = AgentId::new();
            self.registry.insert(id, kind, initial_energy, control_tx);
            self.host.spawn_agent(id, kind, control_rx);
        }
        if granted > 0 {
            self.journal
                .record(format!("{granted} {} joined the savanna", kind.as_str()));
        }
        granted
    }

    /// Fold queued telemetry into the mirrors.
    fn drain_telemetry(&mut self) {
        while let Ok(message) = self.channels.telemetry.try_recv() {
            self.absorb_telemetry(message);
        }
    }

    fn absorb_telemetry(&mut self, message: Telemetry) {
        match message {
            Telemetry::Status {
                id, energy, active, ..
            } => {
                self.registry.update_status(id, energy, active);
            }
            Telemetry::Dead { kind, id } => {
                if self.registry.remove(id).is_some() {
                    self.state.record_death(kind);
                    self.host.reap(id);
                    self.journal.record(format!("{} {id} died", kind.as_str()));
                }
            }
        }
    }

    /// Resolve queued requests: every grant happens against the state
    /// as left by the previous grant in the same pass.
    fn drain_requests(&mut self) {
        while let Ok(request) = self.channels.requests.try_recv() {
            match request {
                Request::EatGrass { id, amount } => {
                    let granted = self.state.consume_grass(amount);
                    debug!(%id, amount, granted, "grass request resolved");
                    self.registry
                        .send_control(id, Control::GrassGrant { granted });
                }
                Request::Hunt { id } => {
                    let claimed = self.registry.claim_prey_for_hunt();
                    let success = claimed.is_some();
                    if let Some(prey) = claimed {
                        self.journal.record(format!("predator {id} caught prey {prey}"));
                    }
                    self.registry
                        .send_control(id, Control::HuntResult { success });
                }
                Request::Spawn { kind, count } => {
                    self.spawn_agents(kind, count);
                }
            }
        }
    }

    /// Publish the per-tick snapshot. Lagging or absent consumers are
    /// not an error.
    fn publish_snapshot(&self) {
        let snapshot = Snapshot {
            tick: self.state.tick(),
            prey: self.state.count(AgentKind::Prey),
            predators: self.state.count(AgentKind::Predator),
            grass: self.state.grass(),
            drought: self.state.drought(),
            prey_energy: self.registry.energy_stats(AgentKind::Prey),
            predator_energy: self.registry.energy_stats(AgentKind::Predator),
            prey_probs: DecisionProbs {
                action: self.behavior.prey_eat_prob,
                reproduce: self.behavior.prey_repro_prob,
            },
            predator_probs: DecisionProbs {
                action: self.behavior.predator_hunt_prob,
                reproduce: self.behavior.predator_repro_prob,
            },
        };
        let _ = self.snapshots.send(snapshot);
    }

    /// Two-phase agent shutdown: ask every agent to die, wait out a
    /// bounded grace period draining death confirmations, then
    /// force-abort whatever is left. Idempotent: an empty registry
    /// returns immediately.
    async fn shutdown_agents(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        self.registry.broadcast_die();

        let deadline = Instant::now().checked_add(self.shutdown_grace);
        while !self.registry.is_empty() {
            let expired = deadline.is_none_or(|d| Instant::now() >= d);
            if expired {
                break;
            }
            self.drain_telemetry();
            if self.registry.is_empty() {
                break;
            }
            sleep(GRACE_POLL).await;
        }

        if !self.registry.is_empty() {
            warn!(
                prey = self.registry.count(AgentKind::Prey),
                predators = self.registry.count(AgentKind::Predator),
                "agents missed the shutdown grace period, aborting"
            );
            self.host.force_stop_all();
            self.registry.clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::host::testing::RecordingHost;

    struct Fixture {
        commands: mpsc::UnboundedSender<Command>,
        telemetry: mpsc::UnboundedSender<Telemetry>,
        requests: mpsc::UnboundedSender<Request>,
        snapshots: broadcast::Receiver<Snapshot>,
        orchestrator: Orchestrator<RecordingHost>,
    }

    fn fixture() -> Fixture {
        fixture_with(SimulationConfig::default())
    }

    fn fixture_with(mut config: SimulationConfig) -> Fixture {
        // Keep grace short so reset tests do not wait a full second.
        config.world.shutdown_grace_ms = 20;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (telemetry_tx, telemetry_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let (journal, _journal_rx) = Journal::new();
        let channels = OrchestratorChannels {
            commands: command_rx,
            telemetry: telemetry_rx,
            requests: request_rx,
        };
        let orchestrator =
            Orchestrator::new(&config, RecordingHost::default(), channels, snapshot_tx, journal);
        Fixture {
            commands: command_tx,
            telemetry: telemetry_tx,
            requests: request_tx,
            snapshots: snapshot_rx,
            orchestrator,
        }
    }

    fn latest_snapshot(rx: &mut broadcast::Receiver<Snapshot>) -> Snapshot {
        let mut latest = None;
        loop {
            match rx.try_recv() {
                Ok(snapshot) => latest = Some(snapshot),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => {}
            }
        }
        latest.unwrap()
    }

    #[tokio::test]
    async fn add_prey_is_clipped_at_the_cap() {
        let mut f = fixture();
        f.commands.send(Command::AddPrey { value: 250 }).unwrap();
        f.orchestrator.run_tick().await;

        assert_eq!(f.orchestrator.state().count(AgentKind::Prey), 200);
        assert_eq!(f.orchestrator.host.spawned.len(), 200);

        // Further additions are refused until deaths free capacity.
        f.commands.send(Command::AddPrey { value: 1 }).unwrap();
        f.orchestrator.run_tick().await;
        assert_eq!(f.orchestrator.state().count(AgentKind::Prey), 200);

        let (dead_id, dead_kind) = *f.orchestrator.host.spawned.first().unwrap();
        f.telemetry
            .send(Telemetry::Dead {
                kind: dead_kind,
                id: dead_id,
            })
            .unwrap();
        f.commands.send(Command::AddPrey { value: 5 }).unwrap();
        f.orchestrator.run_tick().await;
        assert_eq!(f.orchestrator.state().count(AgentKind::Prey), 200);
    }

    #[tokio::test]
    async fn grass_grant_is_bounded_by_the_pool() {
        let mut config = SimulationConfig::default();
        config.world.grass_growth_per_tick = 0;
        let mut f = fixture_with(config);

        f.commands.send(Command::AddPrey { value: 1 }).unwrap();
        f.commands.send(Command::SetGrass { value: 25 }).unwrap();
        f.orchestrator.run_tick().await;
        let (prey_id, _) = *f.orchestrator.host.spawned.first().unwrap();

        f.requests
            .send(Request::EatGrass {
                id: prey_id,
                amount: 40,
            })
            .unwrap();
        f.orchestrator.run_tick().await;

        assert_eq!(f.orchestrator.state().grass(), 0);
        let (_, control) = f.orchestrator.host.controls.first_mut().unwrap();
        assert_eq!(
            control.try_recv().unwrap(),
            Control::GrassGrant { granted: 25 }
        );
    }

    #[tokio::test]
    async fn same_tick_grants_never_exceed_starting_grass() {
        let mut config = SimulationConfig::default();
        config.world.grass_growth_per_tick = 0;
        let mut f = fixture_with(config);

        f.commands.send(Command::AddPrey { value: 3 }).unwrap();
        f.commands.send(Command::SetGrass { value: 50 }).unwrap();
        f.orchestrator.run_tick().await;

        for (id, _) in f.orchestrator.host.spawned.clone() {
            f.requests.send(Request::EatGrass { id, amount: 30 }).unwrap();
        }
        f.orchestrator.run_tick().await;

        let mut total_granted = 0;
        for (_, control) in &mut f.orchestrator.host.controls {
            if let Ok(Control::GrassGrant { granted }) = control.try_recv() {
                total_granted += granted;
            }
        }
        assert_eq!(total_granted, 50);
        assert_eq!(f.orchestrator.state().grass(), 0);
    }

    #[tokio::test]
    async fn concurrent_hunts_cannot_double_kill() {
        let mut f = fixture();
        f.commands.send(Command::AddPrey { value: 1 }).unwrap();
        f.commands.send(Command::AddPredator { value: 2 }).unwrap();
        f.orchestrator.run_tick().await;

        let spawned = f.orchestrator.host.spawned.clone();
        let (prey_id, _) = *spawned.first().unwrap();
        let predators: Vec<AgentId> = spawned
            .iter()
            .filter(|(_, kind)| *kind == AgentKind::Predator)
            .map(|(id, _)| *id)
            .collect();

        // The single prey reports itself hungry, then both predators
        // submit hunts in the same tick.
        f.telemetry
            .send(Telemetry::Status {
                kind: AgentKind::Prey,
                id: prey_id,
                energy: 10.0,
                active: true,
            })
            .unwrap();
        for id in &predators {
            f.requests.send(Request::Hunt { id: *id }).unwrap();
        }
        f.orchestrator.run_tick().await;

        let mut successes = 0;
        let mut failures = 0;
        for (id, control) in &mut f.orchestrator.host.controls {
            if !predators.contains(id) {
                continue;
            }
            match control.try_recv().unwrap() {
                Control::HuntResult { success: true } => successes += 1,
                Control::HuntResult { success: false } => failures += 1,
                other => panic!("unexpected control message {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(failures, 1);

        // The prey stays counted until its own death telemetry.
        assert_eq!(f.orchestrator.state().count(AgentKind::Prey), 1);
        f.telemetry
            .send(Telemetry::Dead {
                kind: AgentKind::Prey,
                id: prey_id,
            })
            .unwrap();
        f.orchestrator.run_tick().await;
        assert_eq!(f.orchestrator.state().count(AgentKind::Prey), 0);
    }

    #[tokio::test]
    async fn drought_toggle_halves_grass_atomically() {
        let mut config = SimulationConfig::default();
        config.world.grass_growth_per_tick = 0;
        let mut f = fixture_with(config);

        f.commands.send(Command::SetGrass { value: 1000 }).unwrap();
        f.commands.send(Command::TriggerDrought).unwrap();
        f.orchestrator.run_tick().await;

        let snapshot = latest_snapshot(&mut f.snapshots);
        assert!(snapshot.drought);
        assert_eq!(snapshot.grass, 500);

        f.commands.send(Command::TriggerDrought).unwrap();
        f.orchestrator.run_tick().await;
        let snapshot = latest_snapshot(&mut f.snapshots);
        assert!(!snapshot.drought);
        assert_eq!(snapshot.grass, 500);
    }

    #[tokio::test]
    async fn growth_is_reduced_during_drought() {
        let mut f = fixture();
        f.commands.send(Command::SetGrass { value: 0 }).unwrap();
        f.orchestrator.run_tick().await;
        assert_eq!(f.orchestrator.state().grass(), 5);

        f.commands.send(Command::SetGrass { value: 0 }).unwrap();
        f.commands.send(Command::TriggerDrought).unwrap();
        f.orchestrator.run_tick().await;
        // 5 × 20% = 1 per tick while drought is active.
        assert_eq!(f.orchestrator.state().grass(), 1);
    }

    #[tokio::test]
    async fn reset_restores_the_initial_world() {
        let mut f = fixture();
        f.commands.send(Command::AddPrey { value: 10 }).unwrap();
        f.commands.send(Command::AddPredator { value: 4 }).unwrap();
        f.commands.send(Command::SetGrass { value: 17 }).unwrap();
        f.commands.send(Command::TriggerDrought).unwrap();
        f.orchestrator.run_tick().await;
        f.orchestrator.run_tick().await;

        f.commands.send(Command::Reset).unwrap();
        f.orchestrator.run_tick().await;

        let state = f.orchestrator.state();
        assert_eq!(state.tick(), 0);
        assert_eq!(state.grass(), 200);
        assert!(!state.drought());
        assert_eq!(state.count(AgentKind::Prey), 0);
        assert_eq!(state.count(AgentKind::Predator), 0);
        assert!(state.running());
        // Agents missed the grace window (no real tasks) and were aborted.
        assert_eq!(f.orchestrator.host.force_stops, 1);
        assert!(f.orchestrator.registry.is_empty());
    }

    #[tokio::test]
    async fn reset_honors_death_confirmations_within_grace() {
        let mut f = fixture();
        f.commands.send(Command::AddPrey { value: 2 }).unwrap();
        f.orchestrator.run_tick().await;

        // Confirm both deaths before the reset command is processed, so
        // the grace loop finds them on its first drain.
        for (id, kind) in f.orchestrator.host.spawned.clone() {
            f.telemetry.send(Telemetry::Dead { kind, id }).unwrap();
        }
        f.commands.send(Command::Reset).unwrap();
        f.orchestrator.run_tick().await;

        assert_eq!(f.orchestrator.host.force_stops, 0);
        assert_eq!(f.orchestrator.host.reaped.len(), 2);
    }

    #[tokio::test]
    async fn quit_stops_the_world() {
        let mut f = fixture();
        f.commands.send(Command::Quit).unwrap();
        f.orchestrator.run_tick().await;
        assert!(!f.orchestrator.state().running());
    }

    #[tokio::test]
    async fn invariants_hold_under_random_command_storms() {
        use rand::Rng;

        let mut f = fixture();
        let mut rng = rand::rng();
        for _ in 0..300 {
            let command = match rng.random_range(0..5_u8) {
                0 => Command::AddPrey {
                    value: rng.random_range(0..300),
                },
                1 => Command::AddPredator {
                    value: rng.random_range(0..120),
                },
                2 => Command::SetGrass {
                    value: rng.random_range(-500..5000),
                },
                3 => Command::TriggerDrought,
                _ => Command::Reset,
            };
            f.commands.send(command).unwrap();
            f.orchestrator.run_tick().await;
            assert!(f.orchestrator.state().invariants_hold());
        }
    }

    #[tokio::test]
    async fn spawn_requests_share_the_add_path() {
        let mut f = fixture();
        f.requests
            .send(Request::Spawn {
                kind: AgentKind::Predator,
                count: 100,
            })
            .unwrap();
        f.orchestrator.run_tick().await;
        assert_eq!(f.orchestrator.state().count(AgentKind::Predator), 80);
    }
}
