//! The world state record and its clamped mutation operations.

use savanna_types::AgentKind;
use serde::{Deserialize, Serialize};

/// Static bounds for the world's shared resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldLimits {
    /// Upper bound for the grass quantity.
    pub max_grass: u32,
    /// Upper bound for the live prey count.
    pub max_prey: u32,
    /// Upper bound for the live predator count.
    pub max_predators: u32,
    /// Grass quantity after a reset.
    pub initial_grass: u32,
}

impl Default for WorldLimits {
    fn default() -> Self {
        Self {
            max_grass: 2000,
            max_prey: 200,
            max_predators: 80,
            initial_grass: 200,
        }
    }
}

/// The authoritative, orchestrator-owned world record.
///
/// Constructed once at startup and mutated exclusively by the
/// orchestrator's tick pass. `running = false` is terminal: no
/// operation ever sets it back to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// Current tick number.
    tick: u64,
    /// Current grass quantity, always in `[0, max_grass]`.
    grass: u32,
    /// Whether drought mode is active.
    drought: bool,
    /// Live prey count, always in `[0, max_prey]`.
    prey: u32,
    /// Live predator count, always in `[0, max_predators]`.
    predators: u32,
    /// Whether the simulation is still running. Terminal once false.
    running: bool,
    /// The bounds every mutation clamps against.
    limits: WorldLimits,
}

impl WorldState {
    /// Create a world in its initial state: tick 0, initial grass,
    /// no drought, empty populations, running.
    ///
    /// `initial_grass` is clamped into `[0, max_grass]` like any other
    /// grass assignment.
    pub const fn new(limits: WorldLimits) -> Self {
        let grass = if limits.initial_grass > limits.max_grass {
            limits.max_grass
        } else {
            limits.initial_grass
        };
        Self {
            tick: 0,
            grass,
            drought: false,
            prey: 0,
            predators: 0,
            running: true,
            limits,
        }
    }

    /// Return the world to its initial values: tick 0, initial grass,
    /// drought off, populations zero. The running flag is untouched;
    /// a stopped world stays stopped.
    pub const fn reset(&mut self) {
        self.tick = 0;
        self.grass = if self.limits.initial_grass > self.limits.max_grass {
            self.limits.max_grass
        } else {
            self.limits.initial_grass
        };
        self.drought = false;
        self.prey = 0;
        self.predators = 0;
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current grass quantity.
    pub const fn grass(&self) -> u32 {
        self.grass
    }

    /// Whether drought mode is active.
    pub const fn drought(&self) -> bool {
        self.drought
    }

    /// Whether the simulation is still running.
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Live count for one agent kind.
    pub const fn count(&self, kind: AgentKind) -> u32 {
        match kind {
            AgentKind::Prey => self.prey,
            AgentKind::Predator => self.predators,
        }
    }

    /// The configured bounds.
    pub const fn limits(&self) -> &WorldLimits {
        &self.limits
    }

    // -----------------------------------------------------------------
    // Mutations (orchestrator only)
    // -----------------------------------------------------------------

    /// Stamp the tick number at the start of a tick pass.
    pub const fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Mark the simulation stopped. Irreversible.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Assign the grass quantity directly, clamping into bounds.
    ///
    /// Negative inputs clamp to zero, oversized inputs to `max_grass`.
    pub fn set_grass(&mut self, value: i64) {
        let clamped = value.clamp(0, i64::from(self.limits.max_grass));
        self.grass = u32::try_from(clamped).unwrap_or(0);
    }

    /// Flip the drought flag. Entering drought halves the grass in the
    /// same operation, so no observer can see the flag flipped without
    /// the halved grass. Returns the new drought state.
    pub const fn toggle_drought(&mut self) -> bool {
        self.drought = !self.drought;
        if self.drought {
            self.grass /= 2;
        }
        self.drought
    }

    /// Apply one tick of grass growth and clamp to bounds.
    ///
    /// During drought, growth is scaled down to
    /// `growth × drought_growth_pct / 100`.
    pub fn apply_growth(&mut self, growth: u32, drought_growth_pct: u32) {
        let amount = if self.drought {
            // u32 × u32 fits in u64, so the scaled product cannot overflow.
            let scaled = u64::from(growth)
                .saturating_mul(u64::from(drought_growth_pct))
                .checked_div(100)
                .unwrap_or(0);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        } else {
            growth
        };
        self.grass = self.grass.saturating_add(amount);
        if self.grass > self.limits.max_grass {
            self.grass = self.limits.max_grass;
        }
    }

    /// Arbitrate a grass request: grant `min(requested, grass)` and
    /// deduct it. The grant and the deduction are one operation, so
    /// the sum of grants resolved in a tick can never exceed the grass
    /// available when arbitration started.
    pub const fn consume_grass(&mut self, requested: u32) -> u32 {
        let granted = if requested > self.grass {
            self.grass
        } else {
            requested
        };
        self.grass = self.grass.saturating_sub(granted);
        granted
    }

    /// Remaining spawn headroom for one kind.
    pub const fn headroom(&self, kind: AgentKind) -> u32 {
        match kind {
            AgentKind::Prey => self.limits.max_prey.saturating_sub(self.prey),
            AgentKind::Predator => self.limits.max_predators.saturating_sub(self.predators),
        }
    }

    /// Grant a spawn request: `min(requested, headroom)` agents, with
    /// the counter incremented immediately so the cap can never be
    /// oversold by a later request in the same tick. A zero grant is a
    /// silent refusal, not an error.
    pub const fn grant_spawn(&mut self, kind: AgentKind, requested: u32) -> u32 {
        let headroom = self.headroom(kind);
        let granted = if requested > headroom { headroom } else { requested };
        match kind {
            AgentKind::Prey => self.prey = self.prey.saturating_add(granted),
            AgentKind::Predator => self.predators = self.predators.saturating_add(granted),
        }
        granted
    }

    /// Reclaim one population slot after a confirmed death. Clamped at
    /// zero: a duplicate death report cannot drive a counter negative.
    pub const fn record_death(&mut self, kind: AgentKind) {
        match kind {
            AgentKind::Prey => self.prey = self.prey.saturating_sub(1),
            AgentKind::Predator => self.predators = self.predators.saturating_sub(1),
        }
    }

    /// Check the bounds invariant. Used by tests after randomized
    /// operation sequences.
    pub const fn invariants_hold(&self) -> bool {
        self.grass <= self.limits.max_grass
            && self.prey <= self.limits.max_prey
            && self.predators <= self.limits.max_predators
    }
}
