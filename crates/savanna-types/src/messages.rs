//! Messaging-fabric payloads.
//!
//! Four logical channels connect the simulation's units:
//!
//! - [`Command`] — external (dashboard, signal handler, drought timer)
//!   to orchestrator, many-to-one.
//! - [`Telemetry`] — agent to orchestrator status reports, many-to-one.
//! - [`Request`] — agent to orchestrator resource/action demands,
//!   many-to-one, arbitrated inside the tick loop.
//! - [`Control`] — orchestrator to one specific agent: directives and
//!   arbitration replies.
//!
//! [`Command`] keeps the original dashboard wire format: a `cmd` tag
//! and an `args` object, so `POST /api/cmd` bodies deserialize into it
//! directly.

use serde::{Deserialize, Serialize};

use crate::enums::AgentKind;
use crate::ids::AgentId;

/// External instruction to the orchestrator.
///
/// Wire format: `{"cmd": "add_prey", "args": {"value": 3}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Tear everything down and return the world to its initial state.
    Reset,
    /// Stop the simulation permanently.
    Quit,
    /// Spawn up to `value` new prey, subject to the population cap.
    AddPrey {
        /// Requested number of prey.
        value: u32,
    },
    /// Spawn up to `value` new predators, subject to the population cap.
    AddPredator {
        /// Requested number of predators.
        value: u32,
    },
    /// Set the grass quantity directly (clamped into bounds).
    SetGrass {
        /// Requested grass quantity.
        value: i64,
    },
    /// Flip the drought flag; entering drought halves grass atomically.
    TriggerDrought,
}

/// Agent-to-orchestrator status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Telemetry {
    /// Periodic mirror update: current energy and activity.
    Status {
        /// Which kind of agent is reporting.
        kind: AgentKind,
        /// The reporting agent.
        id: AgentId,
        /// Current private energy.
        energy: f64,
        /// Whether the agent is currently active (hungry).
        active: bool,
    },
    /// Final message before an agent's task ends.
    Dead {
        /// Which kind of agent died.
        kind: AgentKind,
        /// The dead agent.
        id: AgentId,
    },
}

/// Agent-to-orchestrator resource or action demand.
///
/// Requests are drained and arbitrated once per tick; replies travel
/// back on the requesting agent's [`Control`] channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// A prey asks to consume up to `amount` units of grass.
    EatGrass {
        /// The requesting prey.
        id: AgentId,
        /// Requested amount (granted amount is `min(amount, grass)`).
        amount: u32,
    },
    /// A predator asks for one eligible prey to be killed.
    Hunt {
        /// The requesting predator.
        id: AgentId,
    },
    /// Reproduction: spawn `count` offspring of `kind`, cap-limited.
    Spawn {
        /// The kind of offspring.
        kind: AgentKind,
        /// Number of offspring requested.
        count: u32,
    },
}

/// Orchestrator-to-agent directive or arbitration reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// Terminate immediately (after emitting a final dead telemetry).
    Die,
    /// Reply to an eat request: how much grass was actually granted.
    GrassGrant {
        /// Units of grass granted (possibly zero).
        granted: u32,
    },
    /// Reply to a hunt request.
    HuntResult {
        /// Whether a prey was reserved and killed for this hunt.
        success: bool,
    },
}
