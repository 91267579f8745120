//! The agent host abstraction.
//!
//! The orchestrator decides *when* agents come and go; the host knows
//! *how* to run them. Splitting the two keeps the tick loop free of
//! runtime details and lets registry/orchestrator tests use a
//! recording host instead of real tasks.

use savanna_types::{AgentId, AgentKind, Control};
use tokio::sync::mpsc;

/// Spawns and force-stops agent tasks on behalf of the orchestrator.
///
/// Graceful termination is not the host's job: the orchestrator asks
/// agents to die over their control channels first, and only calls
/// [`force_stop_all`](AgentHost::force_stop_all) for stragglers after
/// the grace period.
pub trait AgentHost: Send {
    /// Start a new agent task reading directives from `control`.
    fn spawn_agent(
        &mut self,
        id: AgentId,
        kind: AgentKind,
        control: mpsc::UnboundedReceiver<Control>,
    );

    /// Abort every agent task still running. Idempotent.
    fn force_stop_all(&mut self);

    /// Forget the handle for one agent that already ended on its own.
    fn reap(&mut self, id: AgentId);
}
