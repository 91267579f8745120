//! The Tokio agent host: one task per agent.
//!
//! Implements [`AgentHost`] by spawning [`run_agent`] tasks and
//! keeping their join handles for the force-stop half of the
//! two-phase shutdown. Handles for agents that died on their own are
//! reaped by the orchestrator when it processes their death telemetry.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use savanna_agents::{run_agent, AgentChannels, AgentProfile, BehaviorConfig};
use savanna_core::AgentHost;
use savanna_types::{AgentId, AgentKind, Control, Request, Telemetry};

/// Spawns agent tasks onto the Tokio runtime.
pub struct TokioAgentHost {
    behavior: BehaviorConfig,
    telemetry: mpsc::UnboundedSender<Telemetry>,
    requests: mpsc::UnboundedSender<Request>,
    period: Duration,
    join_addr: Option<SocketAddr>,
    handles: BTreeMap<AgentId, JoinHandle<()>>,
}

impl TokioAgentHost {
    /// Create a host wiring new agents to the given fabrics.
    #[must_use]
    pub const fn new(
        behavior: BehaviorConfig,
        telemetry: mpsc::UnboundedSender<Telemetry>,
        requests: mpsc::UnboundedSender<Request>,
        period: Duration,
        join_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            behavior,
            telemetry,
            requests,
            period,
            join_addr,
            handles: BTreeMap::new(),
        }
    }

    /// Number of tasks currently tracked.
    #[must_use]
    pub fn live_tasks(&self) -> usize {
        self.handles.len()
    }
}

impl AgentHost for TokioAgentHost {
    fn spawn_agent(
        &mut self,
        id: AgentId,
        kind: AgentKind,
        control: mpsc::UnboundedReceiver<Control>,
    ) {
        let profile = AgentProfile::for_kind(kind, &self.behavior);
        let channels = AgentChannels {
            control,
            telemetry: self.telemetry.clone(),
            requests: self.requests.clone(),
        };
        let handle = tokio::spawn(run_agent(id, profile, channels, self.period, self.join_addr));
        self.handles.insert(id, handle);
    }

    fn force_stop_all(&mut self) {
        let count = self.handles.len();
        for handle in self.handles.values() {
            handle.abort();
        }
        self.handles.clear();
        if count > 0 {
            debug!(count, "aborted straggler agent tasks");
        }
    }

    fn reap(&mut self, id: AgentId) {
        self.handles.remove(&id);
    }
}
