//! The async agent loop.
//!
//! Each agent is one tokio task running [`run_agent`]. The loop shape
//! is fixed for both kinds:
//! 1. Sleep one cycle period
//! 2. Drain pending control messages (grants, hunt results, die)
//! 3. Apply energy decay
//! 4. Recompute activity with hysteresis
//! 5. Maybe send an action request (eat grass / hunt)
//! 6. Maybe pay the reproduction cost and request a spawn
//! 7. Report status telemetry
//!
//! The loop exits when energy reaches zero or a die directive arrives,
//! and always sends a final `Dead` telemetry message so the registry
//! can reclaim the slot. All sends are fire-and-forget over unbounded
//! channels; a closed channel means the orchestrator is gone and the
//! agent simply stops.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, trace};

use savanna_types::{AgentId, Control, Request, Telemetry};

use crate::behavior::{decide_cycle, ActionChoice, AgentVitals, Fate};
use crate::profile::AgentProfile;

/// How long the join handshake may take before it is abandoned.
const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// The channel endpoints an agent task needs.
pub struct AgentChannels {
    /// Directives from the orchestrator to this agent.
    pub control: mpsc::UnboundedReceiver<Control>,
    /// Status and death reports back to the orchestrator.
    pub telemetry: mpsc::UnboundedSender<Telemetry>,
    /// Resource and spawn requests for arbitration.
    pub requests: mpsc::UnboundedSender<Request>,
}

/// Run one agent until it starves or is told to die.
///
/// If `join_addr` is set, the agent announces itself over TCP before
/// entering the loop; failure to announce is logged and ignored.
pub async fn run_agent(
    id: AgentId,
    profile: AgentProfile,
    mut channels: AgentChannels,
    period: Duration,
    join_addr: Option<SocketAddr>,
) {
    if let Some(addr) = join_addr {
        announce_join(addr, profile.kind.as_str(), id).await;
    }

    let mut vitals = AgentVitals::new(&profile);
    debug!(%id, kind = profile.kind.as_str(), energy = vitals.energy, "agent started");

    loop {
        sleep(period).await;

        if drain_control(&profile, &mut vitals, &mut channels.control) == Fate::Die {
            break;
        }

        vitals.decay(&profile);
        if vitals.exhausted() {
            break;
        }
        vitals.refresh_activity(&profile);

        // ThreadRng is not Send, so a fresh handle is taken each cycle
        // and dropped before the next await point.
        let decision = {
            let mut rng = rand::rng();
            decide_cycle(&profile, &vitals, &mut rng)
        };

        if let Some(action) = decision.action {
            let request = match action {
                ActionChoice::Eat(amount) => Request::EatGrass { id, amount },
                ActionChoice::Hunt => Request::Hunt { id },
            };
            if channels.requests.send(request).is_err() {
                break;
            }
        }

        if decision.reproduce {
            vitals.energy -= profile.reproduction_cost;
            let spawn = Request::Spawn {
                kind: profile.kind,
                count: 1,
            };
            if channels.requests.send(spawn).is_err() {
                break;
            }
        }

        trace!(%id, energy = vitals.energy, active = vitals.active, "cycle complete");
        let status = Telemetry::Status {
            kind: profile.kind,
            id,
            energy: vitals.energy,
            active: vitals.active,
        };
        if channels.telemetry.send(status).is_err() {
            break;
        }
    }

    debug!(%id, kind = profile.kind.as_str(), energy = vitals.energy, "agent died");
    let _ = channels.telemetry.send(Telemetry::Dead {
        kind: profile.kind,
        id,
    });
}

/// Drain every queued control message without blocking.
fn drain_control(
    profile: &AgentProfile,
    vitals: &mut AgentVitals,
    control: &mut mpsc::UnboundedReceiver<Control>,
) -> Fate {
    while let Ok(message) = control.try_recv() {
        if vitals.absorb(profile, message) == Fate::Die {
            return Fate::Die;
        }
    }
    Fate::Continue
}

/// One-shot TCP handshake announcing this agent to the join listener.
///
/// The line format is `"<kind> <id>\n"`. Best-effort only: the
/// simulation does not depend on the listener being up.
async fn announce_join(addr: SocketAddr, kind: &str, id: AgentId) {
    let handshake = async {
        let mut stream = TcpStream::connect(addr).await?;
        stream.write_all(format!("{kind} {id}\n").as_bytes()).await?;
        stream.shutdown().await
    };
    match timeout(JOIN_TIMEOUT, handshake).await {
        Ok(Ok(())) => trace!(%id, kind, "join announced"),
        Ok(Err(error)) => debug!(%id, kind, %error, "join handshake failed"),
        Err(_) => debug!(%id, kind, "join handshake timed out"),
    }
}
