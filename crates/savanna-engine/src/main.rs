//! Savanna simulation binary.
//!
//! Wires the orchestrator, the agent host, the observer server, the
//! join listener, and the signal handlers into one process.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `savanna-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the messaging fabrics (command, telemetry, request,
//!    journal, snapshot broadcast)
//! 4. Bind the agent join listener (fatal on failure)
//! 5. Start the observer server and its collectors
//! 6. Install signal handlers (SIGUSR1 toggles drought, Ctrl-C quits)
//! 7. Start the drought self-timer when configured
//! 8. Run the orchestrator until quit

mod error;
mod host;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use savanna_core::config::SimulationConfig;
use savanna_core::drought::run_drought_timer;
use savanna_core::join::JoinListener;
use savanna_core::orchestrator::{
    Orchestrator, OrchestratorChannels, SNAPSHOT_CHANNEL_CAPACITY,
};
use savanna_core::Journal;
use savanna_observer::state::AppState;
use savanna_observer::{spawn_observer, ServerConfig};
use savanna_types::Command;

use crate::error::EngineError;
use crate::host::TokioAgentHost;

/// Default configuration file, looked up relative to the working
/// directory.
const CONFIG_PATH: &str = "savanna-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        tick_interval_ms = config.world.tick_interval_ms,
        join_port = config.world.join_port,
        observer_port = config.world.observer_port,
        "savanna-engine starting"
    );

    // Messaging fabrics.
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (telemetry_tx, telemetry_rx) = mpsc::unbounded_channel();
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
    let (journal, journal_rx) = Journal::new();

    // Join listener: bind failure is fatal before the first tick.
    let join_addr: SocketAddr = format!("{}:{}", config.world.host, config.world.join_port)
        .parse()
        .map_err(|e| EngineError::Startup {
            message: format!("invalid join address: {e}"),
        })?;
    let listener = JoinListener::bind(join_addr).await.map_err(EngineError::from)?;
    tokio::spawn(listener.run(journal.clone()));

    // Observer server and its collector tasks.
    let app_state = Arc::new(AppState::new(snapshot_tx.clone(), command_tx.clone()));
    let server_config = ServerConfig {
        host: config.world.host.clone(),
        port: config.world.observer_port,
    };
    let _observer_handle = spawn_observer(server_config, app_state, journal_rx);
    info!(port = config.world.observer_port, "observer server started");

    install_signal_handlers(&command_tx)?;

    if config.drought.self_timer {
        tokio::spawn(run_drought_timer(
            config.drought.clone(),
            command_tx.clone(),
            snapshot_tx.subscribe(),
        ));
        info!("drought self-timer enabled");
    }

    // The agent host wires new agents to the shared fabrics.
    let agent_host = TokioAgentHost::new(
        config.behavior.clone(),
        telemetry_tx,
        request_tx,
        Duration::from_millis(config.world.tick_interval_ms),
        Some(join_addr),
    );

    let channels = OrchestratorChannels {
        commands: command_rx,
        telemetry: telemetry_rx,
        requests: request_rx,
    };
    let orchestrator = Orchestrator::new(&config, agent_host, channels, snapshot_tx, journal);
    orchestrator.run().await;

    info!("savanna-engine stopped");
    Ok(())
}

/// Load configuration, falling back to defaults when the file is
/// absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Install the signal handlers: SIGUSR1 toggles drought, Ctrl-C quits.
/// Both inject ordinary commands, the single mutation point.
fn install_signal_handlers(
    commands: &mpsc::UnboundedSender<Command>,
) -> Result<(), EngineError> {
    #[cfg(unix)]
    {
        let mut usr1 = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::user_defined1())
            .map_err(|e| EngineError::Startup {
                message: format!("failed to install SIGUSR1 handler: {e}"),
            })?;
        let drought_commands = commands.clone();
        tokio::spawn(async move {
            while usr1.recv().await.is_some() {
                info!("SIGUSR1 received, toggling drought");
                if drought_commands.send(Command::TriggerDrought).is_err() {
                    return;
                }
            }
        });
    }

    let quit_commands = commands.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, quitting");
            let _ = quit_commands.send(Command::Quit);
        }
    });
    Ok(())
}
