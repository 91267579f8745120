//! Observer startup helper for embedding in the engine.
//!
//! [`spawn_observer`] launches the HTTP server plus the two collector
//! tasks that keep [`AppState`] current: one folding the snapshot
//! broadcast into the latest-value slot, one folding journal lines
//! into the log ring. The engine calls this during startup so the
//! observer runs concurrently with the tick loop.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::server::{start_server, ServerConfig};
use crate::state::AppState;

/// Spawn the observer server and its collector tasks.
///
/// The returned handle belongs to the HTTP server task; the collectors
/// end on their own when the orchestrator drops its channel ends.
pub fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
    journal_lines: mpsc::UnboundedReceiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(collect_snapshots(Arc::clone(&state)));
    tokio::spawn(collect_logs(Arc::clone(&state), journal_lines));

    tokio::spawn(async move {
        if let Err(e) = start_server(&config, state).await {
            tracing::error!(error = %e, "observer server exited with error");
        }
    })
}

/// Fold the snapshot broadcast into the latest-value slot. Lagging is
/// harmless: only the newest snapshot matters.
async fn collect_snapshots(state: Arc<AppState>) {
    let mut rx = state.subscribe();
    loop {
        match rx.recv().await {
            Ok(snapshot) => state.record_snapshot(snapshot).await,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                debug!(skipped = n, "snapshot collector lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

/// Fold journal lines into the capped log ring.
async fn collect_logs(state: Arc<AppState>, mut lines: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = lines.recv().await {
        state.record_log_line(line).await;
    }
}
