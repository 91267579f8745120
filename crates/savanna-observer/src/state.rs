//! Shared application state for the observer server.
//!
//! [`AppState`] holds the latest snapshot, the log ring, the command
//! channel into the orchestrator, and the broadcast sender used by
//! `WebSocket` clients. It is wrapped in [`Arc`] and injected through
//! Axum's `State` extractor.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};

use savanna_types::{Command, Snapshot};

/// Maximum journal lines retained for the dashboard; older lines are
/// dropped.
pub const LOG_CAPACITY: usize = 200;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender whose subscriptions feed `WebSocket` clients.
    snapshots: broadcast::Sender<Snapshot>,
    /// The most recent snapshot, if any tick has completed yet.
    latest: Arc<RwLock<Option<Snapshot>>>,
    /// Journal lines, newest first, capped at [`LOG_CAPACITY`].
    logs: Arc<RwLock<VecDeque<String>>>,
    /// Commands destined for the orchestrator.
    commands: mpsc::UnboundedSender<Command>,
}

impl AppState {
    /// Create state around the orchestrator's snapshot broadcast and
    /// command channel.
    #[must_use]
    pub fn new(
        snapshots: broadcast::Sender<Snapshot>,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            snapshots,
            latest: Arc::new(RwLock::new(None)),
            logs: Arc::new(RwLock::new(VecDeque::new())),
            commands,
        }
    }

    /// Subscribe to the snapshot stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Store a snapshot as the latest.
    pub async fn record_snapshot(&self, snapshot: Snapshot) {
        *self.latest.write().await = Some(snapshot);
    }

    /// Append a journal line, dropping the oldest beyond capacity.
    pub async fn record_log_line(&self, line: String) {
        let mut logs = self.logs.write().await;
        logs.push_front(line);
        logs.truncate(LOG_CAPACITY);
    }

    /// The most recent snapshot, if any.
    pub async fn latest(&self) -> Option<Snapshot> {
        self.latest.read().await.clone()
    }

    /// The retained journal lines, newest first.
    pub async fn logs(&self) -> Vec<String> {
        self.logs.read().await.iter().cloned().collect()
    }

    /// Forward a command to the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns the command back when the orchestrator is gone.
    pub fn send_command(
        &self,
        command: Command,
    ) -> Result<(), mpsc::error::SendError<Command>> {
        self.commands.send(command)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let (snapshot_tx, _) = broadcast::channel(8);
        let (command_tx, _command_rx) = mpsc::unbounded_channel();
        AppState::new(snapshot_tx, command_tx)
    }

    #[tokio::test]
    async fn log_ring_is_capped_newest_first() {
        let app = state();
        for n in 0..250 {
            app.record_log_line(format!("line {n}")).await;
        }
        let logs = app.logs().await;
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs.first().map(String::as_str), Some("line 249"));
        assert_eq!(logs.last().map(String::as_str), Some("line 50"));
    }

    #[tokio::test]
    async fn latest_snapshot_starts_empty() {
        let app = state();
        assert!(app.latest().await.is_none());
    }

    #[tokio::test]
    async fn command_send_fails_once_orchestrator_is_gone() {
        let (snapshot_tx, _) = broadcast::channel(8);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let app = AppState::new(snapshot_tx, command_tx);
        drop(command_rx);
        assert!(app.send_command(Command::Reset).is_err());
    }
}
