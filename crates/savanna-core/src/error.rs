//! Orchestrator error types.

/// Errors that can abort the orchestrator.
///
/// Per-message failures (a grant sent to a dead agent, a slow snapshot
/// consumer) are swallowed inside the tick loop and never surface
/// here; only startup failures are fatal.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The join listener could not bind its address.
    #[error("failed to bind join listener on {addr}: {source}")]
    JoinBind {
        /// The address that could not be bound.
        addr: std::net::SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
