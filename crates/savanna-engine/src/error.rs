//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: savanna_core::config::ConfigError,
    },

    /// Orchestrator startup failed (join listener bind).
    #[error("orchestrator error: {source}")]
    Orchestrator {
        /// The underlying orchestrator error.
        #[from]
        source: savanna_core::OrchestratorError,
    },

    /// The observer address was invalid or a signal handler could not
    /// be installed.
    #[error("startup error: {message}")]
    Startup {
        /// Description of the startup failure.
        message: String,
    },
}
