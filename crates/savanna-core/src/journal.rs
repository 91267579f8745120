//! The human-readable log fabric.
//!
//! The orchestrator and its side tasks narrate the simulation as
//! timestamped one-liners. Lines flow over an unbounded channel to the
//! observer, which keeps the most recent ones in a capped ring for the
//! dashboard. Delivery is best-effort: once the observer is gone,
//! lines are dropped silently.

use chrono::Local;
use tokio::sync::mpsc;

/// A cloneable handle for emitting dashboard log lines.
#[derive(Debug, Clone)]
pub struct Journal {
    tx: mpsc::UnboundedSender<String>,
}

impl Journal {
    /// Create a journal and the receiving end of its line stream.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit one line, prefixed with a `[%H:%M:%S]` wall-clock stamp.
    pub fn record(&self, line: impl AsRef<str>) {
        let stamped = format!("[{}] {}", Local::now().format("%H:%M:%S"), line.as_ref());
        let _ = self.tx.send(stamped);
    }
}
