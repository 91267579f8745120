//! TCP join listener for agent handshakes.
//!
//! New agents announce themselves with a single `"<kind> <id>"` line.
//! The listener logs the registration and closes the connection; the
//! handshake carries no state the orchestrator depends on, so a failed
//! read only costs a log line. Binding the port, however, is part of
//! startup: failure here aborts the orchestrator before its first
//! tick.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::error::OrchestratorError;
use crate::journal::Journal;

/// A bound join listener, ready to accept handshakes.
pub struct JoinListener {
    listener: TcpListener,
}

impl JoinListener {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::JoinBind`] when the address cannot
    /// be bound; the caller treats this as fatal.
    pub async fn bind(addr: SocketAddr) -> Result<Self, OrchestratorError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| OrchestratorError::JoinBind { addr, source })?;
        info!(%addr, "join listener bound");
        Ok(Self { listener })
    }

    /// Accept handshakes forever, journaling each one.
    pub async fn run(self, journal: Journal) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let journal = journal.clone();
                    tokio::spawn(async move {
                        let mut line = String::new();
                        let mut reader = BufReader::new(stream);
                        match reader.read_line(&mut line).await {
                            Ok(_) => {
                                let trimmed = line.trim();
                                if !trimmed.is_empty() {
                                    journal.record(format!("{trimmed} joined"));
                                }
                            }
                            Err(error) => {
                                debug!(%peer, %error, "join handshake read failed");
                            }
                        }
                    });
                }
                Err(error) => {
                    debug!(%error, "join accept failed");
                }
            }
        }
    }
}
