//! Observer dashboard server for the Savanna simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **HTML dashboard** (`GET /`) with live population tiles, energy
//!   statistics, control buttons, and a log pane
//! - **State endpoint** (`GET /api/state`) returning the latest
//!   snapshot plus the capped log ring
//! - **Command endpoint** (`POST /api/cmd`) accepting tagged command
//!   JSON and forwarding it onto the orchestrator's command channel
//! - **`WebSocket` endpoint** (`GET /ws/ticks`) streaming one snapshot
//!   per tick via [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! The observer never touches world state. It holds the latest
//! [`Snapshot`] published by the orchestrator and a ring of journal
//! lines; both are fed by background collector tasks, so serving a
//! request never blocks the tick loop. Commands flow the other way,
//! over the same channel every other command source uses.
//!
//! [`Snapshot`]: savanna_types::Snapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use startup::spawn_observer;
pub use state::AppState;
