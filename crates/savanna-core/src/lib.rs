//! Environment orchestrator for the Savanna simulation.
//!
//! This crate owns the authoritative side of the simulation: the world
//! state, the agent registry, and the tick loop that serializes every
//! mutation. Agents only ever see the world through messages; all
//! arbitration (grass grants, hunt reservations, spawn caps) happens
//! inside one task, one tick pass at a time.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `savanna-config.yaml`.
//! - [`registry`] -- Mirrored agent records, control handles, and the
//!   hunt reservation mechanism.
//! - [`host`] -- The [`AgentHost`] trait: spawn and force-stop agent
//!   tasks without the orchestrator knowing about the runtime.
//! - [`journal`] -- The human-readable log fabric feeding the dashboard.
//! - [`orchestrator`] -- The tick function and the async runner loop.
//! - [`join`] -- The TCP listener accepting agent join handshakes.
//! - [`drought`] -- The randomized drought self-timer.
//!
//! [`AgentHost`]: host::AgentHost

pub mod config;
pub mod drought;
pub mod error;
pub mod host;
pub mod join;
pub mod journal;
pub mod orchestrator;
pub mod registry;

pub use config::SimulationConfig;
pub use error::OrchestratorError;
pub use host::AgentHost;
pub use journal::Journal;
pub use orchestrator::Orchestrator;
pub use registry::{AgentRecord, AgentRegistry};
