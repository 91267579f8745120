//! Shared type definitions for the Savanna simulation.
//!
//! This crate holds everything that crosses a crate boundary or a
//! channel: typed identifiers, the agent kind enum, the four
//! messaging-fabric payloads (command, telemetry, request, control),
//! and the per-tick snapshot published to the dashboard.
//!
//! All wire types derive serde so the observer can serve them as JSON
//! without translation.

pub mod enums;
pub mod ids;
pub mod messages;
pub mod snapshot;

pub use enums::AgentKind;
pub use ids::AgentId;
pub use messages::{Command, Control, Request, Telemetry};
pub use snapshot::{DecisionProbs, EnergyStats, Snapshot};
