//! Agent behavior for the Savanna simulation.
//!
//! Prey and predators share one loop shape (sleep, drain control,
//! decay, recompute activity, maybe act, maybe reproduce, report) and
//! differ only in thresholds, gains and costs. That difference is
//! captured by [`AgentProfile`], a per-kind configuration record, so
//! there is a single generic loop instead of duplicated control flow.
//!
//! The decision logic itself is pure ([`behavior`]) and tested with a
//! seeded RNG; the async loop ([`runner`]) only wires it to channels
//! and a timer.

pub mod behavior;
pub mod config;
pub mod profile;
pub mod runner;

pub use behavior::{ActionChoice, AgentVitals, CycleDecision, Fate};
pub use config::BehaviorConfig;
pub use profile::AgentProfile;
pub use runner::{run_agent, AgentChannels};
