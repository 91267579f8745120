//! Authoritative world state for the Savanna simulation.
//!
//! [`WorldState`] is the single record of truth for the shared
//! ecosystem resources: the tick counter, grass quantity, drought
//! flag, and live population counters. It is owned by value by the
//! orchestrator task; nothing else ever holds a reference to it.
//! Agents only ever see copies of individual fields delivered through
//! messages.
//!
//! # Clamping policy
//!
//! Every mutation clamps its result into bounds immediately: grass
//! stays in `[0, max_grass]`, each population counter in
//! `[0, max_<kind>]`. Out-of-range inputs are truncated silently,
//! never rejected. All arithmetic is checked or saturating.

pub mod state;

pub use state::{WorldLimits, WorldState};
