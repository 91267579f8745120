//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Agents are identified by a strongly-typed ID so telemetry, requests
//! and registry bookkeeping cannot mix identifiers with plain integers
//! at compile time. IDs use UUID v7 (time-ordered) so registry maps
//! iterate in creation order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent (prey or predator) in the simulation.
    AgentId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_time_ordered() {
        let first = AgentId::new();
        let second = AgentId::new();
        // UUID v7 embeds a timestamp, so creation order is iteration order.
        assert!(first <= second);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = AgentId::new();
        assert_eq!(format!("{id}"), format!("{}", id.into_inner()));
    }

    #[test]
    fn roundtrips_through_uuid() {
        let id = AgentId::new();
        let raw: Uuid = id.into();
        assert_eq!(AgentId::from(raw), id);
    }
}
