//! Core enumerations shared across the simulation.

use serde::{Deserialize, Serialize};

/// The two kinds of agent in the ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Grass-eating agent; may be hunted while active.
    Prey,
    /// Hunting agent; feeds on active prey.
    Predator,
}

impl AgentKind {
    /// Lowercase wire name, as used in the join handshake and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prey => "prey",
            Self::Predator => "predator",
        }
    }
}

impl core::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(AgentKind::Prey.as_str(), "prey");
        assert_eq!(AgentKind::Predator.as_str(), "predator");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AgentKind::Predator).unwrap_or_default();
        assert_eq!(json, "\"predator\"");
    }
}
