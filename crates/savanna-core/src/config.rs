//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `savanna-config.yaml` at the
//! project root. Every field defaults to the canonical simulation
//! constants, so an empty or missing section still produces the
//! standard world.

use std::path::Path;

use serde::Deserialize;

use savanna_agents::BehaviorConfig;
use savanna_world::WorldLimits;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `savanna-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, timing, network endpoints).
    #[serde(default)]
    pub world: WorldConfig,

    /// Grass and population bounds.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Agent energy dynamics and decision probabilities.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Drought growth factor and the optional self-timer.
    #[serde(default)]
    pub drought: DroughtConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Real-time milliseconds per tick (and per agent cycle).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Grass units regrown per tick outside drought.
    #[serde(default = "default_grass_growth_per_tick")]
    pub grass_growth_per_tick: u32,

    /// Host for the join listener and the observer server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the agent join listener binds.
    #[serde(default = "default_join_port")]
    pub join_port: u16,

    /// Port the observer HTTP server binds.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,

    /// Milliseconds to wait for agents to confirm death during
    /// reset/quit before they are force-aborted.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            tick_interval_ms: default_tick_interval_ms(),
            grass_growth_per_tick: default_grass_growth_per_tick(),
            host: default_host(),
            join_port: default_join_port(),
            observer_port: default_observer_port(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

/// Grass and population bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Maximum grass units the world can hold.
    #[serde(default = "default_max_grass")]
    pub max_grass: u32,

    /// Maximum living prey.
    #[serde(default = "default_max_prey")]
    pub max_prey: u32,

    /// Maximum living predators.
    #[serde(default = "default_max_predators")]
    pub max_predators: u32,

    /// Grass present at startup and after reset.
    #[serde(default = "default_initial_grass")]
    pub initial_grass: u32,
}

impl LimitsConfig {
    /// Convert into the world crate's limits record.
    pub const fn to_world_limits(&self) -> WorldLimits {
        WorldLimits {
            max_grass: self.max_grass,
            max_prey: self.max_prey,
            max_predators: self.max_predators,
            initial_grass: self.initial_grass,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_grass: default_max_grass(),
            max_prey: default_max_prey(),
            max_predators: default_max_predators(),
            initial_grass: default_initial_grass(),
        }
    }
}

/// Drought configuration: growth reduction and the optional self-timer
/// that re-toggles drought after a randomized interval.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DroughtConfig {
    /// Whether the randomized self-timer runs.
    #[serde(default)]
    pub self_timer: bool,

    /// Growth during drought as a percentage of normal growth.
    #[serde(default = "default_growth_pct")]
    pub growth_pct: u32,

    /// Shortest drought spell in seconds.
    #[serde(default = "default_drought_secs_min")]
    pub drought_secs_min: u64,

    /// Longest drought spell in seconds.
    #[serde(default = "default_drought_secs_max")]
    pub drought_secs_max: u64,

    /// Shortest normal spell in seconds.
    #[serde(default = "default_normal_secs_min")]
    pub normal_secs_min: u64,

    /// Longest normal spell in seconds.
    #[serde(default = "default_normal_secs_max")]
    pub normal_secs_max: u64,
}

impl Default for DroughtConfig {
    fn default() -> Self {
        Self {
            self_timer: false,
            growth_pct: default_growth_pct(),
            drought_secs_min: default_drought_secs_min(),
            drought_secs_max: default_drought_secs_max(),
            normal_secs_min: default_normal_secs_min(),
            normal_secs_max: default_normal_secs_max(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_world_name() -> String {
    "Savanna".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    200
}

const fn default_grass_growth_per_tick() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_join_port() -> u16 {
    9000
}

const fn default_observer_port() -> u16 {
    8000
}

const fn default_shutdown_grace_ms() -> u64 {
    1000
}

const fn default_max_grass() -> u32 {
    2000
}

const fn default_max_prey() -> u32 {
    200
}

const fn default_max_predators() -> u32 {
    80
}

const fn default_initial_grass() -> u32 {
    200
}

const fn default_growth_pct() -> u32 {
    20
}

const fn default_drought_secs_min() -> u64 {
    8
}

const fn default_drought_secs_max() -> u64 {
    18
}

const fn default_normal_secs_min() -> u64 {
    10
}

const fn default_normal_secs_max() -> u64 {
    25
}

fn default_log_level() -> String {
    "info".to_owned()
}
