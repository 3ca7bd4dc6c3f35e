//! Error types for simulation setup

use destroyer_combat::EntityId;
use destroyer_physics::PhysicsError;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or schema error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value out of its valid range
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// No actor with this id
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Only one player per simulation
    #[error("Player already spawned as {0}")]
    PlayerAlreadySpawned(EntityId),

    /// A repeating task needs a positive interval
    #[error("Invalid task interval: {0}")]
    InvalidInterval(f64),

    /// Physics layer failure
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
