//! Runtime errors

use destroyer_physics::PhysicsError;
use destroyer_sim::{ConfigError, SimError};
use thiserror::Error;

/// Level file errors
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid level: {0}")]
    Invalid(String),
}

/// Anything that stops an encounter from starting
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
