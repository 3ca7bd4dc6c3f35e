//! Simulation configuration
//!
//! Loaded from TOML, then overridden by `DESTROYER_*` environment variables.
//! Every field has a default carrying the game's tuning, so an empty file is
//! a valid configuration.
//!
//! # Example Config File
//!
//! ```toml
//! [player]
//! max_health = 300.0
//! move_speed = 1.3
//!
//! [golem]
//! max_health = 70.0
//! attack_cooldown = 2.5
//!
//! [golem.perception]
//! notice_radius = 1.4
//!
//! [physics]
//! contact_prediction = 0.0
//! ```
//!
//! # Environment Overrides
//!
//! | Variable | Field |
//! |---|---|
//! | `DESTROYER_PLAYER_HP` | `player.max_health` |
//! | `DESTROYER_PLAYER_SPEED` | `player.move_speed` |
//! | `DESTROYER_GOLEM_HP` | `golem.max_health` |
//! | `DESTROYER_GOLEM_SPEED` | `golem.move_speed` |
//! | `DESTROYER_NOTICE_RADIUS` | `golem.perception.notice_radius` |
//! | `DESTROYER_ATTACK_COOLDOWN` | `golem.attack_cooldown` |

use crate::error::ConfigError;
use destroyer_combat::{AttackProfile, EnemyConfig, PlayerConfig};
use destroyer_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Player tuning
    pub player: PlayerConfig,
    /// Golem tuning
    pub golem: EnemyConfig,
    /// Level world tuning
    pub physics: PhysicsConfig,
}

impl SimulationConfig {
    /// Load from a TOML file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::load_from_file(path)?;
        log::info!("Loaded simulation config from {}", path.display());

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `DESTROYER_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var::<f32>(&lookup, "DESTROYER_PLAYER_HP")? {
            self.player.max_health = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "DESTROYER_PLAYER_SPEED")? {
            self.player.move_speed = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "DESTROYER_GOLEM_HP")? {
            self.golem.max_health = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "DESTROYER_GOLEM_SPEED")? {
            self.golem.move_speed = v;
        }
        if let Some(v) = parse_var::<f32>(&lookup, "DESTROYER_NOTICE_RADIUS")? {
            self.golem.perception.notice_radius = v;
        }
        if let Some(v) = parse_var::<f64>(&lookup, "DESTROYER_ATTACK_COOLDOWN")? {
            self.golem.attack_cooldown = v;
        }
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.max_health", self.player.max_health as f64)?;
        non_negative("player.move_speed", self.player.move_speed as f64)?;
        positive("player.locomotion.max_delta", self.player.locomotion.max_delta as f64)?;
        validate_attack("player.attack", &self.player.attack)?;

        positive("golem.max_health", self.golem.max_health as f64)?;
        non_negative("golem.move_speed", self.golem.move_speed as f64)?;
        positive("golem.locomotion.max_delta", self.golem.locomotion.max_delta as f64)?;
        positive("golem.perception.notice_radius", self.golem.perception.notice_radius as f64)?;
        non_negative("golem.attack_cooldown", self.golem.attack_cooldown)?;
        non_negative("golem.removal_delay", self.golem.removal_delay)?;
        validate_attack("golem.attack", &self.golem.attack)?;

        self.player
            .body
            .shape
            .validate()
            .and(self.player.weapon.shape.validate())
            .and(self.golem.body.shape.validate())
            .map_err(|e| ConfigError::invalid("hit volume", e.to_string()))?;
        self.physics
            .validate()
            .map_err(|e| ConfigError::invalid("physics", e.to_string()))
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => {
            let value = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(key, format!("cannot parse {:?}", raw)))?;
            log::info!("{} overridden from environment", key);
            Ok(Some(value))
        }
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be positive, got {}", value)))
    }
}

fn non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must not be negative, got {}", value)))
    }
}

fn validate_attack(key: &str, attack: &AttackProfile) -> Result<(), ConfigError> {
    positive(&format!("{}.tick_interval", key), attack.tick_interval)?;
    non_negative(&format!("{}.damage", key), attack.damage as f64)?;
    if attack.damage_frame == 0 {
        return Err(ConfigError::invalid(format!("{}.damage_frame", key), "must be at least 1"));
    }
    Ok(())
}
