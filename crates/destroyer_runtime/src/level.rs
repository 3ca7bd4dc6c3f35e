//! Level files
//!
//! A level is a TOML file describing the static geometry, where everyone
//! spawns and the scripted player input of the encounter.
//!
//! # Example Level File
//!
//! ```toml
//! name = "arena"
//! player = [0.0, 0.0, 0.0]
//! golems = [[1.0, 0.0, 1.0]]
//!
//! [encounter]
//! frame_rate = 60.0
//! duration = 20.0
//!
//! [[ground]]
//! position = [0.0, -0.5, 0.0]
//! half_extents = [10.0, 0.5, 10.0]
//!
//! [[walls]]
//! position = [4.0, 1.0, 0.0]
//! half_extents = [0.25, 1.0, 4.0]
//!
//! [[script]]
//! at = 0.5
//! walk = [0.7, 0.7]
//! ```

use crate::error::LevelError;
use destroyer_physics::{LevelWorld, PhysicsConfig, StaticDesc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A box of static geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub position: [f32; 3],
    pub half_extents: [f32; 3],
}

/// How the encounter is played
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterSettings {
    /// Frames per simulated second
    pub frame_rate: f64,
    /// Seconds before the encounter is called off
    pub duration: f64,
    /// Length of the attack clip, seconds
    pub attack_clip: f64,
}

impl Default for EncounterSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            duration: 30.0,
            attack_clip: 0.9,
        }
    }
}

/// One scripted input change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Encounter time the step takes effect
    pub at: f64,
    /// Planar (x, z) walk direction from here on; standing if absent
    #[serde(default)]
    pub walk: Option<[f32; 2]>,
    /// Press attack on this step
    #[serde(default)]
    pub attack: bool,
}

/// A complete level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    pub name: String,
    pub encounter: EncounterSettings,
    pub ground: Vec<Slab>,
    pub walls: Vec<Slab>,
    /// Player spawn point
    pub player: [f32; 3],
    /// Golem spawn points
    pub golems: Vec<[f32; 3]>,
    pub script: Vec<ScriptStep>,
}

impl Level {
    /// Load and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let level = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded level '{}' from {} ({} walls, {} golems)",
            level.name,
            path.display(),
            level.walls.len(),
            level.golems.len()
        );
        Ok(level)
    }

    /// Parse and validate level TOML
    pub fn from_toml_str(content: &str) -> Result<Self, LevelError> {
        let level: Self = toml::from_str(content)?;
        level.validate()?;
        Ok(level)
    }

    /// Reject levels the encounter cannot be played on
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.ground.is_empty() {
            return Err(LevelError::Invalid("no ground slab".into()));
        }
        if !(self.encounter.frame_rate > 0.0) || !(self.encounter.duration > 0.0) {
            return Err(LevelError::Invalid(
                "frame_rate and duration must be positive".into(),
            ));
        }
        if !(self.encounter.attack_clip > 0.0) {
            return Err(LevelError::Invalid("attack_clip must be positive".into()));
        }

        for slab in self.ground.iter().chain(&self.walls) {
            if slab.half_extents.iter().any(|&e| !(e > 0.0)) {
                return Err(LevelError::Invalid(format!(
                    "slab at {:?} has non-positive extents",
                    slab.position
                )));
            }
        }

        if self.script.windows(2).any(|w| w[1].at < w[0].at) {
            return Err(LevelError::Invalid("script steps out of order".into()));
        }
        Ok(())
    }

    /// Static geometry as world descriptions, ground first
    pub fn statics(&self) -> Vec<StaticDesc> {
        self.ground
            .iter()
            .chain(&self.walls)
            .map(|s| StaticDesc::slab(s.position, s.half_extents))
            .collect()
    }

    /// Build the physics world for this level
    pub fn build_world(&self, physics: PhysicsConfig) -> destroyer_physics::Result<LevelWorld> {
        LevelWorld::with_statics(physics, &self.statics())
    }
}
