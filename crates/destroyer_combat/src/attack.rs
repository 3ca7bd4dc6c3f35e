//! Timed melee attacks
//!
//! An attack runs as a repeating tick on the simulation scheduler. Damage
//! resolves once, on the profile's damage frame; the sequence ends when the
//! attack clip reports completion or the attacker dies.

use serde::{Deserialize, Serialize};

/// Damage and timing of a character's melee attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Damage dealt to each target on the damage frame
    pub damage: f32,
    /// Tick on which damage resolves (1-based)
    pub damage_frame: u32,
    /// Seconds between ticks
    pub tick_interval: f64,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::player()
    }
}

impl AttackProfile {
    /// The player's sword swing
    pub fn player() -> Self {
        Self {
            damage: 30.0,
            damage_frame: 12,
            tick_interval: 0.05,
        }
    }

    /// A golem's punch
    pub fn golem() -> Self {
        Self {
            damage: 15.0,
            damage_frame: 10,
            tick_interval: 0.05,
        }
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_damage_frame(mut self, frame: u32) -> Self {
        self.damage_frame = frame;
        self
    }
}

/// Progress of the attack an actor is performing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackSequence {
    pub is_active: bool,
    pub elapsed_frames: u32,
    pub damage_frame: u32,
    pub damage: f32,
    /// Set once the damage frame has resolved
    pub damage_dealt: bool,
}

impl AttackSequence {
    /// Start a fresh sequence
    pub fn begin(&mut self, profile: &AttackProfile) {
        *self = Self {
            is_active: true,
            elapsed_frames: 0,
            damage_frame: profile.damage_frame,
            damage: profile.damage,
            damage_dealt: false,
        };
    }

    /// Count one tick; yields the damage exactly once, on the damage frame
    pub fn tick(&mut self) -> Option<f32> {
        if !self.is_active {
            return None;
        }

        self.elapsed_frames = self.elapsed_frames.saturating_add(1);
        if self.elapsed_frames == self.damage_frame && !self.damage_dealt {
            self.damage_dealt = true;
            Some(self.damage)
        } else {
            None
        }
    }

    /// Drop the sequence
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
