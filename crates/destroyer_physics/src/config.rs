//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Level world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Distance below which two shapes already count as touching
    pub contact_prediction: f32,

    /// Treat static shapes as solid for rays starting inside them
    pub solid_raycasts: bool,

    /// Report contacts between two character hit-volumes
    pub volume_contacts: bool,

    /// Penetrations smaller than this are reported as zero
    pub min_penetration: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            contact_prediction: 0.0,
            solid_raycasts: true,
            volume_contacts: true,
            min_penetration: 0.0,
        }
    }
}

impl PhysicsConfig {
    /// Only report character-versus-wall contacts
    pub fn walls_only() -> Self {
        Self {
            volume_contacts: false,
            ..Default::default()
        }
    }

    /// Set contact prediction distance
    pub fn with_contact_prediction(mut self, distance: f32) -> Self {
        self.contact_prediction = distance;
        self
    }

    /// Check values that would make contact reporting meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.contact_prediction.is_finite() || self.contact_prediction < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "contact_prediction must be a non-negative number, got {}",
                self.contact_prediction
            )));
        }
        if !self.min_penetration.is_finite() || self.min_penetration < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "min_penetration must be a non-negative number, got {}",
                self.min_penetration
            )));
        }
        Ok(())
    }
}
