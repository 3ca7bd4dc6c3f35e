//! Enemy perception and the pursue/attack decision

use destroyer_math::{direction_to_target, distance, fixed_rotation_angle, TargetDirection, Vec3};
use serde::{Deserialize, Serialize};

/// Behaviour state of an enemy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// No target in range
    #[default]
    Idle,
    /// Walking towards the target
    Pursuing,
    /// In contact with the target, swinging on cooldown
    Attacking,
    /// Absorbing
    Dead,
}

impl EnemyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// How an enemy notices its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Targets at or beyond this distance are ignored
    pub notice_radius: f32,
    /// Targets this close give no usable heading
    pub min_distance: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            notice_radius: 1.4,
            min_distance: 0.01,
        }
    }
}

/// What an enemy perceives of its target this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sighting {
    /// Out of range, or on top of the enemy
    Unnoticed,
    /// In range
    Noticed {
        distance: f32,
        heading: TargetDirection,
        /// Model yaw facing the target
        yaw: f32,
    },
}

/// Look for a target from `from`
pub fn sense(from: Vec3, target: Vec3, config: &PerceptionConfig) -> Sighting {
    let distance = distance(target, from);
    if distance >= config.notice_radius || distance <= config.min_distance {
        return Sighting::Unnoticed;
    }

    let heading = direction_to_target(from, target);
    Sighting::Noticed {
        distance,
        heading,
        yaw: fixed_rotation_angle(heading.angle),
    }
}

/// State for a noticed target
pub fn engage(colliding_with_target: bool, attacking: bool) -> EnemyState {
    if !colliding_with_target && !attacking {
        EnemyState::Pursuing
    } else {
        EnemyState::Attacking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_notice_radius() {
        let config = PerceptionConfig::default();
        let origin = Vec3::ZERO;

        assert_eq!(sense(origin, Vec3::new(1.4, 0.0, 0.0), &config), Sighting::Unnoticed);
        assert_eq!(sense(origin, Vec3::new(0.005, 0.0, 0.0), &config), Sighting::Unnoticed);
        assert!(matches!(sense(origin, Vec3::new(1.0, 0.0, 0.0), &config), Sighting::Noticed { .. }));
    }

    #[test]
    fn test_distance_is_three_dimensional() {
        let config = PerceptionConfig::default();
        // 1.0 apart on the ground, but far above
        let sighting = sense(Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), &config);
        assert_eq!(sighting, Sighting::Unnoticed);
    }

    #[test]
    fn test_heading_and_yaw() {
        let sighting = sense(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), &PerceptionConfig::default());
        let Sighting::Noticed { heading, yaw, .. } = sighting else {
            panic!("target should be noticed");
        };

        assert_relative_eq!(heading.vx, 0.0, epsilon = 1e-6);
        assert_relative_eq!(heading.vz, 1.0);
        // Facing +Z is zero yaw
        assert_relative_eq!(yaw, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_engage() {
        assert_eq!(engage(false, false), EnemyState::Pursuing);
        assert_eq!(engage(true, false), EnemyState::Attacking);
        assert_eq!(engage(false, true), EnemyState::Attacking);
    }
}
