//! Distance, heading and facing helpers
//!
//! Headings are measured with `atan2(dz, dx)` (math convention, +X is zero).
//! Character models face +Z at zero yaw, hence [`fixed_rotation_angle`].

use crate::consts::FRAC_PI_2;
use crate::vector::{Vec2, Vec3};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}

/// Unit planar direction from one point towards another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetDirection {
    /// `cos(angle)`
    pub vx: f32,
    /// `sin(angle)`
    pub vz: f32,
    /// Heading in radians, `atan2(dz, dx)`
    pub angle: f32,
}

impl TargetDirection {
    /// Direction as a planar vector (x, z)
    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.vx, self.vz)
    }
}

/// Heading needed to walk from `from` to `to`, ignoring height
pub fn direction_to_target(from: Vec3, to: Vec3) -> TargetDirection {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let angle = dz.atan2(dx);

    TargetDirection {
        vx: angle.cos(),
        vz: angle.sin(),
        angle,
    }
}

/// Model yaw for a heading: `π/2 − angle`
#[inline]
pub fn fixed_rotation_angle(angle: f32) -> f32 {
    FRAC_PI_2 - angle
}

/// Model yaw for a planar movement direction: `atan2(x, z)`
#[inline]
pub fn facing_angle(direction: Vec2) -> f32 {
    direction.x.atan2(direction.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let d = distance(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_direction_to_target() {
        let dir = direction_to_target(Vec3::ZERO, Vec3::new(0.0, 7.0, 2.0));
        assert_relative_eq!(dir.angle, FRAC_PI_2);
        assert_relative_eq!(dir.vx, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dir.vz, 1.0);
    }

    #[test]
    fn test_fixed_angle_matches_facing() {
        // Walking along a heading faces the model the same way the
        // rotation offset does.
        let dir = direction_to_target(Vec3::ZERO, Vec3::new(1.0, 0.0, 2.0));
        let yaw_from_heading = fixed_rotation_angle(dir.angle);
        let yaw_from_motion = facing_angle(dir.as_vec2());
        assert_relative_eq!(yaw_from_heading, yaw_from_motion, epsilon = 1e-5);
    }
}
