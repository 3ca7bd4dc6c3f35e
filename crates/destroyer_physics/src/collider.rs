//! Shapes of the level and of character hit-volumes

use crate::error::{PhysicsError, Result};
use crate::layers::ShapeCategory;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a hit-volume attached to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u64);

/// Geometry of a collider. Everything the combat needs is a box or an
/// upright capsule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColliderShape {
    Cuboid { half_extents: [f32; 3] },
    /// Segment along Y of length `2 * half_height`, inflated by `radius`
    Capsule { half_height: f32, radius: f32 },
}

impl ColliderShape {
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Cuboid {
            half_extents: [hx, hy, hz],
        }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    /// Capsule sized in model units: total `height` including both caps,
    /// everything multiplied by `scale`
    pub fn capsule_from_height(cap_radius: f32, height: f32, scale: f32) -> Self {
        let radius = cap_radius * scale;
        let half_height = (height * scale * 0.5 - radius).max(0.0);
        Self::capsule(half_height, radius)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let valid = match *self {
            Self::Cuboid { half_extents } => half_extents.into_iter().all(positive),
            Self::Capsule { half_height, radius } => {
                half_height.is_finite() && half_height >= 0.0 && positive(radius)
            }
        };

        if !valid {
            return Err(PhysicsError::InvalidShape(format!("{:?}", self)));
        }
        Ok(())
    }

    pub(crate) fn to_rapier(self) -> rapier::SharedShape {
        match self {
            Self::Cuboid { half_extents: [x, y, z] } => rapier::SharedShape::cuboid(x, y, z),
            Self::Capsule { half_height, radius } => rapier::SharedShape::capsule_y(half_height, radius),
        }
    }
}

/// Axis-aligned box of static level geometry. Walls and walkable ground
/// are the same thing to the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticDesc {
    pub shape: ColliderShape,
    /// Center of the box
    pub position: [f32; 3],
}

impl StaticDesc {
    pub fn slab(position: [f32; 3], half_extents: [f32; 3]) -> Self {
        Self {
            shape: ColliderShape::Cuboid { half_extents },
            position,
        }
    }
}

/// Hit-volume carried by a character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitVolumeDesc {
    pub shape: ColliderShape,
    pub category: ShapeCategory,
    /// Local offset from the owner's feet, turned with the owner's yaw
    #[serde(default)]
    pub offset: [f32; 3],
}

impl HitVolumeDesc {
    pub fn new(shape: ColliderShape, category: ShapeCategory) -> Self {
        Self {
            shape,
            category,
            offset: [0.0; 3],
        }
    }

    pub fn with_offset(self, x: f32, y: f32, z: f32) -> Self {
        Self {
            offset: [x, y, z],
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golem_capsule_dimensions() {
        let ColliderShape::Capsule { half_height, radius } =
            ColliderShape::capsule_from_height(13.0, 52.0, 0.01)
        else {
            panic!("expected a capsule");
        };
        assert!((radius - 0.13).abs() < 1e-6);
        assert!((half_height - 0.13).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        assert!(ColliderShape::cuboid(0.5, 0.5, 0.5).validate().is_ok());
        assert!(ColliderShape::cuboid(1.0, 0.0, 1.0).validate().is_err());
        assert!(ColliderShape::capsule(0.0, 0.2).validate().is_ok());
        assert!(ColliderShape::capsule(0.2, f32::NAN).validate().is_err());
    }
}
