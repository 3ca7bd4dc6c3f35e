//! # destroyer_math - Planar Spatial Math
//!
//! Small vector types and the spatial helpers the combat simulation is
//! built on. Combat is planar: characters move and face in the XZ plane,
//! the Y axis only carries ground height.

pub mod vector;
pub mod ray;
pub mod spatial;

pub use vector::*;
pub use ray::*;
pub use spatial::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const FRAC_PI_2: f32 = PI / 2.0;
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3};
    pub use crate::ray::Segment;
    pub use crate::spatial::{distance, direction_to_target, facing_angle, fixed_rotation_angle, TargetDirection};
}
