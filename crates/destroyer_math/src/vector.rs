//! Vector types
//!
//! [`Vec3`] is a world position. [`Vec2`] is a planar direction whose `y`
//! component is the world `z` axis.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Planar (XZ) direction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    /// World `z`
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit direction, or zero for a zero vector
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 { self / len } else { Self::ZERO }
    }

    /// Lift into world space, `y` becoming world `z`.
    #[inline]
    pub fn to_xz(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.y)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// World-space point or offset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Drop the vertical component.
    #[inline]
    pub fn flatten(self) -> Self {
        self.with_y(0.0)
    }

    /// Planar part of the vector as (x, z).
    #[inline]
    pub fn xz(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    #[inline]
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Self::from_array(a)
    }
}

/// Component-wise arithmetic for a vector type
macro_rules! componentwise {
    ($ty:ident { $($f:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($f: self.$f + rhs.$f),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($f: self.$f - rhs.$f),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, s: f32) -> Self {
                Self { $($f: self.$f * s),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            #[inline]
            fn div(self, s: f32) -> Self {
                Self { $($f: self.$f / s),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($f: -self.$f),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }
    };
}

componentwise!(Vec2 { x, y });
componentwise!(Vec3 { x, y, z });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_direction() {
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_operators() {
        let mut p = Vec3::new(1.0, 2.0, 3.0);
        p += Vec3::X * 2.0;
        assert_eq!(p, Vec3::new(3.0, 2.0, 3.0));
        assert_eq!(-(p - Vec3::new(3.0, 0.0, 0.0)) / 2.0, Vec3::new(0.0, -1.0, -1.5));
        assert_eq!(Vec3::new(3.0, 0.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_planar_helpers() {
        let v = Vec3::new(1.0, 5.0, -2.0);
        assert_eq!(v.flatten(), Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(v.xz(), Vec2::new(1.0, -2.0));
        assert_eq!(Vec2::new(3.0, 4.0).to_xz(), Vec3::new(3.0, 0.0, 4.0));
    }
}
