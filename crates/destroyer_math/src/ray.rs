//! Probe segments for ground and line queries
//!
//! Ground adherence casts a short vertical segment through a character's
//! feet. A segment keeps both endpoints so the physics backend can report
//! the closest hit between them.

use crate::vector::Vec3;

/// A finite segment from `start` to `end`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Where the probe starts
    pub start: Vec3,
    /// Where the probe ends
    pub end: Vec3,
}

impl Segment {
    #[inline]
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Vertical probe through `position`, from `up` above to `down` below.
    #[inline]
    pub fn vertical(position: Vec3, up: f32, down: f32) -> Self {
        Self::new(
            position + Vec3::new(0.0, up, 0.0),
            position - Vec3::new(0.0, down, 0.0),
        )
    }

    /// Unnormalized direction, `end - start`
    #[inline]
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Point at parameter `t` in `[0, 1]`
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.start + self.delta() * t
    }

    /// Check if the segment has a usable length
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.delta().length_squared() > 1e-10
    }
}
