//! The world capability the simulation depends on

use crate::collider::{HitVolumeDesc, VolumeId};
use crate::error::Result;
use crate::events::{ContactListener, ShapeTag};
use crate::layers::CollisionGroups;
use destroyer_math::{Segment, Vec3};

/// Result of a segment raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Shape that was hit
    pub tag: ShapeTag,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Fraction along the segment, 0 at start and 1 at end
    pub fraction: f32,
}

impl RaycastHit {
    /// World height of the hit, used for ground snapping
    #[inline]
    pub fn world_y(&self) -> f32 {
        self.point.y
    }
}

/// Where an owner's hit-volumes should be this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub owner: u64,
    pub position: Vec3,
    /// Rotation about +Y in radians
    pub yaw: f32,
}

/// Query and contact capability of the level.
///
/// The simulation calls, per frame and in this order: any number of
/// [`raycast`](WorldQuery::raycast)s during the frame update, then
/// [`sync_bodies`](WorldQuery::sync_bodies), then
/// [`step_contacts`](WorldQuery::step_contacts).
pub trait WorldQuery {
    /// Closest hit along `segment` among shapes passing `filter`
    fn raycast(&self, segment: Segment, filter: CollisionGroups) -> Option<RaycastHit>;

    /// Attach a hit-volume to `owner`
    fn attach_volume(&mut self, owner: u64, desc: &HitVolumeDesc) -> Result<VolumeId>;

    /// Remove every hit-volume of `owner`. Ongoing contacts end silently.
    fn detach_owner(&mut self, owner: u64);

    /// Move hit-volumes to their owners' current poses
    fn sync_bodies(&mut self, poses: &[BodyPose]);

    /// Detect contacts for the current poses and report them
    fn step_contacts(&mut self, listener: &mut dyn ContactListener);
}
