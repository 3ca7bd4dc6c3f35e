//! Per-frame locomotion with ground snapping

use crate::animation::AnimationSink;
use crate::entity::Actor;
use destroyer_math::{facing_angle, Segment, Vec2};
use destroyer_physics::{ShapeCategory, WorldQuery};
use serde::{Deserialize, Serialize};

/// Locomotion tuning for one kind of character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Upper bound on a frame's delta time, seconds
    pub max_delta: f32,
    /// Ground probe start above the feet
    pub probe_up: f32,
    /// Ground probe end below the feet
    pub probe_down: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self::player()
    }
}

impl LocomotionConfig {
    pub fn player() -> Self {
        Self {
            max_delta: 1.0 / 60.0,
            probe_up: 0.88,
            probe_down: 0.1,
        }
    }

    pub fn golem() -> Self {
        Self {
            probe_up: 0.08,
            ..Self::player()
        }
    }

    /// Ground probe below `actor`
    pub fn probe(&self, actor: &Actor) -> Segment {
        Segment::vertical(actor.position, self.probe_up, self.probe_down)
    }
}

/// Result of a locomotion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dead or attacking
    Suppressed,
    /// First frame, only the clock was started
    FirstFrame,
    /// No walking input this frame
    Standing,
    /// Moved and snapped to the ground
    Moved,
    /// No ground below the new position; position restored
    NoGround,
}

/// Translate along `direction` for `dt` seconds and snap to the ground.
///
/// Only a direction with both components nonzero counts as walking: a
/// single-axis direction leaves the actor in place with `is_walking`
/// cleared. The ground probe always runs; when it misses, the actor goes
/// back to where it started this frame.
pub fn translate_and_snap(
    actor: &mut Actor,
    direction: Vec2,
    dt: f32,
    speed: f32,
    world: &dyn WorldQuery,
    config: &LocomotionConfig,
    sink: &mut dyn AnimationSink,
) -> MoveOutcome {
    let start = actor.position;
    let walking = direction.x != 0.0 && direction.y != 0.0;

    if walking {
        actor.position += direction.to_xz() * (dt * speed);
        actor.yaw = facing_angle(direction);
    }
    actor.set_walking(walking, sink);

    match world.raycast(config.probe(actor), ShapeCategory::Wall.query_groups()) {
        Some(hit) => {
            actor.position.y = hit.world_y();
            if walking {
                MoveOutcome::Moved
            } else {
                MoveOutcome::Standing
            }
        }
        None => {
            actor.position = start;
            MoveOutcome::NoGround
        }
    }
}

/// Move an actor one frame along an input direction
pub fn move_actor(
    actor: &mut Actor,
    direction: Vec2,
    now: f64,
    speed: f32,
    world: &dyn WorldQuery,
    config: &LocomotionConfig,
    sink: &mut dyn AnimationSink,
) -> MoveOutcome {
    if actor.is_dead() || actor.is_attacking() {
        return MoveOutcome::Suppressed;
    }

    let Some(dt) = actor.clock.advance(now, config.max_delta) else {
        return MoveOutcome::FirstFrame;
    };

    translate_and_snap(actor, direction, dt, speed, world, config, sink)
}
