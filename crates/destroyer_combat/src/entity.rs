//! Entity identity and the actor core shared by players and enemies

use crate::animation::{clips, AnimationSink, PlayParams};
use crate::attack::{AttackProfile, AttackSequence};
use crate::health::{Health, HealthOutcome};
use destroyer_math::Vec3;
use destroyer_physics::BodyPose;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier handed out by the registry at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Raw id, as used to tag hit-volumes
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Locomotion and action flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionFlags {
    pub is_walking: bool,
    pub is_attacking: bool,
}

/// Per-actor frame timing on the simulation clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds of the previous frame, `0.0` before the first one
    pub last_update: f64,
}

impl FrameClock {
    /// Whether a previous frame has been recorded
    #[inline]
    pub fn has_started(&self) -> bool {
        self.last_update != 0.0
    }

    /// Record `now` and return the clamped delta since the previous frame.
    ///
    /// Returns `None` for the first frame.
    pub fn advance(&mut self, now: f64, max_delta: f32) -> Option<f32> {
        if !self.has_started() {
            self.last_update = now;
            return None;
        }

        let dt = ((now - self.last_update) as f32).clamp(0.0, max_delta);
        self.last_update = now;
        Some(dt)
    }
}

/// What happened when an actor was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target was already dead
    Ignored,
    /// Hit points dropped, still alive
    Wounded { current: f32 },
    /// This hit was fatal
    Killed,
}

/// State shared by every character in the fight
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: EntityId,
    pub position: Vec3,
    /// Rotation about +Y in radians
    pub yaw: f32,
    pub health: Health,
    pub motion: MotionFlags,
    pub clock: FrameClock,
    pub attack: AttackSequence,
    /// Damage and timing of this actor's melee attack
    pub profile: AttackProfile,
}

impl Actor {
    /// Create a new actor at full health
    pub fn new(id: EntityId, position: Vec3, max_health: f32, profile: AttackProfile) -> Self {
        Self {
            id,
            position,
            yaw: 0.0,
            health: Health::new(max_health),
            motion: MotionFlags::default(),
            clock: FrameClock::default(),
            attack: AttackSequence::default(),
            profile,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.motion.is_attacking
    }

    #[inline]
    pub fn is_walking(&self) -> bool {
        self.motion.is_walking
    }

    /// Pose for the physics world
    pub fn pose(&self) -> BodyPose {
        BodyPose {
            owner: self.id.raw(),
            position: self.position,
            yaw: self.yaw,
        }
    }

    /// Update the walking flag, starting or fading the walk clip on change
    pub fn set_walking(&mut self, walking: bool, sink: &mut dyn AnimationSink) {
        if self.motion.is_walking == walking {
            return;
        }
        self.motion.is_walking = walking;

        if walking {
            sink.play(self.id, clips::WALK, PlayParams::looping(clips::FADE));
        } else {
            sink.stop(self.id, clips::WALK, clips::FADE);
        }
    }

    /// Begin a melee attack.
    ///
    /// Returns `false` (and changes nothing) when the actor is dead or
    /// already attacking. The caller owns the tick schedule.
    pub fn start_attack(&mut self, sink: &mut dyn AnimationSink) -> bool {
        if self.is_dead() || self.is_attacking() {
            return false;
        }

        self.set_walking(false, sink);
        self.motion.is_attacking = true;
        self.attack.begin(&self.profile);
        sink.play(
            self.id,
            clips::ATTACK,
            PlayParams::once(clips::FADE).tagged(clips::ATTACK),
        );

        log::debug!("{} starts attacking", self.id);
        true
    }

    /// Advance the running attack by one tick; returns damage to resolve
    pub fn tick_attack(&mut self) -> Option<f32> {
        if self.is_dead() {
            return None;
        }
        self.attack.tick()
    }

    /// End the running attack. Returns `false` if none was running.
    pub fn finish_attack(&mut self) -> bool {
        if !self.is_attacking() {
            return false;
        }
        self.attack.reset();
        self.motion.is_attacking = false;
        true
    }

    /// Take a hit; on the fatal hit play the death clip
    pub fn apply_damage(&mut self, amount: f32, sink: &mut dyn AnimationSink) -> DamageOutcome {
        match self.health.apply_damage(amount) {
            HealthOutcome::Ignored => DamageOutcome::Ignored,
            HealthOutcome::Damaged => DamageOutcome::Wounded {
                current: self.health.current,
            },
            HealthOutcome::Died => {
                self.attack.reset();
                self.motion = MotionFlags::default();
                sink.stop_all(self.id);
                sink.play(self.id, clips::DEAD, PlayParams::once(0.0).held());

                log::info!("{} died", self.id);
                DamageOutcome::Killed
            }
        }
    }
}
