//! Destroyer Combat - Actors, Movement, Perception and Melee
//!
//! Everything a character does during a frame, independent of any engine:
//!
//! - Locomotion with a clamped delta time and ground snapping
//! - Golem perception: idle, pursue, attack on cooldown
//! - Melee attacks that resolve damage once on a fixed tick
//! - Hit points, terminal death and the overlay health bar
//!
//! The level is reached through [`destroyer_physics::WorldQuery`] and
//! animations through [`AnimationSink`], so every piece runs against fakes
//! in tests.
//!
//! # Example
//!
//! ```ignore
//! use destroyer_combat::prelude::*;
//!
//! let mut player = Player::new(EntityId(1), Vec3::ZERO, &PlayerConfig::default());
//! player.walk(Vec2::new(0.7, 0.7), now, &world, &mut sink);
//!
//! if player.start_attack(&mut sink) {
//!     // schedule the attack tick
//! }
//! ```

pub mod animation;
pub mod attack;
pub mod combatant;
pub mod enemy;
pub mod entity;
pub mod health;
pub mod locomotion;
pub mod perception;
pub mod player;

pub mod prelude {
    pub use crate::animation::{clips, AnimationCall, AnimationSink, ClipId, NullSink, PlayParams, RecordingSink};
    pub use crate::attack::{AttackProfile, AttackSequence};
    pub use crate::combatant::Combatant;
    pub use crate::enemy::{Decision, Enemy, EnemyConfig, TargetView};
    pub use crate::entity::{Actor, DamageOutcome, EntityId, FrameClock, MotionFlags};
    pub use crate::health::{Health, HealthBar, HealthChanged, HealthColor, HealthOutcome};
    pub use crate::locomotion::{move_actor, translate_and_snap, LocomotionConfig, MoveOutcome};
    pub use crate::perception::{engage, sense, EnemyState, PerceptionConfig, Sighting};
    pub use crate::player::{Player, PlayerConfig};
    pub use destroyer_math::{Vec2, Vec3};
}

pub use prelude::*;
