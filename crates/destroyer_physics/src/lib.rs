//! Destroyer Physics - World Queries and Contacts
//!
//! The combat simulation never talks to a physics engine directly. It sees
//! the level through the [`WorldQuery`] capability:
//!
//! - segment raycasts against static level geometry (ground snapping)
//! - hit-volumes attached to characters, moved once per frame
//! - begin / update / end contact callbacks with penetration data
//!
//! [`LevelWorld`] implements the capability on top of Rapier 3D. Tests can
//! swap in any other implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 LevelWorld                    │
//! │  ┌─────────────┐  ┌─────────────┐  ┌────────┐│
//! │  │ ColliderSet │  │ HitVolumes  │  │ Query  ││
//! │  │  (static)   │  │ (per owner) │  │Pipeline││
//! │  └─────────────┘  └─────────────┘  └────────┘│
//! └──────────────────────────────────────────────┘
//!          │ raycast            │ step_contacts
//!          ▼                    ▼
//!     RaycastHit          ContactListener
//! ```
//!
//! # Example
//!
//! ```ignore
//! use destroyer_physics::prelude::*;
//!
//! let mut world = LevelWorld::new(PhysicsConfig::default());
//! world.add_static(&StaticDesc::slab([0.0, -0.5, 0.0], [10.0, 0.5, 10.0]))?;
//!
//! let probe = Segment::vertical(Vec3::new(0.0, 0.0, 0.0), 0.88, 0.1);
//! let hit = world.raycast(probe, ShapeCategory::Wall.query_groups());
//! ```

pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::collider::{ColliderShape, HitVolumeDesc, StaticDesc, VolumeId};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{Contact, ContactCollector, ContactListener, ContactPhase, ShapeTag};
    pub use crate::layers::{CollisionGroups, CollisionMatrix, ShapeCategory};
    pub use crate::query::{BodyPose, RaycastHit, WorldQuery};
    pub use crate::world::LevelWorld;
    pub use destroyer_math::{Segment, Vec3};
}

pub use prelude::*;
