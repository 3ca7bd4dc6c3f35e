//! Destroyer Sim - The Combat Frame Loop
//!
//! Ties actors, the level and time together:
//!
//! - [`Registry`] owns every actor and resolves relations by [`EntityId`]
//! - [`Scheduler`] runs attack ticks and corpse removal on the simulation clock
//! - [`PendingCorrections`] pushes characters out of walls after each step
//! - [`Simulation`] runs the frame and publishes player health
//!
//! # Example
//!
//! ```ignore
//! use destroyer_sim::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::load("destroyer.toml")?)?;
//! let player = sim.spawn_player(Vec3::ZERO, &mut world)?;
//! sim.spawn_enemy(Vec3::new(1.0, 0.0, 1.0), &mut world)?;
//! let health = sim.subscribe_health();
//!
//! loop {
//!     let report = sim.tick(clock.now(), &input, &mut world, &mut animator);
//!     for (owner, tag) in animator.completed() {
//!         sim.on_animation_complete(owner, tag);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod resolution;
pub mod schedule;
pub mod simulation;

pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::error::{ConfigError, Result, SimError};
    pub use crate::registry::Registry;
    pub use crate::resolution::{PendingCorrections, StepContacts};
    pub use crate::schedule::{Firing, Scheduler, TaskId, TaskKind};
    pub use crate::simulation::{PlayerInput, Simulation, TickReport};
    pub use destroyer_combat::{EntityId, HealthChanged, Vec2, Vec3};
}

pub use prelude::*;
