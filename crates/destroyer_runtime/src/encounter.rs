//! The encounter loop
//!
//! Owns the simulation, the rapier-backed level world, the animator and the
//! input script, and steps them on a fixed clock until someone wins or
//! time runs out.

use crate::animator::TimedAnimator;
use crate::error::Result;
use crate::level::Level;
use crate::script::ScriptCursor;
use crossbeam_channel::Receiver;
use destroyer_combat::{clips, HealthChanged};
use destroyer_physics::LevelWorld;
use destroyer_sim::{EntityId, Simulation, SimulationConfig, TickReport, Vec3};

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every golem is dead
    PlayerWon,
    PlayerDied,
    TimedOut,
}

/// End-of-encounter report
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub outcome: Outcome,
    pub frames: u64,
    /// Simulated seconds
    pub elapsed: f64,
    pub player_health: f32,
    pub golems_killed: usize,
    pub golems_left: usize,
}

/// A level being played
pub struct Encounter {
    sim: Simulation,
    world: LevelWorld,
    animator: TimedAnimator,
    script: ScriptCursor,
    player: EntityId,
    frame_time: f64,
    duration: f64,
    frame: u64,
    golems_killed: usize,
}

impl Encounter {
    /// Build the world, spawn everyone and load the script
    pub fn new(config: SimulationConfig, level: &Level) -> Result<Self> {
        let mut world = level.build_world(config.physics.clone())?;
        let mut sim = Simulation::new(config)?;

        let player = sim.spawn_player(Vec3::from_array(level.player), &mut world)?;
        for &spawn in &level.golems {
            sim.spawn_enemy(Vec3::from_array(spawn), &mut world)?;
        }

        Ok(Self {
            sim,
            world,
            animator: TimedAnimator::new().with_clip(clips::ATTACK, level.encounter.attack_clip),
            script: ScriptCursor::new(level.script.clone()),
            player,
            frame_time: 1.0 / level.encounter.frame_rate,
            duration: level.encounter.duration,
            frame: 0,
            golems_killed: 0,
        })
    }

    /// Player health updates, starting with the current reading
    pub fn subscribe_health(&mut self) -> Receiver<HealthChanged> {
        self.sim.subscribe_health()
    }

    /// Simulated time of the last frame
    pub fn now(&self) -> f64 {
        self.frame as f64 * self.frame_time
    }

    /// Play one frame
    pub fn step(&mut self) -> TickReport {
        // Frame zero would read as "no previous frame" to every actor clock
        self.frame += 1;
        let now = self.now();

        let input = self.script.input_at(now);
        self.animator.set_time(now);
        let report = self.sim.tick(now, &input, &mut self.world, &mut self.animator);

        for (owner, tag) in self.animator.completed(now) {
            self.sim.on_animation_complete(owner, tag);
        }

        for &dead in &report.deaths {
            if dead == self.player {
                log::info!("Player {} died at {:.2}s", dead, now);
            } else {
                self.golems_killed += 1;
                log::info!("Golem {} killed at {:.2}s", dead, now);
            }
        }
        report
    }

    /// How the encounter ended, if it has
    pub fn outcome(&self) -> Option<Outcome> {
        let player_dead = self.sim.player().map(|p| p.actor.is_dead()).unwrap_or(true);
        if player_dead {
            return Some(Outcome::PlayerDied);
        }
        if self.sim.registry().enemies().all(|e| e.actor.is_dead()) {
            return Some(Outcome::PlayerWon);
        }
        if self.now() >= self.duration {
            return Some(Outcome::TimedOut);
        }
        None
    }

    /// Step until the encounter ends
    pub fn run(&mut self) -> Summary {
        log::info!(
            "Encounter started: {} golems, {:.0} fps, {:.1}s limit",
            self.sim.registry().enemy_count(),
            1.0 / self.frame_time,
            self.duration
        );

        let outcome = loop {
            if let Some(outcome) = self.outcome() {
                break outcome;
            }
            self.step();
        };

        self.summary(outcome)
    }

    fn summary(&self, outcome: Outcome) -> Summary {
        Summary {
            outcome,
            frames: self.frame,
            elapsed: self.now(),
            player_health: self.sim.player().map(|p| p.actor.health.current).unwrap_or(0.0),
            golems_killed: self.golems_killed,
            golems_left: self.sim.registry().enemies().filter(|e| !e.actor.is_dead()).count(),
        }
    }
}
