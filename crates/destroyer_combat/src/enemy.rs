//! Golem enemies: perception, pursuit and attack

use crate::animation::AnimationSink;
use crate::attack::AttackProfile;
use crate::combatant::Combatant;
use crate::entity::{Actor, DamageOutcome, EntityId};
use crate::locomotion::{translate_and_snap, LocomotionConfig};
use crate::perception::{engage, sense, EnemyState, PerceptionConfig, Sighting};
use destroyer_math::Vec3;
use destroyer_physics::{ColliderShape, HitVolumeDesc, ShapeCategory, WorldQuery};
use serde::{Deserialize, Serialize};

/// Golem model scale; collider dimensions are authored in model units
pub const GOLEM_SCALE: f32 = 0.01;

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    /// World units per second
    pub move_speed: f32,
    /// Seconds between attacks while in contact
    pub attack_cooldown: f64,
    /// Seconds a corpse stays before removal
    pub removal_delay: f64,
    pub perception: PerceptionConfig,
    pub locomotion: LocomotionConfig,
    pub attack: AttackProfile,
    pub body: HitVolumeDesc,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 70.0,
            move_speed: 0.5,
            attack_cooldown: 2.5,
            removal_delay: 3.0,
            perception: PerceptionConfig::default(),
            locomotion: LocomotionConfig::golem(),
            attack: AttackProfile::golem(),
            body: HitVolumeDesc::new(
                ColliderShape::capsule_from_height(13.0, 52.0, GOLEM_SCALE),
                ShapeCategory::EnemyBody,
            )
            .with_offset(0.0, 46.0 * GOLEM_SCALE, 0.0),
        }
    }
}

impl EnemyConfig {
    pub fn with_notice_radius(mut self, radius: f32) -> Self {
        self.perception.notice_radius = radius;
        self
    }

    pub fn with_attack_cooldown(mut self, cooldown: f64) -> Self {
        self.attack_cooldown = cooldown;
        self
    }
}

/// What an enemy sees of its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec3,
    pub is_dead: bool,
}

/// Result of one [`Enemy::think`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub state: EnemyState,
    /// An attack started this frame and needs its tick scheduled
    pub attack_started: bool,
}

/// A golem
#[derive(Debug, Clone)]
pub struct Enemy {
    pub actor: Actor,
    /// The character this enemy hunts; a relation, resolved every frame
    pub target: Option<EntityId>,
    /// Body is touching the target's body
    pub colliding_with_target: bool,
    pub perception: PerceptionConfig,
    pub move_speed: f32,
    pub attack_cooldown: f64,
    /// Simulation time of the last attack start, `0.0` if never
    pub last_attack: f64,
    pub state: EnemyState,
    pub locomotion: LocomotionConfig,
    body: HitVolumeDesc,
}

impl Enemy {
    pub fn new(id: EntityId, position: Vec3, config: &EnemyConfig) -> Self {
        Self {
            actor: Actor::new(id, position, config.max_health, config.attack),
            target: None,
            colliding_with_target: false,
            perception: config.perception,
            move_speed: config.move_speed,
            attack_cooldown: config.attack_cooldown,
            last_attack: 0.0,
            state: EnemyState::Idle,
            locomotion: config.locomotion,
            body: config.body.clone(),
        }
    }

    /// Set the hunted character
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    fn decided(&self, attack_started: bool) -> Decision {
        Decision {
            state: self.state,
            attack_started,
        }
    }

    fn go_idle(&mut self, sink: &mut dyn AnimationSink) {
        self.actor.set_walking(false, sink);
        self.state = EnemyState::Idle;
    }

    /// One frame of behaviour.
    ///
    /// `target` is `None` when the hunted character no longer exists.
    pub fn think(
        &mut self,
        target: Option<TargetView>,
        now: f64,
        world: &dyn WorldQuery,
        sink: &mut dyn AnimationSink,
    ) -> Decision {
        if self.actor.is_dead() {
            self.state = EnemyState::Dead;
            return self.decided(false);
        }

        let Some(target) = target else {
            self.go_idle(sink);
            return self.decided(false);
        };
        if target.is_dead {
            return self.decided(false);
        }

        // The clock runs while idle so pursuit starts with a small delta
        let dt = self
            .actor
            .clock
            .advance(now, self.locomotion.max_delta)
            .unwrap_or(0.0);

        let (heading, yaw) = match sense(self.actor.position, target.position, &self.perception) {
            Sighting::Unnoticed => {
                self.go_idle(sink);
                return self.decided(false);
            }
            Sighting::Noticed { heading, yaw, .. } => (heading, yaw),
        };

        self.actor.yaw = yaw;
        let previous = self.state;
        self.state = engage(self.colliding_with_target, self.actor.is_attacking());

        let mut attack_started = false;
        match self.state {
            EnemyState::Pursuing => {
                translate_and_snap(
                    &mut self.actor,
                    heading.as_vec2(),
                    dt,
                    self.move_speed,
                    world,
                    &self.locomotion,
                    sink,
                );
            }
            _ => {
                self.actor.set_walking(false, sink);
                attack_started = self.try_attack(now, sink);
            }
        }

        if previous != self.state {
            log::debug!("{} {:?} -> {:?}", self.actor.id, previous, self.state);
        }
        self.decided(attack_started)
    }

    /// Attack on first contact, then once per cooldown
    fn try_attack(&mut self, now: f64, sink: &mut dyn AnimationSink) -> bool {
        let due = self.last_attack == 0.0 || now - self.last_attack >= self.attack_cooldown;
        if !due {
            return false;
        }

        self.last_attack = now;
        self.actor.start_attack(sink)
    }
}

impl Combatant for Enemy {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn hit_volumes(&self) -> Vec<HitVolumeDesc> {
        vec![self.body.clone()]
    }

    fn apply_damage(&mut self, amount: f32, sink: &mut dyn AnimationSink) -> DamageOutcome {
        let outcome = self.actor.apply_damage(amount, sink);
        if outcome == DamageOutcome::Killed {
            self.state = EnemyState::Dead;
            self.colliding_with_target = false;
        }
        outcome
    }
}
