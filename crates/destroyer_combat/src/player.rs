//! The player character

use crate::animation::AnimationSink;
use crate::attack::AttackProfile;
use crate::combatant::Combatant;
use crate::entity::{Actor, EntityId};
use crate::locomotion::{move_actor, LocomotionConfig, MoveOutcome};
use destroyer_math::{Vec2, Vec3};
use destroyer_physics::{ColliderShape, HitVolumeDesc, ShapeCategory, WorldQuery};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// World units per second
    pub move_speed: f32,
    pub locomotion: LocomotionConfig,
    pub attack: AttackProfile,
    /// Body volume, collides with walls and enemies
    pub body: HitVolumeDesc,
    /// Sword volume, overlaps enemy bodies
    pub weapon: HitVolumeDesc,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 300.0,
            move_speed: 1.3,
            locomotion: LocomotionConfig::player(),
            attack: AttackProfile::player(),
            body: HitVolumeDesc::new(ColliderShape::capsule(0.2, 0.15), ShapeCategory::PlayerBody)
                .with_offset(0.0, 0.45, 0.0),
            weapon: HitVolumeDesc::new(ColliderShape::cuboid(0.15, 0.15, 0.25), ShapeCategory::PlayerWeapon)
                .with_offset(0.0, 0.5, 0.35),
        }
    }
}

impl PlayerConfig {
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub actor: Actor,
    pub move_speed: f32,
    pub locomotion: LocomotionConfig,
    /// Enemies whose body overlaps the weapon volume
    pub overlapping_enemies: BTreeSet<EntityId>,
    body: HitVolumeDesc,
    weapon: HitVolumeDesc,
}

impl Player {
    pub fn new(id: EntityId, position: Vec3, config: &PlayerConfig) -> Self {
        Self {
            actor: Actor::new(id, position, config.max_health, config.attack),
            move_speed: config.move_speed,
            locomotion: config.locomotion,
            overlapping_enemies: BTreeSet::new(),
            body: config.body.clone(),
            weapon: config.weapon.clone(),
        }
    }

    /// Walk one frame along the input direction
    pub fn walk(
        &mut self,
        direction: Vec2,
        now: f64,
        world: &dyn WorldQuery,
        sink: &mut dyn AnimationSink,
    ) -> MoveOutcome {
        move_actor(
            &mut self.actor,
            direction,
            now,
            self.move_speed,
            world,
            &self.locomotion,
            sink,
        )
    }

    /// An enemy body entered the weapon volume
    pub fn weapon_entered(&mut self, enemy: EntityId) {
        self.overlapping_enemies.insert(enemy);
    }

    /// An enemy body left the weapon volume
    pub fn weapon_left(&mut self, enemy: EntityId) {
        self.overlapping_enemies.remove(&enemy);
    }

    /// Enemies a swing would hit right now, in id order
    pub fn strike_targets(&self) -> Vec<EntityId> {
        self.overlapping_enemies.iter().copied().collect()
    }
}

impl Combatant for Player {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn hit_volumes(&self) -> Vec<HitVolumeDesc> {
        vec![self.body.clone(), self.weapon.clone()]
    }
}
