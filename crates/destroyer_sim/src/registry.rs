//! Entity registry
//!
//! Owns every actor in the fight. Relations between actors (an enemy's
//! target, the player's overlap set) hold [`EntityId`]s and are resolved
//! here every time they are used.

use crate::error::{Result, SimError};
use destroyer_combat::{Combatant, Enemy, EntityId, Player, TargetView};
use destroyer_physics::BodyPose;
use std::collections::BTreeMap;

/// All actors of a simulation
#[derive(Debug, Default)]
pub struct Registry {
    player: Option<Player>,
    enemies: BTreeMap<EntityId, Enemy>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh id
    pub fn allocate(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Register the player
    pub fn insert_player(&mut self, player: Player) -> Result<EntityId> {
        if let Some(existing) = &self.player {
            return Err(SimError::PlayerAlreadySpawned(existing.actor.id));
        }
        let id = player.actor.id;
        self.player = Some(player);
        Ok(id)
    }

    /// Register an enemy
    pub fn insert_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.actor.id;
        self.enemies.insert(id, enemy);
        id
    }

    /// Remove an enemy, returning it
    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player.as_ref().map(|p| p.actor.id)
    }

    pub fn is_player(&self, id: EntityId) -> bool {
        self.player_id() == Some(id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Enemy ids in spawn order
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies.keys().copied().collect()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Any actor, through the shared interface
    pub fn combatant(&self, id: EntityId) -> Option<&dyn Combatant> {
        match &self.player {
            Some(player) if player.actor.id == id => Some(player as &dyn Combatant),
            _ => self.enemies.get(&id).map(|e| e as &dyn Combatant),
        }
    }

    /// Any actor, mutable
    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut dyn Combatant> {
        match &mut self.player {
            Some(player) if player.actor.id == id => Some(player as &mut dyn Combatant),
            _ => self.enemies.get_mut(&id).map(|e| e as &mut dyn Combatant),
        }
    }

    /// What an enemy hunting `target` can see of it
    pub fn target_view(&self, target: EntityId) -> Option<TargetView> {
        self.combatant(target).map(|c| TargetView {
            position: c.position(),
            is_dead: c.is_dead(),
        })
    }

    /// Poses of every actor, player first
    pub fn poses(&self) -> Vec<BodyPose> {
        self.player
            .iter()
            .map(|p| p.actor.pose())
            .chain(self.enemies.values().map(|e| e.actor.pose()))
            .collect()
    }
}
