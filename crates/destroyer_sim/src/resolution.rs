//! Collision resolution pass
//!
//! Contacts are collected while the world reports them and applied once the
//! step is over. Wall push-out is horizontal only, since height belongs to
//! the ground snap. Only the deepest wall contact of the whole step is
//! kept: a deeper contact anywhere replaces every correction collected so
//! far, so two characters in walls at once see only one of them corrected.

use crate::registry::Registry;
use destroyer_combat::{EntityId, Vec3};
use destroyer_physics::{Contact, ContactListener, ContactPhase, ShapeCategory};
use std::collections::BTreeMap;

/// Corrected positions collected during one physics step
#[derive(Debug, Default)]
pub struct PendingCorrections {
    entries: BTreeMap<EntityId, Vec3>,
    max_penetration: f32,
}

impl PendingCorrections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new step
    pub fn reset(&mut self) {
        self.entries.clear();
        self.max_penetration = 0.0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deepest penetration seen this step
    pub fn max_penetration(&self) -> f32 {
        self.max_penetration
    }

    /// Pending position for an actor
    pub fn get(&self, id: EntityId) -> Option<Vec3> {
        self.entries.get(&id).copied()
    }

    /// Offer a wall contact.
    ///
    /// `normal` points out of the wall towards the character. Returns
    /// `true` if this contact is now the step's correction.
    pub fn offer(&mut self, owner: EntityId, position: Vec3, normal: Vec3, penetration: f32) -> bool {
        if penetration <= self.max_penetration {
            return false;
        }

        self.max_penetration = penetration;
        self.entries.clear();
        self.entries.insert(owner, position + (normal * penetration).flatten());
        true
    }

    /// Write every pending position back and clear; returns corrected ids
    pub fn apply(&mut self, registry: &mut Registry) -> Vec<EntityId> {
        let mut applied = Vec::with_capacity(self.entries.len());
        for (id, position) in std::mem::take(&mut self.entries) {
            if let Some(actor) = registry.combatant_mut(id) {
                actor.actor_mut().position = position;
                applied.push(id);
            }
        }
        applied
    }
}

/// Routes the world's contact callbacks into corrections and flags
pub struct StepContacts<'a> {
    pub registry: &'a mut Registry,
    pub corrections: &'a mut PendingCorrections,
}

impl<'a> StepContacts<'a> {
    pub fn new(registry: &'a mut Registry, corrections: &'a mut PendingCorrections) -> Self {
        Self {
            registry,
            corrections,
        }
    }

    fn handle(&mut self, phase: ContactPhase, contact: &Contact) {
        if let Some(wall) = contact.matching(ShapeCategory::Wall) {
            if phase != ContactPhase::End && wall.b.category.is_character_body() {
                self.wall_contact(&wall);
            }
            return;
        }

        if contact.is_between(ShapeCategory::PlayerBody, ShapeCategory::EnemyBody) {
            if let Some(enemy) = contact.matching(ShapeCategory::EnemyBody).and_then(|c| c.a.owner) {
                self.body_contact(EntityId(enemy), phase);
            }
        } else if contact.is_between(ShapeCategory::PlayerWeapon, ShapeCategory::EnemyBody) {
            if let Some(enemy) = contact.matching(ShapeCategory::EnemyBody).and_then(|c| c.a.owner) {
                self.weapon_contact(EntityId(enemy), phase);
            }
        }
    }

    /// `contact.a` is the wall, `contact.b` the character
    fn wall_contact(&mut self, contact: &Contact) {
        let Some(owner) = contact.b.owner.map(EntityId) else {
            return;
        };
        let Some(actor) = self.registry.combatant(owner) else {
            log::warn!("Wall contact for unknown entity {}", owner);
            return;
        };

        let position = actor.position();
        if self
            .corrections
            .offer(owner, position, contact.normal, contact.penetration)
        {
            log::debug!("{} wall penetration {:.4}", owner, contact.penetration);
        }
    }

    fn body_contact(&mut self, enemy: EntityId, phase: ContactPhase) {
        if let Some(enemy) = self.registry.enemy_mut(enemy) {
            enemy.colliding_with_target = phase != ContactPhase::End;
        }
    }

    fn weapon_contact(&mut self, enemy: EntityId, phase: ContactPhase) {
        let Some(player) = self.registry.player_mut() else {
            return;
        };
        match phase {
            ContactPhase::Begin => player.weapon_entered(enemy),
            ContactPhase::End => player.weapon_left(enemy),
            ContactPhase::Update => {}
        }
    }
}

impl ContactListener for StepContacts<'_> {
    fn begin_contact(&mut self, contact: &Contact) {
        self.handle(ContactPhase::Begin, contact);
    }

    fn update_contact(&mut self, contact: &Contact) {
        self.handle(ContactPhase::Update, contact);
    }

    fn end_contact(&mut self, contact: &Contact) {
        self.handle(ContactPhase::End, contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use destroyer_combat::{Enemy, EnemyConfig, Player, PlayerConfig};
    use destroyer_physics::ShapeTag;

    fn registry() -> (Registry, EntityId, EntityId) {
        let mut registry = Registry::new();
        let player = registry.allocate();
        registry
            .insert_player(Player::new(player, Vec3::ZERO, &PlayerConfig::default()))
            .unwrap();
        let golem = registry.allocate();
        registry.insert_enemy(Enemy::new(golem, Vec3::new(5.0, 0.0, 0.0), &EnemyConfig::default()));
        (registry, player, golem)
    }

    fn wall_contact(owner: EntityId, category: ShapeCategory, penetration: f32, normal: Vec3) -> Contact {
        Contact {
            a: ShapeTag::WALL,
            b: ShapeTag::owned(owner.raw(), category),
            penetration,
            normal,
        }
    }

    #[test]
    fn test_correction_is_horizontal() {
        let mut corrections = PendingCorrections::new();
        let normal = Vec3::new(-0.6, 0.8, 0.0);
        assert!(corrections.offer(EntityId(1), Vec3::new(1.0, 2.0, 3.0), normal, 0.5));

        let corrected = corrections.get(EntityId(1)).unwrap();
        assert_relative_eq!(corrected.x, 0.7);
        assert_relative_eq!(corrected.y, 2.0);
        assert_relative_eq!(corrected.z, 3.0);
    }

    #[test]
    fn test_deepest_contact_wins() {
        let mut corrections = PendingCorrections::new();
        assert!(corrections.offer(EntityId(1), Vec3::ZERO, Vec3::X, 0.5));
        assert!(corrections.offer(EntityId(2), Vec3::ZERO, Vec3::X, 0.9));
        assert!(!corrections.offer(EntityId(1), Vec3::ZERO, Vec3::X, 0.7));
        // Equal depth keeps the first
        assert!(!corrections.offer(EntityId(3), Vec3::ZERO, Vec3::X, 0.9));

        assert_eq!(corrections.len(), 1);
        assert!(corrections.get(EntityId(2)).is_some());
        assert_relative_eq!(corrections.max_penetration(), 0.9);
    }

    #[test]
    fn test_apply_and_reset() {
        let (mut registry, player, _) = registry();
        let mut corrections = PendingCorrections::new();
        corrections.offer(player, Vec3::ZERO, Vec3::NEG_Z, 0.25);

        assert_eq!(corrections.apply(&mut registry), vec![player]);
        assert!(corrections.is_empty());
        assert_relative_eq!(registry.player().unwrap().actor.position.z, -0.25);

        corrections.reset();
        assert_eq!(corrections.max_penetration(), 0.0);
    }

    #[test]
    fn test_listener_routes_contacts() {
        let (mut registry, player, golem) = registry();
        let mut corrections = PendingCorrections::new();

        {
            let mut listener = StepContacts::new(&mut registry, &mut corrections);
            listener.begin_contact(&wall_contact(golem, ShapeCategory::EnemyBody, 0.1, Vec3::NEG_X));
            // Weapon against a wall is not a character contact
            listener.begin_contact(&wall_contact(player, ShapeCategory::PlayerWeapon, 0.5, Vec3::X));
            listener.begin_contact(&Contact {
                a: ShapeTag::owned(golem.raw(), ShapeCategory::EnemyBody),
                b: ShapeTag::owned(player.raw(), ShapeCategory::PlayerWeapon),
                penetration: 0.05,
                normal: Vec3::Z,
            });
            listener.update_contact(&Contact {
                a: ShapeTag::owned(player.raw(), ShapeCategory::PlayerBody),
                b: ShapeTag::owned(golem.raw(), ShapeCategory::EnemyBody),
                penetration: 0.05,
                normal: Vec3::X,
            });
        }

        assert_relative_eq!(corrections.get(golem).unwrap().x, 4.9);
        assert!(corrections.get(player).is_none());
        assert!(registry.enemy(golem).unwrap().colliding_with_target);
        assert!(registry.player().unwrap().overlapping_enemies.contains(&golem));

        let mut listener = StepContacts::new(&mut registry, &mut corrections);
        listener.end_contact(&Contact {
            a: ShapeTag::owned(golem.raw(), ShapeCategory::EnemyBody),
            b: ShapeTag::owned(player.raw(), ShapeCategory::PlayerBody),
            penetration: 0.0,
            normal: Vec3::X,
        });
        listener.end_contact(&Contact {
            a: ShapeTag::owned(player.raw(), ShapeCategory::PlayerWeapon),
            b: ShapeTag::owned(golem.raw(), ShapeCategory::EnemyBody),
            penetration: 0.0,
            normal: Vec3::X,
        });

        assert!(!registry.enemy(golem).unwrap().colliding_with_target);
        assert!(registry.player().unwrap().overlapping_enemies.is_empty());
    }
}
