//! Behaviour common to every character that can fight

use crate::animation::AnimationSink;
use crate::entity::{Actor, DamageOutcome, EntityId};
use destroyer_math::Vec3;
use destroyer_physics::HitVolumeDesc;

/// A character that moves, attacks and takes hits
pub trait Combatant {
    /// Shared actor state
    fn actor(&self) -> &Actor;

    /// Shared actor state, mutable
    fn actor_mut(&mut self) -> &mut Actor;

    /// Hit-volumes registered with the world at spawn
    fn hit_volumes(&self) -> Vec<HitVolumeDesc>;

    fn id(&self) -> EntityId {
        self.actor().id
    }

    fn position(&self) -> Vec3 {
        self.actor().position
    }

    fn is_dead(&self) -> bool {
        self.actor().is_dead()
    }

    /// Begin a melee attack; `false` when ignored
    fn start_attack(&mut self, sink: &mut dyn AnimationSink) -> bool {
        self.actor_mut().start_attack(sink)
    }

    /// The attack clip finished
    fn finish_attack(&mut self) -> bool {
        self.actor_mut().finish_attack()
    }

    /// Take a hit
    fn apply_damage(&mut self, amount: f32, sink: &mut dyn AnimationSink) -> DamageOutcome {
        self.actor_mut().apply_damage(amount, sink)
    }
}
