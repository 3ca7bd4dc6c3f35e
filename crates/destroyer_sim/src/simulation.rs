//! Frame orchestration
//!
//! One [`Simulation::tick`] per rendered frame, strictly in this order:
//!
//! ```text
//! 0. fire due tasks      attack ticks resolve damage, corpses are removed
//! 1. reset corrections
//! 2. frame update        player locomotion and attack, then every enemy
//! 3. physics step        sync hit-volumes, collect contacts
//! 4. apply corrections
//! ```

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::registry::Registry;
use crate::resolution::{PendingCorrections, StepContacts};
use crate::schedule::{Scheduler, TaskKind};
use crossbeam_channel::{unbounded, Receiver, Sender};
use destroyer_combat::{
    clips, AnimationSink, Combatant, DamageOutcome, Enemy, EntityId, HealthChanged, Player, Vec2, Vec3,
};
use destroyer_physics::WorldQuery;

/// Player input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Planar direction (x, z), normalized or zero
    pub direction: Vec2,
    /// Attack button pressed this frame
    pub attack: bool,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(direction: Vec2) -> Self {
        Self {
            direction,
            attack: false,
        }
    }

    pub fn attack() -> Self {
        Self {
            direction: Vec2::ZERO,
            attack: true,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub now: f64,
    /// Task occurrences fired
    pub fired: usize,
    /// Actors killed this tick
    pub deaths: Vec<EntityId>,
    /// Enemies removed this tick
    pub despawned: Vec<EntityId>,
    /// Actors moved by the resolution pass
    pub corrected: Vec<EntityId>,
}

/// The combat simulation
pub struct Simulation {
    config: SimulationConfig,
    registry: Registry,
    scheduler: Scheduler,
    corrections: PendingCorrections,
    health_subscribers: Vec<Sender<HealthChanged>>,
    now: f64,
}

impl Simulation {
    /// Create an empty simulation
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            registry: Registry::new(),
            scheduler: Scheduler::new(),
            corrections: PendingCorrections::new(),
            health_subscribers: Vec::new(),
            now: 0.0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Corrections collected in the current step
    pub fn corrections(&self) -> &PendingCorrections {
        &self.corrections
    }

    /// Simulation time of the last tick
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn player(&self) -> Option<&Player> {
        self.registry.player()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.registry.enemy(id)
    }

    // ==================== Health channel ====================

    /// Receive every player health change.
    ///
    /// The current reading is sent right away if the player exists.
    pub fn subscribe_health(&mut self) -> Receiver<HealthChanged> {
        let (tx, rx) = unbounded();
        if let Some(player) = self.registry.player() {
            // A fresh channel always has room
            let _ = tx.send(player.actor.health.changed());
        }
        self.health_subscribers.push(tx);
        rx
    }

    fn notify_health(&mut self) {
        let Some(reading) = self.registry.player().map(|p| p.actor.health.changed()) else {
            return;
        };
        self.health_subscribers.retain(|tx| tx.send(reading).is_ok());
    }

    // ==================== Spawning ====================

    /// Spawn the player and register its hit-volumes
    pub fn spawn_player(&mut self, position: Vec3, world: &mut dyn WorldQuery) -> Result<EntityId> {
        if let Some(existing) = self.registry.player_id() {
            return Err(SimError::PlayerAlreadySpawned(existing));
        }

        let id = self.registry.allocate();
        let player = Player::new(id, position, &self.config.player);
        attach_volumes(&player, world)?;
        self.registry.insert_player(player)?;

        // Enemies spawned before the player hunt it from now on
        for enemy_id in self.registry.enemy_ids() {
            if let Some(enemy) = self.registry.enemy_mut(enemy_id) {
                enemy.target.get_or_insert(id);
            }
        }

        log::info!("Spawned player {} at {:?}", id, position);
        self.notify_health();
        Ok(id)
    }

    /// Spawn a golem hunting the player
    pub fn spawn_enemy(&mut self, position: Vec3, world: &mut dyn WorldQuery) -> Result<EntityId> {
        let id = self.registry.allocate();
        let mut enemy = Enemy::new(id, position, &self.config.golem);
        enemy.target = self.registry.player_id();
        attach_volumes(&enemy, world)?;

        log::info!("Spawned golem {} at {:?}", id, position);
        Ok(self.registry.insert_enemy(enemy))
    }

    // ==================== Frame ====================

    /// Run one frame at simulation time `now`
    pub fn tick(
        &mut self,
        now: f64,
        input: &PlayerInput,
        world: &mut dyn WorldQuery,
        sink: &mut dyn AnimationSink,
    ) -> TickReport {
        self.now = now;
        let mut report = TickReport {
            now,
            ..Default::default()
        };

        self.run_due(now, world, sink, &mut report);

        self.corrections.reset();

        self.update_player(now, input, &*world, sink);
        self.update_enemies(now, &*world, sink);

        world.sync_bodies(&self.registry.poses());
        {
            let mut listener = StepContacts::new(&mut self.registry, &mut self.corrections);
            world.step_contacts(&mut listener);
        }

        report.corrected = self.corrections.apply(&mut self.registry);
        report
    }

    fn update_player(&mut self, now: f64, input: &PlayerInput, world: &dyn WorldQuery, sink: &mut dyn AnimationSink) {
        let Some(player) = self.registry.player_mut() else {
            return;
        };

        player.walk(input.direction, now, world, sink);

        if input.attack && player.start_attack(sink) {
            let (id, interval) = (player.actor.id, player.actor.profile.tick_interval);
            self.schedule_attack(id, interval, now);
        }
    }

    fn update_enemies(&mut self, now: f64, world: &dyn WorldQuery, sink: &mut dyn AnimationSink) {
        for id in self.registry.enemy_ids() {
            let target = self
                .registry
                .enemy(id)
                .and_then(|e| e.target)
                .and_then(|t| self.registry.target_view(t));

            let Some(enemy) = self.registry.enemy_mut(id) else {
                continue;
            };

            let decision = enemy.think(target, now, world, sink);
            if decision.attack_started {
                let interval = enemy.actor.profile.tick_interval;
                self.schedule_attack(id, interval, now);
            }
        }
    }

    fn schedule_attack(&mut self, owner: EntityId, interval: f64, now: f64) {
        self.scheduler.cancel(owner, TaskKind::AttackTick);
        if let Err(e) = self.scheduler.every(owner, TaskKind::AttackTick, interval, now) {
            log::warn!("Attack of {} not scheduled: {}", owner, e);
        }
    }

    // ==================== Tasks ====================

    fn run_due(&mut self, now: f64, world: &mut dyn WorldQuery, sink: &mut dyn AnimationSink, report: &mut TickReport) {
        while let Some(firing) = self.scheduler.pop_due(now) {
            report.fired += 1;
            match firing.kind {
                TaskKind::AttackTick => {
                    if let Some(killed) = self.attack_tick(firing.owner, sink) {
                        report.deaths.extend(killed);
                    }
                }
                TaskKind::Despawn => {
                    if self.despawn(firing.owner, world) {
                        report.despawned.push(firing.owner);
                    }
                }
            }
        }
    }

    /// One attack tick; returns who died from it, if damage resolved
    fn attack_tick(&mut self, owner: EntityId, sink: &mut dyn AnimationSink) -> Option<Vec<EntityId>> {
        let (damage, targets) = if self.registry.is_player(owner) {
            let player = self.registry.player_mut()?;
            let damage = player.actor.tick_attack()?;
            (damage, player.strike_targets())
        } else {
            let Some(enemy) = self.registry.enemy_mut(owner) else {
                self.scheduler.cancel_owner(owner);
                return None;
            };
            let damage = enemy.actor.tick_attack()?;
            let target = enemy.target.filter(|_| enemy.colliding_with_target);
            (damage, target.into_iter().collect())
        };

        log::debug!("{} hits {:?} for {}", owner, targets, damage);

        let killed = targets
            .into_iter()
            .filter(|&target| self.deal_damage(target, damage, sink) == Some(DamageOutcome::Killed))
            .collect();
        Some(killed)
    }

    fn despawn(&mut self, id: EntityId, world: &mut dyn WorldQuery) -> bool {
        if self.registry.remove_enemy(id).is_none() {
            return false;
        }

        world.detach_owner(id.raw());
        self.scheduler.cancel_owner(id);
        if let Some(player) = self.registry.player_mut() {
            player.weapon_left(id);
        }

        log::info!("Removed golem {}", id);
        true
    }

    // ==================== Damage ====================

    /// Damage an actor from outside the attack protocol
    pub fn apply_damage(&mut self, target: EntityId, amount: f32, sink: &mut dyn AnimationSink) -> Result<DamageOutcome> {
        self.deal_damage(target, amount, sink)
            .ok_or(SimError::UnknownEntity(target))
    }

    fn deal_damage(&mut self, target: EntityId, amount: f32, sink: &mut dyn AnimationSink) -> Option<DamageOutcome> {
        let outcome = self.registry.combatant_mut(target)?.apply_damage(amount, sink);

        if outcome != DamageOutcome::Ignored && self.registry.is_player(target) {
            self.notify_health();
        }
        if outcome == DamageOutcome::Killed {
            self.on_death(target);
        }
        Some(outcome)
    }

    fn on_death(&mut self, id: EntityId) {
        self.scheduler.cancel(id, TaskKind::AttackTick);

        if !self.registry.is_player(id) {
            let delay = self.config.golem.removal_delay;
            self.scheduler.after(id, TaskKind::Despawn, delay, self.now);
        }
    }

    // ==================== Animation ====================

    /// The host finished a tagged clip.
    ///
    /// Returns `true` if it ended a running attack; anything else is ignored.
    pub fn on_animation_complete(&mut self, owner: EntityId, tag: &str) -> bool {
        if tag != clips::ATTACK {
            return false;
        }

        let finished = self
            .registry
            .combatant_mut(owner)
            .map(|c| c.finish_attack())
            .unwrap_or(false);

        if finished {
            self.scheduler.cancel(owner, TaskKind::AttackTick);
            log::debug!("{} finished attacking", owner);
        }
        finished
    }
}

fn attach_volumes(combatant: &dyn Combatant, world: &mut dyn WorldQuery) -> Result<()> {
    let owner = combatant.id().raw();
    for desc in combatant.hit_volumes() {
        if let Err(e) = world.attach_volume(owner, &desc) {
            world.detach_owner(owner);
            return Err(e.into());
        }
    }
    Ok(())
}
