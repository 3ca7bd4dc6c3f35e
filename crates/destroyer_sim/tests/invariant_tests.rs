//! Invariant tests for destroyer_sim
//!
//! These tests pin the rules of the fight: movement limits, the collision
//! tie-break, attack timing, death and the health overlay.

use destroyer_combat::{
    clips, AnimationSink, Combatant, DamageOutcome, Enemy, EnemyConfig, EnemyState, HealthBar, HealthColor,
    NullSink, RecordingSink, TargetView,
};
use destroyer_physics::prelude::*;
use destroyer_sim::{EntityId, PlayerInput, Simulation, SimulationConfig, TaskKind, Vec2};

/// Flat ground at y = 0 everywhere; contacts are scripted per step
#[derive(Default)]
struct ScriptedWorld {
    contacts: Vec<(ContactPhase, Contact)>,
}

impl WorldQuery for ScriptedWorld {
    fn raycast(&self, segment: Segment, _filter: CollisionGroups) -> Option<RaycastHit> {
        Some(RaycastHit {
            tag: ShapeTag::WALL,
            point: segment.start.with_y(0.0),
            normal: Vec3::Y,
            fraction: 0.5,
        })
    }

    fn attach_volume(&mut self, _owner: u64, _desc: &HitVolumeDesc) -> destroyer_physics::Result<VolumeId> {
        Ok(VolumeId(0))
    }

    fn detach_owner(&mut self, _owner: u64) {}

    fn sync_bodies(&mut self, _poses: &[BodyPose]) {}

    fn step_contacts(&mut self, listener: &mut dyn ContactListener) {
        for (phase, contact) in &self.contacts {
            listener.on_contact(*phase, contact);
        }
    }
}

fn tagged(owner: EntityId, category: ShapeCategory) -> ShapeTag {
    ShapeTag::owned(owner.raw(), category)
}

fn wall_contact(owner: EntityId, category: ShapeCategory, penetration: f32) -> Contact {
    Contact {
        a: ShapeTag::WALL,
        b: tagged(owner, category),
        penetration,
        normal: Vec3::NEG_X,
    }
}

fn setup(golem_at: Vec3) -> (Simulation, ScriptedWorld, EntityId, EntityId) {
    let mut world = ScriptedWorld::default();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let player = sim.spawn_player(Vec3::ZERO, &mut world).unwrap();
    let golem = sim.spawn_enemy(golem_at, &mut world).unwrap();
    (sim, world, player, golem)
}

fn player_position(sim: &Simulation) -> Vec3 {
    sim.player().unwrap().actor.position
}

/// INVARIANT: A frame never moves a character further than speed / 60
#[test]
fn invariant_delta_time_clamp() {
    let (mut sim, mut world, _, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    let input = PlayerInput::walk(Vec2::new(0.6, 0.8));
    let max_step = 1.3 / 60.0 + 1e-5;

    let mut now = 1.0;
    sim.tick(now, &input, &mut world, &mut NullSink);

    for gap in [0.001, 0.016, 0.1, 0.5, 2.0, 30.0] {
        let before = player_position(&sim);
        now += gap;
        sim.tick(now, &input, &mut world, &mut NullSink);

        let step = (player_position(&sim) - before).length();
        assert!(step <= max_step, "moved {} in a {} s frame", step, gap);
    }
}

/// INVARIANT: Locomotion does nothing while attacking or dead
#[test]
fn invariant_locomotion_suppressed() {
    let directions = [
        Vec2::new(0.6, 0.8),
        Vec2::new(-0.7, 0.7),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, -1.0),
        Vec2::ZERO,
    ];

    let (mut sim, mut world, player, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);
    sim.tick(1.01, &PlayerInput::attack(), &mut world, &mut NullSink);
    assert!(sim.player().unwrap().actor.is_attacking());

    let start = player_position(&sim);
    let mut now = 1.01;
    for direction in directions {
        now += 0.016;
        sim.tick(now, &PlayerInput::walk(direction), &mut world, &mut NullSink);
        assert_eq!(player_position(&sim), start);
    }

    sim.apply_damage(player, 1000.0, &mut NullSink).unwrap();
    for direction in directions {
        now += 0.016;
        sim.tick(now, &PlayerInput::walk(direction), &mut world, &mut NullSink);
        assert_eq!(player_position(&sim), start);
    }
}

/// INVARIANT: Only the deepest wall contact of a step is corrected,
/// even when it belongs to another character
#[test]
fn invariant_deepest_penetration_wins_globally() {
    let (mut sim, mut world, player, golem) = setup(Vec3::new(10.0, 0.0, 10.0));
    world.contacts = vec![
        (ContactPhase::Begin, wall_contact(player, ShapeCategory::PlayerBody, 0.5)),
        (ContactPhase::Begin, wall_contact(golem, ShapeCategory::EnemyBody, 0.9)),
    ];

    let report = sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);

    assert_eq!(report.corrected, vec![golem]);
    assert_eq!(player_position(&sim), Vec3::ZERO);
    let golem_position = sim.enemy(golem).unwrap().actor.position;
    assert!((golem_position.x - 9.1).abs() < 1e-5);
    assert!((golem_position.z - 10.0).abs() < 1e-5);
    // Corrections never outlive their step
    assert!(sim.corrections().is_empty());
}

/// INVARIANT: End contacts and non-character shapes never push anyone
#[test]
fn invariant_only_character_wall_contacts_correct() {
    let (mut sim, mut world, player, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    world.contacts = vec![
        (ContactPhase::End, wall_contact(player, ShapeCategory::PlayerBody, 0.4)),
        (ContactPhase::Begin, wall_contact(player, ShapeCategory::PlayerWeapon, 0.4)),
    ];

    let report = sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);
    assert!(report.corrected.is_empty());
    assert_eq!(player_position(&sim), Vec3::ZERO);
}

/// INVARIANT: Health bar colour follows the fixed thresholds
#[test]
fn invariant_health_bar_thresholds() {
    assert_eq!(HealthBar::from_points(100.0, 60.0).color, HealthColor::Green);
    assert_eq!(HealthBar::from_points(100.0, 40.0).color, HealthColor::Orange);
    assert_eq!(HealthBar::from_points(100.0, 20.0).color, HealthColor::Red);
}

/// INVARIANT: An enemy attack deals its damage exactly once, on tick 10
#[test]
fn invariant_enemy_damage_once_per_attack() {
    let (mut sim, mut world, player, golem) = setup(Vec3::new(0.3, 0.0, 0.3));
    let health = sim.subscribe_health();
    // Bodies stay in contact for the whole test
    world.contacts = vec![(
        ContactPhase::Update,
        Contact {
            a: tagged(player, ShapeCategory::PlayerBody),
            b: tagged(golem, ShapeCategory::EnemyBody),
            penetration: 0.01,
            normal: Vec3::X,
        },
    )];

    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);
    sim.tick(1.01, &PlayerInput::idle(), &mut world, &mut NullSink);
    assert!(sim.scheduler().is_scheduled(golem, TaskKind::AttackTick));

    let mut fired = 0;
    for tick in 1..=20 {
        let report = sim.tick(1.011 + 0.05 * tick as f64, &PlayerInput::idle(), &mut world, &mut NullSink);
        fired += report.fired;

        let expected = if tick < 10 { 300.0 } else { 285.0 };
        assert_eq!(sim.player().unwrap().actor.health.current, expected, "after tick {}", tick);
    }

    assert_eq!(fired, 20);
    let readings: Vec<_> = health.try_iter().map(|h| h.current).collect();
    assert_eq!(readings, vec![300.0, 285.0]);
}

/// INVARIANT: The player's swing hits every overlapping enemy once, on tick 12
#[test]
fn invariant_player_swing_hits_overlapping_enemies() {
    let mut world = ScriptedWorld::default();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let player = sim.spawn_player(Vec3::ZERO, &mut world).unwrap();
    let near = sim.spawn_enemy(Vec3::new(0.0, 0.0, 5.0), &mut world).unwrap();
    let also_near = sim.spawn_enemy(Vec3::new(5.0, 0.0, 0.0), &mut world).unwrap();
    let far = sim.spawn_enemy(Vec3::new(-5.0, 0.0, 0.0), &mut world).unwrap();

    world.contacts = [near, also_near]
        .iter()
        .map(|&enemy| {
            (
                ContactPhase::Begin,
                Contact {
                    a: tagged(player, ShapeCategory::PlayerWeapon),
                    b: tagged(enemy, ShapeCategory::EnemyBody),
                    penetration: 0.02,
                    normal: Vec3::Z,
                },
            )
        })
        .collect();

    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);
    world.contacts.clear();
    sim.tick(1.01, &PlayerInput::attack(), &mut world, &mut NullSink);

    let mut now = 1.01;
    for _ in 0..30 {
        now += 0.05;
        sim.tick(now + 0.001, &PlayerInput::idle(), &mut world, &mut NullSink);
    }

    let hp = |id| sim.enemy(id).unwrap().actor.health.current;
    assert_eq!(hp(near), 40.0);
    assert_eq!(hp(also_near), 40.0);
    assert_eq!(hp(far), 70.0);
}

/// INVARIANT: Attack completion is the only way an attack ends
#[test]
fn invariant_attack_ends_on_completion_tag() {
    let (mut sim, mut world, player, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    let mut sink = RecordingSink::new();

    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut sink);
    sim.tick(1.01, &PlayerInput::attack(), &mut world, &mut sink);
    assert!(sink.played(player, clips::ATTACK));

    // A second press while swinging is ignored
    sim.tick(1.02, &PlayerInput::attack(), &mut world, &mut sink);
    assert_eq!(sink.play_count(player, clips::ATTACK), 1);

    // Long after the damage frame, still attacking
    sim.tick(5.0, &PlayerInput::idle(), &mut world, &mut sink);
    assert!(sim.player().unwrap().actor.is_attacking());

    assert!(!sim.on_animation_complete(player, "dead"));
    assert!(sim.on_animation_complete(player, clips::ATTACK));
    assert!(!sim.player().unwrap().actor.is_attacking());
    assert!(!sim.scheduler().is_scheduled(player, TaskKind::AttackTick));
    assert_eq!(sim.player().unwrap().actor.attack.elapsed_frames, 0);

    // Completion for an attack that is not running is ignored
    assert!(!sim.on_animation_complete(player, clips::ATTACK));
}

/// INVARIANT: Death is terminal and takes the actor out of the fight
#[test]
fn invariant_death_is_terminal() {
    let (mut sim, mut world, player, golem) = setup(Vec3::new(0.3, 0.0, 0.3));
    let mut sink = RecordingSink::new();
    world.contacts = vec![(
        ContactPhase::Update,
        Contact {
            a: tagged(player, ShapeCategory::PlayerBody),
            b: tagged(golem, ShapeCategory::EnemyBody),
            penetration: 0.01,
            normal: Vec3::X,
        },
    )];

    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut sink);
    sim.tick(1.01, &PlayerInput::idle(), &mut world, &mut sink);
    assert!(sim.scheduler().is_scheduled(golem, TaskKind::AttackTick));

    assert_eq!(sim.apply_damage(golem, 70.0, &mut sink).unwrap(), DamageOutcome::Killed);
    assert!(!sim.scheduler().is_scheduled(golem, TaskKind::AttackTick));
    assert!(sink.played(golem, clips::DEAD));

    let corpse = sim.enemy(golem).unwrap().actor.clone();
    assert_eq!(sim.apply_damage(golem, 30.0, &mut sink).unwrap(), DamageOutcome::Ignored);
    assert_eq!(sim.enemy(golem).unwrap().actor.health, corpse.health);

    // Still touching the player, but never attacks or moves again
    for i in 1..=40 {
        sim.tick(1.01 + 0.05 * i as f64, &PlayerInput::idle(), &mut world, &mut sink);
    }
    let enemy = sim.enemy(golem).unwrap();
    assert_eq!(enemy.state, EnemyState::Dead);
    assert_eq!(enemy.actor.position, corpse.position);
    assert_eq!(sim.player().unwrap().actor.health.current, 300.0);
    assert_eq!(sink.play_count(golem, clips::ATTACK), 1);
}

/// INVARIANT: A dead target stops its hunters
#[test]
fn invariant_dead_player_is_left_alone() {
    let (mut sim, mut world, player, golem) = setup(Vec3::new(0.3, 0.0, 0.3));
    world.contacts = vec![(
        ContactPhase::Update,
        Contact {
            a: tagged(player, ShapeCategory::PlayerBody),
            b: tagged(golem, ShapeCategory::EnemyBody),
            penetration: 0.01,
            normal: Vec3::X,
        },
    )];

    sim.apply_damage(player, 300.0, &mut NullSink).unwrap();
    for i in 0..10 {
        sim.tick(1.0 + 0.1 * i as f64, &PlayerInput::idle(), &mut world, &mut NullSink);
    }

    assert!(!sim.enemy(golem).unwrap().actor.is_attacking());
    assert!(!sim.scheduler().is_scheduled(golem, TaskKind::AttackTick));
}

/// INVARIANT: Leaving and re-entering notice range cycles
/// Idle -> Pursuing -> Idle -> Pursuing with no stale walking flag
#[test]
fn invariant_idle_pursue_round_trip() {
    let ground = ScriptedWorld::default();
    let mut golem = Enemy::new(EntityId(2), Vec3::ZERO, &EnemyConfig::default()).with_target(EntityId(1));
    let mut sink = RecordingSink::new();
    let near = Some(TargetView {
        position: Vec3::new(0.6, 0.0, 0.8),
        is_dead: false,
    });
    let far = Some(TargetView {
        position: Vec3::new(3.0, 0.0, 4.0),
        is_dead: false,
    });

    let script = [
        (far, EnemyState::Idle, false),
        (near, EnemyState::Pursuing, true),
        (near, EnemyState::Pursuing, true),
        (far, EnemyState::Idle, false),
        (near, EnemyState::Pursuing, true),
        (far, EnemyState::Idle, false),
    ];

    for (frame, (target, state, walking)) in script.into_iter().enumerate() {
        let decision = golem.think(target, 1.0 + 0.016 * frame as f64, &ground, &mut sink);
        assert_eq!(decision.state, state, "frame {}", frame);
        assert_eq!(golem.actor.is_walking(), walking, "frame {}", frame);
    }

    let starts = sink.play_count(golem.actor.id, clips::WALK);
    let stops = sink
        .calls
        .iter()
        .filter(|c| matches!(c, destroyer_combat::AnimationCall::Stop { clip: clips::WALK, .. }))
        .count();
    assert_eq!(starts, 2);
    assert_eq!(stops, 2);
}

/// INVARIANT: A missing target fails closed into Idle
#[test]
fn invariant_missing_target_is_idle() {
    let ground = ScriptedWorld::default();
    let mut golem = Enemy::new(EntityId(2), Vec3::ZERO, &EnemyConfig::default()).with_target(EntityId(404));
    golem.state = EnemyState::Pursuing;

    let decision = golem.think(None, 1.0, &ground, &mut NullSink);
    assert_eq!(decision.state, EnemyState::Idle);
    assert!(!decision.attack_started);
}

/// QUIRK: Single-axis input neither moves nor counts as walking
#[test]
fn quirk_single_axis_input_is_standing() {
    let (mut sim, mut world, _, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);

    for (i, direction) in [Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)].into_iter().enumerate() {
        sim.tick(1.01 + 0.01 * i as f64, &PlayerInput::walk(direction), &mut world, &mut NullSink);
        assert_eq!(player_position(&sim), Vec3::ZERO);
        assert!(!sim.player().unwrap().actor.is_walking());
    }
}

/// INVARIANT: A character pushed into a real wall is moved back out,
/// horizontally
#[test]
fn invariant_wall_push_out_with_level_world() {
    let statics = [
        StaticDesc::slab([0.0, -0.5, 0.0], [10.0, 0.5, 10.0]),
        StaticDesc::slab([1.0, 1.0, 0.0], [0.5, 1.0, 2.0]),
    ];
    let mut world = LevelWorld::with_statics(PhysicsConfig::default(), &statics).unwrap();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.spawn_player(Vec3::new(0.4, 0.0, 0.0), &mut world).unwrap();

    let report = sim.tick(1.0, &PlayerInput::idle(), &mut world, &mut NullSink);

    let position = player_position(&sim);
    assert_eq!(report.corrected.len(), 1);
    assert!((position.x - 0.35).abs() < 1e-3, "x = {}", position.x);
    assert!(position.y.abs() < 1e-5);
    assert!(position.z.abs() < 1e-3);
}

/// Sinks used as trait objects keep working across the whole fight
#[test]
fn animation_sink_is_object_safe() {
    let mut sink = NullSink;
    let sink: &mut dyn AnimationSink = &mut sink;
    let (mut sim, mut world, player, _) = setup(Vec3::new(10.0, 0.0, 10.0));
    sim.tick(1.0, &PlayerInput::attack(), &mut world, sink);
    assert!(sim.registry().combatant(player).map(|c| c.actor().is_attacking()).unwrap_or(false));
}
