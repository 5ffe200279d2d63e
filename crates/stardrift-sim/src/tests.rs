//! Tests for the simulation engine: firing, pools, shield timelines, and
//! command handling across whole frames.

use glam::DVec2;

use stardrift_core::commands::ActorCommand;
use stardrift_core::components::{CollisionBody, Projectile, Transform, Velocity};
use stardrift_core::enums::*;
use stardrift_core::events::SimEvent;
use stardrift_core::state::SimSnapshot;
use stardrift_core::types::{ActorId, WeaponConfig};

use crate::capability::Capability;
use crate::config::SimConfig;
use crate::engine::SimulationEngine;
use crate::ids::actor_id;
use crate::shield::{Shield, ShieldOutcome};
use crate::weapon::{FireOutcome, Weapon};

/// Frames of exactly 100 ms keep shield timelines easy to read.
const STEP_MS: f64 = 100.0;

fn engine() -> SimulationEngine {
    SimulationEngine::new(SimConfig::default())
}

fn run_steps(engine: &mut SimulationEngine, steps: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..steps {
        events.extend(engine.step(STEP_MS).events);
    }
    events
}

fn collision_enabled(engine: &SimulationEngine, actor: hecs::Entity) -> bool {
    engine.world().get::<&CollisionBody>(actor).unwrap().enabled
}

fn shield_of(engine: &SimulationEngine, actor: hecs::Entity) -> Shield {
    Shield::clone(&engine.capability::<Shield>(actor).unwrap())
}

// ---- Determinism ----

fn scripted_run(seed: u64) -> Vec<String> {
    let mut engine = SimulationEngine::new(SimConfig::default().with_seed(seed));
    let player = actor_id(engine.spawn_player());
    let enemies: Vec<ActorId> = engine
        .spawn_enemy_formation(4)
        .into_iter()
        .map(actor_id)
        .collect();

    let mut frames = Vec::new();
    for frame in 0..240 {
        if frame % 10 == 0 {
            engine.queue_command(ActorCommand::Fire { actor: player });
            for &enemy in &enemies {
                engine.queue_command(ActorCommand::Fire { actor: enemy });
            }
        }
        if frame == 30 || frame == 90 {
            engine.queue_command(ActorCommand::ActivateShield {
                actor: player,
                duration_ms: None,
            });
        }
        let snapshot = engine.tick();
        frames.push(serde_json::to_string(&snapshot).unwrap());
    }
    frames
}

#[test]
fn test_determinism_same_seed() {
    let run_a = scripted_run(12345);
    let run_b = scripted_run(12345);
    for (frame, (a, b)) in run_a.iter().zip(&run_b).enumerate() {
        assert_eq!(a, b, "snapshots diverged at frame {frame}");
    }
}

#[test]
fn test_formation_depends_on_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig::default().with_seed(111));
    let mut engine_b = SimulationEngine::new(SimConfig::default().with_seed(222));
    engine_a.spawn_enemy_formation(6);
    engine_b.spawn_enemy_formation(6);

    let positions = |snapshot: SimSnapshot| -> Vec<DVec2> {
        snapshot.actors.iter().map(|a| a.position).collect()
    };
    assert_ne!(positions(engine_a.step(0.0)), positions(engine_b.step(0.0)));
}

#[test]
fn test_formation_stays_in_top_band() {
    let mut engine = engine();
    let enemies = engine.spawn_enemy_formation(20);
    assert_eq!(enemies.len(), 20);

    let snapshot = engine.step(0.0);
    for actor in &snapshot.actors {
        assert_eq!(actor.faction, Faction::Hostile);
        assert!(actor.position.x >= 36.0 && actor.position.x <= 720.0 - 36.0);
        assert!(actor.position.y >= 36.0 && actor.position.y <= 240.0);
        assert_eq!(actor.weapon_enabled, Some(true));
        assert!(actor.shield.is_none());
    }
}

// ---- Weapon and pools ----

#[test]
fn test_fire_from_origin_spawns_at_nose() {
    let mut engine = engine();
    let actor = engine.spawn_actor(
        Faction::Player,
        Transform::new(DVec2::ZERO, 0.0),
        10.0,
    );
    let weapon = engine.weapon_for(Faction::Player);
    engine.attach(actor, weapon).unwrap();

    let projectile = engine.fire(actor).unwrap().projectile().unwrap();
    let transform = *engine.world().get::<&Transform>(projectile).unwrap();
    assert!((transform.position - DVec2::new(10.0, 0.0)).length() < 1e-12);
    assert!(transform.rotation.abs() < 1e-12);

    // Firing never moves the shooter.
    let shooter = *engine.world().get::<&Transform>(actor).unwrap();
    assert_eq!(shooter.position, DVec2::ZERO);
}

#[test]
fn test_player_fires_up_with_player_skin() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.queue_command(ActorCommand::Fire {
        actor: actor_id(player),
    });

    let snapshot = engine.step(0.0);
    assert_eq!(snapshot.projectiles.len(), 1);
    let shot = &snapshot.projectiles[0];
    assert!((shot.position - DVec2::new(360.0, 1080.0)).length() < 1e-9);
    assert!(shot.velocity.x.abs() < 1e-9);
    assert!((shot.velocity.y + 900.0).abs() < 1e-9);
    assert_eq!(shot.frame.as_deref(), Some("laserBlue02.png"));
    assert_eq!(shot.display_size, DVec2::new(37.0, 9.0));

    assert!(matches!(
        snapshot.events.as_slice(),
        [SimEvent::ProjectileFired { actor, .. }] if *actor == actor_id(player)
    ));
}

#[test]
fn test_pool_exhaustion_drops_shot() {
    let mut engine = SimulationEngine::new(SimConfig::default().with_pool_capacities(2, 2));
    let player = engine.spawn_player();

    assert!(matches!(engine.fire(player), Some(FireOutcome::Fired(_))));
    assert!(matches!(engine.fire(player), Some(FireOutcome::Fired(_))));
    assert_eq!(engine.fire(player), Some(FireOutcome::PoolExhausted));

    let snapshot = engine.step(0.0);
    assert_eq!(snapshot.projectiles.len(), 2);
    assert!(snapshot.events.contains(&SimEvent::FireDropped {
        actor: actor_id(player),
        reason: FireDropReason::PoolExhausted,
    }));

    let player_pool = snapshot
        .pools
        .iter()
        .find(|p| p.id == engine.player_pool().0)
        .unwrap();
    assert_eq!(player_pool.capacity, 2);
    assert_eq!(player_pool.active, 2);
}

#[test]
fn test_factions_use_separate_pools() {
    let mut engine = SimulationEngine::new(SimConfig::default().with_pool_capacities(1, 1));
    let player = engine.spawn_player();
    let enemy = engine.spawn_enemy(DVec2::new(360.0, 100.0));

    assert!(matches!(engine.fire(player), Some(FireOutcome::Fired(_))));
    let shot = engine.fire(enemy).unwrap().projectile().unwrap();
    assert!(engine.pools().get(engine.hostile_pool()).unwrap().contains(shot));

    let snapshot = engine.step(0.0);
    let hostile_shot = snapshot
        .projectiles
        .iter()
        .find(|p| p.id == actor_id(shot))
        .unwrap();
    assert_eq!(hostile_shot.frame.as_deref(), Some("laserRed02.png"));
    assert!((hostile_shot.velocity.y - 450.0).abs() < 1e-9);
}

#[test]
fn test_offscreen_projectile_returns_to_pool() {
    let mut engine = SimulationEngine::new(SimConfig::default().with_pool_capacities(1, 1));
    let player = engine.spawn_player();
    let shot = engine.fire(player).unwrap().projectile().unwrap();

    // Starts at y = 1080 moving up at 900/s; gone past y = -4.5 in ~1.21 s.
    let events = run_steps(&mut engine, 12);
    assert!(!events.contains(&SimEvent::ProjectileRecycled {
        projectile: actor_id(shot),
    }));

    let events = run_steps(&mut engine, 2);
    assert!(events.contains(&SimEvent::ProjectileRecycled {
        projectile: actor_id(shot),
    }));

    let state = *engine.world().get::<&Projectile>(shot).unwrap();
    assert_eq!(state.state, ProjectileState::Inactive);
    assert!(!collision_enabled(&engine, shot));

    // The freed slot is reused.
    assert_eq!(engine.fire(player).unwrap().projectile(), Some(shot));
}

#[test]
fn test_idle_projectiles_do_not_move() {
    let mut engine = engine();
    let idle = engine.pools().get(engine.player_pool()).unwrap().members()[0];
    let before = *engine.world().get::<&Transform>(idle).unwrap();
    engine.world_mut().get::<&mut Velocity>(idle).unwrap().linear = DVec2::new(500.0, 500.0);

    let events = run_steps(&mut engine, 5);
    assert!(events.is_empty());

    let after = *engine.world().get::<&Transform>(idle).unwrap();
    assert_eq!(before.position, after.position);
    assert!(!collision_enabled(&engine, idle));
    assert!(engine.step(STEP_MS).projectiles.is_empty());
}

#[test]
fn test_disabled_weapon_reports_drop() {
    let mut engine = engine();
    let player = engine.spawn_player();
    let id = actor_id(player);

    engine.queue_commands([
        ActorCommand::SetCapabilityEnabled {
            actor: id,
            capability: CapabilityKind::Weapon,
            enabled: false,
        },
        ActorCommand::Fire { actor: id },
    ]);
    let snapshot = engine.step(STEP_MS);
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(
        snapshot.events,
        vec![SimEvent::FireDropped {
            actor: id,
            reason: FireDropReason::Disabled,
        }]
    );
    assert_eq!(snapshot.actors[0].weapon_enabled, Some(false));

    assert!(engine.set_capability_enabled(player, CapabilityKind::Weapon, true));
    assert!(matches!(engine.fire(player), Some(FireOutcome::Fired(_))));
}

#[test]
fn test_invalid_weapon_tuning_makes_weapon_inert() {
    let config = SimConfig::default().with_player_weapon(WeaponConfig {
        speed: 0.0,
        width: 37.0,
        height: 9.0,
        damage: 1.0,
    });
    let mut engine = SimulationEngine::new(config);
    let player = engine.spawn_player();

    assert!(engine.capability::<Weapon>(player).unwrap().is_inert());
    assert_eq!(engine.fire(player), Some(FireOutcome::Inert));
    let pool = engine.pools().get(engine.player_pool()).unwrap();
    assert_eq!(pool.active_count(engine.world()), 0);
}

#[test]
fn test_fire_without_weapon_is_none() {
    let mut engine = engine();
    let actor = engine.spawn_actor(Faction::Player, Transform::default(), 10.0);
    assert!(engine.fire(actor).is_none());
}

// ---- Shield ----

#[test]
fn test_shield_full_timeline() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.queue_command(ActorCommand::ActivateShield {
        actor: actor_id(player),
        duration_ms: None,
    });

    // Activation applies at t = 0, before time advances.
    let snapshot = engine.step(STEP_MS);
    assert!(snapshot.events.contains(&SimEvent::ShieldActivated {
        actor: actor_id(player),
        duration_ms: 1500.0,
        restarted: false,
    }));
    assert!(!collision_enabled(&engine, player));
    let view = snapshot.actors[0].shield.clone().unwrap();
    assert!(view.active && view.visible);
    assert_eq!(view.frame.as_deref(), Some("shield3.png"));
    assert_eq!(view.remaining_ms, 1400.0);

    // Phase steps are floor(1500 / 3) = 500 ms apart.
    run_steps(&mut engine, 3);
    assert_eq!(shield_of(&engine, player).phase_index(), 0);
    let events = run_steps(&mut engine, 1);
    assert!(events.contains(&SimEvent::ShieldPhaseAdvanced {
        actor: actor_id(player),
        phase: 1,
    }));
    assert_eq!(
        shield_of(&engine, player).overlay().frame.as_deref(),
        Some("shield2.png")
    );

    let events = run_steps(&mut engine, 5);
    assert!(events.contains(&SimEvent::ShieldPhaseAdvanced {
        actor: actor_id(player),
        phase: 2,
    }));
    assert_eq!(engine.time().elapsed_ms, 1000.0);

    run_steps(&mut engine, 4);
    assert!(shield_of(&engine, player).is_active());
    assert!(!collision_enabled(&engine, player));

    let events = run_steps(&mut engine, 1);
    assert_eq!(engine.time().elapsed_ms, 1500.0);
    assert!(events.contains(&SimEvent::ShieldExpired {
        actor: actor_id(player),
    }));
    let shield = shield_of(&engine, player);
    assert!(!shield.is_active());
    assert!(!shield.overlay().visible);
    assert!(collision_enabled(&engine, player));
    assert_eq!(engine.timers().pending_count(), 0);
}

#[test]
fn test_shield_restart_extends_without_collision_gap() {
    let mut engine = engine();
    let player = engine.spawn_player();

    assert_eq!(
        engine.activate_shield(player, None),
        Some(ShieldOutcome::Activated)
    );
    run_steps(&mut engine, 10);
    assert_eq!(shield_of(&engine, player).phase_index(), 2);

    assert_eq!(
        engine.activate_shield(player, None),
        Some(ShieldOutcome::Restarted)
    );
    let shield = shield_of(&engine, player);
    assert_eq!(shield.phase_index(), 0);
    assert_eq!(shield.expires_at_ms(), Some(2500.0));
    assert!(!collision_enabled(&engine, player));

    // The first activation would have expired at 1500; nothing happens then.
    let mut expired = false;
    for _ in 0..14 {
        let events = run_steps(&mut engine, 1);
        expired |= events
            .iter()
            .any(|e| matches!(e, SimEvent::ShieldExpired { .. }));
        assert!(
            !collision_enabled(&engine, player),
            "collision gap at {} ms",
            engine.time().elapsed_ms
        );
    }
    assert!(!expired);
    assert_eq!(engine.time().elapsed_ms, 2400.0);

    let events = run_steps(&mut engine, 1);
    assert!(events.contains(&SimEvent::ShieldExpired {
        actor: actor_id(player),
    }));
    assert!(collision_enabled(&engine, player));
}

#[test]
fn test_double_activation_leaves_one_expiry() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.step(STEP_MS);

    engine.activate_shield(player, Some(1500.0));
    engine.activate_shield(player, Some(1500.0));

    let shield = shield_of(&engine, player);
    let expire = shield.expire_timer().unwrap();
    assert_eq!(engine.timers().due_at(expire), Some(1600.0));
    // One phase timer and one expiry.
    assert_eq!(engine.timers().pending_count(), 2);
    assert!(!collision_enabled(&engine, player));
}

#[test]
fn test_shield_early_deactivate_cancels_timers() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, Some(800.0));
    run_steps(&mut engine, 2);

    engine.queue_command(ActorCommand::DeactivateShield {
        actor: actor_id(player),
    });
    let events = run_steps(&mut engine, 1);
    assert!(events.contains(&SimEvent::ShieldDeactivated {
        actor: actor_id(player),
    }));
    assert!(collision_enabled(&engine, player));
    assert_eq!(engine.timers().pending_count(), 0);

    let events = run_steps(&mut engine, 20);
    assert!(events.is_empty());
    assert!(!engine.deactivate_shield(player));
}

#[test]
fn test_disabled_shield_blocks_activation_only() {
    let mut engine = engine();
    let player = engine.spawn_player();

    engine.activate_shield(player, None);
    assert!(engine.set_capability_enabled(player, CapabilityKind::Shield, false));
    assert_eq!(
        engine.activate_shield(player, None),
        Some(ShieldOutcome::Disabled)
    );
    assert!(shield_of(&engine, player).is_active());
    assert!(!shield_of(&engine, player).is_enabled());

    assert!(engine.deactivate_shield(player));
    assert!(collision_enabled(&engine, player));
}

#[test]
fn test_shield_duration_shorter_than_phase_count() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, Some(2.0));

    let events = run_steps(&mut engine, 1);
    let phases = events
        .iter()
        .filter(|e| matches!(e, SimEvent::ShieldPhaseAdvanced { .. }))
        .count();
    assert_eq!(phases, 2);
    assert!(events.contains(&SimEvent::ShieldExpired {
        actor: actor_id(player),
    }));
    assert!(collision_enabled(&engine, player));
}

#[test]
fn test_overlay_follows_owner() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, None);
    engine.queue_command(ActorCommand::MoveActor {
        actor: actor_id(player),
        x: 200.0,
        y: 900.0,
        rotation: 0.5,
    });
    engine.step(STEP_MS);

    let shield = shield_of(&engine, player);
    assert_eq!(shield.overlay().position, DVec2::new(200.0, 900.0));
    assert_eq!(shield.overlay().rotation, 0.5);
}

#[test]
fn test_despawn_with_active_shield_cancels_timers() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, None);
    engine.step(STEP_MS);
    assert!(engine.timers().pending_count() > 0);

    assert!(engine.despawn_actor(player));
    assert_eq!(engine.timers().pending_count(), 0);
    assert!(engine.capability::<Shield>(player).is_none());

    let events = run_steps(&mut engine, 20);
    assert_eq!(
        events,
        vec![
            SimEvent::ShieldDeactivated {
                actor: actor_id(player),
            },
            SimEvent::ActorDespawned {
                actor: actor_id(player),
            },
        ]
    );
}

#[test]
fn test_replacing_active_shield_restores_collision() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, Some(300.0));
    engine.step(STEP_MS);
    assert!(!collision_enabled(&engine, player));

    let replacement = engine.new_shield();
    engine.attach(player, replacement).unwrap();
    assert!(collision_enabled(&engine, player));
    assert_eq!(engine.timers().pending_count(), 0);

    let events = run_steps(&mut engine, 50);
    assert_eq!(
        events,
        vec![SimEvent::ShieldDeactivated {
            actor: actor_id(player),
        }]
    );
    assert!(collision_enabled(&engine, player));
    assert!(!shield_of(&engine, player).is_active());

    // The new shield works normally.
    assert_eq!(
        engine.activate_shield(player, None),
        Some(ShieldOutcome::Activated)
    );
    assert!(!collision_enabled(&engine, player));
}

#[test]
fn test_spawned_ships_carry_their_loadout() {
    let mut engine = engine();
    let player = engine.spawn_player();
    let enemy = engine.spawn_enemy(DVec2::new(100.0, 100.0));

    assert!(engine.capability::<Weapon>(player).is_some());
    assert!(engine.capability::<Shield>(player).is_some());
    assert!(collision_enabled(&engine, player));

    assert!(engine.capability::<Weapon>(enemy).is_some());
    assert!(engine.capability::<Shield>(enemy).is_none());
    let transform = *engine.world().get::<&Transform>(enemy).unwrap();
    assert_eq!(transform.position, DVec2::new(100.0, 100.0));
}

#[test]
fn test_pooled_projectiles_cannot_be_despawned() {
    let mut engine = engine();
    let member = engine.pools().get(engine.player_pool()).unwrap().members()[0];
    assert!(!engine.despawn_actor(member));
    assert!(engine.world().contains(member));
}

// ---- Commands and run phase ----

#[test]
fn test_pause_freezes_time_and_timers() {
    let mut engine = engine();
    let player = engine.spawn_player();
    engine.activate_shield(player, Some(300.0));
    run_steps(&mut engine, 1);

    engine.queue_command(ActorCommand::Pause);
    let events = run_steps(&mut engine, 10);
    assert_eq!(engine.phase(), RunPhase::Paused);
    assert_eq!(engine.time().elapsed_ms, 100.0);
    assert!(events.is_empty());
    assert!(shield_of(&engine, player).is_active());

    engine.queue_command(ActorCommand::Resume);
    let events = run_steps(&mut engine, 2);
    assert!(events.contains(&SimEvent::ShieldExpired {
        actor: actor_id(player),
    }));
    assert_eq!(engine.time().elapsed_ms, 300.0);
}

#[test]
fn test_commands_for_unknown_actors_are_ignored() {
    let mut engine = engine();
    let player = engine.spawn_player();
    let gone = engine.spawn_enemy(DVec2::new(100.0, 100.0));
    engine.despawn_actor(gone);
    engine.step(0.0);

    engine.queue_commands([
        ActorCommand::Fire { actor: ActorId(0) },
        ActorCommand::Fire {
            actor: actor_id(gone),
        },
        ActorCommand::ActivateShield {
            actor: actor_id(gone),
            duration_ms: None,
        },
        ActorCommand::DespawnActor {
            actor: actor_id(gone),
        },
    ]);
    let snapshot = engine.step(STEP_MS);
    assert!(snapshot.events.is_empty());
    assert_eq!(snapshot.actors.len(), 1);
    assert_eq!(snapshot.actors[0].id, actor_id(player));
}

#[test]
fn test_commands_parse_from_json() {
    let mut engine = engine();
    let player = engine.spawn_player();
    let json = format!(
        r#"[{{"type":"ActivateShield","actor":{id},"duration_ms":600.0}},{{"type":"Fire","actor":{id}}}]"#,
        id = actor_id(player).0
    );
    let commands: Vec<ActorCommand> = serde_json::from_str(&json).unwrap();
    engine.queue_commands(commands);

    let snapshot = engine.step(STEP_MS);
    assert_eq!(snapshot.events.len(), 2);
    assert_eq!(snapshot.projectiles.len(), 1);
    assert_eq!(shield_of(&engine, player).expires_at_ms(), Some(600.0));
}

#[test]
fn test_attach_to_missing_actor_fails() {
    let mut engine = engine();
    let actor = engine.spawn_actor(Faction::Hostile, Transform::default(), 5.0);
    engine.despawn_actor(actor);

    let shield = engine.new_shield();
    assert!(matches!(
        engine.attach(actor, shield),
        Err(crate::SimError::UnknownActor(id)) if id == actor_id(actor)
    ));
    assert!(engine.set_transform(actor, DVec2::ZERO, 0.0).is_err());
}

#[test]
fn test_try_new_rejects_bad_frame_length() {
    assert!(SimulationEngine::try_new(SimConfig::default().with_frame_ms(0.0)).is_err());
    assert!(SimulationEngine::try_new(SimConfig::default()).is_ok());
}

#[test]
fn test_tick_uses_configured_frame() {
    let mut engine = SimulationEngine::new(SimConfig::default().with_frame_ms(20.0));
    engine.tick();
    let snapshot = engine.tick();
    assert_eq!(snapshot.time.tick, 2);
    assert_eq!(snapshot.time.elapsed_ms, 40.0);
}

#[test]
fn test_shield_attached_to_bare_actor_is_cosmetic() {
    let mut engine = engine();
    let actor = engine.spawn_actor(Faction::Hostile, Transform::default(), 20.0);
    engine.world_mut().remove_one::<CollisionBody>(actor).unwrap();
    let shield = engine.new_shield();
    engine.attach(actor, shield).unwrap();

    assert_eq!(
        engine.activate_shield(actor, Some(200.0)),
        Some(ShieldOutcome::Activated)
    );
    let events = run_steps(&mut engine, 2);
    assert!(events.contains(&SimEvent::ShieldExpired {
        actor: actor_id(actor),
    }));
    assert!(!shield_of(&engine, actor).is_active());
    assert_eq!(engine.timers().pending_count(), 0);
}
