//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use stardrift_core::components::{Actor, CollisionBody, Projectile, Sprite, Transform, Velocity};
use stardrift_core::enums::RunPhase;
use stardrift_core::events::SimEvent;
use stardrift_core::state::*;
use stardrift_core::types::SimTime;

use crate::capability::Capability;
use crate::ids::actor_id;
use crate::pool::Pools;
use crate::shield::Shield;
use crate::weapon::Weapon;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: RunPhase,
    pools: &Pools,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        actors: build_actors(world),
        projectiles: build_projectiles(world),
        pools: pools.views(world),
        events,
    }
}

fn build_actors(world: &World) -> Vec<ActorView> {
    let mut actors: Vec<ActorView> = world
        .query::<(
            &Actor,
            &Transform,
            Option<&CollisionBody>,
            Option<&Weapon>,
            Option<&Shield>,
        )>()
        .iter()
        .map(|(entity, (actor, transform, body, weapon, shield))| ActorView {
            id: actor_id(entity),
            faction: actor.faction,
            position: transform.position,
            rotation: transform.rotation,
            radius: actor.radius,
            collision_enabled: body.map(|b| b.enabled),
            weapon_enabled: weapon.map(|w| w.is_enabled()),
            shield: shield.map(build_shield),
        })
        .collect();

    actors.sort_by_key(|a| a.id);
    actors
}

fn build_shield(shield: &Shield) -> ShieldView {
    let overlay = shield.overlay();
    ShieldView {
        enabled: shield.is_enabled(),
        active: shield.is_active(),
        phase_index: shield.phase_index(),
        remaining_ms: shield.remaining_ms(),
        visible: overlay.visible,
        frame: overlay.frame.as_deref().map(str::to_owned),
    }
}

/// Active projectiles only.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Transform, &Velocity, &Sprite)>()
        .iter()
        .filter(|(_, (projectile, _, _, _))| projectile.is_active())
        .map(|(entity, (projectile, transform, velocity, sprite))| ProjectileView {
            id: actor_id(entity),
            position: transform.position,
            velocity: velocity.linear,
            rotation: transform.rotation,
            damage: projectile.damage,
            display_size: sprite.display_size,
            frame: sprite.frame.as_deref().map(str::to_owned),
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}
