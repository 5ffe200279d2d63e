//! Entity spawn factories for setting up the simulation world.
//!
//! Creates player and enemy actors with their component bundles. Capabilities
//! are built by the caller, which owns the pools and shared configuration.

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use stardrift_core::components::{Actor, CollisionBody, Transform, Velocity};
use stardrift_core::constants::*;
use stardrift_core::enums::Faction;
use stardrift_core::types::PlayArea;

use crate::shield::Shield;
use crate::weapon::Weapon;

/// Heading that points up the screen (toward y = 0).
pub const FACING_UP: f64 = -FRAC_PI_2;

/// Heading that points down the screen.
pub const FACING_DOWN: f64 = FRAC_PI_2;

/// Spawn a bare actor with a collision body and no capabilities.
pub fn spawn_actor(
    world: &mut World,
    faction: Faction,
    transform: Transform,
    radius: f64,
) -> Entity {
    world.spawn(actor_bundle(faction, transform, radius))
}

/// Spawn the player ship near the bottom center, facing up, armed and shielded.
pub fn spawn_player(
    world: &mut World,
    play_area: &PlayArea,
    weapon: Weapon,
    shield: Shield,
) -> Entity {
    let position = DVec2::new(
        play_area.width * 0.5,
        play_area.height - PLAYER_SPAWN_MARGIN,
    );
    let (actor, transform, velocity, body) = actor_bundle(
        Faction::Player,
        Transform::new(position, FACING_UP),
        PLAYER_RADIUS,
    );
    world.spawn((actor, transform, velocity, body, weapon, shield))
}

/// Spawn one enemy ship facing down.
pub fn spawn_enemy(world: &mut World, position: DVec2, weapon: Weapon) -> Entity {
    let (actor, transform, velocity, body) = actor_bundle(
        Faction::Hostile,
        Transform::new(position, FACING_DOWN),
        ENEMY_RADIUS,
    );
    world.spawn((actor, transform, velocity, body, weapon))
}

fn actor_bundle(
    faction: Faction,
    transform: Transform,
    radius: f64,
) -> (Actor, Transform, Velocity, CollisionBody) {
    (
        Actor { faction, radius },
        transform,
        Velocity::default(),
        CollisionBody::default(),
    )
}

/// Spawn `count` enemies at random spots in the band along the top edge.
pub fn spawn_enemy_formation(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    play_area: &PlayArea,
    count: usize,
    mut make_weapon: impl FnMut() -> Weapon,
) -> Vec<Entity> {
    let max_x = (play_area.width - ENEMY_RADIUS).max(ENEMY_RADIUS);
    let max_y = ENEMY_SPAWN_BAND.min(play_area.height).max(ENEMY_RADIUS);

    (0..count)
        .map(|_| {
            let x = if max_x > ENEMY_RADIUS {
                rng.gen_range(ENEMY_RADIUS..max_x)
            } else {
                play_area.width * 0.5
            };
            let y = if max_y > ENEMY_RADIUS {
                rng.gen_range(ENEMY_RADIUS..max_y)
            } else {
                ENEMY_RADIUS
            };
            spawn_enemy(world, DVec2::new(x, y), make_weapon())
        })
        .collect()
}
