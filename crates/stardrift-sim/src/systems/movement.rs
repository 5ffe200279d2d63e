//! Kinematic integration system.
//!
//! Updates Transform from Velocity each frame: position += velocity * dt.
//! Also keeps render state and shield overlays on their owners.

use hecs::World;

use stardrift_core::components::{Projectile, Sprite, Transform, Velocity};
use stardrift_core::handles::RenderHandle;

use crate::shield::Shield;

/// Integrate every moving entity. Idle pooled projectiles are skipped.
pub fn run(world: &mut World, delta_ms: f64) {
    let dt = delta_ms / 1000.0;
    for (_entity, (transform, velocity, projectile, sprite)) in world.query_mut::<(
        &mut Transform,
        &Velocity,
        Option<&Projectile>,
        Option<&mut Sprite>,
    )>() {
        if projectile.is_some_and(|p| !p.is_active()) {
            continue;
        }
        transform.position += velocity.linear * dt;
        if let Some(sprite) = sprite {
            sprite.set_position(transform.position);
        }
    }
}

/// Move shield overlays onto their owners. Runs after movement.
pub fn sync_overlays(world: &mut World) {
    for (_entity, (transform, shield)) in world.query_mut::<(&Transform, &mut Shield)>() {
        shield.follow(transform);
    }
}
