//! Cleanup system: returns projectiles that left the play area to their pool.

use hecs::{Entity, World};

use stardrift_core::components::{Projectile, Transform};
use stardrift_core::events::SimEvent;
use stardrift_core::types::PlayArea;

use crate::ids::actor_id;
use crate::pool;

/// Deactivate every active projectile whose center is outside the play area
/// grown by its own half-extent. Uses a pre-allocated buffer to avoid
/// per-frame allocation.
pub fn run(
    world: &mut World,
    play_area: &PlayArea,
    recycle_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    recycle_buffer.clear();

    for (entity, (transform, projectile)) in world.query_mut::<(&Transform, &Projectile)>() {
        if projectile.is_active()
            && !play_area.contains_with_margin(transform.position, projectile.half_extent)
        {
            recycle_buffer.push(entity);
        }
    }

    for entity in recycle_buffer.drain(..) {
        if pool::deactivate(world, entity) {
            events.push(SimEvent::ProjectileRecycled {
                projectile: actor_id(entity),
            });
        }
    }
}
