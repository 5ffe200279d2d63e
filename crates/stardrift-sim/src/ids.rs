//! Conversion between ECS entities and the core's external identifiers.

use hecs::Entity;

use stardrift_core::types::ActorId;

pub fn actor_id(entity: Entity) -> ActorId {
    ActorId(entity.to_bits().get())
}

/// `None` for bit patterns no entity could have.
pub fn entity_of(id: ActorId) -> Option<Entity> {
    Entity::from_bits(id.0)
}
