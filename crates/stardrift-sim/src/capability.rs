//! The capability abstraction: behavior units attached to actors.
//!
//! Capabilities are ECS components on the actor entity, so looking one up by
//! type is a component lookup and despawning the actor drops them all. The
//! set is closed; see [`CapabilityKind`].

use hecs::{Entity, World};

use stardrift_core::enums::CapabilityKind;

/// Uniform contract for everything attachable to an actor.
pub trait Capability: hecs::Component {
    const KIND: CapabilityKind;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Per-frame update, only called while enabled. No-op unless overridden.
    fn tick(&mut self, _time_elapsed_ms: f64, _delta_ms: f64) {}
}

/// Tick every enabled capability of type `C` in the world.
pub fn tick_all<C: Capability>(world: &mut World, time_elapsed_ms: f64, delta_ms: f64) {
    for (_entity, capability) in world.query_mut::<&mut C>() {
        if capability.is_enabled() {
            capability.tick(time_elapsed_ms, delta_ms);
        }
    }
}

/// Enable or disable a capability of type `C` on `actor`.
/// Returns false when the actor does not carry one.
pub fn set_enabled<C: Capability>(world: &mut World, actor: Entity, enabled: bool) -> bool {
    match world.get::<&mut C>(actor) {
        Ok(mut capability) => {
            capability.set_enabled(enabled);
            true
        }
        Err(_) => false,
    }
}
