//! Capability tick system.

use hecs::World;

use crate::capability::tick_all;
use crate::shield::Shield;
use crate::weapon::Weapon;

/// Tick every enabled capability on every actor. No ordering between
/// capability types or actors is promised.
pub fn run(world: &mut World, time_elapsed_ms: f64, delta_ms: f64) {
    tick_all::<Weapon>(world, time_elapsed_ms, delta_ms);
    tick_all::<Shield>(world, time_elapsed_ms, delta_ms);
}
