//! Simulation core for Stardrift.
//!
//! Owns the hecs ECS world, runs systems once per frame, and produces
//! `SimSnapshot`s for whatever renders the game. Actors carry capabilities
//! (weapons, shields) as components; projectiles come from fixed pools.

pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod pool;
pub mod scheduler;
pub mod shield;
pub mod systems;
pub mod weapon;
pub mod world_setup;

pub use config::SimConfig;
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
pub use stardrift_core as core;

#[cfg(test)]
mod tests;
