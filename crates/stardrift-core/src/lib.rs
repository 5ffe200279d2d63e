//! Core types and definitions for the STARDRIFT simulation.
//!
//! This crate defines the vocabulary shared across the workspace:
//! components, commands, snapshot views, events, and constants.
//! It has no dependency on the ECS, the renderer, or a physics engine.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod handles;
pub mod state;
pub mod types;
