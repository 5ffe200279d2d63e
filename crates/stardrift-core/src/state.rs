//! Simulation snapshot: the complete visible state handed to the render and
//! UI layers after each step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{Faction, RunPhase};
use crate::events::SimEvent;
use crate::types::{ActorId, SimTime};

/// Complete simulation state after one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: RunPhase,
    pub actors: Vec<ActorView>,
    /// Active projectiles only; idle pool members are not visible.
    pub projectiles: Vec<ProjectileView>,
    pub pools: Vec<PoolView>,
    pub events: Vec<SimEvent>,
}

/// One actor on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub id: ActorId,
    pub faction: Faction,
    pub position: DVec2,
    pub rotation: f64,
    pub radius: f64,
    /// `None` when the actor has no collision body.
    pub collision_enabled: Option<bool>,
    /// `None` when the actor carries no weapon.
    pub weapon_enabled: Option<bool>,
    pub shield: Option<ShieldView>,
}

/// Shield overlay and timing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldView {
    pub enabled: bool,
    pub active: bool,
    pub phase_index: usize,
    pub remaining_ms: f64,
    pub visible: bool,
    pub frame: Option<String>,
}

/// One projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ActorId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub rotation: f64,
    pub damage: f64,
    pub display_size: DVec2,
    pub frame: Option<String>,
}

/// Pool occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolView {
    pub id: u32,
    pub capacity: usize,
    pub active: usize,
}
