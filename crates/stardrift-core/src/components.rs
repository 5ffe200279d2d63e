//! ECS components for hecs entities.
//!
//! Components are plain data structs. The capability components (weapon,
//! shield) carry behavior and live in the simulation crate.

use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{Faction, ProjectileState};

/// Position and heading in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec2,
    /// Heading in radians (0 = +x).
    pub rotation: f64,
}

impl Transform {
    pub fn new(position: DVec2, rotation: f64) -> Self {
        Self { position, rotation }
    }
}

/// Linear velocity in units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: DVec2,
}

/// Marks an entity as an actor (player ship or enemy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub faction: Faction,
    /// Collision radius. Projectiles spawn this far ahead of the center.
    pub radius: f64,
}

/// Handle onto the external collision layer for one entity.
///
/// Detection and resolution happen outside the core; the core only flips
/// whether the body responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionBody {
    pub enabled: bool,
}

impl Default for CollisionBody {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Render-side representation mirrored by the external render layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub visible: bool,
    /// Atlas frame name. `None` until a frame is assigned.
    pub frame: Option<Arc<str>>,
    pub position: DVec2,
    pub rotation: f64,
    pub display_size: DVec2,
}

/// A pooled projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub state: ProjectileState,
    pub damage: f64,
    /// Half of the display size; used for the off-screen test.
    pub half_extent: DVec2,
}

impl Projectile {
    pub fn is_active(&self) -> bool {
        self.state == ProjectileState::Active
    }
}
