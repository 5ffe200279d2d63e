//! Fundamental geometric and simulation types.

use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{HOSTILE_LASER_FRAME, PLAYER_LASER_FRAME};
use crate::enums::Faction;

/// External identifier of an actor or projectile.
///
/// Carries the bit pattern of the simulation's entity handle so that
/// commands and snapshots can cross the core boundary without an ECS type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{:x}", self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current frame number (increments by 1 each step).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one frame of `delta_ms` milliseconds.
    pub fn advance(&mut self, delta_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += delta_ms;
    }
}

/// The visible play area in world units (pixels), origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl PlayArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside the play area grown by `margin` on every side.
    ///
    /// Projectiles pass their own half-extent so they only count as gone once
    /// fully off screen.
    pub fn contains_with_margin(&self, point: DVec2, margin: DVec2) -> bool {
        point.x >= -margin.x
            && point.x <= self.width + margin.x
            && point.y >= -margin.y
            && point.y <= self.height + margin.y
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Firing parameters of a weapon. Shared by every projectile the weapon fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Projectile speed in units per second.
    pub speed: f64,
    /// Projectile display width (along the direction of travel).
    pub width: f64,
    /// Projectile display height.
    pub height: f64,
    /// Damage dealt on hit.
    pub damage: f64,
}

impl WeaponConfig {
    pub fn display_size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Speed and size must be positive, damage non-negative, all finite.
    pub fn is_valid(&self) -> bool {
        self.speed.is_finite()
            && self.speed > 0.0
            && self.width.is_finite()
            && self.width > 0.0
            && self.height.is_finite()
            && self.height > 0.0
            && self.damage.is_finite()
            && self.damage >= 0.0
    }
}

/// Faction to projectile visual-variant lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSkins {
    pub player: Arc<str>,
    pub hostile: Arc<str>,
}

impl ProjectileSkins {
    pub fn variant_for(&self, faction: Faction) -> &Arc<str> {
        match faction {
            Faction::Player => &self.player,
            Faction::Hostile => &self.hostile,
        }
    }
}

impl Default for ProjectileSkins {
    fn default() -> Self {
        Self {
            player: Arc::from(PLAYER_LASER_FRAME),
            hostile: Arc::from(HOSTILE_LASER_FRAME),
        }
    }
}

/// Unit vector pointing along `rotation` (radians, 0 = +x, counter-clockwise
/// toward +y).
pub fn forward(rotation: f64) -> DVec2 {
    DVec2::from_angle(rotation)
}
