//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side an actor fights for. Only selects cosmetic variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Player,
    Hostile,
}

/// The closed set of capabilities an actor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    Weapon,
    Shield,
}

/// Pooled projectile lifecycle. Projectiles are never destroyed individually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
}

/// Whether the simulation advances when stepped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    Running,
    Paused,
}

/// Why a fire request produced no projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireDropReason {
    /// The weapon capability is disabled.
    Disabled,
    /// The weapon was built without a pool or with invalid configuration.
    Inert,
    /// Every projectile in the pool is in flight.
    PoolExhausted,
}
