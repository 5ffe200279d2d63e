//! Weapon capability: launches pooled projectiles along the firing actor's
//! heading.

use std::sync::Arc;

use glam::DVec2;
use hecs::{Entity, World};

use stardrift_core::components::{Actor, Transform};
use stardrift_core::enums::{CapabilityKind, Faction, FireDropReason};
use stardrift_core::types::{forward, ProjectileSkins, WeaponConfig};

use crate::capability::Capability;
use crate::pool::{self, Launch, PoolId, Pools};

/// Where a shot comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireSource {
    pub position: DVec2,
    pub rotation: f64,
    /// Shots spawn this far ahead of `position`, at the nose.
    pub radius: f64,
    pub faction: Faction,
}

impl FireSource {
    pub fn from_actor(transform: &Transform, actor: &Actor) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            radius: actor.radius,
            faction: actor.faction,
        }
    }
}

/// What a fire request did. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired(Entity),
    Disabled,
    Inert,
    PoolExhausted,
}

impl FireOutcome {
    pub fn projectile(&self) -> Option<Entity> {
        match self {
            FireOutcome::Fired(entity) => Some(*entity),
            _ => None,
        }
    }

    pub fn drop_reason(&self) -> Option<FireDropReason> {
        match self {
            FireOutcome::Fired(_) => None,
            FireOutcome::Disabled => Some(FireDropReason::Disabled),
            FireOutcome::Inert => Some(FireDropReason::Inert),
            FireOutcome::PoolExhausted => Some(FireDropReason::PoolExhausted),
        }
    }
}

/// Fires projectiles drawn from a shared pool.
///
/// Built without a pool or with an unusable configuration, the weapon logs
/// once and stays inert: every `fire` is a no-op.
#[derive(Debug, Clone)]
pub struct Weapon {
    enabled: bool,
    pool: Option<PoolId>,
    config: Option<Arc<WeaponConfig>>,
}

impl Weapon {
    pub fn new(pool: Option<PoolId>, config: Option<Arc<WeaponConfig>>) -> Self {
        if pool.is_none() {
            log::error!("weapon built without a projectile pool; it will never fire");
        }
        let config = match config {
            Some(config) if config.is_valid() => Some(config),
            Some(config) => {
                log::error!("weapon built with invalid configuration {config:?}; it will never fire");
                None
            }
            None => {
                log::error!("weapon built without configuration; it will never fire");
                None
            }
        };

        Self {
            enabled: true,
            pool,
            config,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.pool.is_none() || self.config.is_none()
    }

    pub fn pool(&self) -> Option<PoolId> {
        self.pool
    }

    pub fn config(&self) -> Option<&Arc<WeaponConfig>> {
        self.config.as_ref()
    }

    /// Launch one projectile from `source`.
    ///
    /// Never touches the firing actor; mutates at most one pooled projectile.
    pub fn fire(
        &self,
        source: &FireSource,
        pools: &mut Pools,
        world: &mut World,
        skins: &ProjectileSkins,
    ) -> FireOutcome {
        if !self.enabled {
            return FireOutcome::Disabled;
        }
        let (Some(pool_id), Some(config)) = (self.pool, self.config.as_ref()) else {
            return FireOutcome::Inert;
        };
        let Some(projectiles) = pools.get_mut(pool_id) else {
            log::debug!("weapon refers to unknown pool {pool_id:?}");
            return FireOutcome::Inert;
        };

        let heading = forward(source.rotation);
        let Some(projectile) = projectiles.acquire(world) else {
            log::debug!("pool {pool_id:?} exhausted, shot dropped");
            return FireOutcome::PoolExhausted;
        };

        let launch = Launch {
            position: source.position + heading * source.radius,
            velocity: heading * config.speed,
            damage: config.damage,
            display_size: config.display_size(),
            frame: skins.variant_for(source.faction).clone(),
        };
        if !pool::enable(world, projectile, &launch) {
            log::error!("pool {pool_id:?} member {projectile:?} is missing components, releasing it");
            pool::deactivate(world, projectile);
            return FireOutcome::Inert;
        }
        FireOutcome::Fired(projectile)
    }
}

impl Capability for Weapon {
    const KIND: CapabilityKind = CapabilityKind::Weapon;

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
