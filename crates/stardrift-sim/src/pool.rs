//! Fixed-capacity projectile pools.
//!
//! Every projectile is spawned once, when its pool is built, and lives for
//! the rest of the simulation. Firing flips an idle member to active;
//! leaving the play area flips it back. The pool never grows, so a small
//! capacity caps the sustained fire rate: requests beyond it are dropped.

use std::sync::Arc;

use glam::DVec2;
use hecs::{Entity, World};

use stardrift_core::components::{CollisionBody, Projectile, Sprite, Transform, Velocity};
use stardrift_core::enums::ProjectileState;
use stardrift_core::handles::{CollisionHandle, RenderHandle};
use stardrift_core::state::PoolView;

/// Identifies a pool in the [`Pools`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub u32);

/// Marks a projectile entity as owned by a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMember {
    pub pool: PoolId,
}

/// Everything a weapon sets on a projectile when launching it.
#[derive(Debug, Clone)]
pub struct Launch {
    pub position: DVec2,
    pub velocity: DVec2,
    pub damage: f64,
    pub display_size: DVec2,
    pub frame: Arc<str>,
}

/// A fixed set of reusable projectile entities.
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    id: PoolId,
    members: Vec<Entity>,
    /// Where the next idle-member search starts.
    cursor: usize,
}

impl ProjectilePool {
    /// Spawn `capacity` idle projectiles into the world.
    pub fn new(world: &mut World, id: PoolId, capacity: usize) -> Self {
        let members = (0..capacity)
            .map(|_| {
                world.spawn((
                    PoolMember { pool: id },
                    Projectile::default(),
                    Transform::default(),
                    Velocity::default(),
                    Sprite::default(),
                    CollisionBody { enabled: false },
                ))
            })
            .collect();

        Self {
            id,
            members,
            cursor: 0,
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    /// Find an idle projectile and mark it active in the same step.
    ///
    /// Returns `None` when every member is in flight.
    pub fn acquire(&mut self, world: &mut World) -> Option<Entity> {
        let len = self.members.len();
        for offset in 0..len {
            let idx = (self.cursor + offset) % len;
            let entity = self.members[idx];
            let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
                continue;
            };
            if projectile.state == ProjectileState::Inactive {
                projectile.state = ProjectileState::Active;
                self.cursor = (idx + 1) % len;
                return Some(entity);
            }
        }
        None
    }

    pub fn active_count(&self, world: &World) -> usize {
        self.members
            .iter()
            .filter(|&&entity| {
                world
                    .get::<&Projectile>(entity)
                    .map(|p| p.is_active())
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn view(&self, world: &World) -> PoolView {
        PoolView {
            id: self.id.0,
            capacity: self.capacity(),
            active: self.active_count(world),
        }
    }
}

/// Registry of every pool in the simulation.
#[derive(Debug, Clone, Default)]
pub struct Pools {
    pools: Vec<ProjectilePool>,
}

impl Pools {
    /// Build a new pool and return its id.
    pub fn create(&mut self, world: &mut World, capacity: usize) -> PoolId {
        let id = PoolId(self.pools.len() as u32);
        self.pools.push(ProjectilePool::new(world, id, capacity));
        id
    }

    pub fn get(&self, id: PoolId) -> Option<&ProjectilePool> {
        self.pools.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut ProjectilePool> {
        self.pools.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectilePool> {
        self.pools.iter()
    }

    pub fn views(&self, world: &World) -> Vec<PoolView> {
        self.pools.iter().map(|p| p.view(world)).collect()
    }
}

/// Put an acquired projectile in flight.
///
/// Returns false if `entity` is not a pooled projectile.
pub fn enable(world: &mut World, entity: Entity, launch: &Launch) -> bool {
    let Ok((projectile, transform, velocity, sprite, body)) = world.query_one_mut::<(
        &mut Projectile,
        &mut Transform,
        &mut Velocity,
        &mut Sprite,
        &mut CollisionBody,
    )>(entity) else {
        return false;
    };

    let rotation = launch.velocity.y.atan2(launch.velocity.x);

    projectile.state = ProjectileState::Active;
    projectile.damage = launch.damage;
    projectile.half_extent = launch.display_size * 0.5;

    transform.position = launch.position;
    transform.rotation = rotation;
    velocity.linear = launch.velocity;

    sprite.set_frame(launch.frame.clone());
    sprite.display_size = launch.display_size;
    sprite.set_position(launch.position);
    sprite.set_rotation(rotation);
    sprite.set_visible(true);

    body.set_collision_enabled(true);
    true
}

/// Return a projectile to its pool's idle set.
///
/// Position is left where it was; idle projectiles are neither moved,
/// drawn, nor collided. Returns whether the projectile was active.
pub fn deactivate(world: &mut World, entity: Entity) -> bool {
    let Ok((projectile, velocity, sprite, body)) = world.query_one_mut::<(
        &mut Projectile,
        &mut Velocity,
        &mut Sprite,
        &mut CollisionBody,
    )>(entity) else {
        return false;
    };

    let was_active = projectile.is_active();
    projectile.state = ProjectileState::Inactive;
    velocity.linear = DVec2::ZERO;
    sprite.set_visible(false);
    body.set_collision_enabled(false);
    was_active
}
