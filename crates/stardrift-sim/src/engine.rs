//! Simulation engine: the frame loop of the arcade core.
//!
//! `SimulationEngine` owns the hecs world, the projectile pools, and the
//! timer queue. It processes actor commands at frame boundaries, runs the
//! systems, and produces `SimSnapshot`s. Headless, so every frame is
//! reproducible from the config seed.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::DVec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use stardrift_core::commands::ActorCommand;
use stardrift_core::components::{Actor, CollisionBody, Transform};
use stardrift_core::enums::{CapabilityKind, Faction, RunPhase};
use stardrift_core::events::SimEvent;
use stardrift_core::state::SimSnapshot;
use stardrift_core::types::{ActorId, SimTime, WeaponConfig};

use crate::capability::{self, Capability};
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::ids::{actor_id, entity_of};
use crate::pool::{PoolId, PoolMember, Pools};
use crate::scheduler::TimerQueue;
use crate::shield::{Shield, ShieldOutcome, ShieldTimer};
use crate::systems;
use crate::weapon::{FireOutcome, FireSource, Weapon};
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: RunPhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    timers: TimerQueue<ShieldTimer>,
    pools: Pools,
    player_pool: PoolId,
    hostile_pool: PoolId,
    player_weapon: Arc<WeaponConfig>,
    hostile_weapon: Arc<WeaponConfig>,
    shield_frames: Arc<[Arc<str>]>,
    command_queue: VecDeque<ActorCommand>,
    recycle_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    ///
    /// Both projectile pools are filled up front. Invalid weapon tuning does
    /// not fail here; weapons built from it come up inert.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        let mut pools = Pools::default();
        let player_pool = pools.create(&mut world, config.player_pool_capacity);
        let hostile_pool = pools.create(&mut world, config.hostile_pool_capacity);
        let shield_frames: Arc<[Arc<str>]> = config
            .shield
            .frames
            .iter()
            .map(|frame| Arc::from(frame.as_str()))
            .collect();

        log::debug!(
            "engine ready: seed {}, pools {}/{}, {} shield phases",
            config.seed,
            config.player_pool_capacity,
            config.hostile_pool_capacity,
            shield_frames.len()
        );

        Self {
            world,
            time: SimTime::default(),
            phase: RunPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            timers: TimerQueue::new(),
            pools,
            player_pool,
            hostile_pool,
            player_weapon: Arc::new(config.player_weapon.clone()),
            hostile_weapon: Arc::new(config.hostile_weapon.clone()),
            shield_frames,
            command_queue: VecDeque::new(),
            recycle_buffer: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Validate `config` before building the engine.
    pub fn try_new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: ActorCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = ActorCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one frame of the configured length.
    pub fn tick(&mut self) -> SimSnapshot {
        self.step(self.config.frame_ms)
    }

    /// Advance the simulation by `delta_ms` and return the resulting snapshot.
    ///
    /// Commands are applied first, then (while running) timers due by the new
    /// time fire, capabilities tick, everything moves, stray projectiles are
    /// recycled, and shield overlays catch up with their owners.
    pub fn step(&mut self, delta_ms: f64) -> SimSnapshot {
        self.process_commands();

        if self.phase == RunPhase::Running {
            let delta_ms = delta_ms.max(0.0);
            self.time.advance(delta_ms);
            self.run_systems(delta_ms);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.phase, &self.pools, events)
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn player_pool(&self) -> PoolId {
        self.player_pool
    }

    pub fn hostile_pool(&self) -> PoolId {
        self.hostile_pool
    }

    pub fn timers(&self) -> &TimerQueue<ShieldTimer> {
        &self.timers
    }

    // --- Spawning ---

    /// A weapon wired to the pool and tuning of `faction`.
    pub fn weapon_for(&self, faction: Faction) -> Weapon {
        match faction {
            Faction::Player => Weapon::new(Some(self.player_pool), Some(self.player_weapon.clone())),
            Faction::Hostile => {
                Weapon::new(Some(self.hostile_pool), Some(self.hostile_weapon.clone()))
            }
        }
    }

    /// A fresh shield using the configured overlay frames.
    pub fn new_shield(&self) -> Shield {
        Shield::new(self.shield_frames.clone())
    }

    pub fn spawn_player(&mut self) -> Entity {
        let weapon = self.weapon_for(Faction::Player);
        let shield = self.new_shield();
        world_setup::spawn_player(&mut self.world, &self.config.play_area, weapon, shield)
    }

    pub fn spawn_enemy(&mut self, position: DVec2) -> Entity {
        let weapon = self.weapon_for(Faction::Hostile);
        world_setup::spawn_enemy(&mut self.world, position, weapon)
    }

    /// Spawn `count` enemies along the top of the play area, placed by the
    /// seeded RNG.
    pub fn spawn_enemy_formation(&mut self, count: usize) -> Vec<Entity> {
        let weapon = self.weapon_for(Faction::Hostile);
        world_setup::spawn_enemy_formation(
            &mut self.world,
            &mut self.rng,
            &self.config.play_area,
            count,
            || weapon.clone(),
        )
    }

    /// Spawn an actor with no capabilities.
    pub fn spawn_actor(&mut self, faction: Faction, transform: Transform, radius: f64) -> Entity {
        world_setup::spawn_actor(&mut self.world, faction, transform, radius)
    }

    /// Attach (or replace) a capability on an existing actor.
    ///
    /// A shield being replaced is deactivated first, restoring the owner's
    /// collision body and cancelling its timers.
    pub fn attach<C: Capability>(&mut self, actor: Entity, capability: C) -> SimResult<()> {
        if !self.world.contains(actor) {
            return Err(SimError::UnknownActor(actor_id(actor)));
        }
        if C::KIND == CapabilityKind::Shield {
            self.deactivate_shield(actor);
        }
        self.world
            .insert_one(actor, capability)
            .map_err(|_| SimError::UnknownActor(actor_id(actor)))
    }

    /// Look up a capability of type `C` on `actor`.
    pub fn capability<C: Capability>(&self, actor: Entity) -> Option<hecs::Ref<'_, C>> {
        self.world.get::<&C>(actor).ok()
    }

    /// Remove an actor. An active shield is torn down first so none of its
    /// timers outlive it. Pooled projectiles cannot be despawned.
    pub fn despawn_actor(&mut self, actor: Entity) -> bool {
        if self.world.get::<&PoolMember>(actor).is_ok() {
            log::warn!("refusing to despawn pooled projectile {actor:?}");
            return false;
        }
        self.deactivate_shield(actor);
        if self.world.despawn(actor).is_err() {
            return false;
        }
        self.events.push(SimEvent::ActorDespawned {
            actor: actor_id(actor),
        });
        true
    }

    pub fn set_transform(&mut self, actor: Entity, position: DVec2, rotation: f64) -> SimResult<()> {
        let mut transform = self
            .world
            .get::<&mut Transform>(actor)
            .map_err(|_| SimError::UnknownActor(actor_id(actor)))?;
        transform.position = position;
        transform.rotation = rotation;
        Ok(())
    }

    // --- Capability actions ---

    /// Fire `actor`'s weapon. `None` when the actor has no weapon.
    pub fn fire(&mut self, actor: Entity) -> Option<FireOutcome> {
        let weapon = Weapon::clone(&*self.world.get::<&Weapon>(actor).ok()?);
        let source = {
            let transform = self.world.get::<&Transform>(actor).ok()?;
            let body = self.world.get::<&Actor>(actor).ok()?;
            FireSource::from_actor(&transform, &body)
        };

        let outcome = weapon.fire(&source, &mut self.pools, &mut self.world, &self.config.skins);
        let id = actor_id(actor);
        match outcome {
            FireOutcome::Fired(projectile) => self.events.push(SimEvent::ProjectileFired {
                actor: id,
                projectile: actor_id(projectile),
            }),
            _ => {
                if let Some(reason) = outcome.drop_reason() {
                    self.events.push(SimEvent::FireDropped { actor: id, reason });
                }
            }
        }
        Some(outcome)
    }

    /// Raise (or restart) `actor`'s shield. `duration_ms` falls back to the
    /// configured duration. `None` when the actor has no shield.
    pub fn activate_shield(&mut self, actor: Entity, duration_ms: Option<f64>) -> Option<ShieldOutcome> {
        let duration_ms = duration_ms.unwrap_or(self.config.shield.duration_ms);
        let now_ms = self.time.elapsed_ms;
        let (shield, body) = self
            .world
            .query_one_mut::<(&mut Shield, Option<&mut CollisionBody>)>(actor)
            .ok()?;
        let outcome = shield.activate(actor, duration_ms, now_ms, &mut self.timers, body);

        match outcome {
            ShieldOutcome::Activated | ShieldOutcome::Restarted => {
                self.events.push(SimEvent::ShieldActivated {
                    actor: actor_id(actor),
                    duration_ms,
                    restarted: outcome == ShieldOutcome::Restarted,
                });
            }
            ShieldOutcome::Disabled | ShieldOutcome::Inert => {
                log::debug!("shield on {actor:?} did not activate: {outcome:?}");
            }
        }
        Some(outcome)
    }

    /// Drop `actor`'s shield early. Returns whether it was up.
    pub fn deactivate_shield(&mut self, actor: Entity) -> bool {
        let Ok((shield, body)) = self
            .world
            .query_one_mut::<(&mut Shield, Option<&mut CollisionBody>)>(actor)
        else {
            return false;
        };
        let dropped = shield.deactivate(&mut self.timers, body);
        if dropped {
            self.events.push(SimEvent::ShieldDeactivated {
                actor: actor_id(actor),
            });
        }
        dropped
    }

    /// Toggle one capability. Returns false when the actor lacks it.
    pub fn set_capability_enabled(
        &mut self,
        actor: Entity,
        kind: CapabilityKind,
        enabled: bool,
    ) -> bool {
        match kind {
            CapabilityKind::Weapon => capability::set_enabled::<Weapon>(&mut self.world, actor, enabled),
            CapabilityKind::Shield => capability::set_enabled::<Shield>(&mut self.world, actor, enabled),
        }
    }

    // --- Frame internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: ActorCommand) {
        match command {
            ActorCommand::Fire { actor } => {
                if let Some(entity) = self.resolve(actor) {
                    if self.fire(entity).is_none() {
                        log::warn!("{actor} has no weapon");
                    }
                }
            }
            ActorCommand::ActivateShield { actor, duration_ms } => {
                if let Some(entity) = self.resolve(actor) {
                    if self.activate_shield(entity, duration_ms).is_none() {
                        log::warn!("{actor} has no shield");
                    }
                }
            }
            ActorCommand::DeactivateShield { actor } => {
                if let Some(entity) = self.resolve(actor) {
                    self.deactivate_shield(entity);
                }
            }
            ActorCommand::SetCapabilityEnabled {
                actor,
                capability,
                enabled,
            } => {
                if let Some(entity) = self.resolve(actor) {
                    if !self.set_capability_enabled(entity, capability, enabled) {
                        log::warn!("{actor} has no {capability:?} capability");
                    }
                }
            }
            ActorCommand::MoveActor {
                actor,
                x,
                y,
                rotation,
            } => {
                if let Some(entity) = self.resolve(actor) {
                    if let Err(err) = self.set_transform(entity, DVec2::new(x, y), rotation) {
                        log::warn!("move ignored: {err}");
                    }
                }
            }
            ActorCommand::DespawnActor { actor } => {
                if let Some(entity) = self.resolve(actor) {
                    self.despawn_actor(entity);
                }
            }
            ActorCommand::Pause => {
                self.phase = RunPhase::Paused;
            }
            ActorCommand::Resume => {
                self.phase = RunPhase::Running;
            }
        }
    }

    /// Map an external id to a live entity, logging when it names nothing.
    fn resolve(&self, actor: ActorId) -> Option<Entity> {
        let entity = entity_of(actor).filter(|entity| self.world.contains(*entity));
        if entity.is_none() {
            log::warn!("command for unknown {actor} ignored");
        }
        entity
    }

    fn run_systems(&mut self, delta_ms: f64) {
        let elapsed_ms = self.time.elapsed_ms;

        // 1. Timers due by the new frame boundary
        self.run_timers();

        // 2. Capability ticks
        systems::capabilities::run(&mut self.world, elapsed_ms, delta_ms);

        // 3. Movement
        systems::movement::run(&mut self.world, delta_ms);

        // 4. Projectiles past the edge go back to their pool
        systems::cleanup::run(
            &mut self.world,
            &self.config.play_area,
            &mut self.recycle_buffer,
            &mut self.events,
        );

        // 5. Shield overlays follow their owners
        systems::movement::sync_overlays(&mut self.world);
    }

    /// Fire every timer due at the current time, earliest first. Timers whose
    /// owner is gone, or that a restart superseded, are dropped.
    fn run_timers(&mut self) {
        self.timers.advance_to(self.time.elapsed_ms);

        while let Some(fired) = self.timers.pop_due() {
            match fired.event {
                ShieldTimer::Phase(owner) => {
                    let Ok(mut shield) = self.world.get::<&mut Shield>(owner) else {
                        continue;
                    };
                    if let Some(phase) = shield.advance_phase(fired.handle) {
                        self.events.push(SimEvent::ShieldPhaseAdvanced {
                            actor: actor_id(owner),
                            phase,
                        });
                    }
                }
                ShieldTimer::Expire(owner) => {
                    let Ok((shield, body)) = self
                        .world
                        .query_one_mut::<(&mut Shield, Option<&mut CollisionBody>)>(owner)
                    else {
                        continue;
                    };
                    if shield.expire(fired.handle, &mut self.timers, body) {
                        self.events.push(SimEvent::ShieldExpired {
                            actor: actor_id(owner),
                        });
                    }
                }
            }
        }
    }
}
