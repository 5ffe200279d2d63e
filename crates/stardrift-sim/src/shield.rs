//! Shield capability: a timed, phased defensive ability.
//!
//! While up, the owner's collision body stops responding and an overlay
//! cycles through its warning frames. The shield owns two timer handles and
//! cancels them at every transition, so a restart or teardown can never let
//! an old expiry re-enable collision early.

use std::sync::Arc;

use hecs::Entity;

use stardrift_core::components::{CollisionBody, Sprite, Transform};
use stardrift_core::constants::SHIELD_MIN_PHASE_MS;
use stardrift_core::enums::CapabilityKind;
use stardrift_core::handles::{CollisionHandle, RenderHandle};

use crate::capability::Capability;
use crate::scheduler::{Scheduler, TimerHandle};

/// Timer payloads scheduled by shields. Carries the owning actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldTimer {
    Phase(Entity),
    Expire(Entity),
}

/// What an activation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldOutcome {
    /// Came up from inactive.
    Activated,
    /// Was already up; timers and phase restarted, collision stayed off.
    Restarted,
    /// The capability is disabled; nothing happened.
    Disabled,
    /// Built without frames; nothing happened.
    Inert,
}

#[derive(Debug, Clone)]
pub struct Shield {
    enabled: bool,
    active: bool,
    phase_index: usize,
    remaining_ms: f64,
    expires_at_ms: f64,
    phase_timer: Option<TimerHandle>,
    expire_timer: Option<TimerHandle>,
    frames: Arc<[Arc<str>]>,
    overlay: Sprite,
}

impl Shield {
    /// Build a shield with one warning phase per overlay frame.
    pub fn new(frames: Arc<[Arc<str>]>) -> Self {
        if frames.is_empty() {
            log::error!("shield built without overlay frames; it will never activate");
        }
        let overlay = Sprite {
            frame: frames.first().cloned(),
            ..Sprite::default()
        };

        Self {
            enabled: true,
            active: false,
            phase_index: 0,
            remaining_ms: 0.0,
            expires_at_ms: 0.0,
            phase_timer: None,
            expire_timer: None,
            frames,
            overlay,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_inert(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase_count(&self) -> usize {
        self.frames.len()
    }

    /// Time left in the current activation, as of the last tick.
    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    pub fn expires_at_ms(&self) -> Option<f64> {
        self.active.then_some(self.expires_at_ms)
    }

    pub fn overlay(&self) -> &Sprite {
        &self.overlay
    }

    pub fn phase_timer(&self) -> Option<TimerHandle> {
        self.phase_timer
    }

    pub fn expire_timer(&self) -> Option<TimerHandle> {
        self.expire_timer
    }

    /// Raise the shield for `duration_ms`, or restart it if already up.
    ///
    /// `body` is the owner's collision body; without one the shield is
    /// cosmetic.
    pub fn activate<S: Scheduler<ShieldTimer>>(
        &mut self,
        owner: Entity,
        duration_ms: f64,
        now_ms: f64,
        scheduler: &mut S,
        body: Option<&mut CollisionBody>,
    ) -> ShieldOutcome {
        if !self.enabled {
            return ShieldOutcome::Disabled;
        }
        if self.frames.is_empty() {
            return ShieldOutcome::Inert;
        }

        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            log::warn!("shield duration {duration_ms} is not positive, using {SHIELD_MIN_PHASE_MS} ms");
            SHIELD_MIN_PHASE_MS
        };

        let restarted = self.active;
        if restarted {
            // Collision stays off across the restart.
            self.cancel_timers(scheduler);
        } else {
            match body {
                Some(body) => body.set_collision_enabled(false),
                None => log::debug!("shield owner {owner:?} has no collision body, shield is cosmetic"),
            }
        }

        self.active = true;
        self.phase_index = 0;
        self.remaining_ms = duration_ms;
        self.expires_at_ms = now_ms + duration_ms;
        self.overlay.set_frame(self.frames[0].clone());
        self.overlay.set_visible(true);

        let steps = self.frames.len();
        if steps > 1 {
            let step_ms = (duration_ms / steps as f64).floor().max(SHIELD_MIN_PHASE_MS);
            self.phase_timer = Some(scheduler.schedule_repeating(
                step_ms,
                (steps - 1) as u32,
                ShieldTimer::Phase(owner),
            ));
        }
        self.expire_timer = Some(scheduler.schedule_once(duration_ms, ShieldTimer::Expire(owner)));

        if restarted {
            ShieldOutcome::Restarted
        } else {
            ShieldOutcome::Activated
        }
    }

    /// Handle a fired phase timer. Returns the new phase index, or `None` if
    /// the timer is not this shield's current one.
    pub fn advance_phase(&mut self, handle: TimerHandle) -> Option<usize> {
        if !self.active || self.phase_timer != Some(handle) {
            return None;
        }
        if self.phase_index + 1 >= self.frames.len() {
            return None;
        }
        self.phase_index += 1;
        self.overlay.set_frame(self.frames[self.phase_index].clone());
        Some(self.phase_index)
    }

    /// Handle a fired expiry timer. Returns whether the shield went down.
    pub fn expire<S: Scheduler<ShieldTimer>>(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut S,
        body: Option<&mut CollisionBody>,
    ) -> bool {
        if !self.active || self.expire_timer != Some(handle) {
            return false;
        }
        self.expire_timer = None;
        self.deactivate(scheduler, body)
    }

    /// Drop the shield now and cancel both timers.
    ///
    /// Works whether or not the capability is enabled. Returns whether the
    /// shield was up.
    pub fn deactivate<S: Scheduler<ShieldTimer>>(
        &mut self,
        scheduler: &mut S,
        body: Option<&mut CollisionBody>,
    ) -> bool {
        self.cancel_timers(scheduler);
        if !self.active {
            return false;
        }

        self.active = false;
        self.phase_index = 0;
        self.remaining_ms = 0.0;
        self.overlay.set_visible(false);
        if let Some(body) = body {
            body.set_collision_enabled(true);
        }
        true
    }

    /// Keep the overlay on top of its owner.
    pub fn follow(&mut self, owner: &Transform) {
        self.overlay.set_position(owner.position);
        self.overlay.set_rotation(owner.rotation);
    }

    fn cancel_timers<S: Scheduler<ShieldTimer>>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.phase_timer.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.expire_timer.take() {
            scheduler.cancel(handle);
        }
    }
}

impl Capability for Shield {
    const KIND: CapabilityKind = CapabilityKind::Shield;

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling blocks new activations only. A shield already up keeps
    /// running until it expires or is deactivated.
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn tick(&mut self, time_elapsed_ms: f64, _delta_ms: f64) {
        if self.active {
            self.remaining_ms = (self.expires_at_ms - time_elapsed_ms).max(0.0);
        }
    }
}
