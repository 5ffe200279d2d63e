//! Events emitted by the simulation for audio, UI, and diagnostics.

use serde::{Deserialize, Serialize};

use crate::enums::FireDropReason;
use crate::types::ActorId;

/// Something observable happened during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A weapon launched a pooled projectile.
    ProjectileFired { actor: ActorId, projectile: ActorId },
    /// A fire request was absorbed without a projectile.
    FireDropped {
        actor: ActorId,
        reason: FireDropReason,
    },
    /// A projectile left the play area and went back to its pool.
    ProjectileRecycled { projectile: ActorId },
    /// A shield came up, or restarted while already up.
    ShieldActivated {
        actor: ActorId,
        duration_ms: f64,
        restarted: bool,
    },
    /// A shield moved to its next warning phase.
    ShieldPhaseAdvanced { actor: ActorId, phase: usize },
    /// A shield ran its full duration.
    ShieldExpired { actor: ActorId },
    /// A shield was dropped explicitly before expiring.
    ShieldDeactivated { actor: ActorId },
    /// An actor was torn down.
    ActorDespawned { actor: ActorId },
}
