//! External stimuli sent to the simulation (input, AI, damage handlers).
//!
//! Commands are queued and processed at the next frame boundary.

use serde::{Deserialize, Serialize};

use crate::enums::CapabilityKind;
use crate::types::ActorId;

/// All actions an external driver can request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActorCommand {
    // --- Capabilities ---
    /// Fire the actor's weapon once.
    Fire { actor: ActorId },
    /// Raise the actor's shield. `None` uses the configured duration.
    ActivateShield {
        actor: ActorId,
        #[serde(default)]
        duration_ms: Option<f64>,
    },
    /// Drop the actor's shield immediately.
    DeactivateShield { actor: ActorId },
    /// Enable or disable one capability.
    SetCapabilityEnabled {
        actor: ActorId,
        capability: CapabilityKind,
        enabled: bool,
    },

    // --- Actors ---
    /// Place an actor (driven by input or the excluded tween layer).
    MoveActor {
        actor: ActorId,
        x: f64,
        y: f64,
        rotation: f64,
    },
    /// Tear an actor down (death). Its capabilities go with it.
    DespawnActor { actor: ActorId },

    // --- Simulation control ---
    Pause,
    Resume,
}
