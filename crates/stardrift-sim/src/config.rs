//! Simulation configuration.

use serde::{Deserialize, Serialize};

use stardrift_core::constants::*;
use stardrift_core::types::{PlayArea, ProjectileSkins, WeaponConfig};

use crate::error::{SimError, SimResult};

/// Shield tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Duration used when an activation request names none (ms).
    pub duration_ms: f64,
    /// Overlay frames, one per warning phase.
    pub frames: Vec<String>,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            duration_ms: SHIELD_DURATION_MS,
            frames: SHIELD_FRAMES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Frame length used by `SimulationEngine::tick` (ms).
    pub frame_ms: f64,
    pub play_area: PlayArea,
    /// Player projectiles that may be in flight at once.
    pub player_pool_capacity: usize,
    /// Hostile projectiles that may be in flight at once.
    pub hostile_pool_capacity: usize,
    pub player_weapon: WeaponConfig,
    pub hostile_weapon: WeaponConfig,
    pub shield: ShieldConfig,
    pub skins: ProjectileSkins,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frame_ms: FRAME_MS,
            play_area: PlayArea::new(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT),
            player_pool_capacity: PLAYER_POOL_CAPACITY,
            hostile_pool_capacity: HOSTILE_POOL_CAPACITY,
            player_weapon: WeaponConfig {
                speed: PLAYER_LASER_SPEED,
                width: LASER_WIDTH,
                height: LASER_HEIGHT,
                damage: LASER_DAMAGE,
            },
            hostile_weapon: WeaponConfig {
                speed: HOSTILE_LASER_SPEED,
                width: LASER_WIDTH,
                height: LASER_HEIGHT,
                damage: LASER_DAMAGE,
            },
            shield: ShieldConfig::default(),
            skins: ProjectileSkins::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    ///
    /// Weapon and shield problems are not rejected here: the engine still
    /// starts and the affected capabilities come up inert.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(SimError::Config(format!(
                "frame_ms must be positive, got {}",
                self.frame_ms
            )));
        }
        if !(self.play_area.width > 0.0 && self.play_area.height > 0.0) {
            return Err(SimError::Config(format!(
                "play area must have positive size, got {}x{}",
                self.play_area.width, self.play_area.height
            )));
        }
        if !(self.shield.duration_ms.is_finite() && self.shield.duration_ms > 0.0) {
            return Err(SimError::Config(format!(
                "shield duration must be positive, got {}",
                self.shield.duration_ms
            )));
        }
        Ok(())
    }

    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the frame length used by `tick`.
    pub fn with_frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    pub fn with_play_area(mut self, play_area: PlayArea) -> Self {
        self.play_area = play_area;
        self
    }

    /// Set both pool capacities.
    pub fn with_pool_capacities(mut self, player: usize, hostile: usize) -> Self {
        self.player_pool_capacity = player;
        self.hostile_pool_capacity = hostile;
        self
    }

    pub fn with_player_weapon(mut self, weapon: WeaponConfig) -> Self {
        self.player_weapon = weapon;
        self
    }

    pub fn with_hostile_weapon(mut self, weapon: WeaponConfig) -> Self {
        self.hostile_weapon = weapon;
        self
    }

    pub fn with_shield(mut self, shield: ShieldConfig) -> Self {
        self.shield = shield;
        self
    }
}
