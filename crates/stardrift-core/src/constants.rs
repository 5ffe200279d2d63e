//! Simulation constants and tuning parameters.

/// Nominal frame rate (Hz).
pub const FRAME_RATE: u32 = 60;

/// Milliseconds per frame at the nominal rate.
pub const FRAME_MS: f64 = 1000.0 / FRAME_RATE as f64;

// --- Play area ---

/// Play area width in pixels.
pub const PLAY_AREA_WIDTH: f64 = 720.0;

/// Play area height in pixels.
pub const PLAY_AREA_HEIGHT: f64 = 1280.0;

// --- Projectile pools ---

/// Player shots in flight at once.
pub const PLAYER_POOL_CAPACITY: usize = 32;

/// Hostile shots in flight at once, shared by every enemy.
pub const HOSTILE_POOL_CAPACITY: usize = 64;

// --- Weapons ---

/// Player laser speed (px/s).
pub const PLAYER_LASER_SPEED: f64 = 900.0;

/// Hostile laser speed (px/s).
pub const HOSTILE_LASER_SPEED: f64 = 450.0;

/// Laser display length along the direction of travel.
pub const LASER_WIDTH: f64 = 37.0;

/// Laser display thickness.
pub const LASER_HEIGHT: f64 = 9.0;

/// Damage per laser hit.
pub const LASER_DAMAGE: f64 = 1.0;

/// Atlas frame for player lasers.
pub const PLAYER_LASER_FRAME: &str = "laserBlue02.png";

/// Atlas frame for hostile lasers.
pub const HOSTILE_LASER_FRAME: &str = "laserRed02.png";

// --- Shield ---

/// Default shield duration (ms).
pub const SHIELD_DURATION_MS: f64 = 1500.0;

/// Shield overlay frames, strongest first. One phase per frame.
pub const SHIELD_FRAMES: [&str; 3] = ["shield3.png", "shield2.png", "shield1.png"];

/// Shortest phase interval the scheduler is asked for (ms).
pub const SHIELD_MIN_PHASE_MS: f64 = 1.0;

// --- Actors ---

/// Player ship collision radius.
pub const PLAYER_RADIUS: f64 = 40.0;

/// Enemy ship collision radius.
pub const ENEMY_RADIUS: f64 = 36.0;

/// Distance of the player spawn point above the bottom edge.
pub const PLAYER_SPAWN_MARGIN: f64 = 160.0;

/// Band at the top of the play area where enemy formations spawn.
pub const ENEMY_SPAWN_BAND: f64 = 240.0;
