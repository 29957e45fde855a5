//! Target Range - A 2D target-shooting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectile physics, collisions, session state)
//! - `game`: Owned session instance with timers, input entry points and score saving
//! - `autopilot`: Idle/demo driver that plays the game by itself
//! - `highscores`: Score records, the store interface and the leaderboard view
//! - `persistence`: File-backed score table
//! - `settings`: Runtime preferences

pub mod autopilot;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{HighScores, ScoreStore};
pub use settings::Settings;

use std::time::{SystemTime, UNIX_EPOCH};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Play area (y grows upward, origin bottom-left)
    pub const SCREEN_WIDTH: f64 = 1024.0;
    pub const SCREEN_HEIGHT: f64 = 768.0;

    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    pub const SIM_DT: f64 = 1.0 / TICK_RATE as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Vertical acceleration on cannon rounds (units/s², negative = down)
    pub const GRAVITY: f64 = -100.0;

    /// Muzzle speeds (units/s). The cannon uses the configurable bullet speed.
    pub const DEFAULT_BULLET_SPEED: f64 = 300.0;
    pub const PISTOL_VEL: f64 = 500.0;
    pub const LASER_VEL: f64 = 600.0;
    /// Maximum distance a laser round can travel
    pub const LASER_DIST: f64 = 500.0;

    /// Round sizes (w, h)
    pub const CANNON_ROUND_SIZE: (f64, f64) = (35.0, 35.0);
    pub const SMALL_ROUND_SIZE: (f64, f64) = (30.0, 20.0);
    /// Seconds an embedded pistol round stays in the stone
    pub const EMBED_LIFETIME: f64 = 1.0;

    /// World objects
    pub const OBJECT_SIZE: f64 = 100.0;
    pub const SPAWN_MARGIN: f64 = 200.0;
    pub const DEFAULT_HAZARD_COUNT: usize = 1;

    /// Session timing
    pub const GAME_TIME: i32 = 60;
    pub const COUNTDOWN_INTERVAL: f64 = 1.0;
    pub const EXPLOSION_DURATION: f64 = 0.5;

    /// Aim limits (degrees) and hold-to-rotate rate
    pub const MIN_AIM_ANGLE: f64 = -45.0;
    pub const MAX_AIM_ANGLE: f64 = 80.0;
    pub const AIM_STEP: f64 = 1.0;
    pub const AIM_STEP_INTERVAL: f64 = 0.01;
}

/// Unit vector scaled to `speed` along `angle_deg` (0° = right, 90° = up)
#[inline]
pub fn velocity_from_angle(angle_deg: f64, speed: f64) -> DVec2 {
    let rad = angle_deg.to_radians();
    DVec2::new(rad.cos(), rad.sin()) * speed
}

/// Seconds since the Unix epoch (0 if the clock is before it)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_timestamp(unix_secs: u64) -> String {
    let days = (unix_secs / 86_400) as i64;
    let secs = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian calendar
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
