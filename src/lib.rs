//! Junker Run - an endless side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, tokens, hazards, hit resolution)
//! - `tuning`: Data-driven game balance
//! - `leaderboard`: Remote global leaderboard
//! - `web`: Browser bindings (wasm32 only)

pub mod leaderboard;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use leaderboard::{LeaderboardClient, LeaderboardEntry, LeaderboardError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, the browser frame rate)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible play area (the HUD strip below it is not part of the world)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;
    /// Horizontal world extent; the camera never scrolls past it
    pub const WORLD_WIDTH: f32 = 200_000.0;

    /// World gravity (units/s², +y is down)
    pub const GRAVITY: f32 = 300.0;

    /// Player spawn point
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 450.0;
    /// Player body footprint at scale 1.0
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Horizontal run speed (units/s)
    pub const PLAYER_SPEED: f32 = 160.0;
    /// Upward speed applied on any vertical platform contact (units/s)
    pub const JUMP_SPEED: f32 = 330.0;
    /// Player scale while the invincible sprite is shown
    pub const INVINCIBLE_SCALE: f32 = 1.5;

    /// Token body footprint
    pub const TOKEN_SIZE: f32 = 32.0;
    /// Obstacle body footprint
    pub const OBSTACLE_SIZE: f32 = 64.0;
    /// Obstacles spawn and cull this far outside the visible band
    pub const OBSTACLE_MARGIN: f32 = 50.0;

    /// Camera follow smoothing (fraction of the gap closed per tick)
    pub const CAMERA_LERP: f32 = 0.1;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
