//! Game balance tuning
//!
//! Every number that shaped play across revisions of the game lives here so a
//! host can ship one consistent set. Defaults are the latest revision's values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::TokenKind;

/// Errors raised when loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("tuning file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    /// Platforms laid out before play starts (including the one under the player)
    pub max_visible_platforms: u32,
    /// Vertical gap between the player spawn and the first platform
    pub first_platform_offset: f32,
    /// Horizontal gap between the spawn and the second platform
    pub track_start_offset: f32,
    /// Horizontal step between platforms
    pub min_spacing_x: i32,
    pub max_spacing_x: i32,
    /// Allowed band for platform centres
    pub min_platform_y: f32,
    pub max_platform_y: f32,
    /// Vertical zig-zag step
    pub vertical_step_min: i32,
    pub vertical_step_max: i32,
    /// Padding between platforms (half on each box)
    pub overlap_buffer: f32,
    /// Placement attempts before a platform is skipped
    pub max_placement_attempts: u32,
    /// Forward nudge applied to X after an overlapping attempt
    pub nudge_min_x: i32,
    pub nudge_max_x: i32,
    /// Generate ahead while the player is within this many viewports of the frontier
    pub track_lookahead: f32,
    /// Entities further behind the camera than this many viewports are culled
    pub cull_distance: f32,

    // === Platform wear ===
    /// Landings before a platform starts fading
    pub wear_threshold: u32,
    /// Alpha removed per landing once fading
    pub wear_step: f32,

    // === Tokens ===
    pub basic_cap: usize,
    pub bonus_cap: usize,
    pub invincibility_cap: usize,
    /// Spawn chance per platform, in percent
    pub basic_chance: u8,
    pub bonus_chance: u8,
    pub invincibility_chance: u8,
    pub basic_value: u32,
    pub bonus_value: u32,
    /// Horizontal jitter around the platform centre
    pub token_jitter: i32,
    /// Height above the platform's top edge
    pub token_lift: f32,

    // === Obstacles ===
    pub obstacle_interval_ms: f32,
    pub obstacle_speed: f32,

    // === Hits ===
    pub hit_cooldown_ms: f32,
    pub hit_debounce_ms: f32,
    /// Length of the player's stun animation
    pub stun_ms: f32,
    /// Length of an obstacle's hit animation before it is destroyed
    pub obstacle_strike_ms: f32,
    /// Delay between the last life lost and game over
    pub game_over_delay_ms: f32,

    // === Invincibility ===
    pub invincibility_ms: f32,
    /// Remaining time at which the sprite starts flashing
    pub flash_start_ms: f32,
    pub flash_interval_ms: f32,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Track
            max_visible_platforms: 10,
            first_platform_offset: 100.0,
            track_start_offset: 50.0,
            min_spacing_x: 120,
            max_spacing_x: 220,
            min_platform_y: 150.0,
            max_platform_y: 550.0,
            vertical_step_min: 50,
            vertical_step_max: 180,
            overlap_buffer: 20.0,
            max_placement_attempts: 10,
            nudge_min_x: 10,
            nudge_max_x: 50,
            track_lookahead: 2.0,
            cull_distance: 1.5,

            // Wear
            wear_threshold: 2,
            wear_step: 0.25,

            // Tokens
            basic_cap: 12,
            bonus_cap: 2,
            invincibility_cap: 1,
            basic_chance: 50,
            bonus_chance: 50,
            invincibility_chance: 20,
            basic_value: 1,
            bonus_value: 3,
            token_jitter: 20,
            token_lift: 25.0,

            // Obstacles
            obstacle_interval_ms: 1500.0,
            obstacle_speed: 150.0,

            // Hits
            hit_cooldown_ms: 800.0,
            hit_debounce_ms: 100.0,
            stun_ms: 800.0,
            obstacle_strike_ms: 200.0,
            game_over_delay_ms: 100.0,

            // Invincibility
            invincibility_ms: 15_000.0,
            flash_start_ms: 2_000.0,
            flash_interval_ms: 500.0,

            // Lives
            starting_lives: 3,
            max_lives: 5,
        }
    }
}

impl Tuning {
    /// Concurrent cap for a token kind
    pub fn cap_for(&self, kind: TokenKind) -> usize {
        match kind {
            TokenKind::Basic => self.basic_cap,
            TokenKind::Bonus => self.bonus_cap,
            TokenKind::Invincibility => self.invincibility_cap,
        }
    }

    /// Spawn chance (percent) for a token kind
    pub fn chance_for(&self, kind: TokenKind) -> u8 {
        match kind {
            TokenKind::Basic => self.basic_chance,
            TokenKind::Bonus => self.bonus_chance,
            TokenKind::Invincibility => self.invincibility_chance,
        }
    }

    /// Reject values the generators and timers cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.max_visible_platforms == 0 {
            return invalid("max_visible_platforms", "must be at least 1");
        }
        if self.min_spacing_x <= 0 || self.min_spacing_x > self.max_spacing_x {
            return invalid("min_spacing_x", "must be positive and <= max_spacing_x");
        }
        if self.min_platform_y > self.max_platform_y {
            return invalid("min_platform_y", "must be <= max_platform_y");
        }
        if self.vertical_step_min < 0 || self.vertical_step_min > self.vertical_step_max {
            return invalid("vertical_step_min", "must be non-negative and <= vertical_step_max");
        }
        if self.overlap_buffer < 0.0 {
            return invalid("overlap_buffer", "must be non-negative");
        }
        if self.max_placement_attempts == 0 {
            return invalid("max_placement_attempts", "must be at least 1");
        }
        if self.nudge_min_x < 0 || self.nudge_min_x > self.nudge_max_x {
            return invalid("nudge_min_x", "must be non-negative and <= nudge_max_x");
        }
        if self.wear_step <= 0.0 {
            return invalid("wear_step", "must be positive");
        }
        if [self.basic_chance, self.bonus_chance, self.invincibility_chance]
            .iter()
            .any(|c| *c > 100)
        {
            return invalid("token chance", "must be a percentage (0-100)");
        }
        if self.obstacle_interval_ms <= 0.0 {
            return invalid("obstacle_interval_ms", "must be positive");
        }
        if self.flash_interval_ms <= 0.0 {
            return invalid("flash_interval_ms", "must be positive");
        }
        if self.flash_start_ms > self.invincibility_ms {
            return invalid("flash_start_ms", "must not exceed invincibility_ms");
        }
        if self.max_lives == 0 || self.starting_lives == 0 || self.starting_lives > self.max_lives
        {
            return invalid("starting_lives", "must be in 1..=max_lives");
        }
        Ok(())
    }

    /// Parse and validate tuning JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write tuning to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> Result<(), TuningError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Tuning saved to {}", path.as_ref().display());
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "junker_run_tuning";

    /// Load tuning from LocalStorage (WASM only). Falls back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Tuning saved"),
                    Err(e) => log::warn!("Failed to save tuning: {e:?}"),
                },
                Err(e) => log::warn!("Failed to serialize tuning: {e}"),
            }
        }
    }
}
