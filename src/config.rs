//! Round configuration and development presets
//!
//! A `GameConfig` is fixed for the lifetime of a round. Browser builds persist
//! it in LocalStorage; native builds read it from a JSON file.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Development presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DevMode {
    /// Small grid, pointer-controlled paddle
    One,
    /// Small grid, paddle tracks the ball on a delay
    Two,
    /// Full grid, tracking paddle, round timer shown
    #[default]
    Three,
}

impl DevMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevMode::One => "1",
            DevMode::Two => "2",
            DevMode::Three => "3",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1" | "one" => Some(DevMode::One),
            "2" | "two" => Some(DevMode::Two),
            "3" | "three" => Some(DevMode::Three),
            _ => None,
        }
    }

    /// Brick grid (rows, cols) for this preset
    pub fn grid(&self) -> (u32, u32) {
        match self {
            DevMode::One | DevMode::Two => (1, 5),
            DevMode::Three => (BRICK_ROWS, BRICK_COLS),
        }
    }

    /// Whether the paddle follows the ball instead of the pointer
    pub fn paddle_tracking(&self) -> bool {
        !matches!(self, DevMode::One)
    }
}

/// Color and score for one brick tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub color: [f32; 4],
    pub points: u32,
}

fn default_tiers() -> [TierStyle; TIER_COUNT] {
    std::array::from_fn(|i| TierStyle {
        color: BRICK_COLORS[i],
        points: BRICK_POINTS[i],
    })
}

/// Everything needed to lay out and run a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Preset this config was derived from (shown in the HUD)
    pub dev_mode: DevMode,

    pub arena_width: f32,
    pub arena_height: f32,

    /// Per-axis ball speed in pixels per tick
    pub ball_speed: f32,
    /// Ball diameter
    pub ball_size: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_floor_gap: f32,
    /// Collision box size relative to the drawn paddle (forgiveness padding)
    pub paddle_hitbox_scale: Vec2,
    /// Paddle follows the ball instead of the pointer
    pub paddle_tracking: bool,
    /// Reaction delay for the tracking paddle
    pub paddle_delay_ms: u64,

    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_height: f32,
    /// Tier table, top row first
    pub tiers: [TierStyle; TIER_COUNT],

    pub bubble_duration_ms: u64,

    /// Show elapsed round time in the HUD
    pub show_timer: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_preset(DevMode::default())
    }
}

impl GameConfig {
    /// Create a config from a development preset
    pub fn from_preset(mode: DevMode) -> Self {
        let (brick_rows, brick_cols) = mode.grid();
        let hitbox = if mode.paddle_tracking() {
            PADDLE_HITBOX_SCALE
        } else {
            1.0
        };

        Self {
            dev_mode: mode,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ball_speed: BALL_SPEED,
            ball_size: BALL_SIZE,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_floor_gap: PADDLE_FLOOR_GAP,
            paddle_hitbox_scale: Vec2::splat(hitbox),
            paddle_tracking: mode.paddle_tracking(),
            paddle_delay_ms: PADDLE_DELAY_MS,
            brick_rows,
            brick_cols,
            brick_height: BRICK_HEIGHT,
            tiers: default_tiers(),
            bubble_duration_ms: BUBBLE_DURATION_MS,
            show_timer: mode == DevMode::Three,
        }
    }

    /// Brick width (columns share the arena width evenly)
    pub fn brick_width(&self) -> f32 {
        self.arena_width / self.brick_cols as f32
    }

    /// Top edge of the paddle
    pub fn paddle_y(&self) -> f32 {
        self.arena_height - self.paddle_height - self.paddle_floor_gap
    }

    /// Reject configurations that would produce a degenerate round
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.arena_width) || !positive(self.arena_height) {
            return Err(ConfigError::ArenaSize {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !positive(self.ball_speed) {
            return Err(ConfigError::BallSpeed {
                speed: self.ball_speed,
            });
        }
        if !positive(self.ball_size) {
            return Err(ConfigError::BallSize {
                size: self.ball_size,
            });
        }
        if self.ball_size >= self.arena_width || self.ball_size >= self.arena_height {
            return Err(ConfigError::BallTooLarge {
                size: self.ball_size,
                arena_width: self.arena_width,
                arena_height: self.arena_height,
            });
        }
        if !positive(self.paddle_width) || !positive(self.paddle_height) {
            return Err(ConfigError::PaddleSize {
                width: self.paddle_width,
                height: self.paddle_height,
            });
        }
        if self.paddle_width > self.arena_width {
            return Err(ConfigError::PaddleTooWide {
                width: self.paddle_width,
                arena_width: self.arena_width,
            });
        }
        if !self.paddle_floor_gap.is_finite() || self.paddle_floor_gap < 0.0 {
            return Err(ConfigError::PaddleFloorGap {
                gap: self.paddle_floor_gap,
            });
        }
        if !positive(self.paddle_hitbox_scale.x) || !positive(self.paddle_hitbox_scale.y) {
            return Err(ConfigError::PaddleHitboxScale {
                x: self.paddle_hitbox_scale.x,
                y: self.paddle_hitbox_scale.y,
            });
        }
        if self.paddle_delay_ms > MAX_PADDLE_DELAY_MS {
            return Err(ConfigError::PaddleDelay {
                delay: self.paddle_delay_ms,
            });
        }
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(ConfigError::BrickGrid {
                rows: self.brick_rows,
                cols: self.brick_cols,
            });
        }
        if !positive(self.brick_height) {
            return Err(ConfigError::BrickHeight {
                height: self.brick_height,
            });
        }
        if self.brick_rows as f32 * self.brick_height >= self.paddle_y() {
            return Err(ConfigError::BricksOverflowArena {
                rows: self.brick_rows,
                height: self.brick_height,
                arena_height: self.arena_height,
            });
        }
        if self.bubble_duration_ms == 0 {
            return Err(ConfigError::BubbleDuration);
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take preset defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "brick_bounce_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Read and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }
}
