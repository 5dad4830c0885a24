//! Brick Bounce - A single-screen ball-and-paddle brick breaker
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (collisions, scoring, round phases)
//! - `config`: Round configuration and development presets
//! - `renderer`: Vertex generation and WebGPU pipeline
//! - `audio`: Sound effects triggered by simulation events
//! - `hud`: Text read-outs for the on-screen overlay

pub mod audio;
pub mod config;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod sim;

pub use config::{DevMode, GameConfig, TierStyle};
pub use error::ConfigError;

/// Milliseconds read from a monotonic clock by the frame driver
pub type Millis = u64;

/// Default tuning, matching the classic desktop layout
pub mod consts {
    /// Nominal frame cadence in milliseconds (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 640.0;

    /// Ball defaults
    pub const BALL_SPEED: f32 = 3.0; // pixels per tick, per axis
    pub const BALL_SIZE: f32 = 20.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Gap between paddle bottom and arena floor
    pub const PADDLE_FLOOR_GAP: f32 = 30.0;
    /// Collision box inflation relative to the drawn paddle
    pub const PADDLE_HITBOX_SCALE: f32 = 1.2;
    /// Autoplay paddle reaction delay
    pub const PADDLE_DELAY_MS: u64 = 250;
    /// Longest accepted reaction delay
    pub const MAX_PADDLE_DELAY_MS: u64 = 60_000;

    /// Brick defaults
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_COLS: u32 = 10;
    pub const TIER_COUNT: usize = 5;
    /// Points per tier, top row first
    pub const BRICK_POINTS: [u32; TIER_COUNT] = [5, 4, 3, 2, 1];
    /// Tier colors: red, orange, yellow, green, cyan
    pub const BRICK_COLORS: [[f32; 4]; TIER_COUNT] = [
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 0.647, 0.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
    ];

    /// Score bubble lifetime
    pub const BUBBLE_DURATION_MS: u64 = 1000;
}
