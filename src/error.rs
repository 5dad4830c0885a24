//! Configuration errors
//!
//! The simulation itself has no failure modes once a round is running; every
//! degenerate setup is rejected here before entities are built.

use core::fmt;

use crate::consts::MAX_PADDLE_DELAY_MS;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ArenaSize { width: f32, height: f32 },
    BallSpeed { speed: f32 },
    BallSize { size: f32 },
    BallTooLarge { size: f32, arena_width: f32, arena_height: f32 },
    PaddleSize { width: f32, height: f32 },
    PaddleTooWide { width: f32, arena_width: f32 },
    PaddleFloorGap { gap: f32 },
    PaddleHitboxScale { x: f32, y: f32 },
    PaddleDelay { delay: u64 },
    BrickGrid { rows: u32, cols: u32 },
    BrickHeight { height: f32 },
    BricksOverflowArena { rows: u32, height: f32, arena_height: f32 },
    BubbleDuration,
    Parse(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArenaSize { width, height } => {
                write!(f, "arena must be positive and finite, got {width}x{height}")
            }
            Self::BallSpeed { speed } => {
                write!(f, "ball speed must be positive and finite, got {speed}")
            }
            Self::BallSize { size } => {
                write!(f, "ball size must be positive and finite, got {size}")
            }
            Self::BallTooLarge {
                size,
                arena_width,
                arena_height,
            } => write!(
                f,
                "ball of size {size} does not fit a {arena_width}x{arena_height} arena"
            ),
            Self::PaddleSize { width, height } => {
                write!(f, "paddle must be positive and finite, got {width}x{height}")
            }
            Self::PaddleTooWide { width, arena_width } => {
                write!(f, "paddle width {width} exceeds arena width {arena_width}")
            }
            Self::PaddleFloorGap { gap } => {
                write!(f, "paddle floor gap must be non-negative, got {gap}")
            }
            Self::PaddleHitboxScale { x, y } => {
                write!(f, "paddle hitbox scale must be positive, got {x}x{y}")
            }
            Self::PaddleDelay { delay } => {
                write!(f, "paddle delay must be at most {MAX_PADDLE_DELAY_MS}ms, got {delay}ms")
            }
            Self::BrickGrid { rows, cols } => {
                write!(f, "brick grid needs at least one row and column, got {rows}x{cols}")
            }
            Self::BrickHeight { height } => {
                write!(f, "brick height must be positive and finite, got {height}")
            }
            Self::BricksOverflowArena {
                rows,
                height,
                arena_height,
            } => write!(
                f,
                "{rows} rows of {height}px bricks do not fit a {arena_height}px arena"
            ),
            Self::BubbleDuration => write!(f, "bubble duration must be non-zero"),
            Self::Parse(msg) => write!(f, "invalid config json: {msg}"),
            Self::Io(msg) => write!(f, "failed to read config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
