//! Round simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One step per frame tick, driven externally
//! - Time comes only from clock readings passed in by the caller
//! - Seeded RNG only
//! - Stable iteration order (grid order for bricks)

pub mod aabb;
pub mod collision;
pub mod schedule;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, overlap_depth, overlaps};
pub use collision::{BounceAxis, BrickHit, WallContact, find_brick_hit, reflect_velocity};
pub use schedule::{Deferred, DeferredQueue};
pub use state::{
    Ball, Brick, GameEvent, GamePhase, GameState, Outcome, Paddle, PaddleNudge, RoundClock,
    ScoreBubble, Tier,
};
pub use tick::{TickInput, tick};
