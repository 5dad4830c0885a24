//! Round state and entity records
//!
//! Everything a round owns lives in `GameState`. A frame driver holds one
//! `GameState` per round and feeds it input and clock readings.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::schedule::DeferredQueue;
use crate::Millis;
use crate::config::{GameConfig, TierStyle};
use crate::consts::TIER_COUNT;
use crate::error::ConfigError;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first click
    Start,
    /// Ball in motion
    Playing,
    /// Terminal; only bubble expiry continues
    Ended(Outcome),
}

/// Notifications for audio and display collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    WallBounced,
    PaddleBounced,
    BrickDestroyed { points: u32, tier: Tier },
    RoundEnded { outcome: Outcome, final_score: u64 },
}

/// The ball, positioned by its center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Diameter
    pub size: f32,
}

impl Ball {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Square circumscribing the ball
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.radius()))
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle, positioned by its top-left corner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, self.size)
    }

    /// Collision box, inflated from the top-left corner
    pub fn hitbox(&self, scale: Vec2) -> Aabb {
        self.bounds().scaled_from_corner(scale)
    }

    /// Largest legal x for the given arena width
    #[inline]
    pub fn max_x(&self, arena_width: f32) -> f32 {
        (arena_width - self.size.x).max(0.0)
    }

    /// Move to `x`, clamped to [0, arena_width - width]
    pub fn set_x(&mut self, x: f32, arena_width: f32) {
        self.pos.x = x.clamp(0.0, self.max_x(arena_width));
    }
}

/// Brick color class; tier 0 is the top row and worth the most
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Rows cycle through the tiers from the top
    pub fn for_row(row: u32) -> Self {
        Self((row % TIER_COUNT as u32) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// This tier's entry in the tier table
    #[inline]
    pub fn style(self, tiers: &[TierStyle; TIER_COUNT]) -> &TierStyle {
        &tiers[self.index()]
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < TIER_COUNT {
            Ok(Self(value))
        } else {
            Err(format!("tier {value} out of range (0..{TIER_COUNT})"))
        }
    }
}

/// A brick; tier and points are fixed at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    tier: Tier,
    points: u32,
}

impl Brick {
    /// Points come from the tier table entry for `tier`
    pub fn new(
        id: u32,
        pos: Vec2,
        size: Vec2,
        tier: Tier,
        tiers: &[TierStyle; TIER_COUNT],
    ) -> Self {
        Self {
            id,
            pos,
            size,
            tier,
            points: tier.style(tiers).points,
        }
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, self.size)
    }
}

/// "+N" feedback shown for a while after a brick breaks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBubble {
    pub text: String,
    pub points: u32,
    pub tier: Tier,
    /// Center of the destroyed brick
    pub pos: Vec2,
    pub created_at: Millis,
}

impl ScoreBubble {
    pub fn new(points: u32, tier: Tier, pos: Vec2, now: Millis) -> Self {
        Self {
            text: format!("+{}", points),
            points,
            tier,
            pos,
            created_at: now,
        }
    }

    #[inline]
    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.created_at)
    }

    #[inline]
    pub fn is_expired(&self, now: Millis, duration: Millis) -> bool {
        self.age(now) >= duration
    }

    /// Age as a fraction of the lifetime, in [0, 1]
    pub fn age_ratio(&self, now: Millis, duration: Millis) -> f32 {
        (self.age(now) as f32 / duration.max(1) as f32).min(1.0)
    }
}

/// Wall-clock span of the round, for display only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    pub started_at: Option<Millis>,
    pub ended_at: Option<Millis>,
}

impl RoundClock {
    /// Record the start time; later calls are ignored
    pub fn start(&mut self, now: Millis) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: Millis) {
        if self.started_at.is_some() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Elapsed time since start, frozen once stopped
    pub fn elapsed(&self, now: Millis) -> Option<Millis> {
        let start = self.started_at?;
        let end = self.ended_at.unwrap_or(now);
        Some(end.saturating_sub(start))
    }
}

/// Deferred paddle adjustment for the tracking paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleNudge {
    pub dx: f32,
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Round configuration (read-only once the round exists)
    config: GameConfig,
    /// Seed for the initial serve direction
    pub seed: u64,
    /// Bumped whenever a round ends or restarts
    pub generation: u32,
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Live bricks in grid order
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub bubbles: Vec<ScoreBubble>,
    pub clock: RoundClock,
    /// Pending tracking adjustments, tagged with the generation that scheduled them
    #[serde(skip)]
    pub(crate) nudges: DeferredQueue<PaddleNudge>,
    /// Events raised since the last `take_events`
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Validate the config and lay out a fresh round
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            ball: spawn_ball(&config, seed),
            paddle: spawn_paddle(&config),
            config,
            seed,
            generation: 0,
            phase: GamePhase::Start,
            bricks: Vec::new(),
            score: 0,
            bubbles: Vec::new(),
            clock: RoundClock::default(),
            nudges: DeferredQueue::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.layout_bricks();

        log::info!(
            "Round ready: {}x{} bricks, seed {}",
            state.config.brick_rows,
            state.config.brick_cols,
            seed
        );
        Ok(state)
    }

    /// Re-initialize every entity for a new round with the same config
    ///
    /// Pending deferred effects from the previous round stay queued but can
    /// no longer match the generation, so they are dropped when due.
    pub fn restart(&mut self, seed: u64) {
        self.generation = self.generation.wrapping_add(1);
        self.seed = seed;
        self.phase = GamePhase::Start;
        self.ball = spawn_ball(&self.config, seed);
        self.paddle = spawn_paddle(&self.config);
        self.bricks.clear();
        self.score = 0;
        self.bubbles.clear();
        self.clock = RoundClock::default();
        self.events.clear();
        self.next_id = 1;
        self.layout_bricks();
        log::info!("Round restarted (generation {}, seed {})", self.generation, seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn layout_bricks(&mut self) {
        let size = Vec2::new(self.config.brick_width(), self.config.brick_height);
        for row in 0..self.config.brick_rows {
            let tier = Tier::for_row(row);
            for col in 0..self.config.brick_cols {
                let pos = Vec2::new(col as f32 * size.x, row as f32 * size.y);
                let id = self.next_entity_id();
                let brick = Brick::new(id, pos, size, tier, &self.config.tiers);
                self.bricks.push(brick);
            }
        }
    }

    /// Primary input (click): starts the round once
    pub fn on_primary_input(&mut self, now: Millis) {
        if self.phase == GamePhase::Start {
            self.phase = GamePhase::Playing;
            self.clock.start(now);
            self.events.push(GameEvent::RoundStarted);
            log::info!("Round started");
        }
    }

    /// Pointer moved to `x` (arena pixels); centers the paddle under it
    ///
    /// Ignored while the paddle is tracking the ball.
    pub fn on_pointer_move(&mut self, x: f32) {
        if self.config.paddle_tracking {
            return;
        }
        let target = x - self.paddle.size.x / 2.0;
        self.paddle.set_x(target, self.config.arena_width);
    }

    /// Terminal transition; invalidates pending deferred effects
    pub(crate) fn end_round(&mut self, outcome: Outcome, now: Millis) {
        if self.is_ended() {
            return;
        }
        self.phase = GamePhase::Ended(outcome);
        self.clock.stop(now);
        self.generation = self.generation.wrapping_add(1);
        self.events.push(GameEvent::RoundEnded {
            outcome,
            final_score: self.score,
        });
        log::info!("Round ended: {:?}, score {}", outcome, self.score);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop bubbles whose lifetime has run out
    pub fn expire_bubbles(&mut self, now: Millis) {
        let duration = self.config.bubble_duration_ms;
        self.bubbles.retain(|b| !b.is_expired(now, duration));
    }

    /// Bubbles still visible at `now`
    pub fn active_bubbles(&self, now: Millis) -> impl Iterator<Item = &ScoreBubble> {
        let duration = self.config.bubble_duration_ms;
        self.bubbles
            .iter()
            .filter(move |b| !b.is_expired(now, duration))
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Time since the round started (frozen once it ends)
    pub fn elapsed_ms(&self, now: Millis) -> Option<Millis> {
        self.clock.elapsed(now)
    }

    /// The end message is stable once every bubble has faded
    pub fn end_screen_ready(&self, now: Millis) -> bool {
        self.is_ended() && self.active_bubbles(now).next().is_none()
    }

    /// Number of deferred effects still queued (stale ones included)
    pub fn pending_nudges(&self) -> usize {
        self.nudges.len()
    }
}

/// Ball at the arena center, falling, with a seeded horizontal direction
fn spawn_ball(config: &GameConfig, seed: u64) -> Ball {
    let mut rng = Pcg32::seed_from_u64(seed);
    let dx = if rng.random_bool(0.5) {
        config.ball_speed
    } else {
        -config.ball_speed
    };
    Ball {
        pos: Vec2::new(config.arena_width / 2.0, config.arena_height / 2.0),
        vel: Vec2::new(dx, config.ball_speed),
        size: config.ball_size,
    }
}

/// Paddle centered horizontally, resting above the floor gap
fn spawn_paddle(config: &GameConfig) -> Paddle {
    Paddle {
        pos: Vec2::new(
            config.arena_width / 2.0 - config.paddle_width / 2.0,
            config.paddle_y(),
        ),
        size: Vec2::new(config.paddle_width, config.paddle_height),
    }
}
