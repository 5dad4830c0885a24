//! HUD text for the overlay
//!
//! The frame driver copies these strings into DOM elements (or the log, when
//! headless). Lines that should be hidden are `None`.

use crate::Millis;
use crate::sim::{GamePhase, GameState, Outcome};

pub const START_PROMPT: &str = "CLICK ANYWHERE TO START";

/// Title shown on the end screen
pub fn end_message(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "You Win!",
        Outcome::Lose => "Game Over!",
    }
}

/// Format elapsed milliseconds as seconds with millisecond precision
pub fn format_elapsed(ms: Millis) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

/// Everything the overlay shows for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub start_prompt: Option<&'static str>,
    pub dev_mode: Option<String>,
    pub bricks_remaining: Option<String>,
    pub elapsed: Option<String>,
    /// End title and score, once the end screen is stable
    pub end_screen: Option<(&'static str, String)>,
}

impl Hud {
    pub fn from_state(state: &GameState, now: Millis) -> Self {
        if state.phase == GamePhase::Start {
            return Self {
                start_prompt: Some(START_PROMPT),
                ..Default::default()
            };
        }

        let config = state.config();
        let elapsed = if config.show_timer {
            state
                .elapsed_ms(now)
                .map(|ms| format!("Time Elapsed: {}", format_elapsed(ms)))
        } else {
            None
        };

        let end_screen = match state.outcome() {
            Some(outcome) if state.end_screen_ready(now) => {
                Some((end_message(outcome), format!("Score: {}", state.score)))
            }
            _ => None,
        };

        Self {
            start_prompt: None,
            dev_mode: Some(format!("DEV_MODE: {}", config.dev_mode.as_str())),
            bricks_remaining: Some(format!("Bricks Remaining: {}", state.bricks_remaining())),
            elapsed,
            end_screen,
        }
    }
}
