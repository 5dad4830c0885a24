//! Sound effects for simulation events
//!
//! The mapping from events to effects is platform independent. Playback is
//! procedurally generated with the Web Audio API in browser builds; native
//! builds have no audio backend.

use crate::sim::{GameEvent, Outcome, Tier};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a wall
    WallHit,
    /// Brick breaks; pitch rises with tier value
    BrickBreak(Tier),
    /// Round started
    Launch,
    /// Every brick cleared
    RoundWon,
    /// Ball fell past the paddle
    GameOver,
}

impl SoundEffect {
    /// Effect for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::RoundStarted => Some(SoundEffect::Launch),
            GameEvent::WallBounced => Some(SoundEffect::WallHit),
            GameEvent::PaddleBounced => Some(SoundEffect::PaddleHit),
            GameEvent::BrickDestroyed { tier, .. } => Some(SoundEffect::BrickBreak(tier)),
            GameEvent::RoundEnded {
                outcome: Outcome::Win,
                ..
            } => Some(SoundEffect::RoundWon),
            GameEvent::RoundEnded {
                outcome: Outcome::Lose,
                ..
            } => Some(SoundEffect::GameOver),
        }
    }
}

/// Base pitch for a brick break; tier 0 (top row) is highest
pub fn brick_break_freq(tier: Tier) -> f32 {
    1200.0 - tier.index() as f32 * 150.0
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, brick_break_freq};
    use crate::sim::Tier;

    /// Output level for every effect
    const VOLUME: f32 = 0.8;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = VOLUME;
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
                SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
                SoundEffect::BrickBreak(tier) => self.play_brick_break(ctx, vol, tier),
                SoundEffect::Launch => self.play_launch(ctx, vol),
                SoundEffect::RoundWon => self.play_round_won(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Paddle hit - solid thump
        fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Wall hit - short ping
        fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Brick break - two quick harmonics pitched by tier
        fn play_brick_break(&self, ctx: &AudioContext, vol: f32, tier: Tier) {
            let base = brick_break_freq(tier);
            for (i, freq) in [base, base * 1.5].iter().enumerate() {
                let delay = i as f64 * 0.03;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        fn play_launch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Rising arpeggio
        fn play_round_won(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        /// Falling tones
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WallBounced),
            Some(SoundEffect::WallHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PaddleBounced),
            Some(SoundEffect::PaddleHit)
        );
        let tier = Tier::for_row(3);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BrickDestroyed { points: 2, tier }),
            Some(SoundEffect::BrickBreak(tier))
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RoundEnded {
                outcome: Outcome::Lose,
                final_score: 0
            }),
            Some(SoundEffect::GameOver)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RoundEnded {
                outcome: Outcome::Win,
                final_score: 10
            }),
            Some(SoundEffect::RoundWon)
        );
    }

    #[test]
    fn test_brick_pitch_descends_with_tier() {
        assert!(brick_break_freq(Tier::for_row(0)) > brick_break_freq(Tier::for_row(4)));
        assert!(brick_break_freq(Tier::for_row(4)) > 0.0);
    }
}
