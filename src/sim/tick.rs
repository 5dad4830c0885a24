//! Per-frame simulation tick
//!
//! One call advances the round by one frame. The frame driver supplies the
//! input gathered since the previous frame and a monotonic clock reading.

use glam::Vec2;

use super::collision::{ball_paddle_collision, ball_wall_contact, find_brick_hit, reflect_velocity};
use super::state::{GameEvent, GamePhase, GameState, Outcome, PaddleNudge, ScoreBubble};
use crate::Millis;

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer x in arena pixels
    pub pointer_x: Option<f32>,
    /// Click/tap since the last tick
    pub primary: bool,
}

/// Advance the round by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now: Millis) {
    if let Some(x) = input.pointer_x {
        state.on_pointer_move(x);
    }
    if input.primary {
        state.on_primary_input(now);
    }

    match state.phase {
        GamePhase::Playing => step(state, now),
        GamePhase::Start | GamePhase::Ended(_) => {
            // Nothing can be live here; this only flushes stale nudges
            apply_due_nudges(state, now);
        }
    }

    state.expire_bubbles(now);
}

/// One simulation step of a round in play
fn step(state: &mut GameState, now: Millis) {
    let arena = Vec2::new(state.config().arena_width, state.config().arena_height);

    // Integrate
    state.ball.pos += state.ball.vel;

    // Walls
    let contact = ball_wall_contact(state.ball.pos, arena);
    if contact.side {
        state.ball.vel.x = -state.ball.vel.x;
        state.emit(GameEvent::WallBounced);
    }
    if contact.top {
        state.ball.vel.y = -state.ball.vel.y;
        state.emit(GameEvent::WallBounced);
    }
    if contact.floor {
        state.end_round(Outcome::Lose, now);
        return;
    }

    // Tracking paddle reacts to where the ball was `paddle_delay_ms` ago
    if state.config().paddle_tracking {
        apply_due_nudges(state, now);
        let due_at = now.saturating_add(state.config().paddle_delay_ms);
        let nudge = PaddleNudge {
            dx: state.ball.vel.x,
        };
        state.nudges.schedule(due_at, state.generation, nudge);
    }

    // Paddle
    let hitbox = state.paddle.hitbox(state.config().paddle_hitbox_scale);
    if ball_paddle_collision(&state.ball.bounds(), &hitbox) {
        state.ball.vel.y = -state.ball.vel.y;
        state.ball.pos.y = state.paddle.pos.y - state.ball.radius();
        state.emit(GameEvent::PaddleBounced);
    }

    // Bricks
    if let Some(hit) = find_brick_hit(&state.ball.bounds(), &state.bricks) {
        state.ball.vel = reflect_velocity(state.ball.vel, hit.axis);

        let brick = state.bricks.remove(hit.index);
        let points = brick.points();
        state.score += u64::from(points);
        state
            .bubbles
            .push(ScoreBubble::new(points, brick.tier(), brick.bounds().center(), now));
        state.emit(GameEvent::BrickDestroyed {
            points,
            tier: brick.tier(),
        });
        log::debug!(
            "Brick {} destroyed (+{}), {} left",
            brick.id,
            points,
            state.bricks.len()
        );
    }

    if state.bricks.is_empty() {
        state.end_round(Outcome::Win, now);
    }
}

/// Apply tracking nudges that have come due for the current generation
fn apply_due_nudges(state: &mut GameState, now: Millis) {
    let arena_width = state.config().arena_width;
    for nudge in state.nudges.take_due(now, state.generation) {
        let x = state.paddle.pos.x + nudge.dx;
        state.paddle.set_x(x, arena_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DevMode, GameConfig};
    use crate::consts::FRAME_MS;
    use crate::sim::state::{Brick, Tier};
    use proptest::prelude::*;

    fn playing(mode: DevMode) -> GameState {
        let mut state = GameState::new(GameConfig::from_preset(mode), 12345).unwrap();
        state.ball.vel = Vec2::new(3.0, 3.0);
        state.on_primary_input(0);
        state.take_events();
        state
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        let start_pos = state.ball.pos;

        // Ticks before the click leave the ball alone
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.ball.pos, start_pos);

        let input = TickInput {
            primary: true,
            ..Default::default()
        };
        tick(&mut state, &input, 32);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.clock.started_at, Some(32));
        assert_ne!(state.ball.pos, start_pos);
    }

    #[test]
    fn test_integration() {
        let mut state = playing(DevMode::One);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.pos, Vec2::new(243.0, 323.0));
    }

    #[test]
    fn test_side_wall_bounce() {
        let mut state = playing(DevMode::One);
        state.ball.pos = Vec2::new(478.0, 300.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel, Vec2::new(-3.0, 3.0));
        // No positional correction after the bounce
        assert_eq!(state.ball.pos.x, 481.0);
        assert_eq!(state.take_events(), vec![GameEvent::WallBounced]);

        tick(&mut state, &TickInput::default(), 32);
        assert_eq!(state.ball.pos.x, 478.0);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut state = playing(DevMode::One);
        state.ball.pos = Vec2::new(240.0, 2.0);
        state.ball.vel = Vec2::new(3.0, -3.0);
        // Clear the path so no brick is involved
        state.bricks.retain(|b| b.pos.x > 300.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(state.take_events(), vec![GameEvent::WallBounced]);
    }

    #[test]
    fn test_corner_bounce_flips_both() {
        let mut state = playing(DevMode::One);
        state.ball.pos = Vec2::new(1.0, 1.0);
        state.ball.vel = Vec2::new(-3.0, -3.0);
        state.bricks.retain(|b| b.pos.x > 200.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(
            state.take_events(),
            vec![GameEvent::WallBounced, GameEvent::WallBounced]
        );
    }

    #[test]
    fn test_paddle_bounce_snaps_ball() {
        let mut state = playing(DevMode::One);
        // Paddle top is at 590; ball bottom will reach 592
        state.ball.pos = Vec2::new(240.0, 579.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel, Vec2::new(3.0, -3.0));
        assert_eq!(state.ball.pos.y, 580.0);
        assert_eq!(state.take_events(), vec![GameEvent::PaddleBounced]);

        // Resting exactly on top does not re-trigger
        tick(&mut state, &TickInput::default(), 32);
        assert_eq!(state.ball.vel.y, -3.0);
    }

    #[test]
    fn test_paddle_forgiveness_padding() {
        let mut state = playing(DevMode::Two);
        // Drawn paddle spans 190..290; the padded box reaches 310
        state.ball.pos = Vec2::new(302.0, 579.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel.y, -3.0);

        let mut strict = playing(DevMode::One);
        strict.ball.pos = Vec2::new(302.0, 579.0);
        tick(&mut strict, &TickInput::default(), 16);
        assert_eq!(strict.ball.vel.y, 3.0);
    }

    #[test]
    fn test_brick_destroyed() {
        let mut state = playing(DevMode::One);
        let total = state.bricks.len();
        let target = state.bricks[1].id;
        state.ball.pos = Vec2::new(141.0, 32.0);
        state.ball.vel = Vec2::new(3.0, -3.0);
        tick(&mut state, &TickInput::default(), 100);

        assert_eq!(state.bricks.len(), total - 1);
        assert!(state.bricks.iter().all(|b| b.id != target));
        assert_eq!(state.score, 5);
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(
            state.take_events(),
            vec![GameEvent::BrickDestroyed {
                points: 5,
                tier: Tier::for_row(0)
            }]
        );

        let bubble = &state.bubbles[0];
        assert_eq!(bubble.text, "+5");
        assert_eq!(bubble.created_at, 100);
        assert_eq!(bubble.pos, Vec2::new(144.0, 10.0));
    }

    #[test]
    fn test_side_entry_reflects_horizontally() {
        let mut state = playing(DevMode::Three);
        state.bricks.clear();
        let brick = Brick::new(
            99,
            Vec2::new(200.0, 200.0),
            Vec2::new(48.0, 20.0),
            Tier::for_row(2),
            &state.config().tiers,
        );
        state.bricks.push(brick);
        // Ball approaching the brick's left edge
        state.ball.pos = Vec2::new(189.0, 210.0);
        state.ball.vel = Vec2::new(3.0, 3.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.ball.vel, Vec2::new(-3.0, 3.0));
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_one_brick_per_tick() {
        let mut state = playing(DevMode::One);
        // Straddling the seam between columns 0 and 1
        state.ball.pos = Vec2::new(96.0, 32.0);
        state.ball.vel = Vec2::new(3.0, -3.0);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.bricks.len(), 4);
        assert_eq!(state.score, 5);
    }

    /// Win: 480x640 arena, 1x5 bricks, ball from center with (+3, +3)
    #[test]
    fn test_scenario_clear_all_bricks_wins() {
        let mut state = GameState::new(GameConfig::from_preset(DevMode::One), 9).unwrap();
        assert_eq!(state.ball.pos, Vec2::new(240.0, 320.0));
        state.ball.vel = Vec2::new(3.0, 3.0);
        state.on_primary_input(0);

        let centers: Vec<f32> = state.bricks.iter().map(|b| b.bounds().center().x).collect();
        assert_eq!(centers.len(), 5);

        let mut now = 0;
        for x in centers {
            assert_eq!(state.phase, GamePhase::Playing);
            // Rising into the brick from below
            state.ball.pos = Vec2::new(x - 3.0, 32.0);
            state.ball.vel = Vec2::new(3.0, -3.0);
            now += FRAME_MS;
            tick(&mut state, &TickInput::default(), now);
        }

        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert_eq!(state.score, 25);
        assert!(state.bricks.is_empty());
        let events = state.take_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::RoundEnded {
                outcome: Outcome::Win,
                final_score: 25
            })
        );
    }

    /// Serve from the center at (+3, +3) and let the round run untouched
    fn play_out(mode: DevMode) -> (GameState, u32) {
        let mut state = GameState::new(GameConfig::from_preset(mode), 3).unwrap();
        state.ball.vel = Vec2::new(3.0, 3.0);
        state.on_primary_input(0);

        let mut now = 0;
        let mut ticks = 0;
        while !state.is_ended() && ticks < 10_000 {
            now += FRAME_MS;
            tick(&mut state, &TickInput::default(), now);
            ticks += 1;
        }
        (state, ticks)
    }

    #[test]
    fn test_idle_pointer_paddle_loses() {
        // The ball drifts right of a paddle that never moves
        let (state, ticks) = play_out(DevMode::One);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Lose));
        assert_eq!(ticks, 107);
        assert_eq!(state.score, 0);
        assert_eq!(state.bricks.len(), 5);
    }

    #[test]
    fn test_tracking_paddle_clears_small_grid() {
        let (state, ticks) = play_out(DevMode::Two);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert!(ticks < 10_000);
        assert_eq!(state.score, 25);
        assert!(state.bricks.is_empty());
    }

    #[test]
    fn test_tracking_near_clock_limit() {
        let mut config = GameConfig::from_preset(DevMode::Two);
        config.paddle_delay_ms = crate::consts::MAX_PADDLE_DELAY_MS;
        let mut state = GameState::new(config, 1).unwrap();
        let start = u64::MAX - 100;
        state.on_primary_input(start);

        tick(&mut state, &TickInput::default(), start + FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pending_nudges(), 1);
    }

    /// Pointer at x=50 with a 100px paddle clamps to 0
    #[test]
    fn test_scenario_pointer_clamps_left() {
        let mut state = GameState::new(GameConfig::from_preset(DevMode::One), 1).unwrap();
        assert_eq!(state.paddle.pos.x, 190.0);
        let input = TickInput {
            pointer_x: Some(50.0),
            ..Default::default()
        };
        tick(&mut state, &input, 16);
        assert_eq!(state.paddle.pos.x, 0.0);

        let input = TickInput {
            pointer_x: Some(20.0),
            ..Default::default()
        };
        tick(&mut state, &input, 32);
        assert_eq!(state.paddle.pos.x, 0.0);
    }

    /// Ball reaching y = 640 loses on that tick with no later checks
    #[test]
    fn test_scenario_floor_breach_loses() {
        let mut state = playing(DevMode::One);
        state.ball.pos = Vec2::new(240.0, 637.0);
        // A brick sitting where the ball lands must survive
        let brick = Brick::new(
            77,
            Vec2::new(200.0, 630.0),
            Vec2::new(96.0, 20.0),
            Tier::for_row(0),
            &state.config().tiers,
        );
        state.bricks.push(brick);
        let bricks_before = state.bricks.len();

        tick(&mut state, &TickInput::default(), 500);

        assert_eq!(state.ball.pos.y, 640.0);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Lose));
        assert_eq!(state.bricks.len(), bricks_before);
        assert_eq!(state.score, 0);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::RoundEnded {
                outcome: Outcome::Lose,
                final_score: 0
            }]
        );

        // Ended is terminal
        let frozen = state.ball.pos;
        tick(&mut state, &TickInput::default(), 516);
        assert_eq!(state.ball.pos, frozen);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Lose));
    }

    #[test]
    fn test_tracking_nudge_is_delayed() {
        let mut state = playing(DevMode::Two);
        assert_eq!(state.paddle.pos.x, 190.0);

        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.paddle.pos.x, 190.0);
        assert_eq!(state.pending_nudges(), 1);

        tick(&mut state, &TickInput::default(), 265);
        assert_eq!(state.paddle.pos.x, 190.0);

        // First nudge (scheduled at 16) comes due at 266
        tick(&mut state, &TickInput::default(), 266);
        assert_eq!(state.paddle.pos.x, 193.0);
    }

    #[test]
    fn test_tracking_nudge_clamped() {
        let mut state = playing(DevMode::Two);
        state.paddle.pos.x = 379.0;
        tick(&mut state, &TickInput::default(), 16);
        tick(&mut state, &TickInput::default(), 300);
        assert_eq!(state.paddle.pos.x, 380.0);
    }

    #[test]
    fn test_stale_nudges_dropped_after_round_end() {
        let mut state = playing(DevMode::Two);
        tick(&mut state, &TickInput::default(), 16);
        assert_eq!(state.pending_nudges(), 1);

        // Lose on the next tick
        state.ball.pos.y = 639.0;
        tick(&mut state, &TickInput::default(), 32);
        assert!(state.is_ended());

        tick(&mut state, &TickInput::default(), 1_000);
        assert_eq!(state.paddle.pos.x, 190.0);
        assert_eq!(state.pending_nudges(), 0);
    }

    #[test]
    fn test_stale_nudges_dropped_after_restart() {
        let mut state = playing(DevMode::Two);
        tick(&mut state, &TickInput::default(), 16);
        state.restart(777);
        state.ball.vel = Vec2::new(3.0, 3.0);
        state.on_primary_input(30);

        // The old nudge is due but belongs to the previous round
        tick(&mut state, &TickInput::default(), 300);
        assert_eq!(state.paddle.pos.x, 190.0);
        // Only this round's nudge remains
        assert_eq!(state.pending_nudges(), 1);
    }

    #[test]
    fn test_bubble_lifetime() {
        let mut state = playing(DevMode::One);
        state.ball.pos = Vec2::new(45.0, 32.0);
        state.ball.vel = Vec2::new(3.0, -3.0);
        tick(&mut state, &TickInput::default(), 1_000);
        assert_eq!(state.active_bubbles(1_000).count(), 1);
        assert_eq!(state.active_bubbles(1_999).count(), 1);
        assert_eq!(state.active_bubbles(2_000).count(), 0);

        tick(&mut state, &TickInput::default(), 1_999);
        assert_eq!(state.bubbles.len(), 1);
        tick(&mut state, &TickInput::default(), 2_000);
        assert!(state.bubbles.is_empty());
    }

    #[test]
    fn test_bubbles_expire_after_round_end() {
        let mut state = playing(DevMode::One);
        state.bricks.truncate(1);
        state.ball.pos = Vec2::new(45.0, 32.0);
        state.ball.vel = Vec2::new(3.0, -3.0);
        tick(&mut state, &TickInput::default(), 5_000);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert!(!state.end_screen_ready(5_500));

        tick(&mut state, &TickInput::default(), 6_000);
        assert!(state.bubbles.is_empty());
        assert!(state.end_screen_ready(6_000));
        assert_eq!(state.elapsed_ms(9_000), Some(5_000));
    }

    fn speed_sq(v: Vec2) -> f32 {
        v.x * v.x + v.y * v.y
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_invariants(
            seed in any::<u64>(),
            mode in prop_oneof![Just(DevMode::One), Just(DevMode::Two), Just(DevMode::Three)],
            pointer in proptest::collection::vec(proptest::option::of(-100.0f32..600.0), 1..64),
            ticks in 100usize..3_000,
        ) {
            let config = GameConfig::from_preset(mode);
            let max_x = config.arena_width - config.paddle_width;
            let mut state = GameState::new(config, seed).unwrap();
            let initial_speed = speed_sq(state.ball.vel);
            let mut now = 0;
            let mut expected_score = 0u64;
            let mut endings = 0;

            tick(&mut state, &TickInput { primary: true, ..Default::default() }, now);

            for i in 0..ticks {
                now += FRAME_MS;
                let input = TickInput {
                    pointer_x: pointer[i % pointer.len()],
                    primary: false,
                };
                let bricks_before = state.bricks.len();
                tick(&mut state, &input, now);

                prop_assert!(state.paddle.pos.x >= 0.0 && state.paddle.pos.x <= max_x);
                prop_assert_eq!(speed_sq(state.ball.vel), initial_speed);

                let mut destroyed = 0;
                for event in state.take_events() {
                    match event {
                        GameEvent::BrickDestroyed { points, .. } => {
                            expected_score += u64::from(points);
                            destroyed += 1;
                        }
                        GameEvent::RoundEnded { outcome, final_score } => {
                            endings += 1;
                            prop_assert_eq!(final_score, state.score);
                            match outcome {
                                Outcome::Win => prop_assert!(state.bricks.is_empty()),
                                Outcome::Lose => prop_assert!(state.ball.pos.y >= 640.0),
                            }
                        }
                        _ => {}
                    }
                }
                prop_assert!(destroyed <= 1);
                prop_assert_eq!(state.bricks.len(), bricks_before - destroyed);
                prop_assert_eq!(state.score, expected_score);
                prop_assert!(endings <= 1);
                prop_assert_eq!(state.is_ended(), endings == 1);
            }
        }

        #[test]
        fn prop_pointer_always_clamped(x in -10_000.0f32..10_000.0) {
            let mut state = GameState::new(GameConfig::from_preset(DevMode::One), 0).unwrap();
            tick(&mut state, &TickInput { pointer_x: Some(x), primary: false }, 0);
            prop_assert!(state.paddle.pos.x >= 0.0);
            prop_assert!(state.paddle.pos.x <= 380.0);
        }

        #[test]
        fn prop_bubble_visible_until_duration(delta in 0u64..3_000) {
            let mut state = playing(DevMode::One);
            state.ball.pos = Vec2::new(45.0, 32.0);
            state.ball.vel = Vec2::new(3.0, -3.0);
            tick(&mut state, &TickInput::default(), 10_000);
            let visible = state.active_bubbles(10_000 + delta).count() == 1;
            prop_assert_eq!(visible, delta < 1_000);
        }
    }
}
