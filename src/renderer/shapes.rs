//! Shape generation for 2D primitives
//!
//! Everything here works in arena pixels (origin top-left, y down). The
//! pipeline maps to clip space at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::Millis;
use crate::sim::{Aabb, GameState};

pub const CIRCLE_SEGMENTS: u32 = 24;
pub const BRICK_OUTLINE_WIDTH: f32 = 1.0;
/// How far a bubble drifts upward over its lifetime
pub const BUBBLE_RISE: f32 = 20.0;

/// Generate vertices for a filled rectangle (two triangles)
pub fn rect(bounds: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let Aabb { min, max } = *bounds;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline drawn inside `bounds`
pub fn rect_outline(bounds: &Aabb, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let Aabb { min, max } = *bounds;
    let w = width.min(bounds.size().min_element() * 0.5);

    let edges = [
        Aabb::new(min, Vec2::new(max.x, min.y + w)),
        Aabb::new(Vec2::new(min.x, max.y - w), max),
        Aabb::new(Vec2::new(min.x, min.y + w), Vec2::new(min.x + w, max.y - w)),
        Aabb::new(Vec2::new(max.x - w, min.y + w), Vec2::new(max.x, max.y - w)),
    ];

    edges.iter().flat_map(|edge| rect(edge, color)).collect()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Build the full frame for a round
///
/// Draw order is back to front: arena, bricks, paddle, ball, bubbles.
/// Once the end screen is stable only the arena is drawn; the overlay
/// carries the message.
pub fn build_scene(state: &GameState, now: Millis) -> Vec<Vertex> {
    let config = state.config();
    let arena = Aabb::new(
        Vec2::ZERO,
        Vec2::new(config.arena_width, config.arena_height),
    );

    let mut vertices = rect(&arena, colors::BACKGROUND);
    if state.end_screen_ready(now) {
        return vertices;
    }

    for brick in &state.bricks {
        let bounds = brick.bounds();
        let color = brick.tier().style(&config.tiers).color;
        vertices.extend(rect(&bounds, color));
        vertices.extend(rect_outline(
            &bounds,
            BRICK_OUTLINE_WIDTH,
            colors::BRICK_OUTLINE,
        ));
    }

    vertices.extend(rect(&state.paddle.bounds(), colors::PADDLE));
    vertices.extend(circle(
        state.ball.pos,
        state.ball.radius(),
        colors::BALL,
        CIRCLE_SEGMENTS,
    ));

    let duration = config.bubble_duration_ms;
    let radius = state.ball.size;
    for bubble in state.active_bubbles(now) {
        let t = bubble.age_ratio(now, duration);
        let mut color = bubble.tier.style(&config.tiers).color;
        color[3] *= 1.0 - t;
        let center = bubble.pos - Vec2::new(0.0, BUBBLE_RISE * t);
        vertices.extend(circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    vertices
}
