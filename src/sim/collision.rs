//! Collision detection and response
//!
//! Walls are tested against the ball center, the paddle and bricks against
//! the ball's bounding square. Responses only ever flip the sign of a
//! velocity component, so the ball's speed never changes.

use glam::Vec2;

use super::aabb::Aabb;
use super::state::Brick;

/// Which velocity component a collision negates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Negate dx
    Horizontal,
    /// Negate dy
    Vertical,
}

impl BounceAxis {
    /// Pick the entry axis from penetration depth
    ///
    /// The shallower axis is the one the ball came through. Equal depths
    /// reflect vertically.
    pub fn from_depth(depth: Vec2) -> Self {
        if depth.x < depth.y {
            BounceAxis::Horizontal
        } else {
            BounceAxis::Vertical
        }
    }
}

/// Reflect velocity across the given axis
#[inline]
pub fn reflect_velocity(velocity: Vec2, axis: BounceAxis) -> Vec2 {
    match axis {
        BounceAxis::Horizontal => Vec2::new(-velocity.x, velocity.y),
        BounceAxis::Vertical => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Arena boundaries the ball center has reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall
    pub side: bool,
    pub top: bool,
    /// Bottom edge; the ball is lost
    pub floor: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.side || self.top || self.floor
    }
}

/// Check the ball center against the arena edges
///
/// No positional correction happens here; a ball past an edge stays there
/// until its flipped velocity carries it back.
pub fn ball_wall_contact(ball_pos: Vec2, arena: Vec2) -> WallContact {
    WallContact {
        side: ball_pos.x <= 0.0 || ball_pos.x >= arena.x,
        top: ball_pos.y <= 0.0,
        floor: ball_pos.y >= arena.y,
    }
}

/// Check the ball box against the paddle's collision box
#[inline]
pub fn ball_paddle_collision(ball: &Aabb, paddle_hitbox: &Aabb) -> bool {
    ball.overlaps(paddle_hitbox)
}

/// The brick a ball position destroys this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    /// Index into the live brick list
    pub index: usize,
    pub depth: Vec2,
    pub area: f32,
    pub axis: BounceAxis,
}

/// Find the single brick hit by the ball this tick
///
/// When the ball box overlaps several bricks, the largest overlap area wins;
/// ties go to the earliest brick in grid order.
pub fn find_brick_hit(ball: &Aabb, bricks: &[Brick]) -> Option<BrickHit> {
    let mut best: Option<BrickHit> = None;

    for (index, brick) in bricks.iter().enumerate() {
        let bounds = brick.bounds();
        if !ball.overlaps(&bounds) {
            continue;
        }
        let area = ball.overlap_area(&bounds);
        if best.is_some_and(|b| area <= b.area) {
            continue;
        }
        let depth = ball.overlap_depth(&bounds);
        best = Some(BrickHit {
            index,
            depth,
            area,
            axis: BounceAxis::from_depth(depth),
        });
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::Tier;

    fn brick(id: u32, x: f32, y: f32) -> Brick {
        let tiers = GameConfig::default().tiers;
        Brick::new(id, Vec2::new(x, y), Vec2::new(96.0, 20.0), Tier::for_row(0), &tiers)
    }

    fn ball_box(x: f32, y: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::splat(10.0))
    }

    #[test]
    fn test_bounce_axis_tie_break() {
        assert_eq!(
            BounceAxis::from_depth(Vec2::new(2.0, 5.0)),
            BounceAxis::Horizontal
        );
        assert_eq!(
            BounceAxis::from_depth(Vec2::new(5.0, 2.0)),
            BounceAxis::Vertical
        );
        assert_eq!(
            BounceAxis::from_depth(Vec2::new(3.0, 3.0)),
            BounceAxis::Vertical
        );
    }

    #[test]
    fn test_reflect_velocity() {
        let v = Vec2::new(3.0, -3.0);
        assert_eq!(reflect_velocity(v, BounceAxis::Horizontal), Vec2::new(-3.0, -3.0));
        assert_eq!(reflect_velocity(v, BounceAxis::Vertical), Vec2::new(3.0, 3.0));
        assert_eq!(reflect_velocity(v, BounceAxis::Vertical).length(), v.length());
    }

    #[test]
    fn test_wall_contact() {
        let arena = Vec2::new(480.0, 640.0);
        assert!(!ball_wall_contact(Vec2::new(240.0, 320.0), arena).any());
        assert!(ball_wall_contact(Vec2::new(0.0, 320.0), arena).side);
        assert!(ball_wall_contact(Vec2::new(481.0, 320.0), arena).side);
        assert!(ball_wall_contact(Vec2::new(240.0, -1.0), arena).top);

        let floor = ball_wall_contact(Vec2::new(240.0, 640.0), arena);
        assert!(floor.floor);
        assert!(!floor.top && !floor.side);
    }

    #[test]
    fn test_paddle_collision_uses_hitbox() {
        let paddle = Aabb::from_corner(Vec2::new(190.0, 590.0), Vec2::new(100.0, 20.0));
        let hitbox = paddle.scaled_from_corner(Vec2::splat(1.2));
        // Just right of the drawn paddle, inside the padded box
        let ball = ball_box(305.0, 600.0);
        assert!(!ball_paddle_collision(&ball, &paddle));
        assert!(ball_paddle_collision(&ball, &hitbox));
    }

    #[test]
    fn test_find_brick_hit_from_below() {
        let bricks = vec![brick(1, 0.0, 0.0), brick(2, 96.0, 0.0)];
        let hit = find_brick_hit(&ball_box(48.0, 28.0), &bricks).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.axis, BounceAxis::Vertical);
        assert_eq!(hit.depth.y, 2.0);
    }

    #[test]
    fn test_find_brick_hit_from_side() {
        // Ball overlapping the left edge of a brick by 2px, deep vertically
        let bricks = vec![brick(1, 100.0, 100.0)];
        let hit = find_brick_hit(&ball_box(92.0, 110.0), &bricks).unwrap();
        assert_eq!(hit.axis, BounceAxis::Horizontal);
    }

    #[test]
    fn test_find_brick_hit_prefers_largest_overlap() {
        let bricks = vec![brick(1, 0.0, 0.0), brick(2, 96.0, 0.0)];
        // Straddles the seam at x=96, mostly over the second brick
        let hit = find_brick_hit(&ball_box(100.0, 25.0), &bricks).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_find_brick_hit_tie_goes_to_first() {
        let bricks = vec![brick(1, 0.0, 0.0), brick(2, 96.0, 0.0)];
        let hit = find_brick_hit(&ball_box(96.0, 25.0), &bricks).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_find_brick_hit_miss() {
        let bricks = vec![brick(1, 0.0, 0.0)];
        // Touching the bottom edge only
        assert!(find_brick_hit(&ball_box(48.0, 30.0), &bricks).is_none());
        assert!(find_brick_hit(&ball_box(48.0, 300.0), &[]).is_none());
    }
}
