//! Axis-aligned bounding boxes
//!
//! Every collider in the arena is a box: bricks and the paddle directly, the
//! ball as the square circumscribing its circle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in arena pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and size
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    /// Box from a center and half extents
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Scale the size per axis, keeping the top-left corner fixed
    pub fn scaled_from_corner(&self, scale: Vec2) -> Self {
        Self::from_corner(self.min, self.size() * scale)
    }

    /// Strict overlap test: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Penetration depth along each axis
    ///
    /// For each axis this is the smaller of the two ways to separate the
    /// boxes. Only meaningful when `overlaps` is true.
    pub fn overlap_depth(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            (self.max.x - other.min.x).min(other.max.x - self.min.x),
            (self.max.y - other.min.y).min(other.max.y - self.min.y),
        )
    }

    /// Area of the intersection (0 when disjoint)
    pub fn overlap_area(&self, other: &Aabb) -> f32 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        w.max(0.0) * h.max(0.0)
    }
}

/// Free-function form of [`Aabb::overlaps`]
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

/// Free-function form of [`Aabb::overlap_depth`]
#[inline]
pub fn overlap_depth(a: &Aabb, b: &Aabb) -> Vec2 {
    a.overlap_depth(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_corner(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect(-10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect(0.0, -10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_disjoint_on_one_axis() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // Overlaps in x but not y
        assert!(!a.overlaps(&rect(2.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_contained_box() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert_eq!(outer.overlap_area(&inner), 100.0);
    }

    #[test]
    fn test_overlap_depth() {
        // Ball box entering a brick from below by 3px, well inside horizontally
        let brick = rect(0.0, 0.0, 96.0, 20.0);
        let ball = Aabb::from_center(Vec2::new(48.0, 27.0), Vec2::splat(10.0));
        let depth = overlap_depth(&ball, &brick);
        assert_eq!(depth.y, 3.0);
        assert_eq!(depth.x, 58.0);
    }

    #[test]
    fn test_overlap_area_disjoint_is_zero() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&rect(50.0, 50.0, 5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_scaled_from_corner() {
        let paddle = rect(190.0, 590.0, 100.0, 20.0);
        let hitbox = paddle.scaled_from_corner(Vec2::splat(1.2));
        assert_eq!(hitbox.min, Vec2::new(190.0, 590.0));
        assert!(hitbox.max.abs_diff_eq(Vec2::new(310.0, 614.0), 0.001));
    }

    #[test]
    fn test_center_and_size() {
        let a = Aabb::from_center(Vec2::new(5.0, 5.0), Vec2::new(2.0, 3.0));
        assert_eq!(a.center(), Vec2::new(5.0, 5.0));
        assert_eq!(a.size(), Vec2::new(4.0, 6.0));
    }
}
