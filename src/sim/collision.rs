//! Axis-aligned bounding box collision
//!
//! Every sprite in the game is a square, so a single AABB overlap test covers
//! both coins and enemies.

use glam::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn square(min: Vec2, edge: f32) -> Self {
        Self {
            min,
            size: Vec2::splat(edge),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Strict overlap test; rectangles that only share an edge do not collide
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::square(Vec2::new(0.0, 0.0), 48.0);
        let b = Rect::square(Vec2::new(40.0, 40.0), 36.0);
        assert!(aabb_overlap(&a, &b));
        assert!(aabb_overlap(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::square(Vec2::new(0.0, 0.0), 48.0);
        let right = Rect::square(Vec2::new(48.0, 0.0), 36.0);
        let below = Rect::square(Vec2::new(0.0, 48.0), 36.0);
        assert!(!aabb_overlap(&a, &right));
        assert!(!aabb_overlap(&a, &below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Rect::square(Vec2::new(0.0, 0.0), 48.0);
        // x ranges overlap, y ranges don't
        let b = Rect::square(Vec2::new(10.0, 100.0), 36.0);
        assert!(!aabb_overlap(&a, &b));
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let inner = Rect::square(Vec2::new(10.0, 10.0), 5.0);
        assert!(aabb_overlap(&outer, &inner));
    }
}
