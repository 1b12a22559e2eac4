//! Axis-aligned rectangle geometry for platforms, tokens, obstacles and the player
//!
//! Screen convention: +x is right, +y is down. A rectangle is stored by its
//! min (top-left) and max (bottom-right) corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Grow by `pad` on every side
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(pad),
            max: self.max + Vec2::splat(pad),
        }
    }

    /// Inclusive intersection test: boxes sharing an edge count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Strict overlap test: touching edges do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth along each axis (zero on an axis with no overlap)
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        let x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let y = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        assert_eq!(b.min, Vec2::new(80.0, 40.0));
        assert_eq!(b.max, Vec2::new(120.0, 60.0));
        assert_eq!(b.width(), 40.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_touching_edges_intersect_but_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        assert!(a.intersects(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_padding_creates_intersection() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(25.0, 0.0), Vec2::new(35.0, 10.0));
        assert!(!a.intersects(&b));
        // 15 units apart: padding 10 on each closes the gap
        assert!(a.padded(10.0).intersects(&b.padded(10.0)));
        assert!(!a.padded(5.0).intersects(&b.padded(5.0)));
        // Exactly closing the gap still counts
        assert!(a.padded(7.5).intersects(&b.padded(7.5)));
    }

    #[test]
    fn test_penetration() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(8.0, 6.0), Vec2::new(20.0, 20.0));
        assert_eq!(a.penetration(&b), Vec2::new(2.0, 4.0));
        let far = Aabb::new(Vec2::new(50.0, 50.0), Vec2::new(60.0, 60.0));
        assert_eq!(a.penetration(&far), Vec2::ZERO);
    }
}
