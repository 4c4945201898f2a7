//! Axis-aligned rectangles in world space
//!
//! World coordinates follow the canvas: x grows to the right, y grows
//! downward, so a rectangle's `bottom()` is its largest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Whether the horizontal extents overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    /// Strict AABB overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap test that also fails when the rectangles are closer than `gap`
    pub fn overlaps_with_gap(&self, other: &Rect, gap: f32) -> bool {
        !(self.right() + gap < other.x
            || other.right() + gap < self.x
            || self.bottom() + gap < other.y
            || other.bottom() + gap < self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(a.overlaps(&Rect::new(30.0, 30.0, 40.0, 40.0)));
        // Touching edges are not an overlap
        assert!(!a.overlaps(&Rect::new(40.0, 0.0, 40.0, 40.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 41.0, 40.0, 40.0)));
    }

    #[test]
    fn test_overlaps_with_gap() {
        let a = Rect::new(0.0, 0.0, 100.0, 20.0);
        // 20px apart horizontally: inside a 30px gap
        assert!(a.overlaps_with_gap(&Rect::new(120.0, 0.0, 100.0, 20.0), 30.0));
        // 40px apart: clear
        assert!(!a.overlaps_with_gap(&Rect::new(140.0, 0.0, 100.0, 20.0), 30.0));
        // Vertical separation counts too
        assert!(!a.overlaps_with_gap(&Rect::new(0.0, 60.0, 100.0, 20.0), 30.0));
        assert!(a.overlaps_with_gap(&Rect::new(0.0, 45.0, 100.0, 20.0), 30.0));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10.0, 10.0, 80.0, 50.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(90.0, 60.0));
        assert!(!r.contains(91.0, 30.0));
    }

    #[test]
    fn test_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(r.center(), Vec2::new(30.0, 50.0));
    }
}
