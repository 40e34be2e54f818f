//! Axis-aligned rectangles in integer playfield units.
//!
//! Every pairwise entity test in the simulation goes through [`intersects`].
//! Overlap is strict: two rectangles that only share an edge do not collide.
//! [`contains`] decides whether a bullet or pickup is still fully on the
//! playfield.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

/// Strict AABB overlap test.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// True when `inner` lies entirely within `outer` (edges may coincide).
#[inline]
pub fn contains(outer: &Rect, inner: &Rect) -> bool {
    inner.left() >= outer.left()
        && inner.right() <= outer.right()
        && inner.top() >= outer.top()
        && inner.bottom() <= outer.bottom()
}

/// Playfield bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Clamp `rect` horizontally so it stays within `[0, width)`.
    pub fn clamp_x(&self, rect: &mut Rect) {
        let max_x = (self.width - rect.w).max(0);
        rect.x = rect.x.clamp(0, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let below = Rect::new(0, 10, 10, 10);
        assert!(!intersects(&a, &right));
        assert!(!intersects(&a, &below));
    }

    #[test]
    fn contained_rect_intersects_and_is_contained() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(10, 10, 5, 5);
        assert!(intersects(&outer, &inner));
        assert!(contains(&outer, &inner));
        assert!(!contains(&inner, &outer));
        assert!(contains(&outer, &outer));
    }

    #[test]
    fn clamp_x_keeps_rect_inside() {
        let bounds = Bounds::new(100, 100);

        let mut r = Rect::new(-7, 50, 20, 10);
        bounds.clamp_x(&mut r);
        assert_eq!(r.x, 0);

        let mut r = Rect::new(95, 50, 20, 10);
        bounds.clamp_x(&mut r);
        assert_eq!(r.x, 80);
    }
}
