//! Integer rectangles for clipping

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle covering `[x, x + w) x [y, y + h)`
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

    /// Rectangle at the origin covering a whole `width x height` surface
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width.min(i32::MAX as u32) as i32, height.min(i32::MAX as u32) as i32)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Same size, moved by `(dx, dy)`
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -3, 10, 6);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 0, 5, 3)));
    }

    #[test]
    fn test_intersect_disjoint_and_touching() {
        let a = Rect::new(0, 0, 4, 4);
        assert_eq!(a.intersect(&Rect::new(4, 0, 4, 4)), None);
        assert_eq!(a.intersect(&Rect::new(10, 10, 1, 1)), None);
    }

    #[test]
    fn test_empty_never_intersects() {
        let a = Rect::new(0, 0, 4, 4);
        assert_eq!(a.intersect(&Rect::new(1, 1, 0, 2)), None);
        assert!(Rect::new(0, 0, -1, 5).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(!r.contains(3, 2));
    }
}
