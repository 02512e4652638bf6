use super::clamp_coord;
use crate::color::Color;
use crate::geometry::Rect;
use crate::surface::Surface;

impl Surface {
    /// Rectangle covering `[x, x + w) x [y, y + h)`
    ///
    /// Fills draw one span per row of the clipped area. Strokes draw the
    /// four edges without blending the corners twice. Edges outside the
    /// surface are dropped, not moved onto the border.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, fill: bool) {
        let rect = Rect::new(x, y, w, h);
        let Some(visible) = rect.intersect(&self.bounds()) else {
            return;
        };

        if fill {
            for row in visible.y..visible.bottom() {
                self.hline(visible.x, visible.right() - 1, row, color);
            }
            return;
        }

        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.right() - 1, rect.bottom() - 1);
        self.hline(x0, x1, y0, color);
        if y1 > y0 {
            self.hline(x0, x1, y1, color);
        }
        if y1 - y0 > 1 {
            self.vline(x0, y0 + 1, y1 - 1, color);
            if x1 > x0 {
                self.vline(x1, y0 + 1, y1 - 1, color);
            }
        }
    }

    /// Triangle through three vertices
    ///
    /// The fill walks the rows the surface shares with the triangle,
    /// interpolating the long edge against whichever short edge the row
    /// crosses. A triangle with all vertices on one row draws nothing,
    /// stroked or filled.
    pub fn triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        fill: bool,
    ) {
        if y0 == y1 && y0 == y2 {
            return;
        }
        if !fill {
            self.line(x0, y0, x1, y1, color);
            self.line(x1, y1, x2, y2, color);
            self.line(x2, y2, x0, y0, color);
            return;
        }

        let mut v = [(x0 as i64, y0 as i64), (x1 as i64, y1 as i64), (x2 as i64, y2 as i64)];
        v.sort_by_key(|&(_, y)| y);
        let [(x0, y0), (x1, y1), (x2, y2)] = v;

        let total = y2 - y0;
        let upper = y1 - y0;
        let first = y0.max(0);
        let last = y2.min(self.height() as i64 - 1);
        for y in first..=last {
            let i = y - y0;
            let second_half = i > upper || y1 == y0;
            let segment = if second_half { y2 - y1 } else { upper };
            let alpha = i as f64 / total as f64;
            let beta = (i - if second_half { upper } else { 0 }) as f64 / segment as f64;
            let ax = x0 + ((x2 - x0) as f64 * alpha) as i64;
            let bx = if second_half {
                x1 + ((x2 - x1) as f64 * beta) as i64
            } else {
                x0 + ((x1 - x0) as f64 * beta) as i64
            };
            self.hline(clamp_coord(ax), clamp_coord(bx), y as i32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::color::Color;
    use crate::surface::Surface;

    fn count_set(s: &Surface) -> usize {
        s.pixels().iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn test_filled_rect_is_half_open() {
        let mut s = Surface::new(8, 8).unwrap();
        s.rect(1, 1, 3, 2, Color::RED, true);
        assert_eq!(count_set(&s), 6);
        assert_eq!(s.get_pixel(3, 2), Color::RED);
        assert_eq!(s.get_pixel(4, 2), Color::TRANSPARENT);
        assert_eq!(s.get_pixel(3, 3), Color::TRANSPARENT);
    }

    #[test]
    fn test_rect_clamps_to_surface() {
        let mut s = Surface::new(8, 8).unwrap();
        s.rect(-2, -2, 4, 4, Color::RED, true);
        assert_eq!(count_set(&s), 4);
        s.rect(6, 6, 100, 100, Color::RED, true);
        assert_eq!(count_set(&s), 8);
    }

    #[test]
    fn test_degenerate_rect_is_noop() {
        let mut s = Surface::new(8, 8).unwrap();
        s.rect(2, 2, 0, 4, Color::RED, true);
        s.rect(2, 2, 4, -1, Color::RED, false);
        s.rect(9, 2, 4, 4, Color::RED, true);
        s.rect(-9, -9, 4, 4, Color::RED, false);
        assert_eq!(count_set(&s), 0);
    }

    #[test]
    fn test_stroked_rect_blends_corners_once() {
        let mut s = Surface::new(8, 8).unwrap();
        let half = Color::rgba(0, 255, 0, 128);
        s.rect(1, 1, 4, 3, half, false);
        assert_eq!(count_set(&s), 10);
        assert!(s.pixels().iter().filter(|&&p| p != 0).all(|&p| p == half.0));
        assert_eq!(s.get_pixel(2, 2), Color::TRANSPARENT);
    }

    #[test]
    fn test_thin_rect_stroke() {
        let mut s = Surface::new(8, 8).unwrap();
        s.rect(0, 0, 5, 1, Color::RED, false);
        assert_eq!(count_set(&s), 5);
        s.clear();
        s.rect(0, 0, 1, 4, Color::RED, false);
        assert_eq!(count_set(&s), 4);
    }

    #[test]
    fn test_flat_triangle_is_noop() {
        let mut s = Surface::new(12, 12).unwrap();
        s.triangle(0, 3, 5, 3, 9, 3, Color::WHITE, true);
        s.triangle(0, 3, 5, 3, 9, 3, Color::WHITE, false);
        assert_eq!(count_set(&s), 0);
    }

    #[test]
    fn test_filled_triangle_covers_vertices() {
        let mut s = Surface::new(16, 16).unwrap();
        s.triangle(7, 10, 2, 2, 12, 2, Color::WHITE, true);
        for (x, y) in [(2, 2), (12, 2), (7, 10), (7, 5)] {
            assert_eq!(s.get_pixel(x, y), Color::WHITE, "({x}, {y})");
        }
        assert_eq!(s.get_pixel(1, 2), Color::TRANSPARENT);
        assert_eq!(s.pixels()[2 * 16..3 * 16].iter().filter(|&&p| p != 0).count(), 11);
    }

    #[test]
    fn test_filled_triangle_blends_once() {
        let mut s = Surface::new(16, 16).unwrap();
        let half = Color::rgba(255, 0, 0, 128);
        s.triangle(1, 1, 14, 6, 4, 14, half, true);
        assert!(count_set(&s) > 40);
        assert!(s.pixels().iter().filter(|&&p| p != 0).all(|&p| p == half.0));
    }

    #[test]
    fn test_extreme_triangles() {
        let mut s = Surface::new(8, 8).unwrap();
        s.triangle(0, i32::MIN, 5, 0, 7, i32::MAX, Color::RED, true);
        // every row is crossed, the long edge sits near x = 3.5
        for y in 0..8 {
            let row = (0..8).filter(|&x| s.get_pixel(x, y) != Color::TRANSPARENT).count();
            assert!((2..=4).contains(&row), "row {y} has {row} pixels");
        }
        s.clear();
        s.triangle(i32::MIN, 4, i32::MAX, 4, 3, i32::MIN, Color::RED, false);
        s.triangle(i32::MAX, 3, i32::MAX - 5, 9, i32::MAX, i32::MIN, Color::RED, true);
        // only the horizontal edge crosses the surface
        assert_eq!(count_set(&s), 8);
        assert!((0..8).all(|x| s.get_pixel(x, 4) == Color::RED));
    }

    #[test]
    fn test_tall_triangle_fills_only_visible_rows() {
        let mut s = Surface::new(8, 8).unwrap();
        let half = Color::rgba(255, 0, 0, 128);
        // the surface sits inside, so every pixel is covered once
        s.triangle(-400_000_000, -400_000_000, 400_000_000, 0, -400_000_000, 400_000_000, half, true);
        assert!(s.pixels().iter().all(|&p| p == half.0));

        s.clear();
        s.triangle(0, -400_000_000, 5, 0, 7, 400_000_000, half, true);
        for y in 0..8 {
            assert_ne!(s.get_pixel(5, y), Color::TRANSPARENT, "row {y}");
            assert_eq!(s.get_pixel(0, y), Color::TRANSPARENT, "row {y}");
        }
        assert!(s.pixels().iter().all(|&p| p == 0 || p == half.0));
    }

    #[test]
    fn test_stroked_triangle_edges() {
        let mut s = Surface::new(16, 16).unwrap();
        s.triangle(1, 1, 14, 1, 1, 14, Color::WHITE, false);
        assert_eq!(s.get_pixel(7, 1), Color::WHITE);
        assert_eq!(s.get_pixel(1, 7), Color::WHITE);
        assert_eq!(s.get_pixel(4, 4), Color::TRANSPARENT);
    }
}
