use crate::color::Color;
use crate::surface::Surface;

impl Surface {
    /// Draw a line using Bresenham's algorithm
    ///
    /// Axis-aligned lines take the span fast paths. A zero-length line is a
    /// single pixel. Long lines are clipped to the surface before walking.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if x0 == x1 {
            self.vline(x0, y0, y1, color);
            return;
        }
        if y0 == y1 {
            self.hline(x0, x1, y0, color);
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip_line(x0, y0, x1, y1, 0) else {
            return;
        };

        let dx = (x1 as i64 - x0 as i64).abs();
        let dy = (y1 as i64 - y0 as i64).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.blend(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x += sx;
            }
            if e2 < dy {
                err += dx;
                y += sy;
            }
        }
    }

    /// Anti-aliased line, coverage weighted by distance to the ideal line
    ///
    /// Up to two pixels are touched per step; the second one's coverage
    /// comes from the error term `|err - dx + dy| / ed`.
    pub fn line_aa(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip_line(x0, y0, x1, y1, 1) else {
            return;
        };
        let dx = (x1 as i64 - x0 as i64).abs();
        let dy = (y1 as i64 - y0 as i64).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let ed = if dx + dy == 0 {
            1
        } else {
            ((dx as f64) * (dx as f64) + (dy as f64) * (dy as f64)).sqrt() as i64
        };
        let coverage = |e: i64| (255 * e / ed).clamp(0, 255) as i32;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.plot_aa(x, y, color, coverage((err - dx + dy).abs()));
            let e2 = err;
            let x2 = x;
            if 2 * e2 >= -dx {
                if x == x1 {
                    break;
                }
                if e2 + dy < ed {
                    self.plot_aa(x, y.saturating_add(sy), color, coverage(e2 + dy));
                }
                err -= dy;
                x += sx;
            }
            if 2 * e2 <= dy {
                if y == y1 {
                    break;
                }
                if dx - e2 < ed {
                    self.plot_aa(x2.saturating_add(sx), y, color, coverage(dx - e2));
                }
                err += dx;
                y += sy;
            }
        }
    }
}
