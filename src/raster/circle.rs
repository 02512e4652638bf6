use super::{clamp_coord, Extent, Spans};
use crate::color::Color;
use crate::surface::Surface;

/// Walk the outline of a circle, four quadrants per step
///
/// Points are handed to `plot` so the same walk serves strokes (blend) and
/// fills (span collection). `r` must be positive.
fn walk_circle(xc: i32, yc: i32, r: i64, mut plot: impl FnMut(i32, i32)) {
    let (xc, yc) = (xc as i64, yc as i64);
    let mut at = |x: i64, y: i64| plot(clamp_coord(x), clamp_coord(y));
    let mut x = -r;
    let mut y = 0;
    let mut err = 2 - 2 * r;
    loop {
        at(xc - x, yc + y);
        at(xc - y, yc - x);
        at(xc + x, yc - y);
        at(xc + y, yc + x);

        let e = err;
        if e <= y {
            y += 1;
            err += y * 2 + 1;
        }
        if e > x || err > y {
            x += 1;
            err += x * 2 + 1;
        }
        if x >= 0 {
            break;
        }
    }
}

impl Surface {
    /// Midpoint circle centered at `(xc, yc)`
    ///
    /// Filled circles draw one span per row. Radius 0 is a single pixel,
    /// a negative radius draws nothing.
    pub fn circle(&mut self, xc: i32, yc: i32, r: i32, color: Color, fill: bool) {
        if r < 0 {
            return;
        }
        if r == 0 {
            self.blend(xc, yc, color);
            return;
        }
        let r = r as i64;
        if self.inside_ellipse(xc as f64, yc as f64, r as f64, r as f64, 1.0) {
            if fill {
                let all = self.bounds();
                self.rect(all.x, all.y, all.w, all.h, color, true);
            }
            return;
        }
        if !self.walkable("circle", Extent::around(xc, yc, r, r), 0) {
            return;
        }

        if fill {
            let mut spans = Spans::new(self, clamp_coord(yc as i64 - r), clamp_coord(yc as i64 + r));
            walk_circle(xc, yc, r, |x, y| spans.add(x, y));
            spans.draw(self, color);
        } else {
            walk_circle(xc, yc, r, |x, y| self.blend(x, y, color));
        }
    }

    /// Anti-aliased circle
    ///
    /// Coverage comes from the residual error at the outer boundary. The
    /// filled variant fills the interior with spans before the AA rim.
    pub fn circle_aa(&mut self, xc: i32, yc: i32, r: i32, color: Color, fill: bool) {
        if r < 0 {
            return;
        }
        if r == 0 {
            self.blend(xc, yc, color);
            return;
        }
        if fill && r > 1 {
            self.circle(xc, yc, r - 1, color, true);
        }
        let r = r as i64;
        if self.inside_ellipse(xc as f64, yc as f64, r as f64, r as f64, 2.0)
            || !self.walkable("circle", Extent::around(xc, yc, r, r), 1)
        {
            return;
        }

        let (xc, yc) = (xc as i64, yc as i64);
        let plot = |s: &mut Self, x: i64, y: i64, i: i64| {
            s.plot_aa(clamp_coord(x), clamp_coord(y), color, i.clamp(0, 255) as i32);
        };
        let mut x = -r;
        let mut y = 0;
        let mut err = 2 - 2 * r;
        let norm = 1 - err;
        loop {
            let i = 255 * (err - 2 * (x + y) - 2).abs() / norm;
            plot(self, xc - x, yc + y, i);
            plot(self, xc - y, yc - x, i);
            plot(self, xc + x, yc - y, i);
            plot(self, xc + y, yc + x, i);

            let e2 = err;
            let x2 = x;
            if err + y > 0 {
                // outward pixel
                let i = 255 * (err - 2 * x - 1) / norm;
                if i < 256 {
                    plot(self, xc - x, yc + y + 1, i);
                    plot(self, xc - y - 1, yc - x, i);
                    plot(self, xc + x, yc - y - 1, i);
                    plot(self, xc + y + 1, yc + x, i);
                }
                x += 1;
                err += x * 2 + 1;
            }
            if e2 + x2 <= 0 {
                // inward pixel
                let i = 255 * (2 * y + 3 - e2) / norm;
                if i < 256 {
                    plot(self, xc - x2 - 1, yc + y, i);
                    plot(self, xc - y, yc - x2 - 1, i);
                    plot(self, xc + x2 + 1, yc - y, i);
                    plot(self, xc + y, yc + x2 + 1, i);
                }
                y += 1;
                err += y * 2 + 1;
            }
            if x >= 0 {
                break;
            }
        }
    }
}
