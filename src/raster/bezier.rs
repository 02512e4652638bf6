//! Bézier curves
//!
//! Curves are cut at every point where the x or y gradient changes sign.
//! Each monotonic piece is then rasterized incrementally, one pixel step at
//! a time, from its longer end. Pieces the incremental walk cannot handle
//! (nearly straight, cusps) are finished with a line.

use super::Extent;
use crate::color::Color;
use crate::surface::Surface;

/// Limit used by the cubic walk once the pixel ahead is known to be valid
const EP: f64 = 0.01;

#[inline]
fn round(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Split a quadratic curve into monotonic pieces `[x0, y0, x1, y1, x2, y2]`
fn quad_segments(
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    mut x2: i32,
    mut y2: i32,
) -> Vec<[i32; 6]> {
    let mut segs = Vec::with_capacity(3);
    let x = x0 as f64 - x1 as f64;
    let y = y0 as f64 - y1 as f64;

    if x * (x2 - x1) as f64 > 0.0 {
        // horizontal cut
        let mut t = (x0 - 2 * x1 + x2) as f64;
        if y * (y2 - y1) as f64 > 0.0 && ((y0 - 2 * y1 + y2) as f64 / t * x).abs() > y.abs() {
            // the vertical cut comes first, reverse the curve
            x0 = x2;
            x2 = x as i32 + x1;
            y0 = y2;
            y2 = y as i32 + y1;
        }
        t = (x0 - x1) as f64 / t;
        let r = (1.0 - t) * ((1.0 - t) * y0 as f64 + 2.0 * t * y1 as f64) + t * t * y2 as f64;
        let t = (x0 as f64 * x2 as f64 - x1 as f64 * x1 as f64) * t / (x0 - x1) as f64;
        let (cx, cy) = (round(t), round(r));
        let r = (y1 - y0) as f64 * (t - x0 as f64) / (x1 - x0) as f64 + y0 as f64;
        segs.push([x0, y0, cx, round(r), cx, cy]);
        let r = (y1 - y2) as f64 * (t - x2 as f64) / (x1 - x2) as f64 + y2 as f64;
        x0 = cx;
        x1 = cx;
        y0 = cy;
        y1 = round(r);
    }

    if (y0 - y1) as f64 * (y2 - y1) as f64 > 0.0 {
        // vertical cut
        let t = (y0 - y1) as f64 / (y0 - 2 * y1 + y2) as f64;
        let r = (1.0 - t) * ((1.0 - t) * x0 as f64 + 2.0 * t * x1 as f64) + t * t * x2 as f64;
        let t = (y0 as f64 * y2 as f64 - y1 as f64 * y1 as f64) * t / (y0 - y1) as f64;
        let (cx, cy) = (round(r), round(t));
        let r = (x1 - x0) as f64 * (t - y0 as f64) / (y1 - y0) as f64 + x0 as f64;
        segs.push([x0, y0, round(r), cy, cx, cy]);
        let r = (x1 - x2) as f64 * (t - y2 as f64) / (y1 - y2) as f64 + x2 as f64;
        x0 = cx;
        x1 = round(r);
        y0 = cy;
        y1 = cy;
    }

    segs.push([x0, y0, x1, y1, x2, y2]);
    segs
}

/// Monotonic cubic piece; inner control points stay fractional
#[derive(Debug, Clone, Copy)]
struct CubicSeg {
    x0: i32,
    y0: i32,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: i32,
    y3: i32,
}

/// Split a cubic curve at the real gradient roots inside the parameter range
///
/// The curve is parametrized over `t` in [-1, 1]; up to four roots are kept.
fn cubic_segments(x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) -> Vec<CubicSeg> {
    let (px0, px1, px2, px3) = (x0 as f64, x1 as f64, x2 as f64, x3 as f64);
    let (py0, py1, py2, py3) = (y0 as f64, y1 as f64, y2 as f64, y3 as f64);
    let xc = px0 + px1 - px2 - px3;
    let xa = xc - 4.0 * (px1 - px2);
    let xb = px0 - px1 - px2 + px3;
    let xd = xb + 4.0 * (px1 + px2);
    let yc = py0 + py1 - py2 - py3;
    let ya = yc - 4.0 * (py1 - py2);
    let yb = py0 - py1 - py2 + py3;
    let yd = yb + 4.0 * (py1 + py2);

    let mut roots = Vec::with_capacity(5);
    for (a, b, c) in [(xa, xb, xc), (ya, yb, yc)] {
        if a == 0.0 {
            if c.abs() < 2.0 * b.abs() {
                roots.push(c / (2.0 * b));
            }
        } else {
            let d = b * b - a * c;
            if d > 0.0 {
                let d = d.sqrt();
                for t in [(b - d) / a, (b + d) / a] {
                    if t.abs() < 1.0 {
                        roots.push(t);
                    }
                }
            }
        }
    }
    roots.sort_by(f64::total_cmp);
    roots.push(1.0);

    let mut segs = Vec::with_capacity(roots.len());
    let (mut sx, mut sy) = (x0, y0);
    let (mut fx0, mut fy0) = (px0, py0);
    let mut t1 = -1.0;
    for t2 in roots {
        let mut fx1 = (t1 * (t1 * xb - 2.0 * xc) - t2 * (t1 * (t1 * xa - 2.0 * xb) + xc) + xd) / 8.0 - fx0;
        let mut fy1 = (t1 * (t1 * yb - 2.0 * yc) - t2 * (t1 * (t1 * ya - 2.0 * yb) + yc) + yd) / 8.0 - fy0;
        let mut fx2 = (t2 * (t2 * xb - 2.0 * xc) - t1 * (t2 * (t2 * xa - 2.0 * xb) + xc) + xd) / 8.0 - fx0;
        let mut fy2 = (t2 * (t2 * yb - 2.0 * yc) - t1 * (t2 * (t2 * ya - 2.0 * yb) + yc) + yd) / 8.0 - fy0;
        let fx3 = (t2 * (t2 * (3.0 * xb - t2 * xa) - 3.0 * xc) + xd) / 8.0;
        let fy3 = (t2 * (t2 * (3.0 * yb - t2 * ya) - 3.0 * yc) + yd) / 8.0;
        fx0 -= fx3;
        fy0 -= fy3;
        let (ex, ey) = (round(fx3), round(fy3));

        // scale the fractional controls to the integer end points
        if fx0 != 0.0 {
            let k = (sx - ex) as f64 / fx0;
            fx1 *= k;
            fx2 *= k;
        }
        if fy0 != 0.0 {
            let k = (sy - ey) as f64 / fy0;
            fy1 *= k;
            fy2 *= k;
        }
        if sx != ex || sy != ey {
            segs.push(CubicSeg {
                x0: sx,
                y0: sy,
                x1: sx as f64 + fx1,
                y1: sy as f64 + fy1,
                x2: sx as f64 + fx2,
                y2: sy as f64 + fy2,
                x3: ex,
                y3: ey,
            });
        }
        sx = ex;
        sy = ey;
        fx0 = fx3;
        fy0 = fy3;
        t1 = t2;
    }
    segs
}

#[inline]
fn mid(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

impl Surface {
    /// Quadratic Bézier from `(x0, y0)` to `(x2, y2)` with control `(x1, y1)`
    pub fn quad_bezier(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        if !self.walkable("quadratic bezier", Extent::of(&[(x0, y0), (x1, y1), (x2, y2)]), 0) {
            return;
        }
        for [ax, ay, bx, by, cx, cy] in quad_segments(x0, y0, x1, y1, x2, y2) {
            self.quad_bezier_seg(ax, ay, bx, by, cx, cy, color);
        }
    }

    /// Anti-aliased quadratic Bézier
    pub fn quad_bezier_aa(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        if !self.walkable("quadratic bezier", Extent::of(&[(x0, y0), (x1, y1), (x2, y2)]), 1) {
            return;
        }
        self.quad_bezier_pieces_aa(x0, y0, x1, y1, x2, y2, color);
    }

    fn quad_bezier_pieces_aa(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        for [ax, ay, bx, by, cx, cy] in quad_segments(x0, y0, x1, y1, x2, y2) {
            self.quad_bezier_seg_aa(ax, ay, bx, by, cx, cy, color);
        }
    }

    /// Rational quadratic Bézier with weight `w` on the control point
    ///
    /// `w == 1` is the plain quadratic, `w < 1` an elliptic arc and `w > 1` a
    /// hyperbolic one. Negative weights draw nothing.
    pub fn quad_rational_bezier(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
        mut x2: i32,
        mut y2: i32,
        w: f32,
        color: Color,
    ) {
        let mut w = w as f64;
        if !(w >= 0.0) {
            tracing::warn!(w, "rational bezier weight must be non-negative");
            return;
        }
        if !self.walkable("rational bezier", Extent::of(&[(x0, y0), (x1, y1), (x2, y2)]), 0) {
            return;
        }
        let x = (x0 - 2 * x1 + x2) as f64;
        let y = (y0 - 2 * y1 + y2) as f64;
        let xx = (x0 - x1) as f64;
        let yy = (y0 - y1) as f64;

        if xx * (x2 - x1) as f64 > 0.0 {
            // horizontal cut
            if yy * (y2 - y1) as f64 > 0.0 && (xx * y).abs() > (yy * x).abs() {
                x0 = x2;
                x2 = xx as i32 + x1;
                y0 = y2;
                y2 = yy as i32 + y1;
            }
            let t = if x0 == x2 || w == 1.0 {
                (x0 - x1) as f64 / x
            } else {
                let mut q = (4.0 * w * w * (x0 - x1) as f64 * (x2 - x1) as f64
                    + (x2 - x0) as f64 * (x2 - x0) as f64)
                    .sqrt();
                if x1 < x0 {
                    q = -q;
                }
                (2.0 * w * (x0 - x1) as f64 - x0 as f64 + x2 as f64 + q) / (2.0 * (1.0 - w) * (x2 - x0) as f64)
            };
            let q = 1.0 / (2.0 * t * (1.0 - t) * (w - 1.0) + 1.0);
            let px = (t * t * (x0 as f64 - 2.0 * w * x1 as f64 + x2 as f64) + 2.0 * t * (w * x1 as f64 - x0 as f64) + x0 as f64) * q;
            let py = (t * t * (y0 as f64 - 2.0 * w * y1 as f64 + y2 as f64) + 2.0 * t * (w * y1 as f64 - y0 as f64) + y0 as f64) * q;
            let mut ww = t * (w - 1.0) + 1.0;
            ww *= ww * q;
            w = ((1.0 - t) * (w - 1.0) + 1.0) * q.sqrt();
            let (cx, cy) = (round(px), round(py));
            let r = (px - x0 as f64) * (y1 - y0) as f64 / (x1 - x0) as f64 + y0 as f64;
            self.quad_rational_bezier_seg(x0, y0, cx, round(r), cx, cy, ww, color);
            let r = (px - x2 as f64) * (y1 - y2) as f64 / (x1 - x2) as f64 + y2 as f64;
            y1 = round(r);
            x0 = cx;
            x1 = cx;
            y0 = cy;
        }

        if (y0 - y1) as f64 * (y2 - y1) as f64 > 0.0 {
            // vertical cut
            let t = if y0 == y2 || w == 1.0 {
                (y0 - y1) as f64 / (y0 - 2 * y1 + y2) as f64
            } else {
                let mut q = (4.0 * w * w * (y0 - y1) as f64 * (y2 - y1) as f64
                    + (y2 - y0) as f64 * (y2 - y0) as f64)
                    .sqrt();
                if y1 < y0 {
                    q = -q;
                }
                (2.0 * w * (y0 - y1) as f64 - y0 as f64 + y2 as f64 + q) / (2.0 * (1.0 - w) * (y2 - y0) as f64)
            };
            let q = 1.0 / (2.0 * t * (1.0 - t) * (w - 1.0) + 1.0);
            let px = (t * t * (x0 as f64 - 2.0 * w * x1 as f64 + x2 as f64) + 2.0 * t * (w * x1 as f64 - x0 as f64) + x0 as f64) * q;
            let py = (t * t * (y0 as f64 - 2.0 * w * y1 as f64 + y2 as f64) + 2.0 * t * (w * y1 as f64 - y0 as f64) + y0 as f64) * q;
            let mut ww = t * (w - 1.0) + 1.0;
            ww *= ww * q;
            w = ((1.0 - t) * (w - 1.0) + 1.0) * q.sqrt();
            let (cx, cy) = (round(px), round(py));
            let r = (x1 - x0) as f64 * (py - y0 as f64) / (y1 - y0) as f64 + x0 as f64;
            self.quad_rational_bezier_seg(x0, y0, round(r), cy, cx, cy, ww, color);
            let r = (x1 - x2) as f64 * (py - y2 as f64) / (y1 - y2) as f64 + x2 as f64;
            x1 = round(r);
            x0 = cx;
            y0 = cy;
            y1 = cy;
        }

        self.quad_rational_bezier_seg(x0, y0, x1, y1, x2, y2, w * w, color);
    }

    /// Cubic Bézier through `(x0, y0)` and `(x3, y3)`
    pub fn cubic_bezier(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: Color,
    ) {
        let hull = Extent::of(&[(x0, y0), (x1, y1), (x2, y2), (x3, y3)]);
        if !self.walkable("cubic bezier", hull, 0) {
            return;
        }
        for seg in cubic_segments(x0, y0, x1, y1, x2, y2, x3, y3) {
            self.cubic_bezier_seg(seg, color);
        }
    }

    /// Anti-aliased cubic Bézier
    ///
    /// Each monotonic piece is halved and every half approximated by the
    /// quadratic sharing its end points, then drawn with [`Surface::quad_bezier_aa`].
    pub fn cubic_bezier_aa(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: Color,
    ) {
        let hull = Extent::of(&[(x0, y0), (x1, y1), (x2, y2), (x3, y3)]);
        if !self.walkable("cubic bezier", hull, 1) {
            return;
        }
        for seg in cubic_segments(x0, y0, x1, y1, x2, y2, x3, y3) {
            let p0 = (seg.x0 as f64, seg.y0 as f64);
            let p1 = (seg.x1, seg.y1);
            let p2 = (seg.x2, seg.y2);
            let p3 = (seg.x3 as f64, seg.y3 as f64);
            let m01 = mid(p0, p1);
            let m12 = mid(p1, p2);
            let m23 = mid(p2, p3);
            let a = mid(m01, m12);
            let b = mid(m12, m23);
            let m = (round(mid(a, b).0) as f64, round(mid(a, b).1) as f64);

            for [q0, q1, q2, q3] in [[p0, m01, a, m], [m, b, m23, p3]] {
                let cx = (3.0 * (q1.0 + q2.0) - (q0.0 + q3.0)) / 4.0;
                let cy = (3.0 * (q1.1 + q2.1) - (q0.1 + q3.1)) / 4.0;
                self.quad_bezier_pieces_aa(
                    q0.0 as i32,
                    q0.1 as i32,
                    round(cx),
                    round(cy),
                    q3.0 as i32,
                    q3.1 as i32,
                    color,
                );
            }
        }
    }

    // ========================================================================
    // Monotonic segments
    // ========================================================================

    fn quad_bezier_seg(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        x1: i32,
        y1: i32,
        mut x2: i32,
        mut y2: i32,
        color: Color,
    ) {
        let mut sx = (x2 - x1) as f64;
        let mut sy = (y2 - y1) as f64;
        let mut xx = (x0 - x1) as f64;
        let mut yy = (y0 - y1) as f64;
        let mut cur = xx * sy - yy * sx;

        if sx * sx + sy * sy > xx * xx + yy * yy {
            // start at the longer end
            x2 = x0;
            x0 = sx as i32 + x1;
            y2 = y0;
            y0 = sy as i32 + y1;
            cur = -cur;
        }

        if cur != 0.0 {
            xx += sx;
            sx = if x0 < x2 { 1.0 } else { -1.0 };
            xx *= sx;
            yy += sy;
            sy = if y0 < y2 { 1.0 } else { -1.0 };
            yy *= sy;
            let mut xy = 2.0 * xx * yy;
            xx *= xx;
            yy *= yy;
            if cur * sx * sy < 0.0 {
                xx = -xx;
                yy = -yy;
                xy = -xy;
                cur = -cur;
            }
            let mut dx = 4.0 * sy * cur * (x1 - x0) as f64 + xx - xy;
            let mut dy = 4.0 * sx * cur * (y0 - y1) as f64 + yy - xy;
            xx += xx;
            yy += yy;
            let mut err = dx + dy + xy;

            loop {
                self.blend(x0, y0, color);
                if x0 == x2 && y0 == y2 {
                    return;
                }
                let y_step = 2.0 * err < dx;
                if 2.0 * err > dy {
                    x0 += sx as i32;
                    dx -= xy;
                    dy += yy;
                    err += dy;
                }
                if y_step {
                    y0 += sy as i32;
                    dy -= xy;
                    dx += xx;
                    err += dx;
                }
                // gradient flipped, finish with a line
                if !(dy < 0.0 && dx > 0.0) {
                    break;
                }
            }
        }
        self.line(x0, y0, x2, y2, color);
    }

    fn quad_bezier_seg_aa(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        x1: i32,
        y1: i32,
        mut x2: i32,
        mut y2: i32,
        color: Color,
    ) {
        let mut sx = (x2 - x1) as f64;
        let mut sy = (y2 - y1) as f64;
        let mut xx = (x0 - x1) as f64;
        let mut yy = (y0 - y1) as f64;
        let mut cur = xx * sy - yy * sx;

        if sx * sx + sy * sy > xx * xx + yy * yy {
            x2 = x0;
            x0 = sx as i32 + x1;
            y2 = y0;
            y0 = sy as i32 + y1;
            cur = -cur;
        }

        if cur != 0.0 {
            xx += sx;
            sx = if x0 < x2 { 1.0 } else { -1.0 };
            xx *= sx;
            yy += sy;
            sy = if y0 < y2 { 1.0 } else { -1.0 };
            yy *= sy;
            let mut xy = 2.0 * xx * yy;
            xx *= xx;
            yy *= yy;
            if cur * sx * sy < 0.0 {
                xx = -xx;
                yy = -yy;
                xy = -xy;
                cur = -cur;
            }
            let mut dx = 4.0 * sy * (x1 - x0) as f64 * cur + xx - xy;
            let mut dy = 4.0 * sx * (y0 - y1) as f64 * cur + yy - xy;
            xx += xx;
            yy += yy;
            let mut err = dx + dy + xy;

            loop {
                let lo = (dx + xy).min(-xy - dy);
                let hi = (dx + xy).max(-xy - dy);
                // approximate distance scale
                let ed = 255.0 / (hi + 2.0 * hi * lo * lo / (4.0 * hi * hi + lo * lo));
                self.plot_aa(x0, y0, color, (ed * (err - dx - dy - xy).abs()) as i32);
                if x0 == x2 && y0 == y2 {
                    return;
                }
                let px = x0;
                let inner = dx - err;
                let y_step = 2.0 * err + dy < 0.0;
                if 2.0 * err + dx > 0.0 {
                    self.plot_aa(x0, y0 + sy as i32, color, (ed * (err - dy).abs()) as i32);
                    x0 += sx as i32;
                    dx -= xy;
                    dy += yy;
                    err += dy;
                }
                if y_step {
                    self.plot_aa(px + sx as i32, y0, color, (ed * inner.abs()) as i32);
                    y0 += sy as i32;
                    dy -= xy;
                    dx += xx;
                    err += dx;
                }
                if !(dy < dx) {
                    break;
                }
            }
        }
        self.line_aa(x0, y0, x2, y2, color);
    }

    /// Monotonic rational quadratic piece with squared weight `w`
    pub(crate) fn quad_rational_bezier_seg(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        x1: i32,
        y1: i32,
        mut x2: i32,
        mut y2: i32,
        w: f64,
        color: Color,
    ) {
        let mut sx = (x2 - x1) as f64;
        let mut sy = (y2 - y1) as f64;
        let mut dx = (x0 - x2) as f64;
        let mut dy = (y0 - y2) as f64;
        let mut xx = (x0 - x1) as f64;
        let mut yy = (y0 - y1) as f64;
        let mut xy = xx * sy + yy * sx;
        let mut cur = xx * sy - yy * sx;

        if cur != 0.0 && w > 0.0 {
            if sx * sx + sy * sy > xx * xx + yy * yy {
                x2 = x0;
                x0 -= dx as i32;
                y2 = y0;
                y0 -= dy as i32;
                cur = -cur;
            }
            xx = 2.0 * (4.0 * w * sx * xx + dx * dx);
            yy = 2.0 * (4.0 * w * sy * yy + dy * dy);
            sx = if x0 < x2 { 1.0 } else { -1.0 };
            sy = if y0 < y2 { 1.0 } else { -1.0 };
            xy = -2.0 * sx * sy * (2.0 * w * xy + dx * dy);

            if cur * sx * sy < 0.0 {
                xx = -xx;
                yy = -yy;
                xy = -xy;
                cur = -cur;
            }
            dx = 4.0 * w * (x1 - x0) as f64 * sy * cur + xx / 2.0 + xy;
            dy = 4.0 * w * (y0 - y1) as f64 * sx * cur + yy / 2.0 + xy;

            if w < 0.5 && (dy > xy || dx < xy) {
                // flat arc: halve it and draw both parts
                let half_w = (w + 1.0) / 2.0;
                let w = w.sqrt();
                let k = 1.0 / (w + 1.0);
                let mx = ((x0 as f64 + 2.0 * w * x1 as f64 + x2 as f64) * k / 2.0 + 0.5).floor() as i32;
                let my = ((y0 as f64 + 2.0 * w * y1 as f64 + y2 as f64) * k / 2.0 + 0.5).floor() as i32;
                let cx = ((w * x1 as f64 + x0 as f64) * k + 0.5).floor() as i32;
                let cy = ((y1 as f64 * w + y0 as f64) * k + 0.5).floor() as i32;
                self.quad_rational_bezier_seg(x0, y0, cx, cy, mx, my, half_w, color);
                let cx = ((w * x1 as f64 + x2 as f64) * k + 0.5).floor() as i32;
                let cy = ((y1 as f64 * w + y2 as f64) * k + 0.5).floor() as i32;
                self.quad_rational_bezier_seg(mx, my, cx, cy, x2, y2, half_w, color);
                return;
            }

            let mut err = dx + dy - xy;
            loop {
                self.blend(x0, y0, color);
                if x0 == x2 && y0 == y2 {
                    return;
                }
                let x_step = 2.0 * err > dy;
                let y_step = 2.0 * (err + yy) < -dy;
                if 2.0 * err < dx || y_step {
                    y0 += sy as i32;
                    dy += xy;
                    dx += xx;
                    err += dx;
                }
                if 2.0 * err > dx || x_step {
                    x0 += sx as i32;
                    dx += xy;
                    dy += yy;
                    err += dy;
                }
                if !(dy <= xy && dx >= xy) {
                    break;
                }
            }
        }
        self.line(x0, y0, x2, y2, color);
    }

    /// Monotonic cubic piece, walked from both ends
    ///
    /// Each leg runs until its error terms stop making sense (cusp, loop or
    /// the other leg's territory); a line closes what is left in between.
    fn cubic_bezier_seg(&mut self, seg: CubicSeg, color: Color) {
        let CubicSeg {
            mut x0,
            mut y0,
            x1,
            y1,
            x2,
            y2,
            mut x3,
            mut y3,
        } = seg;
        let mut sx: i32 = if x0 < x3 { 1 } else { -1 };
        let mut sy: i32 = if y0 < y3 { 1 } else { -1 };
        let xc = -(x0 as f64 + x1 - x2 - x3 as f64).abs();
        let xa = xc - 4.0 * sx as f64 * (x1 - x2);
        let mut xb = sx as f64 * (x0 as f64 - x1 - x2 + x3 as f64);
        let yc = -(y0 as f64 + y1 - y2 - y3 as f64).abs();
        let ya = yc - 4.0 * sy as f64 * (y1 - y2);
        let mut yb = sy as f64 * (y0 as f64 - y1 - y2 + y3 as f64);

        if xa == 0.0 && ya == 0.0 {
            // really a quadratic
            let qx = ((3.0 * x1 - x0 as f64 + 1.0) / 2.0).floor() as i32;
            let qy = ((3.0 * y1 - y0 as f64 + 1.0) / 2.0).floor() as i32;
            self.quad_bezier_seg(x0, y0, qx, qy, x3, y3, color);
            return;
        }

        // squared lengths of the control legs
        let mut near = (x1 - x0 as f64) * (x1 - x0 as f64) + (y1 - y0 as f64) * (y1 - y0 as f64) + 1.0;
        let far = (x2 - x3 as f64) * (x2 - x3 as f64) + (y2 - y3 as f64) * (y2 - y3 as f64) + 1.0;

        for _ in 0..2 {
            let mut ab = xa * yb - xb * ya;
            let mut ac = xa * yc - xc * ya;
            let mut bc = xb * yc - xc * yb;
            // negative inside a self-intersection loop
            let mut ex = ab * (ab + ac - 3.0 * bc) + ac * ac;
            let f: i32 = if ex > 0.0 { 1 } else { (1.0 + 1024.0 / near).sqrt() as i32 };
            let ff = f as f64;
            ab *= ff;
            ac *= ff;
            bc *= ff;
            ex *= ff * ff;

            let mut xy = 9.0 * (ab + ac + bc) / 8.0;
            let mut cb = 8.0 * (xa - ya);
            let mut dx = 27.0 * (8.0 * ab * (yb * yb - ya * yc) + ex * (ya + 2.0 * yb + yc)) / 64.0 - ya * ya * (xy - ya);
            let mut dy = 27.0 * (8.0 * ab * (xb * xb - xa * xc) - ex * (xa + 2.0 * xb + xc)) / 64.0 - xa * xa * (xy + xa);
            let mut xx = 3.0 * (3.0 * ab * (3.0 * yb * yb - ya * ya - 2.0 * ya * yc) - ya * (3.0 * ac * (ya + yb) + ya * cb)) / 4.0;
            let mut yy = 3.0 * (3.0 * ab * (3.0 * xb * xb - xa * xa - 2.0 * xa * xc) - xa * (3.0 * ac * (xa + xb) + xa * cb)) / 4.0;
            xy = xa * ya * (6.0 * ab + 6.0 * ac - 3.0 * bc + cb);
            ac = ya * ya;
            cb = xa * xa;
            xy = 3.0 * (xy + 9.0 * ff * (cb * yb * yc - xb * xc * ac) - 18.0 * xb * yb * ab) / 8.0;

            if ex < 0.0 {
                dx = -dx;
                dy = -dy;
                xx = -xx;
                yy = -yy;
                xy = -xy;
                ac = -ac;
                cb = -cb;
            }
            ab = 6.0 * ya * ac;
            ac = -6.0 * xa * ac;
            bc = 6.0 * ya * cb;
            cb = -6.0 * xa * cb;
            dx += xy;
            ex = dx + dy;
            dy += xy;

            let mut fx = f;
            let mut fy = f;
            let mut ahead_valid = false;
            'leg: while x0 != x3 && y0 != y3 {
                self.blend(x0, y0, color);
                loop {
                    let limit = if ahead_valid { EP } else { xy };
                    if !(dx <= limit && dy >= limit) {
                        break 'leg;
                    }
                    let y_test = 2.0 * ex - dy;
                    if 2.0 * ex >= dx {
                        fx -= 1;
                        dx += xx;
                        ex += dx;
                        xy += ac;
                        dy += xy;
                        yy += bc;
                        xx += ab;
                    }
                    if y_test <= 0.0 {
                        fy -= 1;
                        dy += yy;
                        ex += dy;
                        xy += bc;
                        dx += xy;
                        xx += ac;
                        yy += cb;
                    }
                    if fx <= 0 || fy <= 0 {
                        break;
                    }
                }
                if 2 * fx <= f {
                    x0 += sx;
                    fx += f;
                }
                if 2 * fy <= f {
                    y0 += sy;
                    fy += f;
                }
                if !ahead_valid && dx < 0.0 && dy > 0.0 {
                    ahead_valid = true;
                }
            }

            // walk the other leg from the far end
            std::mem::swap(&mut x0, &mut x3);
            std::mem::swap(&mut y0, &mut y3);
            sx = -sx;
            sy = -sy;
            xb = -xb;
            yb = -yb;
            near = far;
        }
        self.line(x0, y0, x3, y3, color);
    }
}

#[cfg(test)]
mod tests {
    use super::{cubic_segments, quad_segments};
    use crate::color::Color;
    use crate::surface::Surface;

    fn set_points(s: &Surface) -> Vec<(i32, i32)> {
        let w = s.width() as i32;
        s.pixels()
            .iter()
            .enumerate()
            .filter(|(_, &p)| p != 0)
            .map(|(i, _)| (i as i32 % w, i as i32 / w))
            .collect()
    }

    #[test]
    fn test_straight_quad_is_a_line() {
        let mut a = Surface::new(12, 12).unwrap();
        a.quad_bezier(0, 0, 4, 2, 8, 4, Color::WHITE);
        let mut b = Surface::new(12, 12).unwrap();
        b.line(0, 0, 8, 4, Color::WHITE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_quad_hits_end_points() {
        let mut s = Surface::new(16, 16).unwrap();
        s.quad_bezier(1, 1, 10, 1, 10, 10, Color::WHITE);
        assert_eq!(s.get_pixel(1, 1), Color::WHITE);
        assert_eq!(s.get_pixel(10, 10), Color::WHITE);
        for (x, y) in set_points(&s) {
            assert!((1..=10).contains(&x) && (1..=10).contains(&y));
        }
    }

    #[test]
    fn test_quad_split_at_turning_point() {
        let mut s = Surface::new(24, 12).unwrap();
        s.quad_bezier(0, 5, 10, -5, 20, 5, Color::WHITE);
        assert_eq!(s.get_pixel(0, 5), Color::WHITE);
        assert_eq!(s.get_pixel(20, 5), Color::WHITE);
        assert_eq!(s.get_pixel(10, 0), Color::WHITE);
        assert!(set_points(&s).iter().all(|&(_, y)| y <= 5));
    }

    #[test]
    fn test_quad_reversed_when_vertical_cut_comes_first() {
        // y turns at t = 0.4, x at t = 0.6: the pieces run from the far end
        let segs = quad_segments(0, 4, 12, 12, 4, 0);
        assert_eq!(
            segs,
            vec![[4, 0, 7, 5, 7, 6], [7, 6, 7, 7, 6, 7], [6, 7, 4, 7, 0, 4]]
        );
        for [x0, y0, x1, y1, x2, y2] in &segs {
            assert!((x0 - x1) * (x2 - x1) <= 0 && (y0 - y1) * (y2 - y1) <= 0);
        }

        let mut s = Surface::new(10, 10).unwrap();
        s.quad_bezier(0, 4, 12, 12, 4, 0, Color::WHITE);
        for (x, y) in [(0, 4), (4, 0), (7, 6), (6, 7)] {
            assert_eq!(s.get_pixel(x, y), Color::WHITE, "({x}, {y})");
        }
        assert!(set_points(&s).iter().all(|&(x, y)| x <= 7 && y <= 7));
    }

    #[test]
    fn test_cubic_split_at_both_extrema() {
        // x runs linearly, y dips to 4.23 at x = 6.34 and peaks at 15.77 at x = 23.66
        let segs = cubic_segments(0, 10, 10, -10, 20, 30, 30, 10);
        let ends: Vec<_> = segs.iter().map(|g| (g.x0, g.y0, g.x3, g.y3)).collect();
        assert_eq!(ends, vec![(0, 10, 6, 4), (6, 4, 24, 16), (24, 16, 30, 10)]);

        let mut whole = Surface::new(32, 20).unwrap();
        whole.cubic_bezier(0, 10, 10, -10, 20, 30, 30, 10, Color::WHITE);
        let mut pieces = Surface::new(32, 20).unwrap();
        for seg in segs {
            pieces.cubic_bezier_seg(seg, Color::WHITE);
        }
        assert_eq!(whole, pieces);

        let pts = set_points(&whole);
        for (x, y) in [(0, 10), (6, 4), (24, 16), (30, 10)] {
            assert!(pts.contains(&(x, y)), "({x}, {y})");
        }
        // each piece stays inside the box of its own end points
        for &(x, y) in &pts {
            match x {
                0..=5 => assert!((4..=10).contains(&y), "({x}, {y})"),
                7..=23 => assert!((4..=16).contains(&y), "({x}, {y})"),
                25..=30 => assert!((10..=16).contains(&y), "({x}, {y})"),
                6 | 24 => assert!((4..=16).contains(&y), "({x}, {y})"),
                _ => panic!("({x}, {y}) outside the curve's span"),
            }
        }
        assert!((0..=30).all(|x| pts.iter().any(|&(px, _)| px == x)));
    }

    #[test]
    fn test_curves_with_extreme_control_points() {
        let mut s = Surface::new(8, 8).unwrap();
        s.quad_bezier(i32::MIN, 0, 4, 4, i32::MAX, 0, Color::WHITE);
        s.quad_bezier_aa(i32::MAX, i32::MAX, i32::MIN, 3, 0, i32::MIN, Color::WHITE);
        s.quad_rational_bezier(i32::MIN, i32::MIN, i32::MAX, 0, 3, i32::MAX, 0.5, Color::WHITE);
        s.cubic_bezier(i32::MIN, 0, i32::MAX, i32::MAX, i32::MIN, i32::MIN, i32::MAX, 5, Color::WHITE);
        s.cubic_bezier_aa(0, 0, i32::MAX, 0, i32::MAX, 7, 0, 7, Color::WHITE);
        assert!(set_points(&s).is_empty());

        // far but within range: walked and clipped
        s.quad_bezier(-1_000_000, 3, 0, 3, 1_000_000, 3, Color::WHITE);
        assert_eq!(set_points(&s).len(), 8);
        assert!((0..8).all(|x| s.get_pixel(x, 3) == Color::WHITE));
    }

    #[test]
    fn test_quad_aa_is_soft() {
        let mut s = Surface::new(24, 24).unwrap();
        s.quad_bezier_aa(2, 20, 12, -4, 22, 20, Color::WHITE);
        assert!(s.get_pixel(2, 20).a() > 0);
        assert!(s.get_pixel(22, 20).a() > 0);
        assert!(s.pixels().iter().any(|&p| p != 0 && Color(p).a() < 255));
    }

    #[test]
    fn test_rational_weight_zero_is_a_line() {
        let mut a = Surface::new(12, 12).unwrap();
        a.quad_rational_bezier(0, 0, 10, 0, 10, 10, 0.0, Color::WHITE);
        let mut b = Surface::new(12, 12).unwrap();
        b.line(0, 0, 10, 10, Color::WHITE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rational_arc_end_points() {
        let mut s = Surface::new(24, 24).unwrap();
        s.quad_rational_bezier(2, 20, 12, 2, 22, 20, 0.7, Color::WHITE);
        assert_eq!(s.get_pixel(2, 20), Color::WHITE);
        assert_eq!(s.get_pixel(22, 20), Color::WHITE);
        assert!(set_points(&s).len() > 20);
    }

    #[test]
    fn test_rational_negative_weight_is_noop() {
        let mut s = Surface::new(8, 8).unwrap();
        s.quad_rational_bezier(0, 0, 4, 7, 7, 0, -1.0, Color::WHITE);
        assert!(set_points(&s).is_empty());
    }

    #[test]
    fn test_straight_cubic_is_a_line() {
        let mut a = Surface::new(12, 12).unwrap();
        a.cubic_bezier(0, 0, 3, 3, 6, 6, 9, 9, Color::WHITE);
        let mut b = Surface::new(12, 12).unwrap();
        b.line(0, 0, 9, 9, Color::WHITE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cubic_u_shape() {
        let mut s = Surface::new(24, 24).unwrap();
        s.cubic_bezier(2, 2, 2, 20, 20, 20, 20, 2, Color::WHITE);
        assert_eq!(s.get_pixel(2, 2), Color::WHITE);
        assert_eq!(s.get_pixel(20, 2), Color::WHITE);
        let pts = set_points(&s);
        assert!(pts.iter().all(|&(x, y)| (2..=20).contains(&x) && (2..=20).contains(&y)));
        assert!(pts.iter().any(|&(x, y)| x == 11 && (15..=16).contains(&y)));
    }

    #[test]
    fn test_cubic_s_curve_terminates() {
        let mut s = Surface::new(32, 32).unwrap();
        s.cubic_bezier(1, 16, 40, -20, -10, 50, 30, 16, Color::WHITE);
        s.cubic_bezier(5, 5, 25, 25, 5, 25, 25, 5, Color::WHITE);
        assert_eq!(s.get_pixel(1, 16), Color::WHITE);
        assert_eq!(s.get_pixel(30, 16), Color::WHITE);
    }

    #[test]
    fn test_cubic_aa_is_soft() {
        let mut s = Surface::new(24, 24).unwrap();
        s.cubic_bezier_aa(2, 2, 2, 20, 20, 20, 20, 2, Color::WHITE);
        assert!(s.get_pixel(2, 2).a() > 0);
        assert!(s.get_pixel(20, 2).a() > 0);
        assert!(s.pixels().iter().any(|&p| p != 0 && Color(p).a() < 255));
    }
}
