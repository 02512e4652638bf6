use super::{clamp_coord, Extent, Spans};
use crate::color::Color;
use crate::surface::Surface;

/// Walk an axis-aligned ellipse given by center and radii
fn walk_ellipse(xm: i32, ym: i32, a: i32, b: i32, mut plot: impl FnMut(i32, i32)) {
    let a2 = a as f64 * a as f64;
    let b2 = b as f64 * b as f64;
    let mut x = -a;
    let mut y = 0;
    let mut err = x as f64 * (2.0 * b2 + x as f64) + b2;

    loop {
        plot(xm - x, ym + y);
        plot(xm + x, ym + y);
        plot(xm + x, ym - y);
        plot(xm - x, ym - y);

        let e2 = 2.0 * err;
        if e2 >= (x * 2 + 1) as f64 * b2 {
            x += 1;
            err += (x * 2 + 1) as f64 * b2;
        }
        if e2 <= (y * 2 + 1) as f64 * a2 {
            y += 1;
            err += (y * 2 + 1) as f64 * a2;
        }
        if x > 0 {
            break;
        }
    }

    // flat ellipses stop early, finish the tips
    while y < b {
        y += 1;
        plot(xm, ym + y);
        plot(xm, ym - y);
    }
}

/// Walk the ellipse inscribed in the rectangle spanned by two corners
///
/// Works for odd extents, where the center falls between pixels.
fn walk_ellipse_rect(
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    mut plot: impl FnMut(i32, i32),
) {
    let a = (x1 as i64 - x0 as i64).abs();
    let b = (y1 as i64 - y0 as i64).abs();
    let b1 = b & 1;
    let (af, bf) = (a as f64, b as f64);
    let mut dx = 4.0 * (1.0 - af) * bf * bf;
    let mut dy = 4.0 * (b1 + 1) as f64 * af * af;
    let mut err = dx + dy + b1 as f64 * af * af;

    if x0 > x1 {
        x0 = x1;
        x1 = x0 + a as i32;
    }
    if y0 > y1 {
        y0 = y1;
    }
    y0 += ((b + 1) / 2) as i32;
    y1 = y0 - b1 as i32;
    let a8 = 8.0 * af * af;
    let b8 = 8.0 * bf * bf;

    loop {
        plot(x1, y0);
        plot(x0, y0);
        plot(x0, y1);
        plot(x1, y1);

        let e2 = 2.0 * err;
        if e2 <= dy {
            y0 += 1;
            y1 -= 1;
            dy += a8;
            err += dy;
        }
        if e2 >= dx || 2.0 * err > dy {
            x0 += 1;
            x1 -= 1;
            dx += b8;
            err += dx;
        }
        if x0 > x1 {
            break;
        }
    }

    // flat ellipses stop early, finish the tips
    while ((y0 - y1) as i64) <= b {
        plot(x0 - 1, y0);
        plot(x1 + 1, y0);
        y0 += 1;
        plot(x0 - 1, y1);
        plot(x1 + 1, y1);
        y1 -= 1;
    }
}

/// Center and radii of the ellipse inscribed in a rectangle
fn rect_center_radii(x0: i32, y0: i32, x1: i32, y1: i32) -> (f64, f64, f64, f64) {
    let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
    ((x0 + x1) / 2.0, (y0 + y1) / 2.0, (x1 - x0).abs() / 2.0, (y1 - y0).abs() / 2.0)
}

impl Surface {
    /// True when the ellipse encloses the whole surface, after handling it:
    /// the outline misses every pixel, the fill covers them all
    fn covered_by_ellipse(&mut self, xc: f64, yc: f64, a: f64, b: f64, fill: bool, color: Color) -> bool {
        if !self.inside_ellipse(xc, yc, a, b, 1.0) {
            return false;
        }
        if fill {
            let all = self.bounds();
            self.rect(all.x, all.y, all.w, all.h, color, true);
        }
        true
    }

    /// Ellipse centered at `(xm, ym)` with radii `a` (horizontal) and `b`
    ///
    /// A zero radius degenerates to a line. Negative radii draw nothing.
    pub fn ellipse(&mut self, xm: i32, ym: i32, a: i32, b: i32, color: Color, fill: bool) {
        if a < 0 || b < 0 {
            return;
        }
        if self.covered_by_ellipse(xm as f64, ym as f64, a as f64, b as f64, fill, color) {
            return;
        }
        if !self.walkable("ellipse", Extent::around(xm, ym, a as i64, b as i64), 0) {
            return;
        }
        if fill {
            let mut spans = Spans::new(self, ym.saturating_sub(b), ym.saturating_add(b));
            walk_ellipse(xm, ym, a, b, |x, y| spans.add(x, y));
            spans.draw(self, color);
        } else {
            walk_ellipse(xm, ym, a, b, |x, y| self.blend(x, y, color));
        }
    }

    /// Ellipse inscribed in the rectangle with corners `(x0, y0)` and `(x1, y1)`
    pub fn ellipse_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, fill: bool) {
        let (xc, yc, a, b) = rect_center_radii(x0, y0, x1, y1);
        if self.covered_by_ellipse(xc, yc, a, b, fill, color) {
            return;
        }
        if !self.walkable("ellipse", Extent::of(&[(x0, y0), (x1, y1)]), 0) {
            return;
        }
        if fill {
            let mut spans = Spans::new(self, y0, y1);
            walk_ellipse_rect(x0, y0, x1, y1, |x, y| spans.add(x, y));
            spans.draw(self, color);
        } else {
            walk_ellipse_rect(x0, y0, x1, y1, |x, y| self.blend(x, y, color));
        }
    }

    /// Anti-aliased ellipse centered at `(xm, ym)`
    pub fn ellipse_aa(&mut self, xm: i32, ym: i32, a: i32, b: i32, color: Color, fill: bool) {
        if a < 0 || b < 0 {
            return;
        }
        let ext = Extent::around(xm, ym, a as i64, b as i64);
        self.ellipse_rect_aa(
            clamp_coord(ext.x0),
            clamp_coord(ext.y0),
            clamp_coord(ext.x1),
            clamp_coord(ext.y1),
            color,
            fill,
        );
    }

    /// Anti-aliased ellipse inscribed in a rectangle
    ///
    /// The distance to the ideal curve is approximated from the two error
    /// increments. The filled variant fills the inner ellipse with spans
    /// first.
    pub fn ellipse_rect_aa(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
        color: Color,
        fill: bool,
    ) {
        let a = (x1 as i64 - x0 as i64).abs();
        let b = (y1 as i64 - y0 as i64).abs();
        if a == 0 || b == 0 {
            self.line(x0, y0, x1, y1, color);
            return;
        }
        if fill && a > 2 && b > 2 {
            let (lx, hx) = (x0.min(x1), x0.max(x1));
            let (ly, hy) = (y0.min(y1), y0.max(y1));
            self.ellipse_rect(lx + 1, ly + 1, hx - 1, hy - 1, color, true);
        }
        let (xc, yc, ra, rb) = rect_center_radii(x0, y0, x1, y1);
        if self.inside_ellipse(xc, yc, ra, rb, 2.0)
            || !self.walkable("ellipse", Extent::of(&[(x0, y0), (x1, y1)]), 1)
        {
            return;
        }

        let b1 = b & 1;
        let (af, bf) = (a as f64, b as f64);
        let mut dx = 4.0 * (af - 1.0) * bf * bf;
        let mut dy = 4.0 * (b1 + 1) as f64 * af * af;
        let mut err = b1 as f64 * af * af - dx + dy;

        if x0 > x1 {
            x0 = x1;
            x1 = x0 + a as i32;
        }
        if y0 > y1 {
            y0 = y1;
        }
        y0 += ((b + 1) / 2) as i32;
        y1 = y0 - b1 as i32;
        let a8 = 8.0 * af * af;
        let b8 = 8.0 * bf * bf;

        loop {
            let lo = dx.min(dy);
            let hi = dx.max(dy);
            let ed = if y0 == y1 + 1 && err > dy && a8 > b8 {
                // x tip
                255.0 * 4.0 / a8
            } else {
                255.0 / (hi + 2.0 * hi * lo * lo / (4.0 * hi * hi + lo * lo))
            };

            let i = (ed * (err + dx - dy).abs()) as i32;
            self.plot_aa(x0, y0, color, i);
            self.plot_aa(x0, y1, color, i);
            self.plot_aa(x1, y0, color, i);
            self.plot_aa(x1, y1, color, i);

            let x_step = 2.0 * err + dy >= 0.0;
            if x_step {
                if x0 >= x1 {
                    break;
                }
                let i = ed * (err + dx);
                if i < 256.0 {
                    let i = i as i32;
                    self.plot_aa(x0, y0 + 1, color, i);
                    self.plot_aa(x0, y1 - 1, color, i);
                    self.plot_aa(x1, y0 + 1, color, i);
                    self.plot_aa(x1, y1 - 1, color, i);
                }
            }
            if 2.0 * err <= dx {
                let i = ed * (dy - err);
                if i < 256.0 {
                    let i = i as i32;
                    self.plot_aa(x0 + 1, y0, color, i);
                    self.plot_aa(x1 - 1, y0, color, i);
                    self.plot_aa(x0 + 1, y1, color, i);
                    self.plot_aa(x1 - 1, y1, color, i);
                }
                y0 += 1;
                y1 -= 1;
                dy += a8;
                err += dy;
            }
            // error increment of the x step is deferred until here
            if x_step {
                x0 += 1;
                x1 -= 1;
                dx -= b8;
                err -= dx;
            }
        }

        x0 -= 1;
        let tip = x0 == x1;
        x1 += 1;
        if tip {
            while ((y0 - y1) as i64) < b {
                let i = (255.0 * 4.0 * (err + dx).abs() / b8) as i32;
                y0 += 1;
                self.plot_aa(x0, y0, color, i);
                self.plot_aa(x1, y0, color, i);
                y1 -= 1;
                self.plot_aa(x0, y1, color, i);
                self.plot_aa(x1, y1, color, i);
                dy += a8;
                err += dy;
            }
        }
    }

    /// Ellipse with radii `a`, `b` rotated by `degrees` around `(xm, ym)`
    pub fn rotated_ellipse(&mut self, xm: i32, ym: i32, a: i32, b: i32, degrees: f32, color: Color) {
        if a < 0 || b < 0 {
            return;
        }
        let angle = (degrees as f64).to_radians();
        let s = angle.sin();
        let mut xd = a as f64 * a as f64;
        let mut yd = b as f64 * b as f64;
        let zd = (xd - yd) * s;
        xd = (xd - zd * s).sqrt();
        yd = (yd + zd * s).sqrt();

        // scale to the integer bounding box
        let a = (xd + 0.5) as i64;
        let b = (yd + 0.5) as i64;
        let zd = if xd * yd > 0.0 {
            zd * a as f64 * b as f64 / (xd * yd)
        } else {
            0.0
        };
        let ext = Extent::around(xm, ym, a, b);
        if !self.walkable("rotated ellipse", ext, 0) {
            return;
        }
        self.rotated_ellipse_rect(
            clamp_coord(ext.x0),
            clamp_coord(ext.y0),
            clamp_coord(ext.x1),
            clamp_coord(ext.y1),
            (4.0 * zd * angle.cos()) as i64,
            color,
        );
    }

    /// Rotated ellipse inside a rectangle, skewed by the integer term `zd`
    ///
    /// Drawn as four rational quadratic Bézier segments. `zd == 0` is the
    /// axis-aligned ellipse.
    pub fn rotated_ellipse_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, zd: i64, color: Color) {
        if zd == 0 {
            self.ellipse_rect(x0, y0, x1, y1, color, false);
            return;
        }
        if !self.walkable("rotated ellipse", Extent::of(&[(x0, y0), (x1, y1)]), 0) {
            return;
        }
        let xd = x1 as i64 - x0 as i64;
        let yd = y1 as i64 - y0 as i64;
        let mut w = xd as f64 * yd as f64;
        if w != 0.0 {
            // squared weight of the corner control point
            w = (w - zd as f64) / (w + w);
        }
        let w = w.clamp(0.0, 1.0);
        let xd = (xd as f64 * w + 0.5).floor() as i32;
        let yd = (yd as f64 * w + 0.5).floor() as i32;

        self.quad_rational_bezier_seg(x0, y0 + yd, x0, y0, x0 + xd, y0, 1.0 - w, color);
        self.quad_rational_bezier_seg(x0, y0 + yd, x0, y1, x1 - xd, y1, w, color);
        self.quad_rational_bezier_seg(x1, y1 - yd, x1, y1, x1 - xd, y1, 1.0 - w, color);
        self.quad_rational_bezier_seg(x1, y1 - yd, x1, y0, x0 + xd, y0, w, color);
    }
}

#[cfg(test)]
mod tests {
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
    fn test_ellipse_extremes() {
        let mut s = Surface::new(21, 21).unwrap();
        s.ellipse(10, 10, 6, 3, Color::WHITE, false);
        for (x, y) in [(16, 10), (4, 10), (10, 13), (10, 7)] {
            assert_eq!(s.get_pixel(x, y), Color::WHITE, "({x}, {y})");
        }
        assert_eq!(s.get_pixel(10, 10), Color::TRANSPARENT);
        for (x, y) in set_points(&s) {
            assert!((4..=16).contains(&x) && (7..=13).contains(&y));
        }
    }

    #[test]
    fn test_zero_radius_degenerates() {
        let mut s = Surface::new(11, 11).unwrap();
        s.ellipse(5, 5, 0, 3, Color::RED, false);
        let pts = set_points(&s);
        assert_eq!(pts.len(), 7);
        assert!(pts.iter().all(|&(x, _)| x == 5));

        let mut s = Surface::new(11, 11).unwrap();
        s.ellipse(5, 5, 0, 0, Color::RED, false);
        assert_eq!(set_points(&s), vec![(5, 5)]);
    }

    #[test]
    fn test_filled_ellipse_blends_once() {
        let mut s = Surface::new(21, 21).unwrap();
        let half = Color::rgba(0, 255, 0, 128);
        s.ellipse(10, 10, 7, 4, half, true);
        assert_eq!(s.get_pixel(10, 10), half);
        assert!(s.pixels().iter().filter(|&&p| p != 0).all(|&p| p == half.0));
    }

    #[test]
    fn test_ellipse_rect_fits_box() {
        for (x0, y0, x1, y1) in [(2, 2, 9, 6), (3, 1, 12, 10), (9, 6, 2, 2)] {
            let mut s = Surface::new(16, 16).unwrap();
            s.ellipse_rect(x0, y0, x1, y1, Color::WHITE, false);
            let (lx, hx) = (x0.min(x1), x0.max(x1));
            let (ly, hy) = (y0.min(y1), y0.max(y1));
            let pts = set_points(&s);
            assert!(pts.iter().all(|&(x, y)| x >= lx && x <= hx && y >= ly && y <= hy));
            assert!(pts.iter().any(|&(x, _)| x == lx));
            assert!(pts.iter().any(|&(x, _)| x == hx));
            assert!(pts.iter().any(|&(_, y)| y == ly));
            assert!(pts.iter().any(|&(_, y)| y == hy));
        }
    }

    #[test]
    fn test_ellipse_rect_fill_covers_center() {
        let mut s = Surface::new(16, 16).unwrap();
        s.ellipse_rect(2, 3, 11, 10, Color::BLUE, true);
        assert_eq!(s.get_pixel(6, 6), Color::BLUE);
        assert_eq!(s.get_pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn test_ellipse_aa_has_soft_edge() {
        let mut s = Surface::new(24, 24).unwrap();
        s.ellipse_aa(12, 12, 8, 5, Color::WHITE, false);
        assert!(!set_points(&s).is_empty());
        assert_eq!(s.get_pixel(12, 12), Color::TRANSPARENT);
        assert!(s.pixels().iter().any(|&p| p != 0 && Color(p).a() < 255));

        let mut s = Surface::new(24, 24).unwrap();
        s.ellipse_aa(12, 12, 8, 5, Color::WHITE, true);
        assert_eq!(s.get_pixel(12, 12), Color::WHITE);
    }

    #[test]
    fn test_ellipse_aa_flat_is_line() {
        let mut s = Surface::new(10, 10).unwrap();
        s.ellipse_aa(5, 5, 3, 0, Color::WHITE, false);
        assert_eq!(set_points(&s).len(), 7);
    }

    #[test]
    fn test_rotated_zero_matches_axis_aligned() {
        let mut a = Surface::new(24, 24).unwrap();
        a.rotated_ellipse(12, 12, 6, 3, 0.0, Color::WHITE);
        let mut b = Surface::new(24, 24).unwrap();
        b.ellipse_rect(6, 9, 18, 15, Color::WHITE, false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotated_rect_is_point_symmetric() {
        let mut s = Surface::new(26, 18).unwrap();
        // w = (240 - 120) / 480 = 0.25, so the arcs meet the box 5 and 3 px in
        s.rotated_ellipse_rect(2, 2, 22, 14, 120, Color::WHITE);
        for (x, y) in [(2, 5), (7, 2), (22, 11), (17, 14)] {
            assert_eq!(s.get_pixel(x, y), Color::WHITE, "({x}, {y})");
        }
        assert_eq!(s.get_pixel(12, 8), Color::TRANSPARENT);

        let pts = set_points(&s);
        assert!(pts.iter().all(|&(x, y)| (2..=22).contains(&x) && (2..=14).contains(&y)));
        // mirrored through the center (12, 8), every pixel has a partner
        for &(x, y) in &pts {
            let (mx, my) = (24 - x, 16 - y);
            assert!(
                pts.iter().any(|&(px, py)| (px - mx).abs() <= 1 && (py - my).abs() <= 1),
                "({x}, {y}) has no mirror near ({mx}, {my})"
            );
        }

        let mut upright = Surface::new(26, 18).unwrap();
        upright.ellipse_rect(2, 2, 22, 14, Color::WHITE, false);
        assert_ne!(s, upright);
    }

    #[test]
    fn test_covering_ellipses() {
        let mut s = Surface::new(8, 8).unwrap();
        s.ellipse(0, 0, i32::MAX, i32::MAX, Color::RED, false);
        s.ellipse_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color::RED, false);
        s.ellipse_aa(4, 4, i32::MAX, i32::MAX, Color::RED, false);
        assert!(set_points(&s).is_empty());

        let half = Color::rgba(255, 0, 0, 128);
        s.ellipse_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, half, true);
        assert!(s.pixels().iter().all(|&p| p == half.0));
        s.clear();
        s.ellipse_aa(4, 4, i32::MAX, i32::MAX, Color::RED, true);
        assert!(s.pixels().iter().all(|&p| p == Color::RED.0));
    }

    #[test]
    fn test_extreme_ellipses_do_not_walk() {
        let mut s = Surface::new(8, 8).unwrap();
        s.ellipse(i32::MAX, i32::MIN, 50, 50, Color::RED, true);
        s.ellipse(4, 4, i32::MAX, 2, Color::RED, false);
        s.ellipse_rect(i32::MIN, 2, i32::MAX, 5, Color::RED, true);
        s.ellipse_aa(i32::MIN, 4, i32::MAX, 3, Color::RED, false);
        s.rotated_ellipse(4, 4, i32::MAX, 5, 45.0, Color::RED);
        s.rotated_ellipse(i32::MAX, i32::MAX, 20, 5, 30.0, Color::RED);
        s.rotated_ellipse_rect(i32::MIN, 0, i32::MAX, 7, 1000, Color::RED);
        assert!(set_points(&s).is_empty());
    }

    #[test]
    fn test_rotated_ellipse_stays_near_center() {
        let mut s = Surface::new(32, 32).unwrap();
        s.rotated_ellipse(16, 16, 9, 4, 30.0, Color::WHITE);
        let pts = set_points(&s);
        assert!(pts.len() > 20);
        assert_eq!(s.get_pixel(16, 16), Color::TRANSPARENT);
        for (x, y) in pts {
            let d2 = (x - 16) * (x - 16) + (y - 16) * (y - 16);
            assert!(d2 <= 11 * 11, "({x}, {y}) too far out");
        }
    }
}
