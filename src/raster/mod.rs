//! Primitive rasterizer
//!
//! Every routine here is infallible: geometry is clipped per pixel by
//! [`Surface::blend`], degenerate input draws as little as makes sense.
//!
//! Any `i32` coordinate is accepted. Lines and triangles are cut down to
//! the surface before they are walked. Curves that miss the surface are
//! skipped, and curves reaching further than [`COORD_LIMIT`] from the
//! origin are refused with a warning instead of being walked.
//!
//! Level 0 helpers live in this file (spans, anti-aliased plotting).
//! The shape families are split by curve type:
//! - `line`: Bresenham and distance-weighted AA lines
//! - `circle`: midpoint circles, plain and AA
//! - `ellipse`: axis-aligned and rotated ellipses
//! - `bezier`: quadratic, rational quadratic and cubic curves
//! - `shapes`: rectangles and triangles

mod bezier;
mod circle;
mod ellipse;
mod line;
mod shapes;

use crate::color::Color;
use crate::surface::Surface;

/// Furthest a curve's bounding box may reach from the origin and still be
/// walked. Walks take time proportional to the curve's size.
pub const COORD_LIMIT: i64 = 1 << 24;

/// Saturate a wide coordinate back into `i32`
#[inline]
pub(crate) fn clamp_coord(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Inclusive bounding box in wide coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub(crate) x0: i64,
    pub(crate) y0: i64,
    pub(crate) x1: i64,
    pub(crate) y1: i64,
}

impl Extent {
    pub(crate) fn of(points: &[(i32, i32)]) -> Self {
        points.iter().fold(
            Self {
                x0: i64::MAX,
                y0: i64::MAX,
                x1: i64::MIN,
                y1: i64::MIN,
            },
            |e, &(x, y)| Self {
                x0: e.x0.min(x as i64),
                y0: e.y0.min(y as i64),
                x1: e.x1.max(x as i64),
                y1: e.y1.max(y as i64),
            },
        )
    }

    /// Box of radii `a`, `b` around `(xc, yc)`
    pub(crate) fn around(xc: i32, yc: i32, a: i64, b: i64) -> Self {
        Self {
            x0: xc as i64 - a,
            y0: yc as i64 - b,
            x1: xc as i64 + a,
            y1: yc as i64 + b,
        }
    }

    fn within_limit(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.abs() <= COORD_LIMIT)
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Per-row horizontal extents collected from a plotted outline
///
/// Filled shapes record the outline here and then draw one `hline` per row,
/// so each interior pixel is blended exactly once. Rows outside the target
/// surface are dropped up front, which keeps memory bounded by its height.
pub(crate) struct Spans {
    top: i32,
    rows: Vec<Option<(i32, i32)>>,
}

impl Spans {
    /// Spans covering rows `y0..=y1`, clipped to `surface`
    pub(crate) fn new(surface: &Surface, y0: i32, y1: i32) -> Self {
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let top = y0.max(0);
        let bottom = y1.min(surface.height().min(i32::MAX as u32) as i32 - 1);
        let len = if bottom >= top { (bottom - top + 1) as usize } else { 0 };
        Self {
            top,
            rows: vec![None; len],
        }
    }

    #[inline]
    pub(crate) fn add(&mut self, x: i32, y: i32) {
        let Some(row) = y
            .checked_sub(self.top)
            .filter(|&r| r >= 0)
            .and_then(|r| self.rows.get_mut(r as usize))
        else {
            return;
        };
        *row = Some(match *row {
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
            None => (x, x),
        });
    }

    pub(crate) fn draw(&self, surface: &mut Surface, color: Color) {
        for (i, row) in self.rows.iter().enumerate() {
            if let Some((lo, hi)) = *row {
                surface.hline(lo, hi, self.top + i as i32, color);
            }
        }
    }
}

// ============================================================================
// Level 0 primitives
// ============================================================================

impl Surface {
    /// Horizontal span from `x0` to `x1` inclusive, clamped to the surface
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        if y < 0 || y as u32 >= self.height() {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let start = x0.max(0);
        let end = x1.min(self.width().min(i32::MAX as u32) as i32 - 1);
        for x in start..=end {
            self.blend(x, y, color);
        }
    }

    /// Vertical span from `y0` to `y1` inclusive, clamped to the surface
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        if x < 0 || x as u32 >= self.width() {
            return;
        }
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let start = y0.max(0);
        let end = y1.min(self.height().min(i32::MAX as u32) as i32 - 1);
        for y in start..=end {
            self.blend(x, y, color);
        }
    }

    /// Whether anything inside `ext`, grown by `margin`, lands on the surface
    pub(crate) fn touches(&self, ext: Extent, margin: i64) -> bool {
        let w = self.width() as i64;
        let h = self.height() as i64;
        ext.x1 >= -margin && ext.y1 >= -margin && ext.x0 < w + margin && ext.y0 < h + margin
    }

    /// Gate in front of every curve walk
    ///
    /// False when the curve misses the surface, or when it reaches past
    /// [`COORD_LIMIT`], which is logged.
    pub(crate) fn walkable(&self, shape: &'static str, ext: Extent, margin: i64) -> bool {
        if !self.touches(ext, margin) {
            return false;
        }
        if !ext.within_limit() {
            tracing::warn!(shape, ?ext, limit = COORD_LIMIT, "curve out of range, not drawn");
            return false;
        }
        true
    }

    /// Whether the whole surface lies inside the ellipse centered at
    /// `(xc, yc)` with radii `a`, `b` shrunk by `inset`
    ///
    /// Outlines of such ellipses cannot reach the surface, fills cover all
    /// of it.
    pub(crate) fn inside_ellipse(&self, xc: f64, yc: f64, a: f64, b: f64, inset: f64) -> bool {
        let (a, b) = (a - inset, b - inset);
        if self.is_empty() || a <= 0.0 || b <= 0.0 {
            return false;
        }
        let far_x = xc.abs().max((xc - (self.width() - 1) as f64).abs());
        let far_y = yc.abs().max((yc - (self.height() - 1) as f64).abs());
        (far_x / a).powi(2) + (far_y / b).powi(2) < 1.0
    }

    /// Cut a segment to the surface grown by `margin`
    ///
    /// Segments cheap to walk come back unchanged, so their pixels match an
    /// unclipped walk exactly. Longer ones are cut to the grown surface
    /// (Liang-Barsky) and rounded to pixel positions, which may move them
    /// by up to half a pixel. `None` when nothing is left.
    pub(crate) fn clip_line(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        margin: i64,
    ) -> Option<(i32, i32, i32, i32)> {
        let ext = Extent::of(&[(x0, y0), (x1, y1)]);
        if !self.touches(ext, margin) {
            return None;
        }
        let w = self.width() as i64;
        let h = self.height() as i64;
        let span = (ext.x1 - ext.x0).max(ext.y1 - ext.y0);
        if span <= 2 * (w + h + margin) + 16 {
            return Some((x0, y0, x1, y1));
        }

        let lo = -margin as f64;
        let (right, bottom) = ((w - 1 + margin) as f64, (h - 1 + margin) as f64);
        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [(-dx, fx - lo), (dx, right - fx), (-dy, fy - lo), (dy, bottom - fy)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
        if t0 > t1 {
            return None;
        }
        let at = |t: f64| ((fx + t * dx).round() as i32, (fy + t * dy).round() as i32);
        let (ax, ay) = at(t0);
        let (bx, by) = at(t1);
        Some((ax, ay, bx, by))
    }

    /// Blend `color` scaled by coverage
    ///
    /// `intensity` is the distance term of the AA algorithms: 0 is full
    /// coverage, 255 or more draws nothing.
    #[inline]
    pub(crate) fn plot_aa(&mut self, x: i32, y: i32, color: Color, intensity: i32) {
        let i = intensity.clamp(0, 255) as u32;
        let alpha = (255 - i) * color.a() as u32 / 255;
        if alpha > 0 {
            self.blend(x, y, color.with_a(alpha as u8));
        }
    }
}
