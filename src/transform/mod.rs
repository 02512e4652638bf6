//! Geometric transforms and per-pixel filters

pub mod filters;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::surface::Surface;

/// Per-pixel mapping applied by [`Surface::transform`]
///
/// Closures `FnMut(x, y, color) -> color` implement this directly.
pub trait PixelFilter {
    fn apply(&mut self, x: i32, y: i32, color: Color) -> Color;
}

impl<F> PixelFilter for F
where
    F: FnMut(i32, i32, Color) -> Color,
{
    #[inline]
    fn apply(&mut self, x: i32, y: i32, color: Color) -> Color {
        self(x, y, color)
    }
}

impl Surface {
    /// Nearest-neighbor copy at `width x height`
    ///
    /// Source steps are 16.16 fixed point. A zero target dimension is an
    /// `InvalidParameters` error.
    pub fn resized(&self, width: u32, height: u32) -> Result<Surface> {
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "resize target must not be empty");
            return Err(Error::InvalidParameters(format!(
                "resize target {width}x{height} has a zero dimension"
            )));
        }
        let mut out = Surface::with_config(width, height, self.config())?;
        tracing::trace!(from_w = self.width(), from_h = self.height(), width, height, "resize");
        if self.is_empty() {
            return Ok(out);
        }

        let x_ratio = ((self.width() as u64) << 16) / width as u64 + 1;
        let y_ratio = ((self.height() as u64) << 16) / height as u64 + 1;
        let (sw, sh) = (self.width() as u64, self.height() as u64);
        let src = self.pixels();
        for (row, dst) in out.pixels_mut().chunks_exact_mut(width as usize).enumerate() {
            let sy = ((row as u64 * y_ratio) >> 16).min(sh - 1);
            let line = &src[(sy * sw) as usize..((sy + 1) * sw) as usize];
            for (col, px) in dst.iter_mut().enumerate() {
                let sx = ((col as u64 * x_ratio) >> 16).min(sw - 1);
                *px = line[sx as usize];
            }
        }
        Ok(out)
    }

    /// Copy rotated by `degrees` around the top-left corner
    ///
    /// The result is sized to the bounding box of the rotated corners. Each
    /// destination pixel center is mapped back into the source and the hit
    /// pixel is blended onto a transparent surface with this surface's config.
    pub fn rotated(&self, degrees: f32) -> Result<Surface> {
        if !degrees.is_finite() {
            tracing::warn!(degrees, "rotation angle must be finite");
            return Err(Error::InvalidParameters(format!("rotation angle {degrees} is not finite")));
        }
        let theta = (degrees as f64).to_radians();
        let (s, c) = theta.sin_cos();
        let (w, h) = (self.width() as f64, self.height() as f64);

        let corners = [(0.0, 0.0), (-h * s, h * c), (w * c - h * s, h * c + w * s), (w * c, w * s)];
        let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
        let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        // trim float noise so exact multiples of 90 keep their size
        let dw = (max_x - min_x - 1e-3).ceil().max(0.0) as u32;
        let dh = (max_y - min_y - 1e-3).ceil().max(0.0) as u32;

        let mut out = Surface::with_config(dw, dh, self.config())?;
        tracing::trace!(degrees, width = dw, height = dh, "rotate");
        for x in 0..dw as i32 {
            for y in 0..dh as i32 {
                let px = x as f64 + 0.5 + min_x;
                let py = y as f64 + 0.5 + min_y;
                let sx = (px * c + py * s).floor() as i32;
                let sy = (py * c - px * s).floor() as i32;
                if self.in_bounds(sx, sy) {
                    out.blend(x, y, Color(self.pixels()[self.index(sx, sy)]));
                }
            }
        }
        Ok(out)
    }

    /// Replace the 4-connected region of the color at `(x, y)` with `color`
    ///
    /// Scanline fill with an explicit stack of seeds. Pixels are written, not
    /// blended. Out of bounds seeds or a seed already of `color` do nothing.
    pub fn flood_fill(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let old = self.pixels()[self.index(x, y)];
        let new = color.0;
        if old == new {
            return;
        }

        let w = self.width() as usize;
        let h = self.height() as usize;
        let pixels = self.pixels_mut();
        let mut stack = vec![(x as usize, y as usize)];
        while let Some((sx, sy)) = stack.pop() {
            let row = sy * w;
            if pixels[row + sx] != old {
                continue;
            }
            let mut lo = sx;
            while lo > 0 && pixels[row + lo - 1] == old {
                lo -= 1;
            }
            let mut hi = sx;
            while hi + 1 < w && pixels[row + hi + 1] == old {
                hi += 1;
            }
            pixels[row + lo..=row + hi].fill(new);

            // one seed per run of matching pixels on the neighbor rows
            let above = sy.checked_sub(1);
            let below = Some(sy + 1).filter(|&ny| ny < h);
            for ny in [above, below].into_iter().flatten() {
                let nrow = ny * w;
                let mut in_run = false;
                for nx in lo..=hi {
                    let hit = pixels[nrow + nx] == old;
                    if hit && !in_run {
                        stack.push((nx, ny));
                    }
                    in_run = hit;
                }
            }
        }
    }

    /// Map every pixel through `filter`, column by column
    pub fn transform(&mut self, mut filter: impl PixelFilter) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        tracing::trace!(width = w, height = h, "transform");
        for x in 0..w {
            for y in 0..h {
                let color = filter.apply(x, y, self.get_pixel(x, y));
                self.set_pixel(x, y, color);
            }
        }
    }
}
