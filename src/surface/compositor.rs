use super::Surface;
use crate::color::Color;
use crate::config::CompositeMode;
use crate::geometry::Rect;

/// Source-over one channel: `(s*sa + d*da*(255-sa)/255) / 255`
#[inline]
fn over_channel(src: u8, dst: u8, sa: u32, da: u32) -> u8 {
    ((src as u32 * sa + dst as u32 * da * (255 - sa) / 255) / 255) as u8
}

/// Linear interpolation of one channel by source alpha
#[inline]
fn lerp_channel(src: u8, dst: u8, sa: u32) -> u8 {
    ((src as u32 * sa + dst as u32 * (255 - sa)) / 255) as u8
}

/// Composite `src` over `dst` according to `mode`
#[inline]
pub(crate) fn composite(src: Color, dst: Color, mode: CompositeMode) -> Color {
    let sa = src.a() as u32;
    match mode {
        CompositeMode::SourceOver => {
            let da = dst.a() as u32;
            if sa == 255 || da == 0 {
                return src;
            }
            Color::rgba(
                over_channel(src.r(), dst.r(), sa, da),
                over_channel(src.g(), dst.g(), sa, da),
                over_channel(src.b(), dst.b(), sa, da),
                (sa + da * (255 - sa) / 255) as u8,
            )
        }
        CompositeMode::Linear => {
            if sa == 255 {
                return src;
            }
            Color::rgba(
                lerp_channel(src.r(), dst.r(), sa),
                lerp_channel(src.g(), dst.g(), sa),
                lerp_channel(src.b(), dst.b(), sa),
                dst.a(),
            )
        }
    }
}

// ============================================================================
// Point access and blitting
// ============================================================================

impl Surface {
    /// Opaque write (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.pixels[idx] = color.0;
        }
    }

    /// Read a pixel, transparent black when out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        if self.in_bounds(x, y) {
            Color(self.pixels[self.index(x, y)])
        } else {
            Color::TRANSPARENT
        }
    }

    /// Composited write (bounds checked)
    ///
    /// Every drawing routine funnels through here. Alpha 0 leaves the pixel
    /// alone; alpha 255 replaces it.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.a() == 0 || !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let dst = Color(self.pixels[idx]);
        self.pixels[idx] = composite(color, dst, self.config.composite).0;
    }

    /// Composite all of `src` with its top-left corner at `(x, y)`
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) {
        self.blit_region(src, x, y, src.bounds());
    }

    /// Composite the `region` of `src` with its top-left corner at `(x, y)`
    ///
    /// Clipped against both surfaces. Source pixels equal to this surface's
    /// chroma key are skipped whatever their alpha.
    pub fn blit_region(&mut self, src: &Surface, x: i32, y: i32, region: Rect) {
        let Some(visible) = region.intersect(&src.bounds()) else {
            return;
        };
        let dx = x.saturating_sub(region.x);
        let dy = y.saturating_sub(region.y);
        let Some(target) = visible.translated(dx, dy).intersect(&self.bounds()) else {
            return;
        };

        let key = self.config.chroma_key;
        for ty in target.y..target.bottom() {
            let sy = ty - dy;
            for tx in target.x..target.right() {
                let c = src.get_pixel(tx - dx, sy);
                if key == Some(c) {
                    continue;
                }
                self.blend(tx, ty, c);
            }
        }
    }
}
