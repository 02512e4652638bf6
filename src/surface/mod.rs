//! Surfaces: owned 32-bit pixel buffers

mod compositor;

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Reserve a zeroed buffer of `width * height` pixels without aborting on failure
fn alloc_pixels(width: u32, height: u32) -> Result<Vec<u32>> {
    let len = pixel_count(width, height)?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { bytes: len.saturating_mul(4) })?;
    pixels.resize(len, 0);
    Ok(pixels)
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::OutOfMemory { bytes: usize::MAX })
}

// ============================================================================
// Surface
// ============================================================================

/// Packed ARGB pixel buffer
///
/// Row-major, `pixels.len() == width * height` at all times. Every drawing
/// routine clips against the surface bounds, so coordinates are plain `i32`
/// and may fall anywhere.
#[derive(Debug, PartialEq, Eq)]
pub struct Surface {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    config: RenderConfig,
}

impl Surface {
    /// Allocate a zeroed (transparent black) surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: RenderConfig) -> Result<Self> {
        let pixels = alloc_pixels(width, height)?;
        tracing::debug!(width, height, "allocated surface");
        Ok(Self {
            pixels,
            width,
            height,
            config,
        })
    }

    /// Wrap an existing buffer, e.g. one produced by an image decoder
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            tracing::warn!(width, height, len = pixels.len(), "pixel buffer size mismatch");
            return Err(Error::InvalidParameters(format!(
                "{}x{} surface needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            config: RenderConfig::default(),
        })
    }

    /// Release the buffer, leaving an empty 0x0 surface
    ///
    /// Calling this on an already destroyed surface does nothing.
    pub fn destroy(&mut self) {
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    /// Reallocate to `width x height` and zero every pixel
    ///
    /// Previous content is not kept. On failure the surface is left untouched.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        let len = pixel_count(width, height)?;
        let additional = len.saturating_sub(self.pixels.len());
        self.pixels
            .try_reserve_exact(additional)
            .map_err(|_| Error::OutOfMemory { bytes: len.saturating_mul(4) })?;
        self.pixels.clear();
        self.pixels.resize(len, 0);
        self.pixels.shrink_to(len);
        self.width = width;
        self.height = height;
        tracing::debug!(width, height, "reset surface");
        Ok(())
    }

    /// Independent copy with identical pixels and config
    pub fn try_clone(&self) -> Result<Self> {
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(self.pixels.len())
            .map_err(|_| Error::OutOfMemory { bytes: self.pixels.len().saturating_mul(4) })?;
        pixels.extend_from_slice(&self.pixels);
        Ok(Self {
            pixels,
            width: self.width,
            height: self.height,
            config: self.config,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The whole surface as a rectangle at the origin
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::of_size(self.width, self.height)
    }

    #[inline]
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    #[inline]
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub(crate) fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Buffer index for an in-bounds pixel
    #[inline]
    pub(crate) fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Set every pixel to `color`, no blending
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.0);
    }

    /// Zero every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Raw packed pixels, row-major
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Raw bytes in host order for texture upload (`ARGB8888` on little-endian)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }
}
