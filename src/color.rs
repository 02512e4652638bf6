//! Packed 32-bit colors
//!
//! Every component (compositor, rasterizer, quantizer, presenter) shares one
//! layout: `A << 24 | R << 16 | G << 8 | B`. On little-endian hosts this is
//! byte-for-byte SDL's `ARGB8888` packed format.

use serde::{Deserialize, Serialize};

/// A packed ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const LIME: Self = Self::rgb(0, 255, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const PURPLE: Self = Self::rgb(128, 0, 128);
    pub const NAVY: Self = Self::rgb(0, 0, 128);
    pub const MAROON: Self = Self::rgb(128, 0, 0);
    pub const TEAL: Self = Self::rgb(0, 128, 128);
    pub const CORN_FLOWER_BLUE: Self = Self::rgb(100, 149, 237);
    pub const CRIMSON: Self = Self::rgb(220, 20, 60);
    pub const GOLD: Self = Self::rgb(255, 215, 0);
    pub const HOT_PINK: Self = Self::rgb(255, 105, 180);
    pub const SKY_BLUE: Self = Self::rgb(135, 206, 235);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Opaque color
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque grey with all channels set to `c`
    #[inline]
    pub const fn grey(c: u8) -> Self {
        Self::rgb(c, c, c)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn with_r(self, r: u8) -> Self {
        Self((self.0 & !0x00FF_0000) | ((r as u32) << 16))
    }

    #[inline]
    pub const fn with_g(self, g: u8) -> Self {
        Self((self.0 & !0x0000_FF00) | ((g as u32) << 8))
    }

    #[inline]
    pub const fn with_b(self, b: u8) -> Self {
        Self((self.0 & !0x0000_00FF) | b as u32)
    }

    #[inline]
    pub const fn with_a(self, a: u8) -> Self {
        Self((self.0 & !0xFF00_0000) | ((a as u32) << 24))
    }

    /// Split into (r, g, b, a)
    #[inline]
    pub const fn channels(self) -> (u8, u8, u8, u8) {
        (self.r(), self.g(), self.b(), self.a())
    }

    /// HSV to RGB color conversion
    /// h: 0-360, s: 0-1, v: 0-1
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let c = v * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
        let m = v - c;

        let (r1, g1, b1) = match h_prime as i32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(
            ((r1 + m) * 255.0) as u8,
            ((g1 + m) * 255.0) as u8,
            ((b1 + m) * 255.0) as u8,
        )
    }

    /// Linear interpolation between two colors, alpha included
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing_layout() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.0, 0x4411_2233);
        assert_eq!(c.channels(), (0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_channel_replacement() {
        let c = Color::rgb(1, 2, 3).with_g(200).with_a(7);
        assert_eq!(c.channels(), (1, 200, 3, 7));
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0), Color::RED);
        assert_eq!(Color::from_hsv(240.0, 1.0, 1.0), Color::BLUE);
        assert_eq!(Color::from_hsv(0.0, 0.0, 0.0), Color::BLACK);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 1.0), Color::WHITE);
    }
}
