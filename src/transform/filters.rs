//! Stock pixel filters for [`Surface::transform`](crate::Surface::transform)
//!
//! All of them keep the alpha channel untouched.

use super::PixelFilter;
use crate::color::Color;
use crate::util::Rng;

/// Negate the color channels
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl PixelFilter for Invert {
    #[inline]
    fn apply(&mut self, _x: i32, _y: i32, color: Color) -> Color {
        Color(color.0 ^ 0x00FF_FFFF)
    }
}

/// Replace the color with its luma (ITU-R BT.601 weights)
#[derive(Debug, Clone, Copy, Default)]
pub struct Greyscale;

impl PixelFilter for Greyscale {
    #[inline]
    fn apply(&mut self, _x: i32, _y: i32, color: Color) -> Color {
        let (r, g, b, a) = color.channels();
        let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000;
        Color::grey(luma as u8).with_a(a)
    }
}

/// Add uniform noise in `[-amount, amount]` to each color channel
///
/// Seeded, so the same seed over the same image gives the same result.
#[derive(Debug, Clone)]
pub struct Noise {
    rng: Rng,
    amount: u8,
}

impl Noise {
    pub fn new(seed: u64, amount: u8) -> Self {
        Self {
            rng: Rng::new(seed),
            amount,
        }
    }
}

impl PixelFilter for Noise {
    fn apply(&mut self, _x: i32, _y: i32, color: Color) -> Color {
        let (r, g, b, a) = color.channels();
        let [dr, dg, db] = self.rng.channel_offsets(self.amount);
        let shift = |c: u8, d: i32| (c as i32 + d).clamp(0, 255) as u8;
        Color::rgba(shift(r, dr), shift(g, dg), shift(b, db), a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    fn swatch() -> Surface {
        let mut s = Surface::new(4, 2).unwrap();
        s.set_pixel(0, 0, Color::rgba(10, 20, 30, 40));
        s.set_pixel(1, 0, Color::WHITE);
        s.set_pixel(2, 0, Color::RED);
        s.set_pixel(3, 1, Color::rgb(100, 150, 200));
        s
    }

    #[test]
    fn test_invert_keeps_alpha() {
        let mut s = swatch();
        s.transform(Invert);
        assert_eq!(s.get_pixel(0, 0), Color::rgba(245, 235, 225, 40));
        assert_eq!(s.get_pixel(1, 0), Color::rgb(0, 0, 0));
        // twice is the identity
        s.transform(Invert);
        assert_eq!(s, swatch());
    }

    #[test]
    fn test_greyscale_luma() {
        let mut s = swatch();
        s.transform(Greyscale);
        assert_eq!(s.get_pixel(1, 0), Color::WHITE);
        assert_eq!(s.get_pixel(2, 0), Color::grey(76));
        assert_eq!(s.get_pixel(0, 0).a(), 40);
        let c = s.get_pixel(3, 1);
        assert!(c.r() == c.g() && c.g() == c.b());
    }

    #[test]
    fn test_noise_is_deterministic() {
        let mut a = swatch();
        let mut b = swatch();
        a.transform(Noise::new(7, 16));
        b.transform(Noise::new(7, 16));
        assert_eq!(a, b);
        assert_ne!(a, swatch());
        for (p, q) in a.pixels().iter().zip(swatch().pixels()) {
            let (p, q) = (Color(*p), Color(*q));
            assert_eq!(p.a(), q.a());
            assert!((p.r() as i32 - q.r() as i32).abs() <= 16);
        }
    }

    #[test]
    fn test_noise_zero_amount_is_identity() {
        let mut s = swatch();
        s.transform(Noise::new(1, 0));
        assert_eq!(s, swatch());
    }
}
