//! Shared utilities

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use crate::color::Color;

/// Seeded xorshift64 generator
///
/// Backs the noise filter and the demo's random colors. A seed always
/// replays the same sequence.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // xorshift sticks at zero
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Opaque color from the high bytes of one draw
    pub fn color(&mut self) -> Color {
        let [r, g, b, ..] = self.next_u64().to_be_bytes();
        Color::rgb(r, g, b)
    }

    /// One offset in `[-amount, amount]` per color channel
    ///
    /// All three come from a single draw, 21 bits each.
    #[inline]
    pub fn channel_offsets(&mut self, amount: u8) -> [i32; 3] {
        let span = 2 * amount as u64 + 1;
        let bits = self.next_u64();
        [bits >> 43, bits >> 22, bits >> 1].map(|v| ((v & 0x1F_FFFF) % span) as i32 - amount as i32)
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Monotonic millisecond clock anchored at creation
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    started: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }

    /// Milliseconds since the clock was created
    pub fn ticks(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Sleep the calling thread
    pub fn delay(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolling frame rate average for the demo title bar
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Record a frame, returning the averaged fps
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_zero_seed_still_advances() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_channel_offsets_bounds() {
        let mut rng = Rng::new(7);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            for v in rng.channel_offsets(3) {
                assert!((-3..=3).contains(&v));
                seen[(v + 3) as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.channel_offsets(0), [0, 0, 0]);
    }

    #[test]
    fn test_random_colors_are_opaque() {
        let mut rng = Rng::new(3);
        let colors: Vec<Color> = (0..8).map(|_| rng.color()).collect();
        assert!(colors.iter().all(|c| c.a() == 255));
        assert!(colors.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let a = clock.ticks();
        clock.delay(2);
        assert!(clock.ticks() >= a + 1);
    }
}
