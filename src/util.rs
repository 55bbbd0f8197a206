//! Shared utilities

use crate::fixed::Fixed16;

/// Deterministic RNG using xorshift64
/// Same seed, same sequence: demos replay identically frame to frame
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Restart the sequence from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed.max(1);
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random u32
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    /// Get a random f32 in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() & 0xFFFFFF) as f32 / 0x1000000 as f32
    }

    /// Get a random i32 in [min, max]
    ///
    /// # Panics
    /// Panics in debug builds if `min > max`
    #[inline]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "range_i32: min ({}) must be <= max ({})", min, max);
        if min >= max {
            return min;
        }
        let range = (max as i64 - min as i64 + 1) as u64;
        (min as i64 + (self.next_u64() % range) as i64) as i32
    }

    /// Random fixed-point value in [0, r) (negative `r` gives (r, 0])
    pub fn rnd(&mut self, r: Fixed16) -> Fixed16 {
        // 16 random fraction bits scaled by r
        let frac = Fixed16::from_raw((self.next_u64() >> 48) as i32);
        frac * r
    }
}

/// Smallest power of two >= `value` (1 for 0)
pub fn next_pow2(value: usize) -> usize {
    value.max(1).next_power_of_two()
}

pub fn is_pow2(value: usize) -> bool {
    value != 0 && value & (value - 1) == 0
}

// ============================================================================
// FPS Counter
// ============================================================================

use std::collections::VecDeque;
use std::time::Instant;

/// FPS counter with rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call at the start of each frame to record timing
    /// Returns (delta_time, average_fps)
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let avg_dt = self.avg_frame_time();
        let avg_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        (dt, avg_fps)
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time() * 1000.0
    }

    fn avg_frame_time(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        a.reseed(7);
        b.reseed(7);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_rnd_range() {
        let mut rng = Rng::new(1234);
        let limit = Fixed16::from_int(10);
        for _ in 0..1000 {
            let v = rng.rnd(limit);
            assert!(v >= Fixed16::ZERO && v < limit, "rnd out of range: {}", v);
        }
    }

    #[test]
    fn test_range_i32_inclusive() {
        let mut rng = Rng::new(99);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.range_i32(0, 3);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.range_i32(5, 5), 5);
    }

    #[test]
    fn test_next_pow2() {
        assert_eq!(next_pow2(0), 1);
        assert_eq!(next_pow2(1), 1);
        assert_eq!(next_pow2(5), 8);
        assert_eq!(next_pow2(16), 16);
        assert_eq!(next_pow2(17), 32);
        assert!(is_pow2(64));
        assert!(!is_pow2(0));
        assert!(!is_pow2(48));
    }

    #[test]
    fn test_fps_counter_tick() {
        let mut fps = FpsCounter::new(4);
        for _ in 0..10 {
            let (dt, _) = fps.tick();
            assert!(dt >= 0.0);
        }
        assert!(fps.frame_times.len() <= 4);
    }
}
