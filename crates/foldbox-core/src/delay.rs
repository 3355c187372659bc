//! Circular-buffer delay line with fractional reads.
//!
//! The buffer is sized once at construction; reads and writes never
//! allocate. Modulated effects (chorus) read at fractional positions with
//! linear interpolation, ambience combs and allpasses read at the full length.
//!
//! # Indexing
//!
//! A delay of `1.0` returns the most recently written sample and a delay of
//! `capacity()` returns the oldest one. Requests outside `[1, capacity]` are
//! clamped.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolated delay line using a circular buffer (heap-allocated once).
///
/// # Example
///
/// ```rust
/// use foldbox_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(16);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(2.0), 1.0);
/// assert_eq!(delay.read(1.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    /// Slot the next write lands in.
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Creates a delay line holding `max_delay_samples` samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Creates a delay line from sample rate and max delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        let max_samples = (sample_rate * max_seconds) as usize + 2;
        #[cfg(feature = "tracing")]
        tracing::trace!(samples = max_samples, max_seconds, "allocating delay line");
        Self::new(max_samples)
    }

    /// Reads a delayed sample, linearly interpolating fractional delays.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, len as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let a = self.tap(whole);
        if frac == 0.0 {
            return a;
        }
        let b = self.tap((whole + 1).min(len));
        a + (b - a) * frac
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Reads at `delay_samples`, then writes `sample`.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let output = self.read(delay_samples);
        self.write(sample);
        output
    }

    /// Clears the delay line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Returns the maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Whole-sample tap, `delay` in `1..=len`.
    #[inline]
    fn tap(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - delay) % len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_delay_returns_written_sample() {
        let mut delay = InterpolatedDelay::new(100);
        delay.write(1.0);
        for _ in 0..9 {
            delay.write(0.0);
        }
        assert_eq!(delay.read(10.0), 1.0);
        assert_eq!(delay.read(9.0), 0.0);
    }

    #[test]
    fn full_length_read_returns_oldest() {
        let mut delay = InterpolatedDelay::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            delay.write(v);
        }
        assert_eq!(delay.read(4.0), 1.0);
        assert_eq!(delay.read(1.0), 4.0);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let mut delay = InterpolatedDelay::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            delay.write(v);
        }
        assert_eq!(delay.read(100.0), 1.0);
        assert_eq!(delay.read(0.0), 4.0);
    }

    #[test]
    fn clear_zeroes_buffer() {
        let mut delay = InterpolatedDelay::new(8);
        delay.write(1.0);
        delay.clear();
        for d in 1..=8 {
            assert_eq!(delay.read(d as f32), 0.0);
        }
    }
}
