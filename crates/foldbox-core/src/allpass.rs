//! Schroeder allpass for diffusion.
//!
//! Flat magnitude response, smeared phase. Two of these after the comb bank
//! turn discrete echoes into a smooth tail.

use crate::{InterpolatedDelay, flush_denormal};

/// Schroeder allpass filter.
///
/// ```rust
/// use foldbox_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(225);
/// allpass.set_feedback(0.5);
/// assert_eq!(allpass.process(1.0), -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: InterpolatedDelay,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with a delay of `delay_samples`.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient, clamped to (-1, 1).
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    ///
    /// `w = x + g·w[n-D]`, `y = w[n-D] - g·w`, giving
    /// `H(z) = (-g + z^-D) / (1 - g·z^-D)`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read(self.delay.capacity() as f32);
        let w = flush_denormal(input + delayed * self.feedback);
        self.delay.write(w);
        delayed - self.feedback * w
    }

    /// Clear the delay line.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
