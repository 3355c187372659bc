//! Feedback comb filter with a damped feedback path.
//!
//! The building block of the ambience tail: a delay line whose output is fed
//! back through a one-pole lowpass, so each pass around the loop loses high
//! frequencies the way absorbent surfaces do.

use crate::{Effect, InterpolatedDelay, OnePole, flush_denormal};

/// Comb filter with feedback and lowpass damping.
///
/// # Example
///
/// ```rust
/// use foldbox_core::CombFilter;
///
/// let mut comb = CombFilter::new(48000.0, 1000);
/// comb.set_feedback(0.7);
/// comb.set_damping_hz(4000.0);
///
/// let output = comb.process(1.0);
/// assert_eq!(output, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: InterpolatedDelay,
    damping: OnePole,
    feedback: f32,
}

impl CombFilter {
    /// Create a comb filter with a loop length of `delay_samples`.
    pub fn new(sample_rate: f32, delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            damping: OnePole::new(sample_rate, sample_rate * 0.5),
            feedback: 0.5,
        }
    }

    /// Set the feedback amount, clamped to [0, 0.98].
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    /// Current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping lowpass cutoff in Hz.
    pub fn set_damping_hz(&mut self, freq_hz: f32) {
        self.damping.set_frequency(freq_hz);
    }

    /// Process one sample. The output is the delayed signal.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.read(self.delay.capacity() as f32);
        let damped = self.damping.process(output);
        self.delay.write(flush_denormal(input + damped * self.feedback));
        output
    }

    /// Clear the loop and the damping state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.damping.reset();
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}
