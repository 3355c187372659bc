//! DC blocking filter.
//!
//! First-order highpass with transfer function
//! `H(z) = (1 - z^-1) / (1 - R*z^-1)`, where `R = 1 - 2π·fc/fs`.
//! Asymmetric saturation shifts the signal's mean; this stage removes the
//! offset before it reaches the output.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", Chapter on DC Blocker.

use crate::{Effect, flush_denormal};
use core::f32::consts::PI;

/// DC blocking filter using a first-order highpass.
///
/// ## Example
///
/// ```rust
/// use foldbox_core::{DcBlocker, Effect};
///
/// let mut blocker = DcBlocker::new(48000.0, 10.0);
/// let mut out = 1.0;
/// for _ in 0..48000 {
///     out = blocker.process(1.0);
/// }
/// assert!(out.abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    coeff: f32,
    cutoff_hz: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    /// Create a DC blocker with the given -3 dB cutoff.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `cutoff_hz` - Cutoff frequency, typically 5-20 Hz
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            coeff: Self::calculate_coeff(cutoff_hz, sample_rate),
            cutoff_hz,
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// R = 1 - 2π·fc/fs, clamped to [0.9, 0.9999].
    fn calculate_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
        let r = 1.0 - (2.0 * PI * cutoff_hz / sample_rate);
        r.clamp(0.9, 0.9999)
    }
}

impl Effect for DcBlocker {
    /// y[n] = x[n] - x[n-1] + R * y[n-1]
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(input - self.x_prev + self.coeff * self.y_prev);
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = Self::calculate_coeff(self.cutoff_hz, sample_rate);
    }

    fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }
}
