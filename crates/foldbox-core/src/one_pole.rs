//! One-pole filter for coupling, tone and damping stages.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! lp[n] = x[n] + coeff * (lp[n-1] - x[n])
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`. The highpass response is the
//! complement `x[n] - lp[n]`, which is how an analog coupling capacitor
//! behaves in front of a gain stage.
//!
//! # Usage
//!
//! ```rust
//! use foldbox_core::{Effect, OnePole, OnePoleMode};
//!
//! let mut lp = OnePole::new(48000.0, 5000.0);
//! let filtered = lp.process(1.0);
//! assert!(filtered < 1.0);
//!
//! let mut hp = OnePole::with_mode(48000.0, 80.0, OnePoleMode::Highpass);
//! assert!(hp.process(1.0) > 0.9);
//! ```
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use crate::{Effect, flush_denormal};
use libm::expf;

/// Response selected for a [`OnePole`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnePoleMode {
    /// 6 dB/oct rolloff above the cutoff.
    #[default]
    Lowpass,
    /// 6 dB/oct rolloff below the cutoff.
    Highpass,
}

/// One-pole (6 dB/oct) lowpass or highpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
    mode: OnePoleMode,
}

impl OnePole {
    /// Create a new one-pole lowpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Cutoff frequency in Hz (clamped to 0..sample_rate/2)
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self::with_mode(sample_rate, freq_hz, OnePoleMode::Lowpass)
    }

    /// Create a one-pole filter with an explicit response.
    pub fn with_mode(sample_rate: f32, freq_hz: f32, mode: OnePoleMode) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
            mode,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency and recalculate the coefficient.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Current cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Current response mode.
    pub fn mode(&self) -> OnePoleMode {
        self.mode
    }

    fn recalculate_coeff(&mut self) {
        let freq = self.freq.clamp(0.0, self.sample_rate * 0.5);
        self.coeff = expf(-core::f32::consts::TAU * freq / self.sample_rate);
    }
}

impl Effect for OnePole {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        match self.mode {
            OnePoleMode::Lowpass => self.state,
            OnePoleMode::Highpass => input - self.state,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    fn reset(&mut self) {
        self.state = 0.0;
    }
}
