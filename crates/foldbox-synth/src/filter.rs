//! Zero-delay-feedback 2-pole lowpass (Korg-35 style).
//!
//! Two trapezoidal one-pole stages in series with a resonance path from the
//! output back to the input. The feedback loop is solved in closed form each
//! sample, so resonance stays accurate up to the top of the cutoff range
//! instead of detuning the way a unit-delay feedback loop does.
//!
//! ```text
//!            +-----------------------------------------+
//!            |                                         |
//! x --(*drive)--(+)--> [LP1] --> [LP2] --+--> y        |
//!                ^ -                     |             |
//!                +--- K·sat(s3) <--------+-------------+
//! ```
//!
//! Per sample, with `g = tan(π·fc/fs)` and `G = g/(1+g)`:
//!
//! ```text
//! u   = (x - K·sat(s3)) / (1 + K·G²)
//! v1  = (u - s1)·G;   lp1 = v1 + s1;  s1 = lp1 + v1
//! v2  = (lp1 - s2)·G; lp2 = v2 + s2;  s2 = lp2 + v2
//! s3  = lp2
//! ```
//!
//! Reference: Will Pirkle, "Virtual Analog (VA) Filter Implementation and
//! Comparisons", and Zavalishin, "The Art of VA Filter Design", ch. 3-5.

use core::f32::consts::PI;
use foldbox_core::{flush_denormal, hard_clip, soft_clip};
use libm::tanf;

/// Lowest cutoff the filter accepts.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Upper cutoff bound as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Feedback gain at resonance 1.0.
pub const MAX_FEEDBACK: f32 = 12.0;

/// Hard-clip ceiling of the feedback saturator.
pub const FEEDBACK_CLIP: f32 = 3.0;

/// Nonlinearity applied to the feedback tap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Saturator {
    /// Clamp to ±3. Lets resonance scream before it limits.
    #[default]
    HardClip,
    /// `tanh`, softer and darker self-oscillation.
    Tanh,
}

impl Saturator {
    /// Apply the nonlinearity. Bounded for every finite input.
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::HardClip => hard_clip(x, FEEDBACK_CLIP),
            Self::Tanh => soft_clip(x),
        }
    }
}

/// Internal rate of the feedback solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Oversampling {
    /// One solver step per sample.
    #[default]
    None,
    /// Two solver steps per sample at twice the rate, input held.
    Double,
}

impl Oversampling {
    fn factor(self) -> f32 {
        match self {
            Self::None => 1.0,
            Self::Double => 2.0,
        }
    }
}

/// ZDF lowpass with saturating resonance feedback.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::ZdfFilter;
///
/// let mut filter = ZdfFilter::new(48000.0);
/// filter.set_cutoff(1000.0);
/// filter.set_resonance(0.5);
///
/// let mut y = 0.0;
/// for _ in 0..4800 {
///     y = filter.process(1.0);
/// }
/// assert!(y > 0.0 && y < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ZdfFilter {
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    drive: f32,
    saturator: Saturator,
    oversampling: Oversampling,

    /// `g/(1+g)` for the current cutoff at the solver rate
    big_g: f32,
    /// `K = MAX_FEEDBACK · resonance`
    feedback: f32,

    s1: f32,
    s2: f32,
    s3: f32,
}

impl ZdfFilter {
    /// Create a filter at 1 kHz, no resonance, no drive.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.0,
            drive: 0.0,
            saturator: Saturator::default(),
            oversampling: Oversampling::default(),
            big_g: 0.0,
            feedback: 0.0,
            s1: 0.0,
            s2: 0.0,
            s3: 0.0,
        };
        filter.recalculate_coefficients();
        filter
    }

    /// Set cutoff in Hz, clamped to `[MIN_CUTOFF_HZ, 0.49·fs]`.
    ///
    /// The `tan` is only evaluated when the clamped value changes.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let clamped = self.clamp_cutoff(cutoff_hz);
        if clamped != self.cutoff {
            self.cutoff = clamped;
            self.recalculate_coefficients();
        }
    }

    /// Set resonance in [0, 1].
    #[inline]
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = clamp_unit(resonance);
        self.feedback = MAX_FEEDBACK * self.resonance;
    }

    /// Set drive in [0, 1]; the input is scaled by `1 + drive`.
    #[inline]
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = clamp_unit(drive);
    }

    /// Select the feedback nonlinearity.
    pub fn set_saturator(&mut self, saturator: Saturator) {
        self.saturator = saturator;
    }

    /// Select the solver rate.
    pub fn set_oversampling(&mut self, oversampling: Oversampling) {
        if oversampling != self.oversampling {
            self.oversampling = oversampling;
            self.recalculate_coefficients();
        }
    }

    /// Update the sample rate, re-clamping the cutoff.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.clamp_cutoff(self.cutoff);
        self.recalculate_coefficients();
    }

    /// Current (clamped) cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current resonance in [0, 1].
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Current drive in [0, 1].
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// The two integrator states and the feedback state.
    pub fn state(&self) -> [f32; 3] {
        [self.s1, self.s2, self.s3]
    }

    /// Zero all three states.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
        self.s3 = 0.0;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let x = input * (1.0 + self.drive);
        match self.oversampling {
            Oversampling::None => self.tick(x),
            Oversampling::Double => {
                self.tick(x);
                self.tick(x)
            }
        }
    }

    #[inline]
    fn tick(&mut self, x: f32) -> f32 {
        let big_g = self.big_g;
        let k = self.feedback;

        let u = (x - k * self.saturator.apply(self.s3)) / (1.0 + k * big_g * big_g);

        let v1 = (u - self.s1) * big_g;
        let lp1 = v1 + self.s1;
        self.s1 = flush_denormal(lp1 + v1);

        let v2 = (lp1 - self.s2) * big_g;
        let lp2 = v2 + self.s2;
        self.s2 = flush_denormal(lp2 + v2);

        self.s3 = flush_denormal(lp2);
        lp2
    }

    fn clamp_cutoff(&self, cutoff_hz: f32) -> f32 {
        let max = (self.sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF_HZ);
        if cutoff_hz.is_nan() {
            MIN_CUTOFF_HZ
        } else {
            cutoff_hz.clamp(MIN_CUTOFF_HZ, max)
        }
    }

    fn recalculate_coefficients(&mut self) {
        let solver_rate = self.sample_rate * self.oversampling.factor();
        let g = tanf(PI * self.cutoff / solver_rate);
        self.big_g = g / (1.0 + g);
    }
}

#[inline]
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_gain(filter: &mut ZdfFilter, freq: f32) -> f32 {
        let sr = 48000.0;
        let mut peak = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(2.0 * PI * freq * i as f32 / sr) * 0.1;
            let y = filter.process(x);
            if i > 24000 {
                peak = peak.max(y.abs());
            }
        }
        peak / 0.1
    }

    #[test]
    fn passes_dc_without_resonance() {
        let mut filter = ZdfFilter::new(48000.0);
        filter.set_cutoff(1000.0);
        let mut y = 0.0;
        for _ in 0..48000 {
            y = filter.process(0.5);
        }
        assert!((y - 0.5).abs() < 1e-3, "DC gain should be unity, got {}", y / 0.5);
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut filter = ZdfFilter::new(48000.0);
        filter.set_cutoff(500.0);
        let gain = sine_gain(&mut filter, 8000.0);
        assert!(gain < 0.01, "8 kHz through 500 Hz 2-pole: gain {gain}");
    }

    #[test]
    fn resonance_adds_peak_at_cutoff() {
        let mut flat = ZdfFilter::new(48000.0);
        flat.set_cutoff(1000.0);
        let flat_gain = sine_gain(&mut flat, 1000.0);

        let mut peaky = ZdfFilter::new(48000.0);
        peaky.set_cutoff(1000.0);
        peaky.set_resonance(0.3);
        let peak_gain = sine_gain(&mut peaky, 1000.0);

        assert!(
            peak_gain > flat_gain * 1.5,
            "resonance should boost cutoff region: {flat_gain} -> {peak_gain}"
        );
    }

    #[test]
    fn cutoff_is_clamped() {
        let mut filter = ZdfFilter::new(48000.0);
        filter.set_cutoff(1.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
        filter.set_cutoff(1.0e9);
        assert_eq!(filter.cutoff(), 48000.0 * MAX_CUTOFF_RATIO);
        filter.set_cutoff(f32::NAN);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
    }

    #[test]
    fn resonance_and_drive_are_clamped() {
        let mut filter = ZdfFilter::new(48000.0);
        filter.set_resonance(4.0);
        filter.set_drive(-1.0);
        assert_eq!(filter.resonance(), 1.0);
        assert_eq!(filter.drive(), 0.0);
    }

    #[test]
    fn states_flush_to_exact_zero() {
        let mut filter = ZdfFilter::new(48000.0);
        filter.set_cutoff(200.0);
        filter.set_resonance(0.2);
        filter.process(1.0);
        for _ in 0..200_000 {
            filter.process(0.0);
        }
        assert_eq!(filter.state(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn reset_zeroes_states() {
        let mut filter = ZdfFilter::new(48000.0);
        for _ in 0..100 {
            filter.process(1.0);
        }
        filter.reset();
        assert_eq!(filter.state(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn full_resonance_stays_bounded_with_both_saturators() {
        for saturator in [Saturator::HardClip, Saturator::Tanh] {
            for oversampling in [Oversampling::None, Oversampling::Double] {
                let mut filter = ZdfFilter::new(48000.0);
                filter.set_saturator(saturator);
                filter.set_oversampling(oversampling);
                filter.set_cutoff(2000.0);
                filter.set_resonance(1.0);
                filter.set_drive(1.0);
                for i in 0..48000 {
                    let x = if i % 100 < 50 { 1.0 } else { -1.0 };
                    let y = filter.process(x);
                    assert!(
                        y.is_finite() && y.abs() < 50.0,
                        "{saturator:?}/{oversampling:?} diverged: {y}"
                    );
                }
            }
        }
    }
}
