//! Saw + sub oscillator stage with PolyBLEP anti-aliasing.
//!
//! The voice's raw material: a band-limited sawtooth and a sine one octave
//! below it. Both phases run independently and free-run across notes, so a
//! new note never starts on a hard discontinuity unless the voice asks for a
//! [`reset`](SawSubOscillator::reset).

use core::f32::consts::TAU;
use libm::{exp2f, powf, sinf};

/// Largest accepted phase increment. Keeps the two PolyBLEP regions disjoint.
pub const MAX_PHASE_INC: f32 = 0.49;

/// One sample of oscillator output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OscillatorFrame {
    /// PolyBLEP-corrected sawtooth, nominally in [-1, 1].
    pub saw: f32,
    /// Sine at half the saw frequency, in [-1, 1].
    pub sub: f32,
}

/// Sawtooth plus one-octave-down sine sub-oscillator.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{SawSubOscillator, midi_to_freq};
///
/// let mut osc = SawSubOscillator::new();
/// let dt = midi_to_freq(69) / 48000.0;
/// let frame = osc.advance(dt);
/// assert!(frame.saw.abs() <= 1.2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SawSubOscillator {
    /// Saw phase in [0, 1)
    saw_phase: f32,
    /// Sub phase in [0, 1)
    sub_phase: f32,
}

impl SawSubOscillator {
    /// Create an oscillator with both phases at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both phases and return the new frame.
    ///
    /// `dt` is the saw phase increment (`frequency / sample_rate`), clamped
    /// to `[0, MAX_PHASE_INC]`. The sub advances by `dt / 2`.
    #[inline]
    pub fn advance(&mut self, dt: f32) -> OscillatorFrame {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_PHASE_INC)
        } else {
            0.0
        };

        self.saw_phase = wrap_phase(self.saw_phase + dt);
        let saw = 2.0 * self.saw_phase - 1.0 - poly_blep(self.saw_phase, dt);

        self.sub_phase = wrap_phase(self.sub_phase + dt * 0.5);
        let sub = sinf(TAU * self.sub_phase);

        OscillatorFrame { saw, sub }
    }

    /// Zero both phases (hard retrigger).
    pub fn reset(&mut self) {
        self.saw_phase = 0.0;
        self.sub_phase = 0.0;
    }

    /// Current saw phase.
    pub fn saw_phase(&self) -> f32 {
        self.saw_phase
    }

    /// Current sub phase.
    pub fn sub_phase(&self) -> f32 {
        self.sub_phase
    }
}

#[inline]
fn wrap_phase(phase: f32) -> f32 {
    if phase >= 1.0 { phase - 1.0 } else { phase }
}

/// PolyBLEP residual for a rising saw's falling edge.
///
/// Two-sample polynomial correction to subtract from the naive saw:
/// `2x - x² - 1` just after the wrap (`x = t/dt`) and `x² + 2x + 1` just
/// before it (`x = (t-1)/dt`). Zero elsewhere.
///
/// # Arguments
/// * `t` - Phase in [0, 1)
/// * `dt` - Phase increment per sample
///
/// Reference: Välimäki & Huovilainen, "Antialiasing Oscillators in
/// Subtractive Synthesis", IEEE Signal Processing Magazine, 2007.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}

/// Convert a MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * powf(2.0, (f32::from(note) - 69.0) / 12.0)
}

/// Frequency ratio for a pitch-bend position.
///
/// # Arguments
/// * `bend` - Normalized bend in [-1, 1]
/// * `range_semitones` - Bend range at full deflection
#[inline]
pub fn bend_ratio(bend: f32, range_semitones: f32) -> f32 {
    exp2f(bend.clamp(-1.0, 1.0) * range_semitones / 12.0)
}
