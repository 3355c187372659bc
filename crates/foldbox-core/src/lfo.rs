//! Sine LFO for delay-time modulation.

use core::f32::consts::TAU;
use libm::{floorf, sinf};

/// Phase-accumulating sine LFO producing values in [-1, 1].
///
/// Two instances offset by [`set_phase`](Lfo::set_phase)`(0.25)` form a
/// quadrature pair.
///
/// ```rust
/// use foldbox_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 0.8);
/// lfo.set_phase(0.25);
/// assert!((lfo.next() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Cycles completed, wrapped to [0, 1).
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    rate_hz: f32,
}

impl Lfo {
    /// Sine LFO at `rate_hz`, starting at phase 0.
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: rate_hz / sample_rate,
            sample_rate,
            rate_hz,
        }
    }

    /// Change the rate.
    pub fn set_frequency(&mut self, rate_hz: f32) {
        self.rate_hz = rate_hz;
        self.phase_inc = rate_hz / self.sample_rate;
    }

    /// Rate in Hz.
    pub fn frequency(&self) -> f32 {
        self.rate_hz
    }

    /// Jump to `phase` cycles; only the fractional part is kept.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase - floorf(phase);
    }

    /// Position within the cycle, [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Keep the rate in Hz at a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.rate_hz / sample_rate;
    }

    /// Current value, then advance one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = sinf(self.phase * TAU);
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_stays_bipolar() {
        let mut lfo = Lfo::new(48000.0, 7.0);
        for _ in 0..48000 {
            let v = lfo.next();
            assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn one_period_returns_to_start_phase() {
        let mut lfo = Lfo::new(1000.0, 10.0);
        for _ in 0..100 {
            lfo.next();
        }
        let phase = lfo.phase();
        assert!(phase < 1e-3 || phase > 1.0 - 1e-3, "phase = {phase}");
    }

    #[test]
    fn set_phase_wraps() {
        let mut lfo = Lfo::new(48000.0, 1.0);
        lfo.set_phase(1.75);
        assert!((lfo.phase() - 0.75).abs() < 1e-6);
        assert!((lfo.next() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn sample_rate_change_keeps_rate() {
        let mut lfo = Lfo::new(48000.0, 2.0);
        lfo.set_sample_rate(96000.0);
        assert_eq!(lfo.frequency(), 2.0);
        for _ in 0..48000 {
            lfo.next();
        }
        assert!((lfo.phase() - 0.0).abs() < 1e-2 || lfo.phase() > 0.99);
    }
}
