//! One-pole attack/decay/release envelope.
//!
//! Each stage chases a target with a one-pole smoother whose coefficient is
//! `c = 1 - exp(-1 / (time · sample_rate))`. Stage times under 1 ms are
//! instant (`c = 1`). The curve is exponential in every stage, so retriggers
//! start from the current level and never click.
//!
//! ```text
//!  1.0 |   /\
//!      |  /  \___________ sustain
//!      | /               \
//!  0.0 |/                 \____
//!        A   D     (hold)   R
//! ```

use libm::expf;

/// Level at which the attack stage hands over to decay.
pub const ATTACK_COMPLETE: f32 = 0.999;

/// Stage times below this are treated as instant.
pub const MIN_STAGE_TIME_S: f32 = 0.001;

/// Envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Rising toward 1.0 while gated.
    Attack,
    /// Falling (or rising) toward the sustain level while gated.
    Decay,
    /// Falling toward 0.0 after gate-off. Also the idle stage.
    #[default]
    Release,
}

/// Attack/decay/release envelope generator.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{Envelope, EnvelopeStage};
///
/// let mut env = Envelope::new(48000.0);
/// env.set_attack(0.005);
/// env.set_decay(0.2);
/// env.set_sustain(0.0);
/// env.set_release(0.2);
///
/// env.gate_on();
/// for _ in 0..2400 {
///     env.advance();
/// }
/// assert_eq!(env.stage(), EnvelopeStage::Decay);
///
/// env.gate_off();
/// assert_eq!(env.stage(), EnvelopeStage::Release);
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    value: f32,
    sample_rate: f32,

    attack_s: f32,
    decay_s: f32,
    release_s: f32,
    sustain: f32,

    attack_coeff: f32,
    decay_coeff: f32,
    release_coeff: f32,
}

impl Envelope {
    /// Create an idle envelope (Release stage, value 0).
    ///
    /// Defaults: attack 5 ms, decay 300 ms, sustain 0, release 300 ms.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            stage: EnvelopeStage::Release,
            value: 0.0,
            sample_rate,
            attack_s: 0.005,
            decay_s: 0.3,
            release_s: 0.3,
            sustain: 0.0,
            attack_coeff: 1.0,
            decay_coeff: 1.0,
            release_coeff: 1.0,
        };
        env.recalculate_coefficients();
        env
    }

    /// Set attack time in seconds. Recomputes only on change.
    pub fn set_attack(&mut self, seconds: f32) {
        if seconds != self.attack_s {
            self.attack_s = seconds;
            self.attack_coeff = one_pole_coeff(seconds, self.sample_rate);
        }
    }

    /// Set decay time in seconds. Recomputes only on change.
    pub fn set_decay(&mut self, seconds: f32) {
        if seconds != self.decay_s {
            self.decay_s = seconds;
            self.decay_coeff = one_pole_coeff(seconds, self.sample_rate);
        }
    }

    /// Set release time in seconds. Recomputes only on change.
    pub fn set_release(&mut self, seconds: f32) {
        if seconds != self.release_s {
            self.release_s = seconds;
            self.release_coeff = one_pole_coeff(seconds, self.sample_rate);
        }
    }

    /// Set the decay target, clamped to [0, 1].
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
    }

    /// Update the sample rate and recompute all coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Enter Attack from the current level.
    pub fn gate_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Enter Release from any stage.
    pub fn gate_off(&mut self) {
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let (target, coeff) = match self.stage {
            EnvelopeStage::Attack => (1.0, self.attack_coeff),
            EnvelopeStage::Decay => (self.sustain, self.decay_coeff),
            EnvelopeStage::Release => (0.0, self.release_coeff),
        };

        self.value = (self.value + coeff * (target - self.value)).clamp(0.0, 1.0);

        if self.stage == EnvelopeStage::Attack && self.value >= ATTACK_COMPLETE {
            self.stage = EnvelopeStage::Decay;
        }
        self.value
    }

    /// Current value in [0, 1].
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Force the envelope to idle at zero.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Release;
        self.value = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = one_pole_coeff(self.attack_s, self.sample_rate);
        self.decay_coeff = one_pole_coeff(self.decay_s, self.sample_rate);
        self.release_coeff = one_pole_coeff(self.release_s, self.sample_rate);
    }
}

/// `1 - exp(-1 / (time · sample_rate))`, or 1.0 for times under 1 ms
/// (including NaN and negative times).
#[inline]
pub fn one_pole_coeff(seconds: f32, sample_rate: f32) -> f32 {
    if seconds.is_nan() || seconds < MIN_STAGE_TIME_S || sample_rate.is_nan() || sample_rate <= 0.0
    {
        return 1.0;
    }
    1.0 - expf(-1.0 / (seconds * sample_rate))
}
