//! Post-mix effects chain: one 0-1 control, two selectable characters.
//!
//! - [`FxMode::Morph`]: dry -> chorus at 0.5 -> ambience at 1.0. The chorus
//!   always runs because it feeds the ambience.
//! - [`FxMode::Overdrive`]: amp-style asymmetric overdrive whose drive is the
//!   control itself.
//!
//! Both modes return the input untouched below [`BYPASS_THRESHOLD`].

use alloc::vec::Vec;
use foldbox_core::{
    AllpassFilter, CombFilter, DcBlocker, Effect, InterpolatedDelay, Lfo, OnePole, OnePoleMode,
    asymmetric_clip, flush_denormal, lerp,
};
use libm::{ceilf, tanhf};

/// Amounts below this pass the input through bit-for-bit.
pub const BYPASS_THRESHOLD: f32 = 0.001;

/// Effects character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FxMode {
    /// Three-way crossfade dry / chorus / ambience.
    #[default]
    Morph,
    /// Single saturating stage.
    Overdrive,
}

/// Two-voice chorus with quadrature LFOs and light feedback.
#[derive(Debug, Clone)]
pub struct Chorus {
    delay1: InterpolatedDelay,
    delay2: InterpolatedDelay,
    lfo1: Lfo,
    lfo2: Lfo,
    base_delay_samples: f32,
    max_mod_samples: f32,
    depth: f32,
    feedback: f32,
    sample_rate: f32,
}

impl Chorus {
    const BASE_DELAY_MS: f32 = 15.0;
    const MAX_MOD_MS: f32 = 5.0;

    /// Chorus at 0.8 Hz, depth 0.4, feedback 0.2.
    pub fn new(sample_rate: f32) -> Self {
        let max_delay_ms = Self::BASE_DELAY_MS + Self::MAX_MOD_MS;
        let capacity = ceilf(max_delay_ms / 1000.0 * sample_rate) as usize + 2;

        let lfo1 = Lfo::new(sample_rate, 0.8);
        let mut lfo2 = Lfo::new(sample_rate, 0.8);
        lfo2.set_phase(0.25);

        Self {
            delay1: InterpolatedDelay::new(capacity),
            delay2: InterpolatedDelay::new(capacity),
            lfo1,
            lfo2,
            base_delay_samples: Self::BASE_DELAY_MS / 1000.0 * sample_rate,
            max_mod_samples: Self::MAX_MOD_MS / 1000.0 * sample_rate,
            depth: 0.4,
            feedback: 0.2,
            sample_rate,
        }
    }

    /// LFO rate in Hz, clamped to [0.05, 10].
    pub fn set_rate(&mut self, rate_hz: f32) {
        let rate = rate_hz.clamp(0.05, 10.0);
        self.lfo1.set_frequency(rate);
        self.lfo2.set_frequency(rate);
    }

    /// Feedback in [0, 0.9].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }
}

impl Effect for Chorus {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let swing = self.depth * self.max_mod_samples;
        let d1 = self.base_delay_samples + self.lfo1.next() * swing;
        let d2 = self.base_delay_samples + self.lfo2.next() * swing;

        let wet1 = self.delay1.read(d1);
        let wet2 = self.delay2.read(d2);

        self.delay1.write(flush_denormal(input + wet1 * self.feedback));
        self.delay2.write(flush_denormal(input + wet2 * self.feedback));

        0.5 * input + 0.5 * (wet1 + wet2) * 0.5
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            let (rate, depth, feedback) = (self.lfo1.frequency(), self.depth, self.feedback);
            *self = Self::new(sample_rate);
            self.set_rate(rate);
            self.depth = depth;
            self.feedback = feedback;
        }
    }

    fn reset(&mut self) {
        self.delay1.clear();
        self.delay2.clear();
        self.lfo1.set_phase(0.0);
        self.lfo2.set_phase(0.25);
    }
}

/// Freeverb-style ambience: four damped combs into two allpasses.
#[derive(Debug, Clone)]
pub struct Ambience {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
    sample_rate: f32,
}

impl Ambience {
    /// Comb lengths at 44.1 kHz.
    pub const COMB_TUNINGS: [usize; 4] = [1116, 1188, 1277, 1356];
    /// Allpass lengths at 44.1 kHz.
    pub const ALLPASS_TUNINGS: [usize; 2] = [556, 441];
    /// Comb feedback.
    pub const FEEDBACK: f32 = 0.70;
    /// Comb damping cutoff, Hz.
    pub const DAMPING_HZ: f32 = 4000.0;

    /// Build the tank for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let scale = sample_rate / 44_100.0;
        let scaled = |n: usize| ((n as f32 * scale) as usize).max(1);

        let combs = Self::COMB_TUNINGS
            .iter()
            .map(|&n| {
                let mut comb = CombFilter::new(sample_rate, scaled(n));
                comb.set_feedback(Self::FEEDBACK);
                comb.set_damping_hz(Self::DAMPING_HZ);
                comb
            })
            .collect();

        let allpasses = Self::ALLPASS_TUNINGS
            .iter()
            .map(|&n| {
                let mut ap = AllpassFilter::new(scaled(n));
                ap.set_feedback(0.5);
                ap
            })
            .collect();

        Self {
            combs,
            allpasses,
            sample_rate,
        }
    }
}

impl Effect for Ambience {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(input);
        }
        wet *= 0.25;
        for ap in &mut self.allpasses {
            wet = ap.process(wet);
        }
        lerp(input, wet, 0.5)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            *self = Self::new(sample_rate);
        }
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for ap in &mut self.allpasses {
            ap.clear();
        }
    }
}

/// Amp-style overdrive with coupling high-pass and cabinet low-pass.
///
/// ```text
/// in -> HP 80 Hz -> × (1 + 39·d²) -> asym clip -> × 0.5/tanh(0.5·pre)
///    -> DC block 10 Hz -> LP 5 kHz -> out
/// ```
#[derive(Debug, Clone)]
pub struct Overdrive {
    hp_pre: OnePole,
    lp_post: OnePole,
    dc: DcBlocker,
    drive: f32,
    pre_gain: f32,
    post_gain: f32,
}

impl Overdrive {
    /// Overdrive at zero drive.
    pub fn new(sample_rate: f32) -> Self {
        let mut od = Self {
            hp_pre: OnePole::with_mode(sample_rate, 80.0, OnePoleMode::Highpass),
            lp_post: OnePole::new(sample_rate, 5000.0),
            dc: DcBlocker::new(sample_rate, 10.0),
            drive: -1.0,
            pre_gain: 1.0,
            post_gain: 1.0,
        };
        od.set_drive(0.0);
        od
    }

    /// Drive in [0, 1]. Gains are recomputed only on change.
    #[inline]
    pub fn set_drive(&mut self, drive: f32) {
        let drive = drive.clamp(0.0, 1.0);
        if drive != self.drive {
            self.drive = drive;
            self.pre_gain = 1.0 + drive * drive * 39.0;
            self.post_gain = 0.5 / tanhf(0.5 * self.pre_gain);
        }
    }

    /// Current drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }
}

impl Effect for Overdrive {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let sig = self.hp_pre.process(input) * self.pre_gain;
        let sig = asymmetric_clip(sig) * self.post_gain;
        let sig = self.dc.process(sig);
        self.lp_post.process(sig)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.hp_pre.set_sample_rate(sample_rate);
        self.lp_post.set_sample_rate(sample_rate);
        self.dc.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.hp_pre.reset();
        self.lp_post.reset();
        self.dc.reset();
    }
}

/// The post-mix chain.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{FxChain, FxMode};
///
/// let mut fx = FxChain::new(48000.0, FxMode::Morph);
/// assert_eq!(fx.process(0.3, 0.0), 0.3);
/// let y = fx.process(0.3, 0.75);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct FxChain {
    mode: FxMode,
    chorus: Chorus,
    ambience: Ambience,
    overdrive: Overdrive,
}

impl FxChain {
    /// Build every stage up front; switching modes never allocates.
    pub fn new(sample_rate: f32, mode: FxMode) -> Self {
        Self {
            mode,
            chorus: Chorus::new(sample_rate),
            ambience: Ambience::new(sample_rate),
            overdrive: Overdrive::new(sample_rate),
        }
    }

    /// Active character.
    pub fn mode(&self) -> FxMode {
        self.mode
    }

    /// Switch character. Clears the state of the stage being entered.
    pub fn set_mode(&mut self, mode: FxMode) {
        if mode != self.mode {
            self.mode = mode;
            self.reset();
        }
    }

    /// Process one sample at `amount` in [0, 1].
    #[inline]
    pub fn process(&mut self, input: f32, amount: f32) -> f32 {
        if amount.is_nan() || amount < BYPASS_THRESHOLD {
            return input;
        }
        let amount = amount.min(1.0);

        match self.mode {
            FxMode::Morph => {
                let chorused = self.chorus.process(input);
                let ambient = self.ambience.process(chorused);
                if amount <= 0.5 {
                    lerp(input, chorused, amount * 2.0)
                } else {
                    lerp(chorused, ambient, amount * 2.0 - 1.0)
                }
            }
            FxMode::Overdrive => {
                self.overdrive.set_drive(amount);
                self.overdrive.process(input)
            }
        }
    }

    /// Change sample rate for every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.chorus.set_sample_rate(sample_rate);
        self.ambience.set_sample_rate(sample_rate);
        self.overdrive.set_sample_rate(sample_rate);
    }

    /// Clear every buffer and filter state.
    pub fn reset(&mut self) {
        self.chorus.reset();
        self.ambience.reset();
        self.overdrive.reset();
    }
}
