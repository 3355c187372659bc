//! One note's signal path.
//!
//! ```text
//! [saw + sub·level] -> [velocity gain] -> [wavefold] -> [ZDF LP] -> × amp env
//!                                                          ^
//!                      cutoff · keytrack · vel + filt env² ┘
//! ```
//!
//! Voices live in a fixed pool and are never dropped, only retriggered.

use crate::envelope::Envelope;
use crate::filter::{Oversampling, Saturator, ZdfFilter};
use crate::oscillator::{SawSubOscillator, bend_ratio, midi_to_freq};
use crate::params::ParamSet;
use crate::wavefold::wavefold;
use libm::exp2f;

/// Amplitude-envelope level under which an ungated voice is silent.
pub const ACTIVE_THRESHOLD: f32 = 0.001;

/// Shortest amplitude release, seconds.
pub const MIN_AMP_RELEASE_S: f32 = 0.002;

/// Key-tracking reference note (middle C).
pub const KEY_TRACK_CENTER: f32 = 60.0;

/// What a NoteOn does to the running oscillator and filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RetriggerPolicy {
    /// Phases and filter state keep running.
    #[default]
    Legato,
    /// Phases and filter state are zeroed.
    Retrigger,
}

/// How the filter envelope moves the cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterEnvMode {
    /// Sweep toward a fixed ceiling by a fraction of the remaining headroom.
    #[default]
    Sweep,
    /// Add a fixed number of Hz at full envelope.
    Offset,
}

/// Which envelope drives the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvRouting {
    /// A dedicated AD envelope (sustain 0).
    #[default]
    Independent,
    /// The amplitude envelope.
    Shared,
}

/// Per-voice behavior switches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoiceConfig {
    /// NoteOn phase/filter policy.
    pub retrigger: RetriggerPolicy,
    /// Filter envelope application.
    pub filter_env_mode: FilterEnvMode,
    /// Filter envelope source.
    pub env_routing: EnvRouting,
    /// Resonance feedback nonlinearity.
    pub saturator: Saturator,
    /// Filter solver rate.
    pub oversampling: Oversampling,
    /// Cutoff octaves per keyboard octave.
    pub key_tracking: f32,
    /// Pitch-bend range in semitones.
    pub bend_range: f32,
    /// Attack time of both envelopes, seconds.
    pub attack_s: f32,
    /// Sweep-mode cutoff ceiling, Hz.
    pub sweep_ceiling_hz: f32,
    /// Velocity pre-gain amount, [0, 1].
    pub velocity_to_gain: f32,
    /// Velocity cutoff scaling in octaves at full amount.
    pub velocity_to_cutoff: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            retrigger: RetriggerPolicy::Legato,
            filter_env_mode: FilterEnvMode::Sweep,
            env_routing: EnvRouting::Independent,
            saturator: Saturator::HardClip,
            oversampling: Oversampling::None,
            key_tracking: 0.5,
            bend_range: 2.0,
            attack_s: 0.005,
            sweep_ceiling_hz: 10_000.0,
            velocity_to_gain: 0.0,
            velocity_to_cutoff: 0.0,
        }
    }
}

/// A single synthesis voice.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{ParamSet, Voice, VoiceConfig};
///
/// let params = ParamSet::default();
/// let mut voice = Voice::new(48000.0, VoiceConfig::default());
/// voice.note_on(60, None);
///
/// let mut peak = 0.0f32;
/// for _ in 0..4800 {
///     peak = peak.max(voice.process(&params).abs());
/// }
/// assert!(peak > 0.01);
///
/// voice.note_off(60);
/// assert!(!voice.is_gated());
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    sample_rate: f32,
    config: VoiceConfig,

    osc: SawSubOscillator,
    amp_env: Envelope,
    filter_env: Envelope,
    filter: ZdfFilter,

    note: u8,
    /// Velocity in [0, 1]; `None` plays at full level.
    velocity: Option<f32>,
    gate: bool,

    /// Note frequency before bend, Hz
    base_freq: f32,
    cached_bend: f32,
    bend_mult: f32,
}

impl Voice {
    /// Create an idle voice.
    pub fn new(sample_rate: f32, config: VoiceConfig) -> Self {
        let mut voice = Self {
            sample_rate,
            config,
            osc: SawSubOscillator::new(),
            amp_env: Envelope::new(sample_rate),
            filter_env: Envelope::new(sample_rate),
            filter: ZdfFilter::new(sample_rate),
            note: 0,
            velocity: None,
            gate: false,
            base_freq: midi_to_freq(0),
            cached_bend: 0.0,
            bend_mult: 1.0,
        };
        voice.apply_config();
        voice
    }

    /// Replace the behavior switches.
    pub fn set_config(&mut self, config: VoiceConfig) {
        self.config = config;
        self.apply_config();
    }

    /// Current behavior switches.
    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Change sample rate for every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.amp_env.set_sample_rate(sample_rate);
        self.filter_env.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
    }

    /// Start `note`. `velocity` is MIDI 1..=127, `None` for full level.
    pub fn note_on(&mut self, note: u8, velocity: Option<u8>) {
        self.note = note.min(127);
        self.velocity = velocity.map(|v| f32::from(v.min(127)) / 127.0);
        self.base_freq = midi_to_freq(self.note);
        self.gate = true;

        if self.config.retrigger == RetriggerPolicy::Retrigger {
            self.osc.reset();
            self.filter.reset();
        }

        self.amp_env.gate_on();
        self.filter_env.gate_on();
    }

    /// Release the voice if it is still playing `note`.
    ///
    /// A NoteOff for any other note is ignored, so a stale release can't
    /// silence a voice that has been reassigned.
    pub fn note_off(&mut self, note: u8) {
        if self.gate && note == self.note {
            self.release();
        }
    }

    /// Release unconditionally.
    pub fn release(&mut self) {
        self.gate = false;
        self.amp_env.gate_off();
        self.filter_env.gate_off();
    }

    /// Gated, or still sounding above [`ACTIVE_THRESHOLD`].
    pub fn is_active(&self) -> bool {
        self.gate || self.amp_env.value() > ACTIVE_THRESHOLD
    }

    /// Between NoteOn and the matching NoteOff.
    pub fn is_gated(&self) -> bool {
        self.gate
    }

    /// Assigned note.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Amplitude envelope value.
    pub fn amp_level(&self) -> f32 {
        self.amp_env.value()
    }

    /// Silence immediately and clear all state.
    pub fn reset(&mut self) {
        self.gate = false;
        self.osc.reset();
        self.amp_env.reset();
        self.filter_env.reset();
        self.filter.reset();
    }

    /// Render one sample.
    #[inline]
    pub fn process(&mut self, params: &ParamSet) -> f32 {
        let p = params.derived();
        let cfg = &self.config;

        let bend = params.pitch_bend();
        if bend != self.cached_bend {
            self.cached_bend = bend;
            self.bend_mult = bend_ratio(bend, cfg.bend_range);
        }
        let dt = self.base_freq * self.bend_mult / self.sample_rate;

        let frame = self.osc.advance(dt);
        let mut x = frame.saw + frame.sub * p.sub_level;

        let velocity = self.velocity.unwrap_or(1.0);
        x *= 1.0 - cfg.velocity_to_gain * (1.0 - velocity);

        let folded = wavefold(x, p.fold_amount);

        let amp_release = (p.amp_env_depth * p.decay_s).max(MIN_AMP_RELEASE_S);
        self.amp_env.set_decay(p.decay_s);
        self.amp_env.set_sustain(1.0 - p.amp_env_depth);
        self.amp_env.set_release(amp_release);
        let amp = self.amp_env.advance();

        let mod_env = match cfg.env_routing {
            EnvRouting::Independent => {
                self.filter_env.set_decay(p.decay_s);
                self.filter_env.set_release(p.decay_s);
                self.filter_env.advance()
            }
            EnvRouting::Shared => amp,
        };
        let env_sq = mod_env * mod_env;

        let key_track = exp2f(cfg.key_tracking * (f32::from(self.note) - KEY_TRACK_CENTER) / 12.0);
        let vel_scale = exp2f(cfg.velocity_to_cutoff * (velocity - 1.0));
        let base = p.cutoff_hz * key_track * vel_scale;

        let cutoff = match cfg.filter_env_mode {
            FilterEnvMode::Sweep => {
                base + env_sq * p.filter_env_depth * (cfg.sweep_ceiling_hz - base).max(0.0)
            }
            FilterEnvMode::Offset => base + env_sq * p.filter_env_hz,
        };

        self.filter.set_cutoff(cutoff);
        self.filter.set_resonance(p.resonance);
        self.filter.set_drive(p.drive);

        self.filter.process(folded) * amp
    }

    fn apply_config(&mut self) {
        self.amp_env.set_attack(self.config.attack_s);
        self.filter_env.set_attack(self.config.attack_s);
        self.filter_env.set_sustain(0.0);
        self.filter.set_saturator(self.config.saturator);
        self.filter.set_oversampling(self.config.oversampling);
        self.bend_mult = bend_ratio(self.cached_bend, self.config.bend_range);
    }
}
