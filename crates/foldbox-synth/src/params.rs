//! Normalized controls, scaling curves and the derived parameter view.
//!
//! The control layer writes raw values in [0, 1]; every write recomputes the
//! derived values (cutoff in Hz, decay in seconds, resonance...) through
//! [`Curves`]. Voices only read the derived side.
//!
//! | Control  | Derived                       | Default curve                 |
//! |----------|-------------------------------|-------------------------------|
//! | cutoff   | `cutoff_hz`                   | `20 · 900^x` Hz               |
//! | drive    | `drive`, `resonance`          | `x^0.6`, `0.85 · x^1.8`       |
//! | sub      | `sub_level`                   | linear                        |
//! | fold     | `fold_amount`                 | linear                        |
//! | decay    | `decay_s`                     | `0.03 · (5/0.03)^x` s         |
//! | amp_env  | `amp_env_depth`               | linear                        |
//! | filt_env | `filter_env_depth`, `_hz`     | linear, `18000 · x` Hz        |
//! | fx       | `fx_amount`                   | linear                        |
//! | gain     | `output_gain`                 | `2 · x`                       |

use libm::powf;

/// One of the nine normalized front-panel controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Control {
    /// Filter cutoff.
    Cutoff,
    /// Filter drive; also sets resonance.
    Drive,
    /// Sub-oscillator level.
    Sub,
    /// Wavefold amount.
    Fold,
    /// Envelope decay time.
    Decay,
    /// Amplitude envelope depth.
    AmpEnv,
    /// Filter envelope depth.
    FiltEnv,
    /// Effects chain amount.
    Fx,
    /// Output gain.
    Gain,
}

impl Control {
    /// Number of controls.
    pub const COUNT: usize = 9;

    /// All controls in storage order.
    pub const ALL: [Control; Self::COUNT] = [
        Control::Cutoff,
        Control::Drive,
        Control::Sub,
        Control::Fold,
        Control::Decay,
        Control::AmpEnv,
        Control::FiltEnv,
        Control::Fx,
        Control::Gain,
    ];

    /// Storage index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name, matching patch-file keys.
    pub const fn name(self) -> &'static str {
        match self {
            Control::Cutoff => "cutoff",
            Control::Drive => "drive",
            Control::Sub => "sub",
            Control::Fold => "fold",
            Control::Decay => "decay",
            Control::AmpEnv => "amp_env",
            Control::FiltEnv => "filt_env",
            Control::Fx => "fx",
            Control::Gain => "gain",
        }
    }

    /// Look a control up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Raw value a fresh [`ParamSet`] starts with.
    pub const fn default_raw(self) -> f32 {
        match self {
            Control::Cutoff => 0.5,
            Control::Decay => 0.3,
            Control::AmpEnv => 1.0,
            Control::Gain => 0.5,
            _ => 0.0,
        }
    }
}

/// Scaling curves from raw control values to engine units.
///
/// Exponential ranges interpolate `min · (max/min)^x`. Power curves are
/// `scale · x^exponent`. Every curve is monotonic non-decreasing in `x` as
/// long as `min < max` and exponents are positive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Curves {
    /// Cutoff at raw 0, Hz.
    pub cutoff_min_hz: f32,
    /// Cutoff at raw 1, Hz.
    pub cutoff_max_hz: f32,
    /// Drive power-curve exponent.
    pub drive_exponent: f32,
    /// Resonance at full drive.
    pub resonance_scale: f32,
    /// Resonance power-curve exponent.
    pub resonance_exponent: f32,
    /// Decay at raw 0, seconds.
    pub decay_min_s: f32,
    /// Decay at raw 1, seconds.
    pub decay_max_s: f32,
    /// Filter envelope offset at raw 1, Hz (offset mode).
    pub filter_env_max_hz: f32,
    /// Output gain at raw 1.
    pub output_gain_max: f32,
}

impl Default for Curves {
    fn default() -> Self {
        Self {
            cutoff_min_hz: 20.0,
            cutoff_max_hz: 18_000.0,
            drive_exponent: 0.6,
            resonance_scale: 0.85,
            resonance_exponent: 1.8,
            decay_min_s: 0.03,
            decay_max_s: 5.0,
            filter_env_max_hz: 18_000.0,
            output_gain_max: 2.0,
        }
    }
}

impl Curves {
    /// Cutoff in Hz.
    pub fn cutoff_hz(&self, x: f32) -> f32 {
        exp_range(self.cutoff_min_hz, self.cutoff_max_hz, x)
    }

    /// Drive amount in [0, 1].
    pub fn drive(&self, x: f32) -> f32 {
        powf(unit(x), self.drive_exponent)
    }

    /// Resonance from the raw drive control.
    pub fn resonance(&self, x: f32) -> f32 {
        self.resonance_scale * powf(unit(x), self.resonance_exponent)
    }

    /// Decay time in seconds.
    pub fn decay_s(&self, x: f32) -> f32 {
        exp_range(self.decay_min_s, self.decay_max_s, x)
    }

    /// Filter envelope offset in Hz.
    pub fn filter_env_hz(&self, x: f32) -> f32 {
        self.filter_env_max_hz * unit(x)
    }

    /// Linear output gain.
    pub fn output_gain(&self, x: f32) -> f32 {
        self.output_gain_max * unit(x)
    }
}

#[inline]
fn unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[inline]
fn exp_range(min: f32, max: f32, x: f32) -> f32 {
    min * powf(max / min, unit(x))
}

/// MIDI CC number assigned to each control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CcMap {
    /// Cutoff CC (default 1).
    pub cutoff: u8,
    /// Drive CC (default 2).
    pub drive: u8,
    /// Sub level CC (default 3).
    pub sub: u8,
    /// Fold CC (default 4).
    pub fold: u8,
    /// Decay CC (default 5).
    pub decay: u8,
    /// Amp envelope depth CC (default 6).
    pub amp_env: u8,
    /// Filter envelope depth CC (default 7).
    pub filt_env: u8,
    /// Effects amount CC (default 8).
    pub fx: u8,
    /// Output gain CC (default 9).
    pub gain: u8,
}

impl Default for CcMap {
    fn default() -> Self {
        Self {
            cutoff: 1,
            drive: 2,
            sub: 3,
            fold: 4,
            decay: 5,
            amp_env: 6,
            filt_env: 7,
            fx: 8,
            gain: 9,
        }
    }
}

impl CcMap {
    /// CC number assigned to `control`.
    pub fn cc_for(&self, control: Control) -> u8 {
        match control {
            Control::Cutoff => self.cutoff,
            Control::Drive => self.drive,
            Control::Sub => self.sub,
            Control::Fold => self.fold,
            Control::Decay => self.decay,
            Control::AmpEnv => self.amp_env,
            Control::FiltEnv => self.filt_env,
            Control::Fx => self.fx,
            Control::Gain => self.gain,
        }
    }

    /// Control driven by `cc`, if any. The first match in
    /// [`Control::ALL`] order wins when a CC is mapped twice.
    pub fn control_for(&self, cc: u8) -> Option<Control> {
        Control::ALL.iter().copied().find(|&c| self.cc_for(c) == cc)
    }
}

/// Derived engine-unit values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    /// Base cutoff, Hz.
    pub cutoff_hz: f32,
    /// Filter drive, [0, 1].
    pub drive: f32,
    /// Filter resonance, [0, 1].
    pub resonance: f32,
    /// Sub-oscillator level, [0, 1].
    pub sub_level: f32,
    /// Wavefold amount, [0, 1].
    pub fold_amount: f32,
    /// Decay time, seconds.
    pub decay_s: f32,
    /// Amplitude envelope depth, [0, 1].
    pub amp_env_depth: f32,
    /// Filter envelope depth as sweep fraction, [0, 1].
    pub filter_env_depth: f32,
    /// Filter envelope depth as offset, Hz.
    pub filter_env_hz: f32,
    /// Effects amount, [0, 1].
    pub fx_amount: f32,
    /// Linear output gain.
    pub output_gain: f32,
}

impl Derived {
    /// Compute every derived value from raw controls.
    pub fn compute(curves: &Curves, raw: &[f32; Control::COUNT]) -> Self {
        let r = |c: Control| raw[c.index()];
        Self {
            cutoff_hz: curves.cutoff_hz(r(Control::Cutoff)),
            drive: curves.drive(r(Control::Drive)),
            resonance: curves.resonance(r(Control::Drive)),
            sub_level: unit(r(Control::Sub)),
            fold_amount: unit(r(Control::Fold)),
            decay_s: curves.decay_s(r(Control::Decay)),
            amp_env_depth: unit(r(Control::AmpEnv)),
            filter_env_depth: unit(r(Control::FiltEnv)),
            filter_env_hz: curves.filter_env_hz(r(Control::FiltEnv)),
            fx_amount: unit(r(Control::Fx)),
            output_gain: curves.output_gain(r(Control::Gain)),
        }
    }
}

/// The parameter view the engine reads every sample.
///
/// Cheap to copy; the audio path takes one snapshot per block.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{CcMap, Control, ParamSet};
///
/// let mut params = ParamSet::default();
/// assert!((params.derived().cutoff_hz - 600.0).abs() < 0.5);
///
/// params.set(Control::Cutoff, 1.0);
/// assert!((params.derived().cutoff_hz - 18_000.0).abs() < 1.0);
///
/// assert!(params.handle_cc(&CcMap::default(), 1, 0));
/// assert_eq!(params.raw(Control::Cutoff), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSet {
    curves: Curves,
    raw: [f32; Control::COUNT],
    pitch_bend: f32,
    derived: Derived,
}

impl Default for ParamSet {
    fn default() -> Self {
        Self::new(Curves::default())
    }
}

impl ParamSet {
    /// Default raw values scaled through `curves`.
    pub fn new(curves: Curves) -> Self {
        let raw = Control::ALL.map(Control::default_raw);
        Self::from_raw(curves, raw, 0.0)
    }

    /// Build from explicit raw values and bend.
    pub fn from_raw(curves: Curves, raw: [f32; Control::COUNT], pitch_bend: f32) -> Self {
        let raw = raw.map(unit);
        Self {
            curves,
            raw,
            pitch_bend: clamp_bend(pitch_bend),
            derived: Derived::compute(&curves, &raw),
        }
    }

    /// Set one raw control (clamped to [0, 1]) and recompute derived values.
    pub fn set(&mut self, control: Control, value: f32) {
        self.raw[control.index()] = unit(value);
        self.update();
    }

    /// Raw value of `control`.
    pub fn raw(&self, control: Control) -> f32 {
        self.raw[control.index()]
    }

    /// All raw values in [`Control::ALL`] order.
    pub fn raw_values(&self) -> &[f32; Control::COUNT] {
        &self.raw
    }

    /// Curves in use.
    pub fn curves(&self) -> &Curves {
        &self.curves
    }

    /// Derived values.
    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// Pitch bend in [-1, 1].
    pub fn pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    /// Set pitch bend, clamped to [-1, 1].
    pub fn set_pitch_bend(&mut self, bend: f32) {
        self.pitch_bend = clamp_bend(bend);
    }

    /// Recompute derived values from raw.
    pub fn update(&mut self) {
        self.derived = Derived::compute(&self.curves, &self.raw);
    }

    /// Apply a CC message. Returns `false` if `cc` is not mapped.
    pub fn handle_cc(&mut self, map: &CcMap, cc: u8, value: u8) -> bool {
        match map.control_for(cc) {
            Some(control) => {
                self.set(control, cc_to_unit(value));
                true
            }
            None => false,
        }
    }

    /// Apply a 14-bit pitch-bend message (center 8192).
    pub fn handle_pitch_bend(&mut self, value: u16) {
        self.set_pitch_bend(bend_from_14bit(value));
    }
}

/// `value / 127`, with values above 127 clamped.
#[inline]
pub fn cc_to_unit(value: u8) -> f32 {
    f32::from(value.min(127)) / 127.0
}

/// Map `0..=16383` to [-1, 1] around 8192.
#[inline]
pub fn bend_from_14bit(value: u16) -> f32 {
    clamp_bend((f32::from(value) - 8192.0) / 8192.0)
}

#[inline]
fn clamp_bend(bend: f32) -> f32 {
    if bend.is_nan() {
        0.0
    } else {
        bend.clamp(-1.0, 1.0)
    }
}
