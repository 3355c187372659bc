//! Patch file format and operations.

use foldbox_synth::{Control, ParamSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A named snapshot of the nine front-panel controls.
///
/// Every value is a raw control position in [0, 1]. Missing keys take the
/// power-on defaults, so a patch file only needs the controls it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "Fold Lead"
/// description = "Bright folded lead with a short filter snap"
/// cutoff = 0.55
/// drive = 0.3
/// sub = 0.2
/// fold = 0.65
/// decay = 0.35
/// amp_env = 0.4
/// filt_env = 0.5
/// fx = 0.25
/// gain = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Patch {
    /// Display name.
    pub name: String,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Filter cutoff.
    pub cutoff: f32,
    /// Filter drive and resonance.
    pub drive: f32,
    /// Sub-oscillator level.
    pub sub: f32,
    /// Wavefold amount.
    pub fold: f32,
    /// Envelope decay time.
    pub decay: f32,
    /// Amplitude envelope depth.
    pub amp_env: f32,
    /// Filter envelope depth.
    pub filt_env: f32,
    /// Effects amount.
    pub fx: f32,
    /// Output gain.
    pub gain: f32,
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Init")
    }
}

impl Patch {
    /// A patch holding the power-on control positions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            cutoff: Control::Cutoff.default_raw(),
            drive: Control::Drive.default_raw(),
            sub: Control::Sub.default_raw(),
            fold: Control::Fold.default_raw(),
            decay: Control::Decay.default_raw(),
            amp_env: Control::AmpEnv.default_raw(),
            filt_env: Control::FiltEnv.default_raw(),
            fx: Control::Fx.default_raw(),
            gain: Control::Gain.default_raw(),
        }
    }

    /// Capture the raw values of a parameter set.
    pub fn from_params(name: impl Into<String>, params: &ParamSet) -> Self {
        let mut patch = Self::new(name);
        for control in Control::ALL {
            patch.set(control, params.raw(control));
        }
        patch
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, control: Control, value: f32) -> Self {
        self.set(control, value);
        self
    }

    /// Raw value stored for `control`.
    pub fn get(&self, control: Control) -> f32 {
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

    /// Store a raw value for `control`. Range is checked by validation, not
    /// here.
    pub fn set(&mut self, control: Control, value: f32) {
        let slot = match control {
            Control::Cutoff => &mut self.cutoff,
            Control::Drive => &mut self.drive,
            Control::Sub => &mut self.sub,
            Control::Fold => &mut self.fold,
            Control::Decay => &mut self.decay,
            Control::AmpEnv => &mut self.amp_env,
            Control::FiltEnv => &mut self.filt_env,
            Control::Fx => &mut self.fx,
            Control::Gain => &mut self.gain,
        };
        *slot = value;
    }

    /// All raw values in [`Control::ALL`] order.
    pub fn raw_values(&self) -> [f32; Control::COUNT] {
        Control::ALL.map(|c| self.get(c))
    }

    /// Write every control into `params` (clamped) and recompute derived
    /// values. Pitch bend is left alone.
    pub fn apply(&self, params: &mut ParamSet) {
        tracing::debug!(patch = %self.name, "applying patch");
        *params = ParamSet::from_raw(*params.curves(), self.raw_values(), params.pitch_bend());
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
