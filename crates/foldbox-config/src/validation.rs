//! Patch and engine-config validation.
//!
//! Loading never clamps silently: values that the engine would clamp at run
//! time are reported here so a bad file is caught before it is played.
//!
//! # Example
//!
//! ```rust
//! use foldbox_config::{EngineConfig, Patch, validate_config, validate_patch};
//!
//! validate_patch(&Patch::new("ok")).expect("defaults are valid");
//!
//! let mut cfg = EngineConfig::default();
//! cfg.polyphony = 3;
//! assert!(validate_config(&cfg).is_err());
//! ```

use foldbox_synth::{Control, Curves, VoiceConfig};
use thiserror::Error;

use crate::engine_config::{EngineConfig, SUPPORTED_POLYPHONY};
use crate::patch::Patch;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its allowed range (or not finite).
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name, dotted for nested tables.
        field: String,
        /// Offending value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Voice count the engine has no pool size for.
    #[error("unsupported polyphony {0} (expected 1, 2, 4 or 8)")]
    UnsupportedPolyphony(usize),

    /// Zero sample rate.
    #[error("sample rate must be positive")]
    InvalidSampleRate,

    /// Curve range whose minimum is not below its maximum.
    #[error("curve '{curve}' is not increasing: min {min} >= max {max}")]
    NonMonotonicCurve {
        /// Curve name.
        curve: String,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check every control of a patch is a finite value in [0, 1].
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();
    for control in Control::ALL {
        check_range(&mut errors, control.name(), patch.get(control), 0.0, 1.0);
    }
    collect(errors)
}

/// Check an engine config for values the engine cannot run with.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.sample_rate == 0 {
        errors.push(ValidationError::InvalidSampleRate);
    }
    if config.block_size == 0 || config.block_size > 8192 {
        errors.push(out_of_range("block_size", f64::from(config.block_size), 1.0, 8192.0));
    }
    if !SUPPORTED_POLYPHONY.contains(&config.polyphony) {
        errors.push(ValidationError::UnsupportedPolyphony(config.polyphony));
    }
    if config.midi_channel > 15 {
        errors.push(out_of_range("midi_channel", f64::from(config.midi_channel), 0.0, 15.0));
    }

    validate_voice(&mut errors, &config.voice);
    validate_curves(&mut errors, &config.curves);

    for control in Control::ALL {
        let cc = config.cc_map.cc_for(control);
        if cc > 127 {
            errors.push(out_of_range(
                &format!("cc_map.{}", control.name()),
                f64::from(cc),
                0.0,
                127.0,
            ));
        }
    }

    collect(errors)
}

fn validate_voice(errors: &mut Vec<ValidationError>, voice: &VoiceConfig) {
    check_range(errors, "voice.key_tracking", voice.key_tracking, -2.0, 2.0);
    check_range(errors, "voice.bend_range", voice.bend_range, 0.0, 24.0);
    check_range(errors, "voice.attack_s", voice.attack_s, 0.0, 10.0);
    check_range(errors, "voice.sweep_ceiling_hz", voice.sweep_ceiling_hz, 20.0, 24_000.0);
    check_range(errors, "voice.velocity_to_gain", voice.velocity_to_gain, 0.0, 1.0);
    check_range(errors, "voice.velocity_to_cutoff", voice.velocity_to_cutoff, 0.0, 8.0);
}

fn validate_curves(errors: &mut Vec<ValidationError>, curves: &Curves) {
    check_increasing(errors, "cutoff", curves.cutoff_min_hz, curves.cutoff_max_hz);
    check_increasing(errors, "decay", curves.decay_min_s, curves.decay_max_s);

    check_range(errors, "curves.cutoff_min_hz", curves.cutoff_min_hz, 1.0, 24_000.0);
    check_range(errors, "curves.cutoff_max_hz", curves.cutoff_max_hz, 1.0, 24_000.0);
    check_range(errors, "curves.decay_min_s", curves.decay_min_s, 0.001, 60.0);
    check_range(errors, "curves.decay_max_s", curves.decay_max_s, 0.001, 60.0);
    check_range(errors, "curves.drive_exponent", curves.drive_exponent, 0.05, 10.0);
    check_range(errors, "curves.resonance_exponent", curves.resonance_exponent, 0.05, 10.0);
    check_range(errors, "curves.resonance_scale", curves.resonance_scale, 0.0, 1.0);
    check_range(errors, "curves.filter_env_max_hz", curves.filter_env_max_hz, 0.0, 24_000.0);
    check_range(errors, "curves.output_gain_max", curves.output_gain_max, 0.0, 4.0);
}

fn check_range(errors: &mut Vec<ValidationError>, field: &str, value: f32, min: f32, max: f32) {
    if !value.is_finite() || value < min || value > max {
        errors.push(out_of_range(
            field,
            f64::from(value),
            f64::from(min),
            f64::from(max),
        ));
    }
}

fn check_increasing(errors: &mut Vec<ValidationError>, curve: &str, min: f32, max: f32) {
    if min.is_finite() && max.is_finite() && min >= max {
        errors.push(ValidationError::NonMonotonicCurve {
            curve: curve.to_string(),
            min,
            max,
        });
    }
}

fn out_of_range(field: &str, value: f64, min: f64, max: f64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        value,
        min,
        max,
    }
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&EngineConfig::default()), Ok(()));
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let patch = Patch::new("x").with(Control::Fold, 1.5);
        let err = validate_patch(&patch).unwrap_err();
        assert!(
            matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "fold"),
            "got {err:?}"
        );
    }

    #[test]
    fn multiple_errors_are_collected() {
        let patch = Patch::new("x")
            .with(Control::Cutoff, -0.1)
            .with(Control::Gain, f32::NAN);
        match validate_patch(&patch) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn polyphony_must_be_supported() {
        for n in [0, 3, 5, 16] {
            let cfg = EngineConfig {
                polyphony: n,
                ..EngineConfig::default()
            };
            assert_eq!(
                validate_config(&cfg),
                Err(ValidationError::UnsupportedPolyphony(n))
            );
        }
    }

    #[test]
    fn inverted_curve_is_reported() {
        let mut cfg = EngineConfig::default();
        cfg.curves.decay_min_s = 2.0;
        cfg.curves.decay_max_s = 1.0;
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::NonMonotonicCurve { ref curve, .. }) if curve == "decay"
        ));
    }

    #[test]
    fn zero_sample_rate_is_reported() {
        let cfg = EngineConfig {
            sample_rate: 0,
            ..EngineConfig::default()
        };
        assert_eq!(validate_config(&cfg), Err(ValidationError::InvalidSampleRate));
    }

    #[test]
    fn midi_channel_is_limited_to_sixteen() {
        let ok = EngineConfig {
            midi_channel: 15,
            ..EngineConfig::default()
        };
        assert_eq!(validate_config(&ok), Ok(()));

        let bad = EngineConfig {
            midi_channel: 16,
            ..EngineConfig::default()
        };
        assert!(matches!(
            validate_config(&bad),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "midi_channel"
        ));
    }

    #[test]
    fn display_lists_every_error() {
        let err = ValidationError::Multiple(vec![
            ValidationError::InvalidSampleRate,
            ValidationError::UnsupportedPolyphony(3),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("sample rate"));
        assert!(msg.contains("polyphony 3"));
    }
}
