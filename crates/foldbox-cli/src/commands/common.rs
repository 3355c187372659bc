//! Arguments and loading shared by the render and play commands.

use clap::{Args, ValueEnum};
use foldbox_config::{EngineConfig, config_file_path, find_patch, validate_config, validate_patch};
use foldbox_synth::{FxMode, ParamSet};
use std::path::PathBuf;

/// Effects character as a CLI value.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliFxMode {
    /// Dry, chorus, ambience crossfade.
    Morph,
    /// Saturating overdrive.
    Overdrive,
}

impl From<CliFxMode> for FxMode {
    fn from(m: CliFxMode) -> Self {
        match m {
            CliFxMode::Morph => FxMode::Morph,
            CliFxMode::Overdrive => FxMode::Overdrive,
        }
    }
}

/// Engine selection flags.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Engine config file (default: the per-user config, if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Patch name, user patch file or path
    #[arg(short, long, default_value = "init")]
    pub patch: String,

    /// Override the configured voice count (1, 2, 4 or 8)
    #[arg(long)]
    pub polyphony: Option<usize>,

    /// Override the configured sample rate
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Override the configured effects character
    #[arg(long, value_enum)]
    pub fx_mode: Option<CliFxMode>,
}

/// Load the config, apply flag overrides and validate the result.
pub fn load_config(args: &EngineArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default(config_file_path())?,
    };

    if let Some(n) = args.polyphony {
        config.polyphony = n;
    }
    if let Some(sr) = args.sample_rate {
        config.sample_rate = sr;
    }
    if let Some(mode) = args.fx_mode {
        config.fx_mode = mode.into();
    }

    validate_config(&config)?;
    tracing::debug!(
        polyphony = config.polyphony,
        sample_rate = config.sample_rate,
        fx_mode = ?config.fx_mode,
        "engine config ready"
    );
    Ok(config)
}

/// Resolve and validate the patch, returning the starting parameter set.
pub fn load_params(args: &EngineArgs, config: &EngineConfig) -> anyhow::Result<ParamSet> {
    let patch = find_patch(&args.patch)?;
    validate_patch(&patch)?;
    tracing::info!(patch = %patch.name, "patch loaded");

    let mut params = ParamSet::new(config.curves);
    patch.apply(&mut params);
    Ok(params)
}

/// Peak absolute value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// Root mean square.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Linear gain to decibels, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_conversion() {
        assert_eq!(linear_to_db(0.0), -120.0);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
    }

    #[test]
    fn level_stats() {
        let s = [0.5f32, -1.0, 0.5, 0.0];
        assert_eq!(peak(&s), 1.0);
        assert!((rms(&s) - (1.5f32 / 4.0).sqrt()).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }
}
