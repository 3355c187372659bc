//! Engine configuration file.

use foldbox_synth::{CcMap, Curves, FxMode, VoiceConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Voice counts the engine is built for.
pub const SUPPORTED_POLYPHONY: [usize; 4] = [1, 2, 4, 8];

/// Everything fixed at engine start-up.
///
/// Missing keys take their defaults, so an empty file is a valid config.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
/// block_size = 48
/// polyphony = 4
/// midi_channel = 0
/// fx_mode = "morph"
///
/// [voice]
/// retrigger = "legato"
/// filter_env_mode = "sweep"
/// env_routing = "independent"
/// saturator = "hard_clip"
/// oversampling = "none"
/// key_tracking = 0.5
///
/// [curves]
/// cutoff_min_hz = 20.0
/// cutoff_max_hz = 18000.0
///
/// [cc_map]
/// cutoff = 74
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per audio callback.
    pub block_size: u32,
    /// Voice pool size (1, 2, 4 or 8).
    pub polyphony: usize,
    /// Receive channel for a MIDI input, 0-15. Scores carry no channel and
    /// are played regardless of it.
    pub midi_channel: u8,
    /// Effects character.
    pub fx_mode: FxMode,
    /// Per-voice behavior.
    pub voice: VoiceConfig,
    /// Control scaling curves.
    pub curves: Curves,
    /// Controller assignments.
    pub cc_map: CcMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 48,
            polyphony: 4,
            midi_channel: 0,
            fx_mode: FxMode::Morph,
            voice: VoiceConfig::default(),
            curves: Curves::default(),
            cc_map: CcMap::default(),
        }
    }
}

impl EngineConfig {
    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load the file at `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the config to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `sample_rate` as the engine's `f32`.
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldbox_synth::{EnvRouting, RetriggerPolicy, Saturator};

    #[test]
    fn empty_file_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn nested_tables_parse() {
        let cfg = EngineConfig::from_toml(
            r#"
polyphony = 8
fx_mode = "overdrive"

[voice]
retrigger = "retrigger"
env_routing = "shared"
saturator = "tanh"

[cc_map]
cutoff = 74
"#,
        )
        .unwrap();
        assert_eq!(cfg.polyphony, 8);
        assert_eq!(cfg.fx_mode, FxMode::Overdrive);
        assert_eq!(cfg.voice.retrigger, RetriggerPolicy::Retrigger);
        assert_eq!(cfg.voice.env_routing, EnvRouting::Shared);
        assert_eq!(cfg.voice.saturator, Saturator::Tanh);
        assert_eq!(cfg.voice.key_tracking, 0.5);
        assert_eq!(cfg.cc_map.cutoff, 74);
        assert_eq!(cfg.cc_map.drive, 2);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = EngineConfig::default();
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("[voice]"));
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        let err = EngineConfig::from_toml("fx_mode = \"flanger\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
