//! Integration tests for foldbox-config: files on disk through to a
//! parameter set the engine can play.

use foldbox_config::{
    ConfigError, EngineConfig, Patch, ValidationError, factory_patches, find_patch_in,
    validate_config, validate_patch,
};
use foldbox_synth::{Control, FxMode, ParamSet, Saturator};
use std::fs;
use tempfile::TempDir;

#[test]
fn saved_patch_loads_and_drives_params() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/dir/bright.toml");

    let patch = Patch::new("Bright")
        .with_description("open filter")
        .with(Control::Cutoff, 0.9)
        .with(Control::Fold, 0.4);
    patch.save(&path).unwrap();

    let loaded = Patch::load(&path).unwrap();
    assert_eq!(loaded, patch);
    validate_patch(&loaded).unwrap();

    let mut params = ParamSet::default();
    loaded.apply(&mut params);
    assert_eq!(params.raw(Control::Cutoff), 0.9);
    assert!(params.derived().cutoff_hz > 5000.0);
}

#[test]
fn config_file_round_trip_with_custom_curves() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    let mut cfg = EngineConfig {
        polyphony: 8,
        fx_mode: FxMode::Overdrive,
        ..EngineConfig::default()
    };
    cfg.voice.saturator = Saturator::Tanh;
    cfg.curves.cutoff_max_hz = 12_000.0;
    cfg.cc_map.fx = 91;
    cfg.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, cfg);
    validate_config(&loaded).unwrap();

    let mut params = ParamSet::new(loaded.curves);
    params.set(Control::Cutoff, 1.0);
    assert!((params.derived().cutoff_hz - 12_000.0).abs() < 1.0);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let cfg = EngineConfig::load_or_default(temp.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn unreadable_patch_reports_path() {
    let err = Patch::load("/no/such/patch.toml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("/no/such/patch.toml"));
}

#[test]
fn validation_error_converts_into_config_error() {
    fn check(cfg: &EngineConfig) -> Result<(), ConfigError> {
        validate_config(cfg)?;
        Ok(())
    }

    let cfg = EngineConfig {
        polyphony: 6,
        ..EngineConfig::default()
    };
    let err = check(&cfg).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::UnsupportedPolyphony(6))
    ));
}

#[test]
fn user_dir_overrides_factory_by_identifier() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("init.toml"), "name = \"Mine\"\ngain = 0.8\n").unwrap();

    assert_eq!(find_patch_in("init", temp.path()).unwrap().gain, 0.8);
    assert_eq!(find_patch_in("Acid", temp.path()).unwrap().name, "Acid");
}

#[test]
fn factory_patches_sound_different() {
    let patches = factory_patches();
    for (i, a) in patches.iter().enumerate() {
        for b in &patches[i + 1..] {
            assert_ne!(a.raw_values(), b.raw_values(), "{} == {}", a.name, b.name);
        }
    }
}
