//! Patch and engine configuration for foldbox.
//!
//! - **Patches**: the nine panel controls as small TOML files
//! - **Engine config**: sample rate, polyphony, voice behavior, curves and
//!   the CC map
//! - **Validation**: range checks that report every problem at once
//! - **Paths**: per-user patch directory and config file
//! - **Factory patches**: built-in starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use foldbox_config::{EngineConfig, find_patch, validate_config};
//! use foldbox_synth::ParamSet;
//!
//! let config = EngineConfig::default();
//! validate_config(&config).unwrap();
//!
//! let mut params = ParamSet::new(config.curves);
//! find_patch("fold_lead").unwrap().apply(&mut params);
//! ```

mod engine_config;
mod error;
mod patch;

/// Platform directories for patches and config.
pub mod paths;

/// Patch and config validation.
pub mod validation;

/// Patches bundled with the library.
pub mod factory_patches;

pub use engine_config::{EngineConfig, SUPPORTED_POLYPHONY};
pub use error::ConfigError;
pub use factory_patches::{FACTORY_PATCH_NAMES, factory_patch, factory_patches, is_factory_patch};
pub use patch::Patch;
pub use paths::{
    config_file_path, ensure_user_patches_dir, find_patch, find_patch_in, list_user_patches,
    patch_name_from_path, user_config_dir, user_patches_dir,
};
pub use validation::{ValidationError, ValidationResult, validate_config, validate_patch};
