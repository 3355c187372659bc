//! Platform directories for user patches and the engine config.
//!
//! - **User patches**: `<config dir>/foldbox/patches/`
//! - **Engine config**: `<config dir>/foldbox/config.toml`
//!
//! where `<config dir>` is `~/.config` on Linux, `~/Library/Application
//! Support` on macOS and `%APPDATA%` on Windows.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::factory_patches::factory_patch;
use crate::patch::Patch;

const APP_NAME: &str = "foldbox";
const PATCHES_SUBDIR: &str = "patches";
const CONFIG_FILE: &str = "config.toml";

/// The per-user foldbox directory. Falls back to `./foldbox` when the
/// platform has no config directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Where user patches are stored.
pub fn user_patches_dir() -> PathBuf {
    user_config_dir().join(PATCHES_SUBDIR)
}

/// Default location of the engine config file.
pub fn config_file_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Create the user patch directory if needed and return it.
pub fn ensure_user_patches_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_patches_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// `.toml` files in the user patch directory, sorted by path.
pub fn list_user_patches() -> Vec<PathBuf> {
    list_patches_in_dir(&user_patches_dir())
}

/// `.toml` files directly inside `dir`, sorted by path. Empty if the
/// directory is missing or unreadable.
pub fn list_patches_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut patches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    patches.sort();
    patches
}

/// File stem of a patch path.
///
/// ```rust
/// use foldbox_config::paths::patch_name_from_path;
/// use std::path::Path;
///
/// let name = patch_name_from_path(Path::new("/tmp/patches/acid_line.toml"));
/// assert_eq!(name.as_deref(), Some("acid_line"));
/// ```
pub fn patch_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Resolve a patch reference against the user patch directory.
///
/// See [`find_patch_in`] for the search order.
pub fn find_patch(name: &str) -> Result<Patch, ConfigError> {
    find_patch_in(name, &user_patches_dir())
}

/// Resolve a patch reference.
///
/// Tried in order: `name` as a file path, `<dir>/<name>.toml`, then the
/// factory patches.
pub fn find_patch_in(name: &str, dir: &Path) -> Result<Patch, ConfigError> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Patch::load(direct);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let user_path = dir.join(filename);
    if user_path.is_file() {
        tracing::debug!(path = %user_path.display(), "found user patch");
        return Patch::load(&user_path);
    }

    factory_patch(name).ok_or_else(|| ConfigError::PatchNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dirs_are_namespaced() {
        assert!(user_patches_dir().ends_with("foldbox/patches"));
        assert!(config_file_path().ends_with("foldbox/config.toml"));
    }

    #[test]
    fn listing_skips_non_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.toml"), "name = \"B\"").unwrap();
        fs::write(temp.path().join("a.toml"), "name = \"A\"").unwrap();
        fs::write(temp.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(temp.path().join("dir.toml")).unwrap();

        let found = list_patches_in_dir(temp.path());
        let names: Vec<_> = found.iter().filter_map(|p| patch_name_from_path(p)).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        assert!(list_patches_in_dir(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn user_patch_shadows_factory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("acid.toml"), "name = \"My Acid\"\nfold = 0.9").unwrap();

        let patch = find_patch_in("acid", temp.path()).unwrap();
        assert_eq!(patch.name, "My Acid");
        assert_eq!(patch.fold, 0.9);
    }

    #[test]
    fn falls_back_to_factory_then_errors() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_patch_in("pluck", temp.path()).unwrap().name, "Pluck");
        assert!(matches!(
            find_patch_in("nope", temp.path()),
            Err(ConfigError::PatchNotFound(ref n)) if n == "nope"
        ));
    }

    #[test]
    fn direct_path_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("elsewhere.toml");
        fs::write(&path, "name = \"Direct\"").unwrap();
        let patch = find_patch_in(path.to_str().unwrap(), Path::new("/unused")).unwrap();
        assert_eq!(patch.name, "Direct");
    }
}
