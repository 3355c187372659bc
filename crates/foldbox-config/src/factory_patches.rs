//! Factory patches compiled into the library.
//!
//! Always available, even with no user patch directory.

use crate::Patch;

/// Identifiers of the factory patches, in listing order.
pub static FACTORY_PATCH_NAMES: &[&str] = &[
    "init",
    "pluck",
    "fold_lead",
    "sub_bass",
    "acid",
    "ambient_keys",
];

static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT),
    ("pluck", PLUCK),
    ("fold_lead", FOLD_LEAD),
    ("sub_bass", SUB_BASS),
    ("acid", ACID),
    ("ambient_keys", AMBIENT_KEYS),
];

const INIT: &str = r#"
name = "Init"
description = "Power-on panel: plain saw, half-open filter, percussive envelope"
"#;

const PLUCK: &str = r#"
name = "Pluck"
description = "Short filter snap over a quick amp decay"
cutoff = 0.3
drive = 0.2
sub = 0.1
fold = 0.0
decay = 0.18
amp_env = 1.0
filt_env = 0.7
fx = 0.2
gain = 0.5
"#;

const FOLD_LEAD: &str = r#"
name = "Fold Lead"
description = "Bright folded lead that holds while the key is down"
cutoff = 0.6
drive = 0.35
sub = 0.2
fold = 0.65
decay = 0.35
amp_env = 0.3
filt_env = 0.4
fx = 0.3
gain = 0.45
"#;

const SUB_BASS: &str = r#"
name = "Sub Bass"
description = "Dark, heavy sub with a gate-style amp"
cutoff = 0.25
drive = 0.1
sub = 0.9
fold = 0.0
decay = 0.4
amp_env = 0.0
filt_env = 0.1
fx = 0.0
gain = 0.55
"#;

const ACID: &str = r#"
name = "Acid"
description = "Resonant squelch with the filter envelope doing the work"
cutoff = 0.2
drive = 0.8
sub = 0.0
fold = 0.15
decay = 0.25
amp_env = 0.6
filt_env = 0.85
fx = 0.15
gain = 0.45
"#;

const AMBIENT_KEYS: &str = r#"
name = "Ambient Keys"
description = "Soft keys washed into the ambience end of the effects"
cutoff = 0.45
drive = 0.05
sub = 0.3
fold = 0.2
decay = 0.7
amp_env = 0.8
filt_env = 0.3
fx = 0.9
gain = 0.5
"#;

/// Every factory patch, in [`FACTORY_PATCH_NAMES`] order.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Look up a factory patch by identifier or display name, ignoring case.
///
/// ```rust
/// use foldbox_config::factory_patch;
///
/// assert_eq!(factory_patch("fold_lead").unwrap().name, "Fold Lead");
/// assert_eq!(factory_patch("Fold Lead").unwrap().name, "Fold Lead");
/// assert!(factory_patch("missing").is_none());
/// ```
pub fn factory_patch(name: &str) -> Option<Patch> {
    let wanted = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PATCHES_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == wanted)
    {
        return Patch::from_toml(toml).ok();
    }

    factory_patches()
        .into_iter()
        .find(|patch| patch.name.to_lowercase() == wanted)
}

/// True when `name` names a factory patch.
pub fn is_factory_patch(name: &str) -> bool {
    factory_patch(name).is_some()
}
