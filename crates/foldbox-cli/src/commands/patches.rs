//! Patch listing, inspection and saving.

use clap::{Args, Subcommand};
use foldbox_config::{
    ConfigError, FACTORY_PATCH_NAMES, Patch, ensure_user_patches_dir, factory_patches, find_patch,
    list_user_patches, patch_name_from_path, validate_patch,
};
use foldbox_synth::Control;

#[derive(Args)]
pub struct PatchesArgs {
    #[command(subcommand)]
    command: Option<PatchesCommand>,
}

#[derive(Subcommand)]
enum PatchesCommand {
    /// List factory and user patches
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a patch as TOML
    Show {
        /// Patch name or path
        name: String,

        /// Print as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Save a patch to the user patch directory
    Save {
        /// File name (without .toml)
        name: String,

        /// Patch to start from
        #[arg(long, default_value = "init")]
        from: String,

        /// Control overrides, e.g. `--set fold=0.7`
        #[arg(long = "set", value_name = "CONTROL=VALUE", value_parser = parse_control)]
        set: Vec<(Control, f32)>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_control(s: &str) -> Result<(Control, f32), ConfigError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ConfigError::invalid_value(s, "expected CONTROL=VALUE"))?;
    let control = Control::from_name(key.trim()).ok_or_else(|| {
        let names: Vec<_> = Control::ALL.iter().map(|c| c.name()).collect();
        ConfigError::invalid_value(key, format!("unknown control (one of {})", names.join(", ")))
    })?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::invalid_value(key, e.to_string()))?;
    Ok((control, value))
}

pub fn run(args: PatchesArgs) -> anyhow::Result<()> {
    match args
        .command
        .unwrap_or(PatchesCommand::List { json: false })
    {
        PatchesCommand::List { json } => list(json),
        PatchesCommand::Show { name, json } => {
            let patch = find_patch(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&patch)?);
            } else {
                print!("{}", patch.to_toml()?);
            }
            Ok(())
        }
        PatchesCommand::Save {
            name,
            from,
            set,
            force,
        } => save(&name, &from, &set, force),
    }
}

fn list(json: bool) -> anyhow::Result<()> {
    let factory = factory_patches();
    let user: Vec<_> = list_user_patches()
        .into_iter()
        .filter_map(|path| {
            let id = patch_name_from_path(&path)?;
            match Patch::load(&path) {
                Ok(patch) => Some((id, patch)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable patch");
                    None
                }
            }
        })
        .collect();

    if json {
        let entry = |id: &str, patch: &Patch, source: &str| {
            serde_json::json!({
                "id": id,
                "name": patch.name,
                "description": patch.description,
                "source": source,
            })
        };
        let mut all: Vec<_> = FACTORY_PATCH_NAMES
            .iter()
            .zip(&factory)
            .map(|(id, p)| entry(id, p, "factory"))
            .collect();
        all.extend(user.iter().map(|(id, p)| entry(id, p, "user")));
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!("Factory Patches");
    println!("===============\n");
    for (id, patch) in FACTORY_PATCH_NAMES.iter().zip(&factory) {
        println!(
            "  {:<14} {}",
            id,
            patch.description.as_deref().unwrap_or(&patch.name)
        );
    }

    println!("\nUser Patches");
    println!("============\n");
    if user.is_empty() {
        println!("  (none)");
    }
    for (id, patch) in &user {
        println!(
            "  {:<14} {}",
            id,
            patch.description.as_deref().unwrap_or(&patch.name)
        );
    }
    Ok(())
}

fn save(name: &str, from: &str, set: &[(Control, f32)], force: bool) -> anyhow::Result<()> {
    let mut patch = find_patch(from)?;
    patch.name = name.to_string();
    for &(control, value) in set {
        patch.set(control, value);
    }
    validate_patch(&patch)?;

    let path = ensure_user_patches_dir()?.join(format!("{name}.toml"));
    anyhow::ensure!(
        force || !path.exists(),
        "{} exists (use --force to replace it)",
        path.display()
    );
    patch.save(&path)?;
    println!("Saved {}", path.display());
    Ok(())
}
