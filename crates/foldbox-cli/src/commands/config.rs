//! Engine config inspection.

use clap::{Args, Subcommand};
use foldbox_config::{EngineConfig, config_file_path, validate_config};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective config (file if present, else defaults)
    Show {
        /// Config file (default: the per-user config)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },

    /// Print the built-in defaults
    Default,

    /// Write the defaults to a file
    Init {
        /// Destination (default: the per-user config)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a config file
    Check {
        /// Config file (default: the per-user config)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },

    /// Print the default config location
    Path,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(ConfigCommand::Show { path: None }) {
        ConfigCommand::Show { path } => {
            let path = path.unwrap_or_else(config_file_path);
            print!("{}", EngineConfig::load_or_default(&path)?.to_toml()?);
        }
        ConfigCommand::Default => print!("{}", EngineConfig::default().to_toml()?),
        ConfigCommand::Init { path, force } => {
            let path = path.unwrap_or_else(config_file_path);
            anyhow::ensure!(
                force || !path.exists(),
                "{} exists (use --force to replace it)",
                path.display()
            );
            EngineConfig::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommand::Check { path } => {
            let path = path.unwrap_or_else(config_file_path);
            let config = EngineConfig::load(&path)?;
            validate_config(&config)?;
            println!("{}: ok", path.display());
        }
        ConfigCommand::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}
