//! foldbox - render and play scores through the foldbox synthesizer.

mod commands;
mod poly;
mod score;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foldbox")]
#[command(author, version, about = "Wavefolding subtractive synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to WAV
    Render(commands::render::RenderArgs),

    /// Play a score file in real time
    Play(commands::play::PlayArgs),

    /// Print the control scaling curves
    Curves(commands::curves::CurvesArgs),

    /// List or show patches
    Patches(commands::patches::PatchesArgs),

    /// Print, write or check the engine config
    Config(commands::config::ConfigArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "foldbox=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Curves(args) => commands::curves::run(args),
        Commands::Patches(args) => commands::patches::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
