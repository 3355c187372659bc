//! Scaling-curve table.

use clap::Args;
use foldbox_config::{EngineConfig, config_file_path};
use std::path::PathBuf;

#[derive(Args)]
pub struct CurvesArgs {
    /// Engine config whose curves are shown (default: the per-user config)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of steps between raw 0 and 1
    #[arg(long, default_value = "10")]
    steps: usize,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CurvesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps > 0, "--steps must be at least 1");
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default(config_file_path())?,
    };
    let curves = config.curves;

    let rows: Vec<_> = (0..=args.steps)
        .map(|i| {
            let x = i as f32 / args.steps as f32;
            (
                x,
                curves.cutoff_hz(x),
                curves.drive(x),
                curves.resonance(x),
                curves.decay_s(x),
                curves.filter_env_hz(x),
                curves.output_gain(x),
            )
        })
        .collect();

    if args.json {
        let list: Vec<_> = rows
            .iter()
            .map(|&(x, cutoff, drive, res, decay, env, gain)| {
                serde_json::json!({
                    "raw": x,
                    "cutoff_hz": cutoff,
                    "drive": drive,
                    "resonance": res,
                    "decay_s": decay,
                    "filter_env_hz": env,
                    "output_gain": gain,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!(
        "{:>5}  {:>10}  {:>6}  {:>9}  {:>8}  {:>12}  {:>6}",
        "raw", "cutoff Hz", "drive", "resonance", "decay s", "filt env Hz", "gain"
    );
    for (x, cutoff, drive, res, decay, env, gain) in rows {
        println!(
            "{x:>5.2}  {cutoff:>10.1}  {drive:>6.3}  {res:>9.3}  {decay:>8.3}  {env:>12.1}  {gain:>6.2}"
        );
    }
    Ok(())
}
