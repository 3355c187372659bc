//! Offline score rendering.

use super::common::{EngineArgs, linear_to_db, load_config, load_params, peak, rms};
use crate::poly::PolySynth;
use crate::score::Score;
use clap::Args;
use foldbox_io::{SUPPORTED_BIT_DEPTHS, WavSpec, write_wav};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Score file
    #[arg(value_name = "SCORE")]
    score: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,

    /// Seconds rendered after the last event
    #[arg(long, default_value = "2.0")]
    tail: f64,

    /// Write the mono render to both channels
    #[arg(long)]
    stereo: bool,

    /// Output bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let score = Score::load(&args.score)?;
    let config = load_config(&args.engine)?;
    let mut params = load_params(&args.engine, &config)?;
    let mut synth = PolySynth::from_config(&config)?;

    anyhow::ensure!(
        args.tail.is_finite() && args.tail >= 0.0,
        "--tail must be a non-negative number of seconds"
    );
    anyhow::ensure!(
        SUPPORTED_BIT_DEPTHS.contains(&args.bit_depth),
        "--bit-depth must be 16, 24 or 32"
    );
    let sample_rate = config.sample_rate;
    let total_frames =
        ((score.end_s() + args.tail) * f64::from(sample_rate)).ceil() as usize;
    let block_size = config.block_size as usize;

    println!(
        "Rendering {} ({} notes, {:.2}s) with {} voice(s) at {} Hz",
        args.score.display(),
        score.note_count(),
        total_frames as f64 / f64::from(sample_rate),
        synth.polyphony(),
        sample_rate
    );

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total_frames as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = vec![0.0f32; total_frames];
    let mut pending = score.events().iter().peekable();
    let mut frame = 0usize;

    while frame < total_frames {
        while let Some(ev) = pending.next_if(|ev| ev.frame(sample_rate) as usize <= frame) {
            synth.handle_event(ev.event, &mut params, &config.cc_map);
        }

        // Split blocks at the next event so it lands on its exact sample.
        let next_event = pending
            .peek()
            .map_or(total_frames, |ev| ev.frame(sample_rate) as usize);
        let end = (frame + block_size).min(next_event).min(total_frames);
        synth.process_block(&params, &mut output[frame..end]);
        frame = end;
        pb.set_position(frame as u64);
    }
    pb.finish_and_clear();

    println!(
        "  Peak {:.1} dB, RMS {:.1} dB",
        linear_to_db(peak(&output)),
        linear_to_db(rms(&output))
    );
    if peak(&output) > 1.0 && args.bit_depth != 32 {
        tracing::warn!("render exceeds full scale and will clip in integer output");
    }

    let spec = WavSpec {
        channels: if args.stereo { 2 } else { 1 },
        sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav(&args.output, &output, spec)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
