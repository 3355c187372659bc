//! Real-time score playback.
//!
//! The main thread walks the score on the wall clock. Note events go to the
//! audio callback over a bounded channel; controller and bend events are
//! written to [`SharedParams`], which the callback snapshots once per block.

use super::common::{EngineArgs, load_config, load_params};
use crate::poly::PolySynth;
use crate::score::Score;
use clap::Args;
use crossbeam_channel::{Sender, TrySendError};
use foldbox_io::{OutputConfig, render_callback, start_output};
use foldbox_synth::{SharedParams, SynthEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Pending note commands the audio thread can lag behind by.
const QUEUE_DEPTH: usize = 256;

/// Polling interval of the control thread.
const TICK: Duration = Duration::from_millis(1);

/// Release time allowed after Ctrl+C before the stream is closed.
const STOP_FADE: Duration = Duration::from_millis(250);

#[derive(Args)]
pub struct PlayArgs {
    /// Score file
    #[arg(value_name = "SCORE")]
    score: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output device (partial name, case-insensitive)
    #[arg(short, long)]
    output: Option<String>,

    /// Output channels
    #[arg(long, default_value = "2")]
    channels: u16,

    /// Seconds to keep playing after the last event
    #[arg(long, default_value = "2.0")]
    tail: f64,
}

/// Messages for the audio thread.
#[derive(Debug, Clone, Copy)]
enum AudioCommand {
    Note(SynthEvent),
    AllNotesOff,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.tail.is_finite() && args.tail >= 0.0,
        "--tail must be a non-negative number of seconds"
    );

    let score = Score::load(&args.score)?;
    let config = load_config(&args.engine)?;
    let params = load_params(&args.engine, &config)?;
    let mut synth = PolySynth::from_config(&config)?;

    let shared = Arc::new(SharedParams::from_params(&params));
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(QUEUE_DEPTH);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let cb_shared = Arc::clone(&shared);
    let callback = render_callback(args.channels, move |block: &mut [f32]| {
        for cmd in rx.try_iter() {
            match cmd {
                AudioCommand::Note(SynthEvent::NoteOn { note, velocity }) => {
                    synth.note_on(note, velocity);
                }
                AudioCommand::Note(SynthEvent::NoteOff { note }) => synth.note_off(note),
                AudioCommand::Note(_) => {}
                AudioCommand::AllNotesOff => synth.all_notes_off(),
            }
        }
        let params = cb_shared.snapshot();
        synth.process_block(&params, block);
    });

    let output_config = OutputConfig {
        sample_rate: config.sample_rate,
        block_size: config.block_size,
        channels: args.channels,
        device_name: args.output.clone(),
    };
    let stream = start_output(
        &output_config,
        callback,
        Box::new(|msg: &str| eprintln!("audio error: {msg}")),
    )?;

    println!(
        "Playing {} ({} notes, {:.1}s). Press Ctrl+C to stop.",
        args.score.display(),
        score.note_count(),
        score.end_s()
    );

    let start = Instant::now();
    for ev in score.events() {
        if !wait_until(start, ev.time_s, &running) {
            break;
        }
        if ev.event.is_note() {
            send(&tx, AudioCommand::Note(ev.event));
        } else {
            shared.apply_event(ev.event, &config.cc_map);
        }
    }

    if running.load(Ordering::SeqCst) {
        wait_until(start, score.end_s() + args.tail, &running);
    }

    if !running.load(Ordering::SeqCst) {
        println!("\nStopping...");
        send(&tx, AudioCommand::AllNotesOff);
        std::thread::sleep(STOP_FADE);
    }

    drop(stream);
    tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), "playback finished");
    Ok(())
}

/// Sleep until `at_s` seconds after `start`. False if interrupted.
fn wait_until(start: Instant, at_s: f64, running: &AtomicBool) -> bool {
    let target = start + Duration::from_secs_f64(at_s);
    while Instant::now() < target {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        std::thread::sleep(TICK.min(target.saturating_duration_since(Instant::now())));
    }
    running.load(Ordering::SeqCst)
}

fn send(tx: &Sender<AudioCommand>, cmd: AudioCommand) {
    match tx.try_send(cmd) {
        Ok(()) => {}
        Err(TrySendError::Full(cmd)) => tracing::warn!(?cmd, "audio queue full, event dropped"),
        Err(TrySendError::Disconnected(_)) => tracing::error!("audio thread gone"),
    }
}
