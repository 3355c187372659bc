//! Runtime choice of voice count.
//!
//! `Synth<N>` fixes its pool size at compile time; the config picks one of
//! the supported sizes at start-up.

use foldbox_config::EngineConfig;
use foldbox_synth::{CcMap, ParamSet, Synth, SynthEvent};

/// A `Synth` with 1, 2, 4 or 8 voices.
pub enum PolySynth {
    /// Mono.
    One(Box<Synth<1>>),
    /// Two voices.
    Two(Box<Synth<2>>),
    /// Four voices.
    Four(Box<Synth<4>>),
    /// Eight voices.
    Eight(Box<Synth<8>>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            PolySynth::One($s) => $body,
            PolySynth::Two($s) => $body,
            PolySynth::Four($s) => $body,
            PolySynth::Eight($s) => $body,
        }
    };
}

impl PolySynth {
    /// Build the engine described by `config`.
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let sr = config.sample_rate_hz();
        let voice = config.voice;
        let fx = config.fx_mode;
        Ok(match config.polyphony {
            1 => Self::One(Box::new(Synth::new(sr, voice, fx))),
            2 => Self::Two(Box::new(Synth::new(sr, voice, fx))),
            4 => Self::Four(Box::new(Synth::new(sr, voice, fx))),
            8 => Self::Eight(Box::new(Synth::new(sr, voice, fx))),
            n => anyhow::bail!("unsupported polyphony {n} (expected 1, 2, 4 or 8)"),
        })
    }

    /// Voice pool size.
    pub fn polyphony(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two(_) => 2,
            Self::Four(_) => 4,
            Self::Eight(_) => 8,
        }
    }

    /// See [`Synth::handle_event`].
    pub fn handle_event(&mut self, event: SynthEvent, params: &mut ParamSet, map: &CcMap) {
        dispatch!(self, s => s.handle_event(event, params, map));
    }

    /// See [`Synth::note_on`].
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        dispatch!(self, s => s.note_on(note, velocity));
    }

    /// See [`Synth::note_off`].
    pub fn note_off(&mut self, note: u8) {
        dispatch!(self, s => s.note_off(note));
    }

    /// See [`Synth::all_notes_off`].
    pub fn all_notes_off(&mut self) {
        dispatch!(self, s => s.all_notes_off());
    }

    /// See [`Synth::is_active`].
    pub fn is_active(&self) -> bool {
        dispatch!(self, s => s.is_active())
    }

    /// See [`Synth::process_block`].
    pub fn process_block(&mut self, params: &ParamSet, output: &mut [f32]) {
        dispatch!(self, s => s.process_block(params, output));
    }
}
