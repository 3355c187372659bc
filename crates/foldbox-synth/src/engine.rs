//! Polyphonic engine: voice pool, allocator and effects chain.

use crate::allocator::VoiceAllocator;
use crate::event::SynthEvent;
use crate::fx::{FxChain, FxMode};
use crate::params::{CcMap, ParamSet};
use crate::voice::{Voice, VoiceConfig};
use libm::sqrtf;

/// `N`-voice synthesizer. `Synth<1>` is the monophonic instrument.
///
/// Per sample: every active voice renders, the sum is scaled by `1/sqrt(N)`,
/// passes the effects chain, and is multiplied by the output gain.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{FxMode, ParamSet, Synth, VoiceConfig};
///
/// let params = ParamSet::default();
/// let mut synth: Synth<4> = Synth::new(48000.0, VoiceConfig::default(), FxMode::Morph);
///
/// synth.note_on(60, 100);
/// synth.note_on(64, 100);
/// let mut block = [0.0f32; 48];
/// synth.process_block(&params, &mut block);
/// assert_eq!(synth.active_voice_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Synth<const N: usize> {
    voices: [Voice; N],
    allocator: VoiceAllocator<N>,
    fx: FxChain,
    sample_rate: f32,
    mix_scale: f32,
}

impl<const N: usize> Synth<N> {
    /// Build the voice pool and effects buffers. The only allocation the
    /// engine ever does happens here.
    pub fn new(sample_rate: f32, config: VoiceConfig, fx_mode: FxMode) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate, config)),
            allocator: VoiceAllocator::new(),
            fx: FxChain::new(sample_rate, fx_mode),
            sample_rate,
            mix_scale: if N == 0 { 0.0 } else { 1.0 / sqrtf(N as f32) },
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate of every voice and effect.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
        self.fx.set_sample_rate(sample_rate);
    }

    /// Apply new voice switches to the whole pool.
    pub fn set_voice_config(&mut self, config: VoiceConfig) {
        for voice in &mut self.voices {
            voice.set_config(config);
        }
    }

    /// Switch the effects character.
    pub fn set_fx_mode(&mut self, mode: FxMode) {
        self.fx.set_mode(mode);
    }

    /// Current effects character.
    pub fn fx_mode(&self) -> FxMode {
        self.fx.mode()
    }

    /// Start a note. Velocity 0 releases it instead.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(note);
            return;
        }

        #[cfg(feature = "tracing")]
        let stealing = self.allocator.is_full() && self.allocator.slot_of(note).is_none();

        let slot = self.allocator.note_on(note);
        let Some(voice) = self.voices.get_mut(slot) else {
            return;
        };

        #[cfg(feature = "tracing")]
        {
            if stealing {
                tracing::debug!(slot, stolen = voice.note(), note, "voice stolen");
            } else if voice.is_gated() && voice.note() == note {
                tracing::trace!(slot, note, "voice retriggered");
            }
        }

        voice.note_on(note, Some(velocity));
    }

    /// Release a note. Unknown or already-stolen notes are ignored.
    pub fn note_off(&mut self, note: u8) {
        if let Some(voice) = self
            .allocator
            .note_off(note)
            .and_then(|slot| self.voices.get_mut(slot))
        {
            voice.note_off(note);
        }
    }

    /// Release every held note; tails keep ringing.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
        self.allocator.release_all();
    }

    /// Silence everything and clear all state.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.allocator.reset();
        self.fx.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(voices = N, "engine reset");
    }

    /// Any voice gated or still sounding.
    pub fn is_active(&self) -> bool {
        self.voices.iter().any(Voice::is_active)
    }

    /// Number of voices gated or still sounding.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// The voice pool.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// The note-to-slot map.
    pub fn allocator(&self) -> &VoiceAllocator<N> {
        &self.allocator
    }

    /// Route a decoded event: notes to the pool, controllers and bend to
    /// `params`.
    pub fn handle_event(&mut self, event: SynthEvent, params: &mut ParamSet, map: &CcMap) {
        match event {
            SynthEvent::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthEvent::NoteOff { note } => self.note_off(note),
            SynthEvent::ControlChange { cc, value } => {
                params.handle_cc(map, cc, value);
            }
            SynthEvent::PitchBend { value } => params.handle_pitch_bend(value),
        }
    }

    /// Render one sample.
    #[inline]
    pub fn process(&mut self, params: &ParamSet) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            if voice.is_active() {
                sum += voice.process(params);
            }
        }
        let derived = params.derived();
        self.fx.process(sum * self.mix_scale, derived.fx_amount) * derived.output_gain
    }

    /// Render `output.len()` samples with one parameter view.
    pub fn process_block(&mut self, params: &ParamSet, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.process(params);
        }
    }
}
