//! FoldBox Synth - the wavefolding virtual-analog voice engine
//!
//! Everything that runs inside the audio callback lives here: the voice
//! pipeline, the voice pool and the post-mix effects. Nothing on the
//! per-sample path allocates, blocks or logs.
//!
//! # Signal Flow
//!
//! ```text
//! events -> VoiceAllocator -> Voice[N] -> Σ·1/√N -> FxChain -> × gain -> out
//!                               ^
//!                           ParamSet (snapshot of SharedParams)
//! ```
//!
//! # Core Components
//!
//! ## Voice stages
//!
//! - [`SawSubOscillator`] - PolyBLEP saw plus a sine one octave down
//! - [`wavefold`] - Closed-form triangle wavefolder, bounded for any input
//! - [`Envelope`] - One-pole attack/decay/release
//! - [`ZdfFilter`] - Zero-delay-feedback 2-pole lowpass with saturating resonance
//!
//! ```rust
//! use foldbox_synth::{Envelope, ZdfFilter, wavefold};
//!
//! let mut env = Envelope::new(48000.0);
//! let mut filter = ZdfFilter::new(48000.0);
//! filter.set_cutoff(800.0);
//!
//! env.gate_on();
//! let y = filter.process(wavefold(0.7, 0.5)) * env.advance();
//! assert!(y.is_finite());
//! ```
//!
//! ## Voices and the engine
//!
//! - [`Voice`] / [`VoiceConfig`] - One note, with its retrigger, envelope-routing
//!   and filter-envelope policies
//! - [`VoiceAllocator`] - Note-to-slot map with steal-oldest
//! - [`Synth`] - `N` voices, allocator and effects chain
//!
//! ## Parameters
//!
//! - [`ParamSet`] - Raw controls plus derived engine units
//! - [`Curves`] - Raw-to-unit scaling curves
//! - [`CcMap`] - Controller assignments
//! - [`SharedParams`] - Lock-free store written by the control thread
//!
//! ## Effects
//!
//! - [`FxChain`] / [`FxMode`] - Chorus/ambience morph or overdrive
//!
//! # no_std Support
//!
//! ```toml
//! [dependencies]
//! foldbox-synth = { version = "0.1", default-features = false }
//! ```
//!
//! The effects chain allocates its delay lines at construction, so `alloc` is
//! required.
//!
//! # Example: Polyphonic Render
//!
//! ```rust
//! use foldbox_synth::{Control, FxMode, ParamSet, Synth, VoiceConfig};
//!
//! let mut params = ParamSet::default();
//! params.set(Control::Fold, 0.6);
//! params.set(Control::Fx, 0.3);
//!
//! let mut synth: Synth<4> = Synth::new(48000.0, VoiceConfig::default(), FxMode::Morph);
//! synth.note_on(48, 100);
//! synth.note_on(55, 100);
//!
//! let mut out = vec![0.0f32; 4800];
//! synth.process_block(&params, &mut out);
//! assert!(out.iter().any(|s| s.abs() > 0.01));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

pub mod allocator;
pub mod engine;
pub mod envelope;
pub mod event;
pub mod filter;
pub mod fx;
pub mod oscillator;
pub mod params;
pub mod shared;
pub mod voice;
pub mod wavefold;

pub use allocator::VoiceAllocator;
pub use engine::Synth;
pub use envelope::{Envelope, EnvelopeStage};
pub use event::SynthEvent;
pub use filter::{Oversampling, Saturator, ZdfFilter};
pub use fx::{Ambience, Chorus, FxChain, FxMode, Overdrive};
pub use oscillator::{OscillatorFrame, SawSubOscillator, bend_ratio, midi_to_freq, poly_blep};
pub use params::{CcMap, Control, Curves, Derived, ParamSet, bend_from_14bit, cc_to_unit};
pub use shared::SharedParams;
pub use voice::{EnvRouting, FilterEnvMode, RetriggerPolicy, Voice, VoiceConfig};
pub use wavefold::wavefold;
