//! FoldBox Core - DSP primitives for the foldbox synthesizer
//!
//! This crate holds the small, allocation-free building blocks the synthesis
//! engine is assembled from. Everything here is safe to call from a hard
//! real-time audio callback once constructed.
//!
//! # Building Blocks
//!
//! ## Filters
//!
//! - [`OnePole`] - 6 dB/oct lowpass or highpass ([`OnePoleMode`])
//! - [`DcBlocker`] - First-order DC blocking highpass
//! - [`CombFilter`] - Feedback comb with damping, for ambience tails
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//!
//! ## Delay Lines
//!
//! - [`InterpolatedDelay`] - Fractional delay line, buffer allocated once at construction
//!
//! ## Modulation
//!
//! - [`Lfo`] - Sine low-frequency oscillator with settable phase
//!
//! ## Utilities
//!
//! - [`flush_denormal`] - Force near-zero values to exact zero
//! - [`lerp`] - Linear crossfade
//! - [`soft_clip`], [`hard_clip`], [`asymmetric_clip`] - Bounded saturators
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets. Delay lines need
//! `alloc`.
//!
//! ```toml
//! [dependencies]
//! foldbox-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use foldbox_core::{Effect, OnePole, OnePoleMode};
//!
//! let mut hp = OnePole::with_mode(48000.0, 80.0, OnePoleMode::Highpass);
//! let mut out = [0.0f32; 64];
//! hp.process_block(&[0.5; 64], &mut out);
//! assert!(out[63] < 0.5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod dc_blocker;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod one_pole;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use dc_blocker::DcBlocker;
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use lfo::Lfo;
pub use math::{
    DENORMAL_THRESHOLD, asymmetric_clip, flush_denormal, hard_clip, lerp, soft_clip,
};
pub use one_pole::{OnePole, OnePoleMode};
