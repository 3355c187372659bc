//! Audio I/O for foldbox.
//!
//! - **WAV rendering**: [`write_wav`] stores a mono engine render as mono or
//!   duplicated stereo; [`read_wav`] loads one back as mono
//! - **Real-time output**: [`start_output`] opens a `cpal` output stream fed
//!   by an [`OutputCallback`] running the engine block by block
//!
//! ```rust,no_run
//! use foldbox_io::{OutputConfig, render_callback, start_output};
//! use foldbox_synth::{FxMode, ParamSet, Synth, VoiceConfig};
//!
//! let mut synth: Synth<4> = Synth::new(48_000.0, VoiceConfig::default(), FxMode::Morph);
//! synth.note_on(57, 100);
//! let params = ParamSet::default();
//!
//! let config = OutputConfig::default();
//! let callback = render_callback(config.channels, move |block: &mut [f32]| {
//!     synth.process_block(&params, block);
//! });
//! let _stream = start_output(&config, callback, Box::new(|e| eprintln!("{e}")))?;
//! # Ok::<(), foldbox_io::Error>(())
//! ```

mod output;
mod wav;

pub use output::{
    ErrorCallback, OutputCallback, OutputConfig, OutputDevice, StreamHandle, default_output_device,
    list_output_devices, render_callback, start_output,
};
pub use wav::{SUPPORTED_BIT_DEPTHS, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Requested sample depth is not 16, 24 or 32 bits.
    #[error("Unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
