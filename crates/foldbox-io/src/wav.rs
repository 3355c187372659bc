//! WAV file writing and reading.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Sample depths [`write_wav`] accepts.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Output file layout.
///
/// The engine renders mono; with `channels = 2` every sample is written to
/// both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// 1 (mono) or 2 (duplicated stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// 16 or 24 for integer PCM, 32 for float.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Header details of a WAV file.
#[derive(Debug, Clone, Copy)]
pub struct WavInfo {
    /// Layout from the header.
    pub spec: WavSpec,
    /// Samples per channel.
    pub num_frames: u64,
    /// Length in seconds.
    pub duration_secs: f64,
}

/// Write a mono render, duplicating it across `spec.channels`.
///
/// Integer formats clamp to full scale; float output is written as is.
/// Depths other than 16, 24 and 32 are rejected before the file is created.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&spec.bits_per_sample) {
        return Err(Error::UnsupportedBitDepth(spec.bits_per_sample));
    }

    let channels = spec.channels.max(1);
    let hound_spec = hound::WavSpec::from(WavSpec { channels, ..spec });
    let mut writer = WavWriter::create(path.as_ref(), hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            for _ in 0..channels {
                writer.write_sample(sample)?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            for _ in 0..channels {
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        frames = samples.len(),
        channels,
        "wrote wav"
    );
    Ok(())
}

/// Read a WAV file as mono (channels averaged) along with its layout.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Read only the header of a WAV file.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));
    Ok(WavInfo {
        spec,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
    })
}
