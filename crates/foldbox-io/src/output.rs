//! Real-time output through cpal.
//!
//! The engine produces mono. [`render_callback`] adapts a block renderer to
//! the interleaved buffers cpal hands out, and [`start_output`] opens the
//! stream. Playback runs while the returned [`StreamHandle`] is alive.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Frames rendered per inner chunk. Larger device buffers are split.
const MAX_CHUNK_FRAMES: usize = 4096;

/// Called on the audio thread with an interleaved buffer to fill.
///
/// Must not allocate, lock or block.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Called with a message when the backend reports a stream error.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Output stream request.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per callback.
    pub block_size: u32,
    /// Interleaved channels; the mono signal is copied to each.
    pub channels: u16,
    /// Case-insensitive substring of the device name, `None` for the default.
    pub device_name: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 48,
            channels: 2,
            device_name: None,
        }
    }
}

/// An output-capable device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    /// Name reported by the host.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub default_channels: u16,
}

/// Keeps a stream playing until dropped.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend stream object.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

fn device_name(device: &cpal::Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

fn describe(device: &cpal::Device) -> Option<OutputDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, default_channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((48000, 2));
    Some(OutputDevice {
        name,
        default_sample_rate,
        default_channels,
    })
}

/// Every output device on the default host.
pub fn list_output_devices() -> Result<Vec<OutputDevice>> {
    let host = cpal::default_host();
    let devices = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    Ok(devices.filter_map(|d| describe(&d)).collect())
}

/// The host's default output device, if it has one.
pub fn default_output_device() -> Option<OutputDevice> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| describe(&d))
}

fn find_output_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device> {
    let Some(search) = name else {
        return host.default_output_device().ok_or(Error::NoDevice);
    };

    let search_lower = search.to_lowercase();
    let devices = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    for device in devices {
        if let Ok(dev_name) = device_name(&device)
            && dev_name.to_lowercase().contains(&search_lower)
        {
            return Ok(device);
        }
    }
    Err(Error::DeviceNotFound(format!(
        "no output device matching '{search}'"
    )))
}

/// Adapt a mono block renderer to interleaved output.
///
/// `render` is called with mono chunks of at most `MAX_CHUNK_FRAMES`
/// frames; each sample is then copied to every channel. The scratch buffer
/// is allocated here, once, so the returned callback never allocates.
pub fn render_callback<F>(channels: u16, mut render: F) -> OutputCallback
where
    F: FnMut(&mut [f32]) + Send + 'static,
{
    let channels = usize::from(channels.max(1));
    let mut scratch = vec![0.0f32; MAX_CHUNK_FRAMES];

    Box::new(move |out: &mut [f32]| {
        for chunk in out.chunks_mut(MAX_CHUNK_FRAMES * channels) {
            let frames = chunk.len() / channels;
            let mono = &mut scratch[..frames];
            render(mono);
            for (frame, &sample) in chunk.chunks_exact_mut(channels).zip(mono.iter()) {
                frame.fill(sample);
            }
        }
    })
}

/// Open and start an output stream on the requested device.
pub fn start_output(
    config: &OutputConfig,
    mut callback: OutputCallback,
    mut error_callback: ErrorCallback,
) -> Result<StreamHandle> {
    let host = cpal::default_host();
    let device = find_output_device(&host, config.device_name.as_deref())?;
    let name = device_name(&device).unwrap_or_else(|_| "<unnamed>".to_string());

    let stream_config = cpal::StreamConfig {
        channels: config.channels,
        sample_rate: config.sample_rate,
        buffer_size: cpal::BufferSize::Fixed(config.block_size),
    };

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                callback(data);
            },
            move |err| {
                tracing::error!(error = %err, "output stream error");
                error_callback(&err.to_string());
            },
            None,
        )
        .map_err(|e| Error::Stream(e.to_string()))?;

    stream.play().map_err(|e| Error::Stream(e.to_string()))?;
    tracing::info!(
        host = host.id().name(),
        device = %name,
        channels = config.channels,
        sample_rate = config.sample_rate,
        block_size = config.block_size,
        "output stream started"
    );

    Ok(StreamHandle::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_engine_block() {
        let config = OutputConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.block_size, 48);
        assert_eq!(config.channels, 2);
        assert!(config.device_name.is_none());
    }

    #[test]
    fn callback_duplicates_mono_to_channels() {
        let mut counter = 0.0f32;
        let mut cb = render_callback(2, move |block: &mut [f32]| {
            for s in block.iter_mut() {
                counter += 1.0;
                *s = counter;
            }
        });
        let mut out = [0.0f32; 6];
        cb(&mut out);
        assert_eq!(out, [1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn oversized_buffers_are_split() {
        let mut calls = Vec::new();
        let (tx, rx) = std::sync::mpsc::channel();
        let mut cb = render_callback(1, move |block: &mut [f32]| {
            block.fill(0.5);
            tx.send(block.len()).unwrap();
        });
        let mut out = vec![0.0f32; MAX_CHUNK_FRAMES + 10];
        cb(&mut out);
        calls.extend(rx.try_iter());
        assert_eq!(calls, [MAX_CHUNK_FRAMES, 10]);
        assert!(out.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn stream_handle_debug() {
        let handle = StreamHandle::new(7u8);
        assert!(format!("{handle:?}").contains("StreamHandle"));
    }
}
