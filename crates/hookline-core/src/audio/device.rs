//! Output device lookup

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, StreamConfig};

use super::error::{AudioError, AudioResult};

/// Get the default output device of the platform's default host
pub fn default_output_device() -> AudioResult<cpal::Device> {
    let host = cpal::default_host();

    let has_any = host
        .output_devices()
        .map(|mut devices| devices.next().is_some())
        .unwrap_or(false);
    if !has_any {
        return Err(AudioError::NoDevices);
    }

    host.default_output_device()
        .ok_or_else(|| AudioError::NoDefaultDevice("No default output device".to_string()))
}

/// Stream configuration for preview playback on `device`
///
/// Uses the device's preferred channel count and rate; the clock resamples
/// the decoded signal on the fly.
pub fn output_stream_config(device: &cpal::Device) -> AudioResult<StreamConfig> {
    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?;

    Ok(StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: BufferSize::Default,
    })
}
