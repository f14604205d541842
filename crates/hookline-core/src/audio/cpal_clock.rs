//! CPAL-backed media clock
//!
//! The stream is opened lazily on the first `start()`, so a card that is only
//! hovered briefly never touches the audio device. Dropping the clock drops
//! the stream, which stops the callback.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{BuildStreamError, PlayStreamError, Stream, StreamConfig};

use super::device::{default_output_device, output_stream_config};
use super::error::{AudioError, AudioResult};
use crate::audio_file::DecodedAudio;
use crate::playback::MediaClock;

/// Sentinel for "no pending seek" (NaN bit pattern, never a real position)
const NO_SEEK: u64 = u64::MAX;

/// Lock-free state shared between the UI and the audio callback
struct ClockAtomics {
    /// Current position in seconds (f64 bits)
    position: AtomicU64,
    /// Pending seek target in seconds (f64 bits), `NO_SEEK` when idle
    seek_request: AtomicU64,
    playing: AtomicBool,
    muted: AtomicBool,
}

impl ClockAtomics {
    fn new() -> Self {
        Self {
            position: AtomicU64::new(0f64.to_bits()),
            seek_request: AtomicU64::new(NO_SEEK),
            playing: AtomicBool::new(false),
            muted: AtomicBool::new(false),
        }
    }

    fn position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Relaxed))
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn request_seek(&self, seconds: f64) {
        self.seek_request.store(seconds.to_bits(), Ordering::Relaxed);
        self.position.store(seconds.to_bits(), Ordering::Relaxed);
    }
}

/// Audio-thread side: owns the read cursor
struct ClockRenderer {
    atomics: Arc<ClockAtomics>,
    audio: DecodedAudio,
    /// Source frames advanced per output frame
    step: f64,
    /// Read cursor in source frames
    cursor: f64,
}

impl ClockRenderer {
    fn new(atomics: Arc<ClockAtomics>, audio: DecodedAudio, output_rate: u32) -> Self {
        let step = if output_rate == 0 {
            1.0
        } else {
            audio.sample_rate as f64 / output_rate as f64
        };
        let cursor = atomics.position() * audio.sample_rate as f64;
        Self {
            atomics,
            audio,
            step,
            cursor,
        }
    }

    /// Fill one interleaved output buffer
    fn render(&mut self, data: &mut [f32], channels: usize) {
        let seek = self.atomics.seek_request.swap(NO_SEEK, Ordering::Relaxed);
        if seek != NO_SEEK {
            self.cursor = f64::from_bits(seek) * self.audio.sample_rate as f64;
        }

        let playing = self.atomics.is_playing();
        let gain = if self.atomics.is_muted() { 0.0 } else { 1.0 };
        let samples = &self.audio.samples;

        for frame in data.chunks_mut(channels.max(1)) {
            let value = if playing {
                let idx = self.cursor as usize;
                if idx < samples.len() {
                    self.cursor += self.step;
                    samples[idx] * gain
                } else {
                    0.0
                }
            } else {
                0.0
            };
            frame.fill(value);
        }

        if self.audio.sample_rate > 0 {
            let seconds = self.cursor / self.audio.sample_rate as f64;
            self.atomics.position.store(seconds.to_bits(), Ordering::Relaxed);
        }
    }
}

/// Real media clock playing decoded audio through CPAL
pub struct CpalClock {
    audio: DecodedAudio,
    atomics: Arc<ClockAtomics>,
    stream: Option<Stream>,
}

impl CpalClock {
    pub fn new(audio: DecodedAudio) -> Self {
        Self {
            audio,
            atomics: Arc::new(ClockAtomics::new()),
            stream: None,
        }
    }

    fn open_stream(&self) -> AudioResult<Stream> {
        if self.audio.is_empty() {
            return Err(AudioError::NoAudio);
        }

        let device = default_output_device()?;
        let config = output_stream_config(&device)?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        log::info!(
            "CpalClock: opening {} ({} ch, {} Hz)",
            device_name,
            config.channels,
            config.sample_rate.0
        );

        build_stream(&device, &config, self.audio.clone(), Arc::clone(&self.atomics))
    }
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    audio: DecodedAudio,
    atomics: Arc<ClockAtomics>,
) -> AudioResult<Stream> {
    let channels = config.channels as usize;
    let mut renderer = ClockRenderer::new(atomics, audio, config.sample_rate.0);

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                renderer.render(data, channels);
            },
            move |err| {
                log::error!("Preview audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| match e {
            BuildStreamError::DeviceNotAvailable => {
                AudioError::PlaybackRejected("output device not available".to_string())
            }
            other => AudioError::StreamBuildError(other.to_string()),
        })
}

impl MediaClock for CpalClock {
    fn start(&mut self) -> AudioResult<()> {
        if self.stream.is_none() {
            self.stream = Some(self.open_stream()?);
        }

        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| match e {
                PlayStreamError::DeviceNotAvailable => {
                    AudioError::PlaybackRejected("output device not available".to_string())
                }
                other => AudioError::StreamPlayError(other.to_string()),
            })?;
        }

        self.atomics.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&mut self) {
        self.atomics.playing.store(false, Ordering::Relaxed);
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                log::debug!("CpalClock: pause failed: {}", e);
            }
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.atomics.request_seek(seconds.max(0.0));
    }

    fn position(&self) -> f64 {
        self.atomics.position()
    }

    fn set_muted(&mut self, muted: bool) {
        self.atomics.muted.store(muted, Ordering::Relaxed);
    }
}

impl Drop for CpalClock {
    fn drop(&mut self) {
        self.atomics.playing.store(false, Ordering::Relaxed);
        if self.stream.take().is_some() {
            log::debug!("CpalClock: stream released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(samples: Vec<f32>, rate: u32, output_rate: u32) -> ClockRenderer {
        let atomics = Arc::new(ClockAtomics::new());
        ClockRenderer::new(atomics, DecodedAudio::new(samples, rate), output_rate)
    }

    #[test]
    fn test_paused_renders_silence() {
        let mut r = renderer(vec![0.5; 100], 100, 100);
        let mut out = [1.0f32; 8];
        r.render(&mut out, 2);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(r.atomics.position(), 0.0);
    }

    #[test]
    fn test_playing_advances_and_duplicates_channels() {
        let mut r = renderer((0..100).map(|i| i as f32 / 100.0).collect(), 100, 100);
        r.atomics.playing.store(true, Ordering::Relaxed);
        let mut out = [0.0f32; 8];
        r.render(&mut out, 2);
        assert_eq!(out, [0.0, 0.0, 0.01, 0.01, 0.02, 0.02, 0.03, 0.03]);
        assert!((r.atomics.position() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_seek_request_consumed_by_callback() {
        let mut r = renderer(vec![0.25; 1000], 100, 100);
        r.atomics.playing.store(true, Ordering::Relaxed);
        r.atomics.request_seek(5.0);
        let mut out = [0.0f32; 10];
        r.render(&mut out, 1);
        assert!((r.atomics.position() - 5.1).abs() < 1e-9);
        assert_eq!(r.atomics.seek_request.load(Ordering::Relaxed), NO_SEEK);
    }

    #[test]
    fn test_muted_keeps_clock_running() {
        let mut r = renderer(vec![0.8; 100], 100, 100);
        r.atomics.playing.store(true, Ordering::Relaxed);
        r.atomics.muted.store(true, Ordering::Relaxed);
        let mut out = [1.0f32; 10];
        r.render(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!((r.atomics.position() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_resampling_step() {
        let mut r = renderer(vec![0.1; 1000], 200, 100);
        r.atomics.playing.store(true, Ordering::Relaxed);
        let mut out = [0.0f32; 10];
        r.render(&mut out, 1);
        // 10 output frames at half the source rate cover 20 source frames
        assert!((r.atomics.position() - 0.1).abs() < 1e-9);
    }
}
