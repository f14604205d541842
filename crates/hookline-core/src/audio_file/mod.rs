//! Byte-to-signal decoding
//!
//! Turns an uploaded audio payload into a mono `f32` signal using symphonia.
//! Only the first channel is kept: the waveform and the preview clock never
//! need more than one channel of amplitude data.

use std::io::Cursor;
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Errors that can occur while decoding a track
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Reading the payload failed
    #[error("IO error: {0}")]
    Io(String),

    /// Container or codec not recognised
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    /// Container has no decodable audio track
    #[error("No audio track found")]
    NoAudioTrack,

    /// Decoding produced no samples
    #[error("Decoded stream is empty")]
    Empty,

    /// Decoding did not finish before the watchdog fired
    #[error("Decode timed out after {0:.1}s")]
    Timeout(f64),

    /// Blocking decode task panicked or was cancelled
    #[error("Decode task failed: {0}")]
    TaskFailed(String),
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decoded mono signal
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Channel 0 samples in `[-1, 1]`
    pub samples: Arc<[f32]>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an in-memory payload to a mono signal
///
/// `extension` is only a probe hint; the container is sniffed from the bytes.
pub fn decode_audio(bytes: &[u8], extension: Option<&str>) -> DecodeResult<DecodedAudio> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::Unsupported("Unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut channels = 1usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                log::warn!("decode_audio: error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("decode_audio: skipping corrupt packet: {}", e);
                continue;
            }
            Err(e) => return Err(DecodeError::Unsupported(e.to_string())),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count().max(1);
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend(buf.samples().iter().step_by(channels));
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }

    log::debug!(
        "decode_audio: {} frames at {} Hz ({} source channels)",
        samples.len(),
        sample_rate,
        channels
    );

    Ok(DecodedAudio::new(samples, sample_rate))
}

/// Read the container's declared duration without decoding any packets
///
/// Used when decoding fails but the header is intact, so the trim region can
/// still be sized.
pub fn probe_duration(bytes: &[u8], extension: Option<&str>) -> Option<f64> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .ok()?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)?;

    let frames = track.codec_params.n_frames?;
    let rate = track.codec_params.sample_rate?;
    if rate == 0 {
        return None;
    }
    Some(frames as f64 / rate as f64)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    /// Encode a 16-bit WAV in memory
    pub fn wav_bytes(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                for _ in 0..channels {
                    writer
                        .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                        .unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    /// 440 Hz sine at half scale
    pub fn sine_wav(seconds: f32, sample_rate: u32) -> Vec<u8> {
        let frames = (seconds * sample_rate as f32) as usize;
        let samples: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect();
        wav_bytes(&samples, sample_rate, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_decode_mono_wav() {
        let bytes = sine_wav(1.0, 8000);
        let decoded = decode_audio(&bytes, Some("wav")).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.len(), 8000);
        assert!((decoded.duration_seconds() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_keeps_first_channel_of_stereo() {
        let samples = vec![0.25f32; 4000];
        let bytes = wav_bytes(&samples, 4000, 2);
        let decoded = decode_audio(&bytes, None).unwrap();
        assert_eq!(decoded.len(), 4000);
        assert!(decoded.samples.iter().all(|s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let garbage: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        assert!(decode_audio(&garbage, None).is_err());
    }

    #[test]
    fn test_container_duration_reads_header() {
        let bytes = sine_wav(2.0, 8000);
        let duration = probe_duration(&bytes, Some("wav")).unwrap();
        assert!((duration - 2.0).abs() < 1e-6);
    }
}
