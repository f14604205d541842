//! Waveform extraction for the trim editor
//!
//! Reduces a decoded signal to a fixed number of amplitude buckets
//! ([`WAVEFORM_BUCKETS`] unless configured otherwise). Every track yields
//! exactly that many values regardless of its length, so the renderer never
//! has to resample.
//!
//! Decoding is allowed to fail: corrupt uploads, unsupported containers and
//! stalled decodes all fall back to a synthetic waveform. The editor always
//! has something to draw.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::audio_file::{decode_audio, probe_duration, DecodeError, DecodeResult, DecodedAudio};
use crate::track::Track;

/// Number of amplitude buckets per track
pub const WAVEFORM_BUCKETS: usize = 200;

/// Floor added to every decoded bucket so near-silent blocks stay visible
pub const BUCKET_FLOOR: f32 = 0.15;

/// Gain applied to the blended block magnitude
pub const BUCKET_GAIN: f32 = 3.0;

/// Upper bound for decoded buckets (renderer clamps further to 1.0)
pub const BUCKET_CEILING: f32 = 1.6;

/// Weight of the block average in the blended magnitude (peak gets the rest)
const AVERAGE_WEIGHT: f32 = 0.7;

/// Watchdog for the decode step
pub const DECODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a set of buckets came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformSource {
    Decoded,
    Synthetic,
}

/// Fixed-resolution amplitude representation of a track
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSamples {
    buckets: Vec<f32>,
    source: WaveformSource,
}

impl WaveformSamples {
    pub fn buckets(&self) -> &[f32] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn source(&self) -> WaveformSource {
        self.source
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == WaveformSource::Synthetic
    }
}

/// Outcome of loading a waveform for a track
#[derive(Debug, Clone)]
pub struct WaveformLoad {
    pub samples: WaveformSamples,
    /// Decoded signal, present only when decoding succeeded
    pub audio: Option<DecodedAudio>,
    /// Track length in seconds, when decode or the container header told us
    pub total_duration: Option<f64>,
}

/// Blend peak and average magnitude per block
///
/// The signal is split into `count` equal blocks. Blocks that fall past the
/// end of a very short signal read as silence.
pub fn compute_buckets(signal: &[f32], count: usize) -> Vec<f32> {
    let len = signal.len();
    (0..count)
        .map(|i| {
            let start = i * len / count;
            let end = ((i + 1) * len / count).min(len);
            let block = &signal[start..end];

            let value = if block.is_empty() {
                0.0
            } else {
                let mut sum = 0.0f32;
                let mut peak = 0.0f32;
                for &s in block {
                    let magnitude = if s.is_finite() { s.abs() } else { 0.0 };
                    sum += magnitude;
                    peak = peak.max(magnitude);
                }
                let average = sum / block.len() as f32;
                average * AVERAGE_WEIGHT + peak * (1.0 - AVERAGE_WEIGHT)
            };

            (BUCKET_FLOOR + value * BUCKET_GAIN).min(BUCKET_CEILING)
        })
        .collect()
}

/// Smooth periodic stand-in used when decoding is impossible
pub fn synthetic_waveform<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f32> {
    (0..count)
        .map(|i| {
            let phase = 8.0 * std::f32::consts::PI * i as f32 / count as f32;
            let jitter: f32 = rng.gen_range(0.0..0.1);
            (0.2 + 0.3 * phase.sin() + jitter).max(0.0)
        })
        .collect()
}

impl WaveformSamples {
    pub fn from_audio(audio: &DecodedAudio, count: usize) -> Self {
        Self {
            buckets: compute_buckets(&audio.samples, count),
            source: WaveformSource::Decoded,
        }
    }

    pub fn synthetic(count: usize) -> Self {
        Self {
            buckets: synthetic_waveform(count, &mut rand::thread_rng()),
            source: WaveformSource::Synthetic,
        }
    }
}

impl WaveformLoad {
    fn decoded(audio: DecodedAudio, count: usize) -> Self {
        Self {
            samples: WaveformSamples::from_audio(&audio, count),
            total_duration: Some(audio.duration_seconds()),
            audio: Some(audio),
        }
    }

    /// Degraded load: synthetic buckets and no playable audio
    pub fn synthetic(total_duration: Option<f64>, count: usize) -> Self {
        Self {
            samples: WaveformSamples::synthetic(count),
            audio: None,
            total_duration,
        }
    }
}

/// Decode-or-synthesize, synchronously
///
/// Never fails. Decode errors are logged and replaced by the synthetic
/// waveform.
pub fn extract_waveform(bytes: &[u8], extension: Option<&str>, count: usize) -> WaveformLoad {
    match decode_audio(bytes, extension) {
        Ok(audio) => WaveformLoad::decoded(audio, count),
        Err(e) => fallback_load(&e, probe_duration(bytes, extension), count),
    }
}

/// Load the waveform for a track under the decode watchdog
///
/// Decoding runs on a blocking task. If it has not finished after
/// [`DECODE_TIMEOUT`] the load completes with the synthetic waveform; the
/// decode result, if it ever arrives, is dropped.
pub async fn load_waveform(track: &Track, count: usize) -> WaveformLoad {
    let bytes = track.bytes();
    let extension = track.extension().map(str::to_owned);
    let decode = async move {
        tokio::task::spawn_blocking(move || decode_audio(&bytes, extension.as_deref()))
            .await
            .unwrap_or_else(|e| Err(DecodeError::TaskFailed(e.to_string())))
    };
    load_with_watchdog(track, decode, count, DECODE_TIMEOUT).await
}

/// Race `decode` against `timeout`
///
/// Whatever the outcome, the container header is still probed for a
/// duration when decoding did not produce one.
pub async fn load_with_watchdog<F>(
    track: &Track,
    decode: F,
    count: usize,
    timeout: Duration,
) -> WaveformLoad
where
    F: Future<Output = DecodeResult<DecodedAudio>>,
{
    let decoded = match tokio::time::timeout(timeout, decode).await {
        Ok(result) => result,
        Err(_) => Err(DecodeError::Timeout(timeout.as_secs_f64())),
    };

    match decoded {
        Ok(audio) => {
            log::info!(
                "load_waveform: decoded {:.1}s of audio for waveform",
                audio.duration_seconds()
            );
            WaveformLoad::decoded(audio, count)
        }
        Err(e) => fallback_load(&e, probe_duration(&track.bytes(), track.extension()), count),
    }
}

fn fallback_load(error: &DecodeError, total_duration: Option<f64>, count: usize) -> WaveformLoad {
    log::warn!("Waveform decode failed ({}), using synthetic waveform", error);
    WaveformLoad::synthetic(total_duration, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_file::fixtures::sine_wav;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_well_formed(samples: &WaveformSamples) {
        assert_eq!(samples.len(), WAVEFORM_BUCKETS);
        for &v in samples.buckets() {
            assert!(v.is_finite());
            assert!((0.0..=BUCKET_CEILING).contains(&v), "bucket out of range: {v}");
        }
    }

    #[test]
    fn test_silence_sits_on_floor() {
        let buckets = compute_buckets(&vec![0.0; 10_000], WAVEFORM_BUCKETS);
        assert_eq!(buckets.len(), WAVEFORM_BUCKETS);
        assert!(buckets.iter().all(|&v| (v - BUCKET_FLOOR).abs() < 1e-6));
    }

    #[test]
    fn test_blend_of_average_and_peak() {
        // One block: average |s| = 0.05, peak = 0.2
        let signal = [0.0, 0.2, -0.0, 0.0];
        let buckets = compute_buckets(&signal, 1);
        let expected = BUCKET_FLOOR + (0.05 * 0.7 + 0.2 * 0.3) * BUCKET_GAIN;
        assert!((buckets[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_loud_signal_is_capped() {
        let buckets = compute_buckets(&vec![1.0; 4000], WAVEFORM_BUCKETS);
        assert!(buckets.iter().all(|&v| v == BUCKET_CEILING));
    }

    #[test]
    fn test_short_signal_still_yields_full_resolution() {
        let buckets = compute_buckets(&[0.5, -0.5, 0.1], WAVEFORM_BUCKETS);
        assert_eq!(buckets.len(), WAVEFORM_BUCKETS);
        assert!(buckets.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let buckets = compute_buckets(&[f32::NAN, f32::INFINITY, 0.0, 0.0], 2);
        assert!(buckets.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_synthetic_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let buckets = synthetic_waveform(WAVEFORM_BUCKETS, &mut rng);
        assert_eq!(buckets.len(), WAVEFORM_BUCKETS);
        assert!(buckets.iter().all(|&v| (0.0..0.61).contains(&v)));
    }

    #[test]
    fn test_extract_decoded() {
        let load = extract_waveform(&sine_wav(3.0, 8000), Some("wav"), WAVEFORM_BUCKETS);
        assert_well_formed(&load.samples);
        assert_eq!(load.samples.source(), WaveformSource::Decoded);
        assert!((load.total_duration.unwrap() - 3.0).abs() < 1e-3);
        assert!(load.audio.is_some());
    }

    #[test]
    fn test_extract_corrupt_falls_back() {
        let load = extract_waveform(b"definitely not audio", None, WAVEFORM_BUCKETS);
        assert_well_formed(&load.samples);
        assert!(load.samples.is_synthetic());
        assert!(load.audio.is_none());
    }

    #[tokio::test]
    async fn test_load_waveform_corrupt_file_completes() {
        let track = Track::from_bytes(vec![0u8; 1024], None);
        let load = load_waveform(&track, WAVEFORM_BUCKETS).await;
        assert_well_formed(&load.samples);
        assert!(load.samples.is_synthetic());
    }

    #[tokio::test]
    async fn test_load_waveform_decodes_wav() {
        let track = Track::from_bytes(sine_wav(1.0, 8000), Some("wav"));
        let load = load_waveform(&track, WAVEFORM_BUCKETS).await;
        assert_well_formed(&load.samples);
        assert!(!load.samples.is_synthetic());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_decode_completes_at_watchdog() {
        let track = Track::from_bytes(sine_wav(30.0, 8000), Some("wav"));
        let started = tokio::time::Instant::now();

        let load = load_with_watchdog(
            &track,
            std::future::pending::<DecodeResult<DecodedAudio>>(),
            WAVEFORM_BUCKETS,
            DECODE_TIMEOUT,
        )
        .await;

        assert!(started.elapsed() >= DECODE_TIMEOUT);
        assert_well_formed(&load.samples);
        assert!(load.samples.is_synthetic());
        assert!(load.audio.is_none());
        // Header still read after the timeout
        assert!((load.total_duration.unwrap() - 30.0).abs() < 1e-3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_decode_of_garbage_has_no_duration() {
        let track = Track::from_bytes(vec![0x5a; 2048], Some("mp3"));
        let load = load_with_watchdog(
            &track,
            std::future::pending::<DecodeResult<DecodedAudio>>(),
            WAVEFORM_BUCKETS,
            DECODE_TIMEOUT,
        )
        .await;
        assert_well_formed(&load.samples);
        assert_eq!(load.total_duration, None);
    }

    #[test]
    fn test_bucket_count_is_configurable() {
        let load = extract_waveform(&sine_wav(2.0, 8000), Some("wav"), 64);
        assert_eq!(load.samples.len(), 64);
        assert_eq!(WaveformLoad::synthetic(None, 32).samples.len(), 32);
    }
}
