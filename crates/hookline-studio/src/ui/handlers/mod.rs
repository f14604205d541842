//! Message handlers organized by feature
//!
//! Each sub-module provides handler methods on StudioApp.

pub mod editor;
pub mod hover;
pub mod tick;

use hookline_core::track::Track;
use hookline_core::waveform::load_waveform;
use hookline_core::AudioSource;

use super::message::LoadedTrack;

/// Read the track and extract `buckets` waveform buckets under the decode
/// watchdog
pub(crate) async fn load_track(
    source: AudioSource,
    buckets: usize,
) -> Result<LoadedTrack, String> {
    let track = Track::load(&source).await.map_err(|e| e.to_string())?;
    let load = load_waveform(&track, buckets).await;
    Ok(LoadedTrack { track, load })
}
