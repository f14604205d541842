//! Trim editor state

use hookline_core::playback::PlaybackState;
use hookline_core::trim::TrimRegion;
use hookline_core::waveform::WaveformSamples;

use super::drag::HANDLE_TOLERANCE_PX;
use super::scene::{SceneKey, SurfaceSize};

/// Height of the trim editor canvas
pub const TRIM_EDITOR_HEIGHT: f32 = 120.0;

/// Everything the trim editor draws
///
/// The application owns this and copies region and playback snapshots into
/// it after each update.
#[derive(Debug, Clone)]
pub struct TrimEditorState {
    /// Waveform buckets; `None` while the track is loading
    pub waveform: Option<WaveformSamples>,
    pub region: TrimRegion,
    /// Playhead in track seconds
    pub playhead: f64,
    pub is_playing: bool,
    /// Display scale factor used for pixel snapping
    pub scale_factor: f32,
    /// Presses this close to the window start grab it, in pixels
    pub handle_tolerance: f32,
    /// Bumped whenever the waveform changes
    revision: u64,
}

impl TrimEditorState {
    /// Editor waiting for its track
    pub fn loading(window_length: f64) -> Self {
        Self {
            waveform: None,
            region: TrimRegion::unresolved(window_length),
            playhead: 0.0,
            is_playing: false,
            scale_factor: 1.0,
            handle_tolerance: HANDLE_TOLERANCE_PX,
            revision: 0,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_handle_tolerance(mut self, tolerance: f32) -> Self {
        self.handle_tolerance = tolerance;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.waveform.is_none()
    }

    pub fn set_waveform(&mut self, waveform: WaveformSamples) {
        self.waveform = Some(waveform);
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn set_region(&mut self, region: TrimRegion) {
        self.region = region;
    }

    pub fn set_playback(&mut self, playback: PlaybackState) {
        self.playhead = playback.position;
        self.is_playing = playback.is_playing;
    }

    pub fn scene_key(&self, surface: SurfaceSize) -> SceneKey {
        SceneKey::new(
            self.revision,
            &self.region,
            self.playhead,
            self.is_playing,
            surface,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookline_core::playback::PlaybackMode;
    use hookline_core::waveform::WAVEFORM_BUCKETS;

    #[test]
    fn test_waveform_bumps_revision() {
        let mut state = TrimEditorState::loading(20.0);
        assert!(state.is_loading());
        assert_eq!(state.revision, 0);

        state.set_waveform(WaveformSamples::synthetic(WAVEFORM_BUCKETS));
        assert!(!state.is_loading());
        assert_eq!(state.revision, 1);
    }

    #[test]
    fn test_playback_snapshot_changes_key() {
        let surface = SurfaceSize::new(400.0, 100.0, 1.0);
        let mut state = TrimEditorState::loading(20.0);
        state.set_region(TrimRegion::init(40.0, 0.0, 20.0));
        let idle = state.scene_key(surface);

        state.set_playback(PlaybackState {
            mode: PlaybackMode::Simulated,
            is_playing: true,
            position: 10.0,
        });
        assert_ne!(state.scene_key(surface), idle);
        assert_eq!(state.playhead, 10.0);
    }
}
