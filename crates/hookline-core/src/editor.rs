//! One trim-editing session
//!
//! Owns everything the editor needs for a single song: the track, its
//! waveform and a looping synchronizer whose region is the trim selection.
//! A session exists from the moment the editor opens; until the load
//! finishes it is loading, and a play request made meanwhile starts once the
//! track resolves. Dropping the session stops playback and releases the
//! decoded audio.

use std::time::Duration;

use crate::audio::CpalClock;
use crate::playback::{
    region_for_load, LoopMode, MediaClock, PlaybackState, PlaybackSynchronizer,
};
use crate::track::Track;
use crate::trim::{TrimBounds, TrimEvent, TrimRegion};
use crate::types::Song;
use crate::waveform::{WaveformLoad, WaveformSamples};

pub struct EditorSession<C: MediaClock> {
    song: Song,
    /// `None` while loading, or when the payload could not be read
    track: Option<Track>,
    waveform: Option<WaveformSamples>,
    synchronizer: PlaybackSynchronizer<C>,
}

impl EditorSession<CpalClock> {
    /// Leave loading with whatever the load produced
    ///
    /// Without decoded audio the session plays on the simulated clock.
    pub fn finish_load(&mut self, track: Option<Track>, load: WaveformLoad) {
        let window_length = self.synchronizer.region().window_length();
        let region = region_for_load(&load, &self.song, window_length);
        let clock = load.audio.clone().map(CpalClock::new);
        log::info!(
            "EditorSession: {} ready ({} waveform, {:.1}s window at {:.1}s)",
            self.song.id,
            if load.samples.is_synthetic() { "synthetic" } else { "decoded" },
            region.to_bounds().length(),
            region.start()
        );
        self.resolve(track, load.samples, clock, region);
    }
}

impl<C: MediaClock> EditorSession<C> {
    /// Session for a song whose track is still loading
    pub fn loading(song: Song, window_length: f64) -> Self {
        Self {
            song,
            track: None,
            waveform: None,
            synchronizer: PlaybackSynchronizer::loading(window_length, LoopMode::Loop),
        }
    }

    pub fn resolve(
        &mut self,
        track: Option<Track>,
        waveform: WaveformSamples,
        clock: Option<C>,
        region: TrimRegion,
    ) {
        self.track = track;
        self.waveform = Some(waveform);
        self.synchronizer.resolve(clock, region);
    }

    pub fn is_loading(&self) -> bool {
        self.waveform.is_none()
    }

    pub fn waveform(&self) -> Option<&WaveformSamples> {
        self.waveform.as_ref()
    }

    pub fn region(&self) -> TrimRegion {
        self.synchronizer.region()
    }

    /// Move the window so it starts at `start`
    ///
    /// Playback, if running, continues from the new start.
    pub fn drag_to(&mut self, start: f64) -> TrimRegion {
        self.apply(TrimEvent::SetStart(start))
    }

    /// Move the window by `delta` seconds
    pub fn nudge(&mut self, delta: f64) -> TrimRegion {
        self.apply(TrimEvent::Nudge(delta))
    }

    fn apply(&mut self, event: TrimEvent) -> TrimRegion {
        let region = self.region().apply(event);
        self.synchronizer.retarget(region.start());
        region
    }

    /// Seek the playhead; while playing, positions outside the window snap
    /// back to its start
    pub fn seek(&mut self, seconds: f64) {
        self.synchronizer.seek(seconds);
        let region = self.region();
        if self.synchronizer.is_playing() && !region.contains(self.synchronizer.position()) {
            self.synchronizer.seek(region.start());
        }
    }

    /// Play or pause; while loading this arms or cancels a deferred start
    pub fn toggle_play(&mut self) {
        if self.synchronizer.is_playing() || self.synchronizer.is_play_pending() {
            self.synchronizer.pause();
        } else {
            self.synchronizer.play();
        }
    }

    pub fn is_play_pending(&self) -> bool {
        self.synchronizer.is_play_pending()
    }

    pub fn stop(&mut self) {
        self.synchronizer.stop();
    }

    pub fn tick(&mut self) -> PlaybackState {
        self.synchronizer.tick()
    }

    pub fn tick_interval(&self) -> Duration {
        self.synchronizer.tick_interval()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.synchronizer.set_muted(muted);
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.synchronizer.state()
    }

    /// Current selection; `(0, 0)` while the duration is unknown
    pub fn bounds(&self) -> TrimBounds {
        self.region().to_bounds()
    }

    /// Pause and hand back the bounds to persist
    pub fn commit(&mut self) -> TrimBounds {
        self.synchronizer.pause();
        let bounds = self.bounds();
        log::info!(
            "EditorSession: committed {} [{:.2}, {:.2}]",
            self.song.id,
            bounds.start,
            bounds.end
        );
        bounds
    }
}

impl<C: MediaClock> Drop for EditorSession<C> {
    fn drop(&mut self) {
        self.synchronizer.stop();
        log::debug!(
            "EditorSession: released {} ({} bytes)",
            self.song.id,
            self.track.as_ref().map_or(0, Track::size)
        );
    }
}
