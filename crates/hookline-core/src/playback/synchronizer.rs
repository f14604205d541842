//! Keeps a media clock inside the trim region

use std::time::Duration;

use super::clock::{MediaClock, SimulatedClock};
use super::{LoopMode, PlaybackMode, PlaybackState, SyncPhase};
use crate::audio::{AudioError, CpalClock};
use crate::trim::TrimRegion;
use crate::types::Song;
use crate::waveform::WaveformLoad;

/// Playhead refresh while a real clock is running (~30 fps)
pub const REAL_TICK: Duration = Duration::from_millis(33);

/// Playhead refresh while the simulated clock is running
pub const SIMULATED_TICK: Duration = Duration::from_millis(100);

/// Region-bounded playback over an optional real clock
///
/// The synchronizer does not own a timer. The UI drives it by calling
/// [`tick`](Self::tick) every [`tick_interval`](Self::tick_interval) while
/// it is playing.
pub struct PlaybackSynchronizer<C: MediaClock> {
    clock: Option<C>,
    simulated: Option<SimulatedClock>,
    region: TrimRegion,
    loop_mode: LoopMode,
    phase: SyncPhase,
    mode: PlaybackMode,
    position: f64,
    muted: bool,
    /// `play()` arrived while the duration was still unknown
    pending_play: bool,
}

impl<C: MediaClock> PlaybackSynchronizer<C> {
    /// Synchronizer over a resolved region
    ///
    /// `clock` is `None` when the track could not be decoded; playback then
    /// always runs on the simulated clock.
    pub fn new(clock: Option<C>, region: TrimRegion, loop_mode: LoopMode) -> Self {
        Self {
            clock,
            simulated: None,
            region,
            loop_mode,
            phase: SyncPhase::Idle,
            mode: PlaybackMode::Idle,
            position: region.start(),
            muted: false,
            pending_play: false,
        }
    }

    /// Synchronizer for a track whose duration is not known yet
    pub fn loading(window_length: f64, loop_mode: LoopMode) -> Self {
        let mut sync = Self::new(None, TrimRegion::unresolved(window_length), loop_mode);
        sync.phase = SyncPhase::Loading;
        sync
    }

    /// Leave `Loading` once the track is available
    ///
    /// A `play()` requested while loading is honoured here.
    pub fn resolve(&mut self, clock: Option<C>, region: TrimRegion) {
        self.clock = clock;
        self.region = region;
        self.position = region.start();
        if let Some(clock) = self.clock.as_mut() {
            clock.set_muted(self.muted);
        }
        if self.phase == SyncPhase::Loading {
            self.phase = SyncPhase::Idle;
            if std::mem::take(&mut self.pending_play) {
                self.play();
            }
        }
    }

    pub fn play(&mut self) {
        match self.phase {
            SyncPhase::Loading => {
                self.pending_play = true;
                return;
            }
            SyncPhase::Playing => return,
            SyncPhase::Idle | SyncPhase::Paused => {}
        }

        if !self.region.contains(self.position) {
            self.position = self.region.start();
        }
        if self.region.to_bounds().length() <= 0.0 {
            log::debug!("PlaybackSynchronizer: empty region, nothing to play");
            return;
        }

        let position = self.position;
        let muted = self.muted;
        let started = match self.clock.as_mut() {
            Some(clock) => {
                clock.set_muted(muted);
                clock.seek(position);
                clock.start()
            }
            None => Err(AudioError::NoAudio),
        };

        match started {
            Ok(()) => {
                self.mode = PlaybackMode::Real;
            }
            Err(AudioError::NoAudio) => {
                log::info!("PlaybackSynchronizer: no decoded audio, simulating playback");
                self.start_simulated();
            }
            Err(e) => {
                log::warn!("PlaybackSynchronizer: playback refused ({}), simulating", e);
                self.start_simulated();
            }
        }
        self.phase = SyncPhase::Playing;
    }

    fn start_simulated(&mut self) {
        self.simulated = Some(SimulatedClock::running_from(self.position));
        self.mode = PlaybackMode::Simulated;
    }

    /// Advance the playhead and enforce the region end
    pub fn tick(&mut self) -> PlaybackState {
        if self.phase != SyncPhase::Playing {
            return self.state();
        }

        let raw = match self.mode {
            PlaybackMode::Real => self
                .clock
                .as_ref()
                .map_or(self.position, |clock| clock.position()),
            PlaybackMode::Simulated => self
                .simulated
                .as_ref()
                .map_or(self.position, |clock| clock.position()),
            PlaybackMode::Idle => self.position,
        };

        if raw >= self.region.end() {
            match self.loop_mode {
                LoopMode::Loop => {
                    let start = self.region.start();
                    self.seek_active(start);
                    self.position = start;
                }
                LoopMode::OneShot => self.stop(),
            }
        } else {
            self.position = raw.max(0.0);
        }

        self.state()
    }

    pub fn pause(&mut self) {
        match self.phase {
            SyncPhase::Loading => self.pending_play = false,
            SyncPhase::Playing => {
                self.halt();
                self.phase = SyncPhase::Paused;
            }
            SyncPhase::Idle | SyncPhase::Paused => {}
        }
    }

    /// Halt playback and rewind to the region start
    pub fn stop(&mut self) {
        if self.phase == SyncPhase::Loading {
            self.pending_play = false;
            return;
        }
        self.halt();
        self.phase = SyncPhase::Idle;
        self.position = self.region.start();
    }

    fn halt(&mut self) {
        match self.mode {
            PlaybackMode::Real => {
                if let Some(clock) = self.clock.as_mut() {
                    clock.pause();
                }
            }
            PlaybackMode::Simulated => self.simulated = None,
            PlaybackMode::Idle => {}
        }
        self.mode = PlaybackMode::Idle;
    }

    fn seek_active(&mut self, seconds: f64) {
        match self.mode {
            PlaybackMode::Real => {
                if let Some(clock) = self.clock.as_mut() {
                    clock.seek(seconds);
                }
            }
            PlaybackMode::Simulated => {
                if let Some(clock) = self.simulated.as_mut() {
                    clock.seek(seconds);
                }
            }
            PlaybackMode::Idle => {}
        }
    }

    /// Move the playhead, clamped into the track
    pub fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_nan() { 0.0 } else { seconds };
        let target = seconds.clamp(0.0, self.region.total_duration());
        self.position = target;
        self.seek_active(target);
    }

    /// Move the region and put the playhead on its new start without stopping
    pub fn retarget(&mut self, start: f64) {
        self.region = self.region.set_start(start);
        self.seek(self.region.start());
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(clock) = self.clock.as_mut() {
            clock.set_muted(muted);
        }
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    pub fn tick_interval(&self) -> Duration {
        match self.mode {
            PlaybackMode::Real => REAL_TICK,
            PlaybackMode::Simulated | PlaybackMode::Idle => SIMULATED_TICK,
        }
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            mode: self.mode,
            is_playing: self.phase == SyncPhase::Playing,
            position: self.position,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SyncPhase::Playing
    }

    /// `play()` was requested while loading and will run once resolved
    pub fn is_play_pending(&self) -> bool {
        self.pending_play
    }

    pub fn region(&self) -> TrimRegion {
        self.region
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Fraction of the region already played, in `[0, 1]`
    pub fn region_progress(&self) -> f64 {
        let length = self.region.to_bounds().length();
        if length <= 0.0 {
            return 0.0;
        }
        ((self.position - self.region.start()) / length).clamp(0.0, 1.0)
    }
}

/// Region for a finished load
///
/// When neither decoding nor the container header produced a duration, the
/// end of the song's stored trim stands in for it, so a simulated preview of
/// that window can still run. Without either the region stays unresolved.
pub fn region_for_load(load: &WaveformLoad, song: &Song, window_length: f64) -> TrimRegion {
    let stored_end = song.trim.map(|t| t.end).filter(|end| end.is_finite() && *end > 0.0);
    match load.total_duration.or(stored_end) {
        Some(total) => {
            if load.total_duration.is_none() {
                log::debug!(
                    "Duration of {} unknown, using stored trim end {:.1}s",
                    song.id,
                    total
                );
            }
            TrimRegion::init(total, song.trim_start(), window_length)
        }
        None => TrimRegion::unresolved(window_length),
    }
}

impl PlaybackSynchronizer<CpalClock> {
    /// Synchronizer over a finished waveform load
    ///
    /// The real clock exists only when decoding succeeded.
    pub fn from_load(
        load: &WaveformLoad,
        song: &Song,
        window_length: f64,
        loop_mode: LoopMode,
    ) -> Self {
        let region = region_for_load(load, song, window_length);
        let clock = load.audio.clone().map(CpalClock::new);
        Self::new(clock, region, loop_mode)
    }
}

impl<C: MediaClock> Drop for PlaybackSynchronizer<C> {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::testing::ScriptedClock;
    use crate::trim::TrimBounds;
    use crate::types::{AudioSource, SongId, PREVIEW_WINDOW_SECS};
    use crate::waveform::{extract_waveform, WAVEFORM_BUCKETS};
    use std::path::PathBuf;
    use tokio::time::advance;

    fn region(total: f64, start: f64) -> TrimRegion {
        TrimRegion::init(total, start, PREVIEW_WINDOW_SECS)
    }

    fn simulated(total: f64, start: f64) -> PlaybackSynchronizer<ScriptedClock> {
        PlaybackSynchronizer::new(
            Some(ScriptedClock::rejecting()),
            region(total, start),
            LoopMode::Loop,
        )
    }

    #[test]
    fn test_play_from_outside_region_starts_at_region_start() {
        let mut sync = PlaybackSynchronizer::new(
            Some(ScriptedClock::default()),
            region(180.0, 60.0),
            LoopMode::Loop,
        );
        sync.seek(5.0);
        sync.play();
        let state = sync.state();
        assert!(state.is_playing);
        assert_eq!(state.mode, PlaybackMode::Real);
        assert_eq!(state.position, 60.0);
        assert_eq!(sync.clock.as_ref().map(|c| c.position), Some(60.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_start_falls_back_to_simulated() {
        let mut sync = simulated(180.0, 0.0);
        sync.play();
        assert_eq!(sync.state().mode, PlaybackMode::Simulated);
        assert!(sync.is_playing());
        assert_eq!(sync.tick_interval(), SIMULATED_TICK);

        advance(SIMULATED_TICK).await;
        let state = sync.tick();
        assert!((state.position - 0.1).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_speed_does_not_depend_on_tick_rate() {
        let mut sync = simulated(180.0, 0.0);
        sync.play();

        // A faster caller (the real-clock cadence) must not speed it up
        for _ in 0..30 {
            advance(REAL_TICK).await;
            sync.tick();
        }
        assert!((sync.position() - 0.99).abs() < 1e-6);

        // Nor does a slow one slow it down
        advance(Duration::from_secs(2)).await;
        assert!((sync.tick().position - 2.99).abs() < 1e-6);
    }

    #[test]
    fn test_missing_clock_simulates() {
        let mut sync: PlaybackSynchronizer<ScriptedClock> =
            PlaybackSynchronizer::new(None, region(60.0, 10.0), LoopMode::Loop);
        sync.play();
        assert_eq!(sync.state().mode, PlaybackMode::Simulated);
        assert_eq!(sync.state().position, 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_loop_wraps_to_start() {
        let mut sync = simulated(180.0, 0.0);
        sync.play();

        let mut last = 0.0;
        let mut wrapped = false;
        for _ in 0..250 {
            advance(SIMULATED_TICK).await;
            let state = sync.tick();
            assert!(state.position < 20.0);
            if state.position < last {
                assert_eq!(state.position, 0.0);
                wrapped = true;
                break;
            }
            last = state.position;
        }
        assert!(wrapped);
        assert!(last > 19.8);
        assert!(sync.is_playing());
    }

    #[test]
    fn test_real_clock_overrun_seeks_back() {
        let mut sync = PlaybackSynchronizer::new(
            Some(ScriptedClock::default()),
            region(180.0, 30.0),
            LoopMode::Loop,
        );
        sync.play();
        assert_eq!(sync.tick_interval(), REAL_TICK);

        if let Some(clock) = sync.clock.as_mut() {
            clock.advance(12.5);
        }
        assert_eq!(sync.tick().position, 42.5);

        if let Some(clock) = sync.clock.as_mut() {
            clock.advance(8.0);
        }
        let state = sync.tick();
        assert_eq!(state.position, 30.0);
        assert_eq!(sync.clock.as_ref().map(|c| c.position), Some(30.0));
    }

    #[test]
    fn test_one_shot_stops_at_end() {
        let mut sync = PlaybackSynchronizer::new(
            Some(ScriptedClock::default()),
            region(180.0, 0.0),
            LoopMode::OneShot,
        );
        sync.play();
        if let Some(clock) = sync.clock.as_mut() {
            clock.advance(21.0);
        }
        let state = sync.tick();
        assert!(!state.is_playing);
        assert_eq!(state.mode, PlaybackMode::Idle);
        assert_eq!(state.position, 0.0);
    }

    #[test]
    fn test_pause_and_stop_are_idempotent() {
        let mut sync = PlaybackSynchronizer::new(
            Some(ScriptedClock::default()),
            region(180.0, 40.0),
            LoopMode::Loop,
        );
        sync.pause();
        sync.stop();
        sync.play();
        sync.seek(45.0);
        sync.pause();
        sync.pause();
        assert_eq!(sync.phase(), SyncPhase::Paused);
        assert_eq!(sync.position(), 45.0);
        assert_eq!(sync.clock.as_ref().map(|c| c.pauses), Some(1));

        sync.stop();
        sync.stop();
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.position(), 40.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_inside_region_keeps_position() {
        let mut sync = simulated(180.0, 40.0);
        sync.play();
        advance(Duration::from_millis(200)).await;
        sync.tick();
        sync.pause();
        let paused_at = sync.position();
        assert!((paused_at - 40.2).abs() < 1e-9);

        advance(Duration::from_secs(5)).await;
        sync.play();
        assert_eq!(sync.position(), paused_at);
        assert_eq!(sync.tick().position, paused_at);
    }

    #[test]
    fn test_seek_clamps_to_track() {
        let mut sync = simulated(90.0, 0.0);
        sync.seek(-3.0);
        assert_eq!(sync.position(), 0.0);
        sync.seek(500.0);
        assert_eq!(sync.position(), 90.0);
        sync.seek(f64::NAN);
        assert_eq!(sync.position(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_while_playing() {
        let mut sync = simulated(180.0, 0.0);
        sync.play();
        advance(SIMULATED_TICK).await;
        sync.tick();
        sync.retarget(100.0);
        assert!(sync.is_playing());
        assert_eq!(sync.position(), 100.0);
        assert_eq!(sync.region().start(), 100.0);

        advance(SIMULATED_TICK).await;
        let state = sync.tick();
        assert!((state.position - 100.1).abs() < 1e-9);
    }

    #[test]
    fn test_play_while_loading_is_deferred() {
        let mut sync: PlaybackSynchronizer<ScriptedClock> =
            PlaybackSynchronizer::loading(PREVIEW_WINDOW_SECS, LoopMode::Loop);
        sync.play();
        assert_eq!(sync.phase(), SyncPhase::Loading);
        assert!(sync.is_play_pending());
        assert!(!sync.state().is_playing);

        sync.resolve(Some(ScriptedClock::default()), region(120.0, 50.0));
        assert!(sync.is_playing());
        assert!(!sync.is_play_pending());
        assert_eq!(sync.position(), 50.0);
    }

    #[test]
    fn test_pause_while_loading_cancels_pending_play() {
        let mut sync: PlaybackSynchronizer<ScriptedClock> =
            PlaybackSynchronizer::loading(PREVIEW_WINDOW_SECS, LoopMode::Loop);
        sync.play();
        sync.pause();
        sync.resolve(Some(ScriptedClock::default()), region(120.0, 0.0));
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_mute_reaches_clock() {
        let mut sync = PlaybackSynchronizer::new(
            Some(ScriptedClock::default()),
            region(60.0, 0.0),
            LoopMode::Loop,
        );
        sync.set_muted(true);
        assert_eq!(sync.clock.as_ref().map(|c| c.muted), Some(true));
        sync.play();
        assert!(sync.is_muted());
    }

    #[test]
    fn test_region_progress() {
        let mut sync = simulated(180.0, 10.0);
        assert_eq!(sync.region_progress(), 0.0);
        sync.seek(15.0);
        assert_eq!(sync.region_progress(), 0.25);
        sync.seek(170.0);
        assert_eq!(sync.region_progress(), 1.0);
    }

    #[test]
    fn test_empty_region_does_not_play() {
        let mut sync: PlaybackSynchronizer<ScriptedClock> =
            PlaybackSynchronizer::new(None, TrimRegion::unresolved(20.0), LoopMode::Loop);
        sync.play();
        assert!(!sync.is_playing());
        assert_eq!(sync.state().mode, PlaybackMode::Idle);
    }

    fn broken_song(trim: Option<TrimBounds>) -> Song {
        Song::new(
            SongId::new("broken"),
            "Broken",
            AudioSource::File(PathBuf::from("broken.mp3")),
        )
        .with_trim(trim)
    }

    #[test]
    fn test_undecodable_load_uses_stored_trim_end() {
        let load = extract_waveform(&[0x5a; 2048], Some("mp3"), WAVEFORM_BUCKETS);
        assert_eq!(load.total_duration, None);

        let song = broken_song(Some(TrimBounds { start: 30.0, end: 50.0 }));
        let region = region_for_load(&load, &song, PREVIEW_WINDOW_SECS);
        assert_eq!(region.to_bounds(), TrimBounds { start: 30.0, end: 50.0 });

        let mut sync =
            PlaybackSynchronizer::from_load(&load, &song, PREVIEW_WINDOW_SECS, LoopMode::Loop);
        sync.play();
        assert!(sync.is_playing());
        assert_eq!(sync.state().mode, PlaybackMode::Simulated);
    }

    #[test]
    fn test_undecodable_load_without_trim_stays_unresolved() {
        let load = extract_waveform(&[0x5a; 2048], Some("mp3"), WAVEFORM_BUCKETS);
        let region = region_for_load(&load, &broken_song(None), PREVIEW_WINDOW_SECS);
        assert_eq!(region.to_bounds(), TrimBounds { start: 0.0, end: 0.0 });
    }
}
