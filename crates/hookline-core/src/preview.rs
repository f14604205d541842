//! Hover-to-preview on song cards
//!
//! Each card owns one [`HoverPreviewController`]. Hovering schedules a
//! debounce; only when it elapses is the track loaded and a looping
//! synchronizer started at the stored trim start. Leaving the card pauses at
//! once and invalidates anything still in flight.
//!
//! ```text
//! hover_enter ──► Schedule{token} ──(300 ms)──► debounce_elapsed(token)
//!                                                  │
//!                     ┌────────── no synchronizer ─┴─ synchronizer ──┐
//!                     ▼                                              ▼
//!               Load{token} ──(decode)──► attach(token, sync)     play looping
//! ```
//!
//! The controller never spawns anything itself; the UI runs the returned
//! [`HoverAction`]s as tasks and reports back with the token.

use std::time::Duration;

use crate::config::PreviewPreferences;
use crate::playback::{LoopMode, MediaClock, PlaybackState, PlaybackSynchronizer};
use crate::trim::TrimRegion;
use crate::types::{Song, SongId, PREVIEW_WINDOW_SECS};

/// Delay between entering a card and loading its preview
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one hover; stale tokens are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverToken(u64);

/// Work the UI should perform after a controller call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverAction {
    /// Nothing to do
    Nothing,
    /// Wait `delay`, then call `debounce_elapsed(token)`
    Schedule { token: HoverToken, delay: Duration },
    /// Load the track, then call `attach(token, ..)`
    Load { token: HoverToken },
}

/// Sleep for the debounce and hand the token back
pub async fn debounce(token: HoverToken, delay: Duration) -> HoverToken {
    tokio::time::sleep(delay).await;
    token
}

/// Per-card preview state
pub struct HoverPreviewController<C: MediaClock> {
    song: Song,
    preferences: PreviewPreferences,
    window_length: f64,
    debounce: Duration,
    hovering: bool,
    generation: u64,
    synchronizer: Option<PlaybackSynchronizer<C>>,
}

impl<C: MediaClock> HoverPreviewController<C> {
    pub fn new(song: Song, preferences: PreviewPreferences) -> Self {
        Self {
            song,
            preferences,
            window_length: PREVIEW_WINDOW_SECS,
            debounce: HOVER_DEBOUNCE,
            hovering: false,
            generation: 0,
            synchronizer: None,
        }
    }

    pub fn with_window_length(mut self, window_length: f64) -> Self {
        self.window_length = window_length;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn preferences(&self) -> PreviewPreferences {
        self.preferences
    }

    pub fn window_length(&self) -> f64 {
        self.window_length
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    fn current_token(&self) -> HoverToken {
        HoverToken(self.generation)
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Pointer entered the card
    ///
    /// Ignored when autoplay is off or this song is already loaded in the
    /// main player.
    pub fn hover_enter(&mut self, main_player_song: Option<&SongId>) -> HoverAction {
        if !self.preferences.autoplay_previews {
            return HoverAction::Nothing;
        }
        if main_player_song == Some(&self.song.id) {
            log::debug!("Hover preview: {} is in the main player, skipping", self.song.id);
            return HoverAction::Nothing;
        }

        self.hovering = true;
        self.invalidate();
        HoverAction::Schedule {
            token: self.current_token(),
            delay: self.debounce,
        }
    }

    /// The debounce for `token` ran out
    pub fn debounce_elapsed(&mut self, token: HoverToken) -> HoverAction {
        if !self.hovering || token != self.current_token() {
            return HoverAction::Nothing;
        }
        if self.synchronizer.is_some() {
            self.start_playback();
            return HoverAction::Nothing;
        }
        HoverAction::Load { token }
    }

    /// Region to use once the track duration is known
    pub fn region_for(&self, total_duration: f64) -> TrimRegion {
        TrimRegion::init(total_duration, self.song.trim_start(), self.window_length)
    }

    /// Hand over the synchronizer built for this card's track
    ///
    /// It is kept for later hovers even when `token` is stale, but only
    /// started while the hover that requested it is still current.
    pub fn attach(&mut self, token: HoverToken, mut synchronizer: PlaybackSynchronizer<C>) {
        synchronizer.set_muted(self.preferences.muted);
        synchronizer.set_loop_mode(LoopMode::Loop);
        self.synchronizer = Some(synchronizer);

        if self.hovering && token == self.current_token() {
            self.start_playback();
        }
    }

    fn start_playback(&mut self) {
        let start = self.song.trim_start();
        if let Some(sync) = self.synchronizer.as_mut() {
            sync.retarget(start);
            sync.play();
            log::debug!(
                "Hover preview: playing {} from {:.1}s ({:?})",
                self.song.id,
                sync.region().start(),
                sync.state().mode
            );
        }
    }

    /// Pointer left the card
    pub fn hover_exit(&mut self) {
        self.hovering = false;
        self.invalidate();
        if let Some(sync) = self.synchronizer.as_mut() {
            sync.pause();
        }
    }

    /// Apply new shared preferences
    pub fn set_preferences(&mut self, preferences: PreviewPreferences) {
        self.preferences = preferences;
        if let Some(sync) = self.synchronizer.as_mut() {
            sync.set_muted(preferences.muted);
        }
        if !preferences.autoplay_previews && self.hovering {
            self.hover_exit();
        }
    }

    /// Flip mute and return the preferences to share with other cards
    pub fn toggle_mute(&mut self) -> PreviewPreferences {
        let mut preferences = self.preferences;
        preferences.muted = !preferences.muted;
        self.set_preferences(preferences);
        preferences
    }

    pub fn is_playing(&self) -> bool {
        self.synchronizer.as_ref().is_some_and(|s| s.is_playing())
    }

    /// Fraction of the preview window played, 0 when not playing
    pub fn progress(&self) -> f64 {
        match self.synchronizer.as_ref() {
            Some(sync) if sync.is_playing() => sync.region_progress(),
            _ => 0.0,
        }
    }

    /// Advance the active preview, if any
    pub fn tick(&mut self) -> Option<PlaybackState> {
        let sync = self.synchronizer.as_mut()?;
        if !sync.is_playing() {
            return None;
        }
        Some(sync.tick())
    }

    /// Refresh interval while playing
    pub fn tick_interval(&self) -> Option<Duration> {
        self.synchronizer
            .as_ref()
            .filter(|s| s.is_playing())
            .map(|s| s.tick_interval())
    }

    /// Release the synchronizer and its track
    pub fn teardown(&mut self) {
        self.hovering = false;
        self.invalidate();
        if self.synchronizer.take().is_some() {
            log::debug!("Hover preview: released {}", self.song.id);
        }
    }
}

impl<C: MediaClock> Drop for HoverPreviewController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
