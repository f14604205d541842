//! Region-bounded preview playback
//!
//! The [`PlaybackSynchronizer`] keeps a media clock inside the trim region:
//! playback always starts at the region start when the playhead is outside
//! it, and an overrun past the region end seeks back to the start (or stops,
//! for one-shot previews).
//!
//! Two clocks can back a playing synchronizer, tagged by [`PlaybackMode`]:
//!
//! - **Real**: a [`MediaClock`] (normally [`crate::audio::CpalClock`])
//! - **Simulated**: a wall-time virtual clock used when the real clock
//!   refuses to start
//!
//! Consumers only ever see [`PlaybackState`]; they cannot tell the two apart.

mod clock;
mod synchronizer;

pub use clock::{MediaClock, SimulatedClock};
pub use synchronizer::{region_for_load, PlaybackSynchronizer, REAL_TICK, SIMULATED_TICK};

/// Which clock currently backs the playhead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Idle,
    Real,
    Simulated,
}

/// Lifecycle phase of a synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// Track duration not resolved yet
    Loading,
    Playing,
    Paused,
}

/// What happens when the playhead reaches the region end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Loop,
    OneShot,
}

/// Snapshot read by renderers and cards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    pub is_playing: bool,
    /// Playhead in track seconds
    pub position: f64,
}
