//! Application messages

use hookline_core::preview::HoverToken;
use hookline_core::track::Track;
use hookline_core::trim::TrimBounds;
use hookline_core::waveform::WaveformLoad;
use hookline_core::SongId;

/// Track bytes plus the waveform extracted from them
#[derive(Debug, Clone)]
pub struct LoadedTrack {
    pub track: Track,
    pub load: WaveformLoad,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Song cards
    CardEntered(usize),
    CardExited(usize),
    /// Hover debounce for a card ran out
    HoverDebounced(usize, HoverToken),
    PreviewLoaded(usize, HoverToken, Result<LoadedTrack, String>),
    ToggleMute(usize),
    ToggleAutoplay,

    // Trim editor
    OpenEditor(usize),
    EditorLoaded(SongId, Result<LoadedTrack, String>),
    /// Live drag: new window start in seconds
    TrimDragged(f64),
    /// Drag released with these bounds
    TrimCommitted(TrimBounds),
    EditorSeek(f64),
    NudgeTrim(f64),
    TogglePlay,
    SaveTrim,
    CloseEditor,

    // Misc
    Tick,
    /// Scale factor reported by the main window
    ScaleFactorChanged(f32),
    ConfigSaved(Result<(), String>),
}
