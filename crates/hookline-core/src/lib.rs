//! Hookline Core - preview window trimming and hover playback
//!
//! Everything here is UI-toolkit agnostic: waveform extraction from raw audio
//! bytes, the fixed-length trim region, the playback synchronizer that keeps a
//! media clock inside that region, and the per-card hover preview controller.
//!
//! The iced widgets that render and drag the region live in `hookline-widgets`.

pub mod audio;
pub mod audio_file;
pub mod config;
pub mod editor;
pub mod playback;
pub mod preview;
pub mod store;
pub mod track;
pub mod trim;
pub mod types;
pub mod waveform;

pub use types::*;
