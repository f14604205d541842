//! Shared record types handed in by the metadata subsystem

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::trim::TrimBounds;

/// Length of the preview window in seconds
pub const PREVIEW_WINDOW_SECS: f64 = 20.0;

/// Stable identifier of a song in the external metadata store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub String);

impl SongId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the audio payload for a song comes from
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Bytes already in memory (fresh upload)
    Bytes(Arc<[u8]>),
    /// File on disk (library track)
    File(PathBuf),
}

impl AudioSource {
    /// File extension hint for the decoder, if known
    pub fn extension(&self) -> Option<&str> {
        match self {
            AudioSource::Bytes(_) => None,
            AudioSource::File(path) => path.extension().and_then(|e| e.to_str()),
        }
    }
}

/// Song record as produced by the upload/metadata subsystem
#[derive(Debug, Clone)]
pub struct Song {
    pub id: SongId,
    /// Display title
    pub title: String,
    pub source: AudioSource,
    /// Previously committed preview window, if any
    pub trim: Option<TrimBounds>,
}

impl Song {
    pub fn new(id: SongId, title: impl Into<String>, source: AudioSource) -> Self {
        Self {
            id,
            title: title.into(),
            source,
            trim: None,
        }
    }

    pub fn with_trim(mut self, trim: Option<TrimBounds>) -> Self {
        self.trim = trim;
        self
    }

    /// Stored trim start, or the top of the track when nothing was committed
    pub fn trim_start(&self) -> f64 {
        self.trim.map(|t| t.start).unwrap_or(0.0)
    }
}
