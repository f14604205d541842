//! Track payloads
//!
//! A [`Track`] is the immutable audio payload for one editing or preview
//! session. It is cheap to clone (the bytes are shared) and is dropped with
//! the session that owns it.

use std::sync::Arc;

use crate::audio_file::{DecodeError, DecodeResult};
use crate::types::AudioSource;

/// Immutable audio payload
#[derive(Debug, Clone)]
pub struct Track {
    bytes: Arc<[u8]>,
    extension: Option<String>,
}

impl Track {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>, extension: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            extension: extension.map(str::to_owned),
        }
    }

    /// Read the payload behind a song's audio source
    ///
    /// File reads run on the blocking pool so the UI thread never waits on
    /// disk.
    pub async fn load(source: &AudioSource) -> DecodeResult<Self> {
        match source {
            AudioSource::Bytes(bytes) => Ok(Self {
                bytes: Arc::clone(bytes),
                extension: None,
            }),
            AudioSource::File(path) => {
                let path = path.clone();
                let extension = source.extension().map(str::to_owned);
                let bytes = tokio::task::spawn_blocking(move || std::fs::read(&path))
                    .await
                    .map_err(|e| DecodeError::TaskFailed(e.to_string()))?
                    .map_err(|e| DecodeError::Io(e.to_string()))?;
                log::debug!("Track::load: read {} bytes", bytes.len());
                Ok(Self {
                    bytes: bytes.into(),
                    extension,
                })
            }
        }
    }

    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
