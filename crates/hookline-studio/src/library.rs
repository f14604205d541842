//! YAML trim library
//!
//! Stands in for the external metadata store: committed preview windows are
//! kept per song id in a single YAML file and rewritten on every save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hookline_core::config::{load_config, save_config};
use hookline_core::store::TrimStore;
use hookline_core::trim::TrimBounds;
use hookline_core::SongId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct LibraryFile {
    trims: BTreeMap<SongId, TrimBounds>,
}

/// Trim bounds persisted to YAML
#[derive(Debug, Clone)]
pub struct TrimLibrary {
    path: PathBuf,
    file: LibraryFile,
}

impl TrimLibrary {
    /// Open the library at `path`; a missing or invalid file starts empty
    pub fn open(path: &Path) -> Self {
        let library = Self {
            path: path.to_path_buf(),
            file: load_config(path),
        };
        log::info!("TrimLibrary: {} stored trims in {:?}", library.len(), path);
        library
    }

    pub fn len(&self) -> usize {
        self.file.trims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.trims.is_empty()
    }
}

impl TrimStore for TrimLibrary {
    fn load_trim(&self, song: &SongId) -> Option<TrimBounds> {
        self.file.trims.get(song).copied()
    }

    fn save_trim(&mut self, song: &SongId, bounds: TrimBounds) -> Result<()> {
        self.file.trims.insert(song.clone(), bounds);
        save_config(&self.file, &self.path)
            .with_context(|| format!("Failed to store trim for {}", song))
    }
}
