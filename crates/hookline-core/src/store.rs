//! Persistence seam for committed trim bounds
//!
//! The editor only produces [`TrimBounds`]; where they end up is up to the
//! host application (a YAML library in the studio, a database elsewhere).

use std::collections::HashMap;

use anyhow::Result;

use crate::trim::TrimBounds;
use crate::types::SongId;

pub trait TrimStore {
    /// Previously committed bounds for `song`
    fn load_trim(&self, song: &SongId) -> Option<TrimBounds>;

    /// Persist bounds committed by the editor
    fn save_trim(&mut self, song: &SongId, bounds: TrimBounds) -> Result<()>;
}

/// Store that keeps bounds in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryTrimStore {
    trims: HashMap<SongId, TrimBounds>,
}

impl MemoryTrimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trims.is_empty()
    }
}

impl TrimStore for MemoryTrimStore {
    fn load_trim(&self, song: &SongId) -> Option<TrimBounds> {
        self.trims.get(song).copied()
    }

    fn save_trim(&mut self, song: &SongId, bounds: TrimBounds) -> Result<()> {
        self.trims.insert(song.clone(), bounds);
        Ok(())
    }
}
