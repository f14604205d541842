//! Configuration for hookline-studio
//!
//! Stored as YAML in the hookline config directory.
//! Default location: ~/.config/hookline/studio.yaml

use std::path::PathBuf;

use hookline_core::config::{default_config_path as config_file, PreviewConfig};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Preview preferences and tuning shared with the widgets
    pub preview: PreviewConfig,
    /// YAML file holding committed trim bounds
    /// Default: ~/.config/hookline/trims.yaml
    pub library_path: PathBuf,
    /// Directory scanned when no files are given on the command line
    /// Default: the platform's music directory
    pub music_dir: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            preview: PreviewConfig::default(),
            library_path: config_file("trims.yaml"),
            music_dir: dirs::audio_dir(),
        }
    }
}

/// `~/.config/hookline/studio.yaml`
pub fn default_config_path() -> PathBuf {
    config_file("studio.yaml")
}
