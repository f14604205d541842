//! Standard locations for hookline configuration files

use std::path::PathBuf;

/// `~/.config/hookline` on Linux, the platform equivalent elsewhere
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hookline")
}

/// `{config_dir}/{filename}`
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
