//! Shared configuration utilities for hookline applications
//!
//! - Generic YAML config loading/saving
//! - Config directory paths
//! - Preview preferences and tuning
//!
//! # Usage
//!
//! ```ignore
//! use hookline_core::config::{load_config, save_config, default_config_path, PreviewConfig};
//!
//! let path = default_config_path("preview.yaml");
//! let config: PreviewConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;
mod preview;

pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};
pub use preview::{PreviewConfig, PreviewPreferences};
