//! Preview preferences and tuning

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::PREVIEW_WINDOW_SECS;
use crate::waveform::WAVEFORM_BUCKETS;

/// User-facing preview preferences
///
/// Shared by every hover card; handed to controllers by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewPreferences {
    /// Start previews automatically when a card is hovered
    /// Default: true
    pub autoplay_previews: bool,

    /// Silence preview output (the playhead keeps moving)
    /// Default: false
    pub muted: bool,
}

impl Default for PreviewPreferences {
    fn default() -> Self {
        Self {
            autoplay_previews: true,
            muted: false,
        }
    }
}

/// Preview tuning shared by the editor and hover cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub preferences: PreviewPreferences,

    /// Length of the preview window in seconds
    /// Default: 20.0
    pub window_seconds: f64,

    /// Number of waveform buckets drawn in the editor
    /// Default: 200
    pub waveform_buckets: usize,

    /// Hover delay before a preview loads, in milliseconds
    /// Default: 300
    pub hover_debounce_ms: u64,

    /// Presses this close to the window start grab the window, in pixels
    /// Default: 10.0
    pub handle_tolerance_px: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            preferences: PreviewPreferences::default(),
            window_seconds: PREVIEW_WINDOW_SECS,
            waveform_buckets: WAVEFORM_BUCKETS,
            hover_debounce_ms: 300,
            handle_tolerance_px: 10.0,
        }
    }
}

impl PreviewConfig {
    pub fn hover_debounce(&self) -> Duration {
        Duration::from_millis(self.hover_debounce_ms)
    }

    /// Buckets per waveform; zero falls back to the default
    pub fn bucket_count(&self) -> usize {
        if self.waveform_buckets == 0 {
            WAVEFORM_BUCKETS
        } else {
            self.waveform_buckets
        }
    }

    /// Handle grab distance; unusable values fall back to the default
    pub fn handle_tolerance(&self) -> f32 {
        if self.handle_tolerance_px.is_finite() && self.handle_tolerance_px >= 0.0 {
            self.handle_tolerance_px
        } else {
            10.0
        }
    }

    /// Window length, falling back to the default for unusable values
    pub fn window_length(&self) -> f64 {
        if self.window_seconds.is_finite() && self.window_seconds > 0.0 {
            self.window_seconds
        } else {
            PREVIEW_WINDOW_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::default();
        assert!(config.preferences.autoplay_previews);
        assert!(!config.preferences.muted);
        assert_eq!(config.window_length(), 20.0);
        assert_eq!(config.bucket_count(), 200);
        assert_eq!(config.handle_tolerance(), 10.0);
        assert_eq!(config.hover_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: PreviewConfig =
            serde_yaml::from_str("preferences:\n  muted: true\nwindow_seconds: -4\n").unwrap();
        assert!(config.preferences.muted);
        assert!(config.preferences.autoplay_previews);
        assert_eq!(config.window_length(), 20.0);
        assert_eq!(config.hover_debounce_ms, 300);
    }

    #[test]
    fn test_tuning_values_sanitized() {
        let config: PreviewConfig =
            serde_yaml::from_str("waveform_buckets: 0
handle_tolerance_px: -2
").unwrap();
        assert_eq!(config.bucket_count(), 200);
        assert_eq!(config.handle_tolerance(), 10.0);

        let config: PreviewConfig =
            serde_yaml::from_str("waveform_buckets: 96
handle_tolerance_px: 16
").unwrap();
        assert_eq!(config.bucket_count(), 96);
        assert_eq!(config.handle_tolerance(), 16.0);
    }
}
