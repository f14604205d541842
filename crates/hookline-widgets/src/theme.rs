//! Shared colors for the trim editor and hover cards

use iced::Color;

/// Canvas background
pub const BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.12);

/// Waveform bars outside the preview window
pub const BAR_COLOR: Color = Color::from_rgba(0.55, 0.55, 0.6, 0.7);

/// Waveform bars inside the preview window
pub const BAR_SELECTED_COLOR: Color = Color::from_rgb(0.2, 0.8, 0.4);

/// Highlight band over the preview window
pub const BAND_COLOR: Color = Color::from_rgba(0.2, 0.8, 0.4, 0.15);

/// Start/end handle markers
pub const HANDLE_COLOR: Color = Color::from_rgb(0.95, 0.95, 0.95);

/// Playback cursor
pub const CURSOR_COLOR: Color = Color::from_rgb(1.0, 0.6, 0.0);

/// Loading placeholder
pub const PLACEHOLDER_COLOR: Color = Color::from_rgba(0.6, 0.6, 0.6, 0.8);

/// Hover card backgrounds
pub const CARD_COLOR: Color = Color::from_rgb(0.16, 0.16, 0.18);
pub const CARD_ACTIVE_COLOR: Color = Color::from_rgb(0.2, 0.24, 0.22);
