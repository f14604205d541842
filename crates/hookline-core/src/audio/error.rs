//! Audio output error types

use thiserror::Error;

/// Errors that can occur when starting or driving real playback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// No audio devices available
    #[error("No audio output devices found")]
    NoDevices,

    /// Failed to get default device
    #[error("Failed to get default audio device: {0}")]
    NoDefaultDevice(String),

    /// Failed to get device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start/play stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Host refused to start playback without a prior user gesture
    #[error("Playback rejected by host: {0}")]
    PlaybackRejected(String),

    /// Clock has no decoded audio to play
    #[error("No decoded audio attached to the clock")]
    NoAudio,
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
