//! Real audio output for previews
//!
//! The preview clock plays a decoded mono signal through the default CPAL
//! output device. It follows the same split as a full engine, just smaller:
//!
//! - **UI thread**: requests play/pause/seek through atomics
//! - **Audio thread**: owns the read cursor and writes it back every buffer
//!
//! ```text
//! ┌──────────────────┐  seek_request / playing  ┌─────────────────────┐
//! │ PlaybackSynchro- │─────────────────────────►│  CPAL output stream │
//! │ nizer (UI)       │◄─────────────────────────│  (callback thread)  │
//! └──────────────────┘      position (f64)      └─────────────────────┘
//! ```
//!
//! Any failure to open or start the stream is reported as an [`AudioError`];
//! the synchronizer treats every such error as a refusal and switches to its
//! simulated clock.

mod cpal_clock;
mod device;
mod error;

pub use cpal_clock::CpalClock;
pub use device::{default_output_device, output_stream_config};
pub use error::{AudioError, AudioResult};
