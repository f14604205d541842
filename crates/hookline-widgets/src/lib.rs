//! iced widgets for hookline applications
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: Pure data (`TrimEditorState`, `HoverCardStatus`)
//! - **View functions**: Take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: Handle custom rendering and event-to-callback translation
//!
//! ## View Functions
//!
//! - `trim_editor`: waveform with a draggable preview window
//! - `hover_card`: song card that reports hover enter/exit

pub mod hover_card;
pub mod theme;
pub mod trim_editor;

pub use hover_card::{hover_card, HoverCardStatus};
pub use trim_editor::{
    build_scene, pixel_to_time, time_to_pixel, trim_editor, DragController, DragOutcome,
    RegionScene, SceneKey, SurfaceSize, TrimCanvas, TrimEditorState, TrimInteraction,
    HANDLE_TOLERANCE_PX, TRIM_EDITOR_HEIGHT,
};
