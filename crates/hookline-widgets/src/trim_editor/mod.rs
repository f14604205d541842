//! Trim editor widget
//!
//! A waveform with a fixed-length preview window the user drags along the
//! track. Split the same way as the other widgets:
//!
//! - `state`: pure data owned by the application
//! - `drag`: pointer math for the drag gesture
//! - `scene`: renderer-independent layout
//! - `canvas`: the iced `Program` that paints a scene and publishes drags
//! - `view`: the view function

mod canvas;
mod drag;
mod scene;
mod state;
mod view;

pub use canvas::{TrimCanvas, TrimInteraction};
pub use drag::{pixel_to_time, time_to_pixel, DragController, DragOutcome, HANDLE_TOLERANCE_PX};
pub use scene::{build_scene, Bar, RegionScene, SceneKey, Span, SurfaceSize};
pub use state::{TrimEditorState, TRIM_EDITOR_HEIGHT};
pub use view::trim_editor;
