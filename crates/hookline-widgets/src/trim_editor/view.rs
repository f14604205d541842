//! Trim editor view function
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     trim_editor(
//!         &self.editor_state,
//!         Message::TrimDragged,
//!         Message::TrimCommitted,
//!         Message::EditorSeek,
//!     )
//! }
//! ```

use hookline_core::trim::TrimBounds;
use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::TrimCanvas;
use super::state::{TrimEditorState, TRIM_EDITOR_HEIGHT};

/// Create the trim editor element
///
/// * `on_drag` - new window start (seconds) while dragging
/// * `on_commit` - final bounds when the pointer is released
/// * `on_seek` - track time (seconds) for clicks outside the window
pub fn trim_editor<'a, Message>(
    state: &'a TrimEditorState,
    on_drag: impl Fn(f64) -> Message + 'a,
    on_commit: impl Fn(TrimBounds) -> Message + 'a,
    on_seek: impl Fn(f64) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(TrimCanvas {
        state,
        on_drag,
        on_commit,
        on_seek,
    })
    .width(Length::Fill)
    .height(Length::Fixed(TRIM_EDITOR_HEIGHT))
    .into()
}
