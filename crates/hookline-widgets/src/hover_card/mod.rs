//! Song card that previews its trim window on hover
//!
//! The card itself is stateless: the application owns one
//! `HoverPreviewController` per card and passes a [`HoverCardStatus`]
//! snapshot into [`hover_card`].

mod view;

pub use view::{hover_card, HoverCardStatus};
