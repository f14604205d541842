//! User interface for hookline-studio

pub mod app;
mod handlers;
pub mod message;

pub use app::StudioApp;
pub use message::Message;
