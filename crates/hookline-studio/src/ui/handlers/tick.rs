//! Tick handler for periodic playhead updates
//!
//! The Tick message arrives at the shortest interval any running preview
//! asks for (33 ms for real audio, 100 ms for the simulated clock).

use iced::Task;

use super::super::app::StudioApp;
use super::super::message::Message;

impl StudioApp {
    /// Handle Tick message
    pub fn handle_tick(&mut self) -> Task<Message> {
        if let Some(editor) = self.editor.as_mut() {
            editor.session.tick();
            editor.sync_state();
        }

        for card in &mut self.cards {
            card.preview.tick();
        }
        Task::none()
    }
}
