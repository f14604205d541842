//! Song card hover preview handlers
//!
//! Handles: CardEntered, CardExited, HoverDebounced, PreviewLoaded,
//! ToggleMute, ToggleAutoplay

use hookline_core::playback::{LoopMode, PlaybackSynchronizer};
use hookline_core::preview::{debounce, HoverAction, HoverToken};
use iced::Task;

use super::super::app::StudioApp;
use super::super::message::{LoadedTrack, Message};
use super::load_track;

impl StudioApp {
    /// Turn a controller action into a task for card `index`
    fn run_hover_action(&self, index: usize, action: HoverAction) -> Task<Message> {
        match action {
            HoverAction::Nothing => Task::none(),
            HoverAction::Schedule { token, delay } => Task::perform(
                debounce(token, delay),
                move |token| Message::HoverDebounced(index, token),
            ),
            HoverAction::Load { token } => {
                let Some(card) = self.cards.get(index) else {
                    return Task::none();
                };
                let source = card.song.source.clone();
                let buckets = self.config.preview.bucket_count();
                Task::perform(load_track(source, buckets), move |result| {
                    Message::PreviewLoaded(index, token, result)
                })
            }
        }
    }

    /// Handle CardEntered message
    pub fn handle_card_entered(&mut self, index: usize) -> Task<Message> {
        let in_player = self.main_player_song();
        let Some(card) = self.cards.get_mut(index) else {
            return Task::none();
        };
        let action = card.preview.hover_enter(in_player.as_ref());
        self.run_hover_action(index, action)
    }

    /// Handle CardExited message
    pub fn handle_card_exited(&mut self, index: usize) -> Task<Message> {
        if let Some(card) = self.cards.get_mut(index) {
            card.preview.hover_exit();
        }
        Task::none()
    }

    /// Handle HoverDebounced message
    pub fn handle_hover_debounced(&mut self, index: usize, token: HoverToken) -> Task<Message> {
        let Some(card) = self.cards.get_mut(index) else {
            return Task::none();
        };
        let action = card.preview.debounce_elapsed(token);
        self.run_hover_action(index, action)
    }

    /// Handle PreviewLoaded message
    pub fn handle_preview_loaded(
        &mut self,
        index: usize,
        token: HoverToken,
        result: Result<LoadedTrack, String>,
    ) -> Task<Message> {
        let Some(card) = self.cards.get_mut(index) else {
            return Task::none();
        };

        match result {
            Ok(loaded) => {
                let window = card.preview.window_length();
                let synchronizer = PlaybackSynchronizer::from_load(
                    &loaded.load,
                    &card.song,
                    window,
                    LoopMode::Loop,
                );
                card.preview.attach(token, synchronizer);
            }
            Err(e) => {
                log::warn!("Preview load failed for {}: {}", card.song.id, e);
                self.status = format!("Could not load {}: {}", card.song.title, e);
            }
        }
        Task::none()
    }

    /// Handle ToggleMute message
    ///
    /// Mute is a shared preference: it applies to every card and is persisted.
    pub fn handle_toggle_mute(&mut self, index: usize) -> Task<Message> {
        let Some(card) = self.cards.get_mut(index) else {
            return Task::none();
        };
        let preferences = card.preview.toggle_mute();
        self.config.preview.preferences = preferences;
        for card in &mut self.cards {
            card.preview.set_preferences(preferences);
        }
        if let Some(editor) = self.editor.as_mut() {
            editor.session.set_muted(preferences.muted);
        }
        self.save_config_task()
    }

    /// Handle ToggleAutoplay message
    pub fn handle_toggle_autoplay(&mut self) -> Task<Message> {
        let mut preferences = self.config.preview.preferences;
        preferences.autoplay_previews = !preferences.autoplay_previews;
        self.config.preview.preferences = preferences;
        for card in &mut self.cards {
            card.preview.set_preferences(preferences);
        }
        log::info!("Autoplay previews: {}", preferences.autoplay_previews);
        self.save_config_task()
    }
}
