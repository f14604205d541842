//! Trim editor handlers
//!
//! Handles: OpenEditor, EditorLoaded, TrimDragged, TrimCommitted, EditorSeek,
//! NudgeTrim, TogglePlay, SaveTrim, CloseEditor
//!
//! Every committed window (drag release, nudge, Save) is written to the
//! library straight away; only a drag still in progress is unsaved.

use hookline_core::audio::CpalClock;
use hookline_core::editor::EditorSession;
use hookline_core::store::TrimStore;
use hookline_core::trim::TrimBounds;
use hookline_core::waveform::WaveformLoad;
use hookline_core::SongId;
use hookline_widgets::TrimEditorState;
use iced::Task;

use super::super::app::{EditorPanel, StudioApp};
use super::super::message::{LoadedTrack, Message};
use super::load_track;

impl StudioApp {
    /// Handle OpenEditor message
    pub fn handle_open_editor(&mut self, index: usize) -> Task<Message> {
        let Some(song) = self.cards.get(index).map(|c| c.song.clone()) else {
            return Task::none();
        };
        // The editor becomes the main player; stop anything previewing
        for card in &mut self.cards {
            card.preview.hover_exit();
        }

        log::info!("Opening editor for {}", song.id);
        let window = self.config.preview.window_length();
        let state = TrimEditorState::loading(window)
            .with_scale_factor(self.scale_factor)
            .with_handle_tolerance(self.config.preview.handle_tolerance());
        let mut session = EditorSession::loading(song.clone(), window);
        session.set_muted(self.config.preview.preferences.muted);

        let id = song.id.clone();
        let source = song.source.clone();
        self.editor = Some(EditorPanel {
            song,
            state,
            session,
            dirty: false,
        });

        let buckets = self.config.preview.bucket_count();
        Task::perform(load_track(source, buckets), move |result| {
            Message::EditorLoaded(id, result)
        })
    }

    /// Handle EditorLoaded message
    ///
    /// A failed read still resolves the session: the stored trim, if any,
    /// gives it enough of a duration to play on the simulated clock.
    pub fn handle_editor_loaded(
        &mut self,
        id: SongId,
        result: Result<LoadedTrack, String>,
    ) -> Task<Message> {
        let buckets = self.config.preview.bucket_count();
        let Some(editor) = self.editor.as_mut().filter(|e| e.song.id == id) else {
            log::debug!("Dropping stale editor load for {}", id);
            return Task::none();
        };

        match result {
            Ok(loaded) => editor.session.finish_load(Some(loaded.track), loaded.load),
            Err(e) => {
                log::warn!("Editor load failed for {}: {}", id, e);
                self.status = format!("Could not load {}: {}", editor.song.title, e);
                editor
                    .session
                    .finish_load(None, WaveformLoad::synthetic(None, buckets));
            }
        }
        if let Some(waveform) = editor.session.waveform() {
            editor.state.set_waveform(waveform.clone());
        }
        editor.sync_state();
        Task::none()
    }

    fn with_session(&mut self, f: impl FnOnce(&mut EditorSession<CpalClock>)) {
        if let Some(editor) = self.editor.as_mut() {
            f(&mut editor.session);
            editor.sync_state();
        }
    }

    /// Handle TrimDragged message
    pub fn handle_trim_dragged(&mut self, start: f64) -> Task<Message> {
        self.with_session(|session| {
            session.drag_to(start);
        });
        if let Some(editor) = self.editor.as_mut() {
            editor.dirty = !editor.session.is_loading();
        }
        Task::none()
    }

    /// Handle TrimCommitted message
    ///
    /// Playback keeps running from the released window.
    pub fn handle_trim_committed(&mut self, bounds: TrimBounds) -> Task<Message> {
        let Some(editor) = self.editor.as_mut() else {
            return Task::none();
        };
        editor.session.drag_to(bounds.start);
        editor.sync_state();
        let bounds = editor.session.bounds();
        self.persist_trim(bounds);
        Task::none()
    }

    /// Handle EditorSeek message
    pub fn handle_editor_seek(&mut self, seconds: f64) -> Task<Message> {
        self.with_session(|session| session.seek(seconds));
        Task::none()
    }

    /// Handle NudgeTrim message
    pub fn handle_nudge(&mut self, delta: f64) -> Task<Message> {
        let Some(editor) = self.editor.as_mut() else {
            return Task::none();
        };
        if editor.session.is_loading() {
            return Task::none();
        }
        editor.session.nudge(delta);
        editor.sync_state();
        let bounds = editor.session.bounds();
        self.persist_trim(bounds);
        Task::none()
    }

    /// Handle TogglePlay message
    ///
    /// Allowed while loading: playback then starts once the track resolves.
    pub fn handle_toggle_play(&mut self) -> Task<Message> {
        self.with_session(|session| session.toggle_play());
        Task::none()
    }

    /// Handle SaveTrim message
    pub fn handle_save_trim(&mut self) -> Task<Message> {
        let Some(editor) = self.editor.as_mut() else {
            return Task::none();
        };
        if editor.session.is_loading() {
            return Task::none();
        }
        let bounds = editor.session.commit();
        editor.sync_state();
        self.persist_trim(bounds);
        Task::none()
    }

    /// Write `bounds` for the open song and rebuild its card so the next
    /// hover preview starts there
    fn persist_trim(&mut self, bounds: TrimBounds) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let id = editor.song.id.clone();

        match self.library.save_trim(&id, bounds) {
            Ok(()) => {
                editor.dirty = false;
                editor.song.trim = Some(bounds);
                self.status = format!("Saved preview for {}", editor.song.title);

                let song = editor.song.clone();
                if let Some(card) = self.cards.iter_mut().find(|c| c.song.id == id) {
                    *card = Self::new_card(song, &self.config);
                }
            }
            Err(e) => {
                log::error!("Failed to save trim for {}: {:#}", id, e);
                editor.dirty = true;
                self.status = format!("Could not save preview: {}", e);
            }
        }
    }

    /// Handle CloseEditor message
    pub fn handle_close_editor(&mut self) -> Task<Message> {
        if let Some(editor) = self.editor.take() {
            if editor.dirty {
                log::warn!("Closing editor with unsaved window for {}", editor.song.id);
            }
        }
        Task::none()
    }
}
