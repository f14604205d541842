//! Main application state, update dispatch and view

use std::path::PathBuf;
use std::time::Duration;

use hookline_core::audio::CpalClock;
use hookline_core::config::{load_config, save_config};
use hookline_core::editor::EditorSession;
use hookline_core::preview::HoverPreviewController;
use hookline_core::{Song, SongId};
use hookline_widgets::{hover_card, trim_editor, HoverCardStatus, TrimEditorState};
use iced::widget::{button, column, container, row, scrollable, text, Row, Space};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};

use super::message::Message;
use crate::config::{self, StudioConfig};
use crate::library::TrimLibrary;
use crate::songs;

/// Cards per row in the song grid
const CARDS_PER_ROW: usize = 4;

/// One song in the grid with its hover preview
pub struct SongCard {
    pub song: Song,
    pub preview: HoverPreviewController<CpalClock>,
}

/// The open trim editor
pub struct EditorPanel {
    pub song: Song,
    pub state: TrimEditorState,
    /// Loading until the track arrives
    pub session: EditorSession<CpalClock>,
    /// Region moved since the last save
    pub dirty: bool,
}

impl EditorPanel {
    /// Copy region and playback from the session into the widget state
    pub fn sync_state(&mut self) {
        self.state.set_region(self.session.region());
        self.state.set_playback(self.session.playback_state());
    }
}

/// Main application
pub struct StudioApp {
    pub(crate) config: StudioConfig,
    pub(crate) config_path: PathBuf,
    pub(crate) library: TrimLibrary,
    pub(crate) cards: Vec<SongCard>,
    pub(crate) editor: Option<EditorPanel>,
    /// One-line status shown in the header
    pub(crate) status: String,
    /// Scale factor of the main window, used for pixel snapping
    pub(crate) scale_factor: f32,
}

impl StudioApp {
    /// Create a new application instance
    pub fn new(inputs: Vec<PathBuf>) -> (Self, Task<Message>) {
        let config_path = config::default_config_path();
        let config: StudioConfig = load_config(&config_path);
        let library = TrimLibrary::open(&config.library_path);

        let inputs = if inputs.is_empty() {
            config.music_dir.iter().cloned().collect()
        } else {
            inputs
        };
        let files = songs::discover(&inputs);
        log::info!("Found {} songs", files.len());

        let cards = files
            .iter()
            .map(|path| Self::new_card(songs::song_from_path(path, &library), &config))
            .collect();

        let status = if files.is_empty() {
            String::from("No songs found - pass audio files or a directory on the command line")
        } else {
            format!("{} songs", files.len())
        };

        let app = Self {
            config,
            config_path,
            library,
            cards,
            editor: None,
            status,
            scale_factor: 1.0,
        };

        let scale_factor = iced::window::oldest()
            .and_then(iced::window::scale_factor)
            .map(Message::ScaleFactorChanged);
        (app, scale_factor)
    }

    pub(crate) fn new_card(song: Song, config: &StudioConfig) -> SongCard {
        let preview = HoverPreviewController::new(song.clone(), config.preview.preferences)
            .with_window_length(config.preview.window_length())
            .with_debounce(config.preview.hover_debounce());
        SongCard { song, preview }
    }

    /// Song currently loaded in the editor, which hover previews skip
    pub(crate) fn main_player_song(&self) -> Option<SongId> {
        self.editor.as_ref().map(|e| e.song.id.clone())
    }

    /// Persist the config in the background
    pub(crate) fn save_config_task(&self) -> Task<Message> {
        let config = self.config.clone();
        let path = self.config_path.clone();
        Task::perform(
            async move { save_config(&config, &path).map_err(|e| e.to_string()) },
            Message::ConfigSaved,
        )
    }

    /// Update application state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Song cards
            Message::CardEntered(index) => self.handle_card_entered(index),
            Message::CardExited(index) => self.handle_card_exited(index),
            Message::HoverDebounced(index, token) => self.handle_hover_debounced(index, token),
            Message::PreviewLoaded(index, token, result) => {
                self.handle_preview_loaded(index, token, result)
            }
            Message::ToggleMute(index) => self.handle_toggle_mute(index),
            Message::ToggleAutoplay => self.handle_toggle_autoplay(),

            // Trim editor
            Message::OpenEditor(index) => self.handle_open_editor(index),
            Message::EditorLoaded(id, result) => self.handle_editor_loaded(id, result),
            Message::TrimDragged(start) => self.handle_trim_dragged(start),
            Message::TrimCommitted(bounds) => self.handle_trim_committed(bounds),
            Message::EditorSeek(seconds) => self.handle_editor_seek(seconds),
            Message::NudgeTrim(delta) => self.handle_nudge(delta),
            Message::TogglePlay => self.handle_toggle_play(),
            Message::SaveTrim => self.handle_save_trim(),
            Message::CloseEditor => self.handle_close_editor(),

            // Misc
            Message::Tick => self.handle_tick(),
            Message::ScaleFactorChanged(scale_factor) => {
                log::debug!("Window scale factor: {}", scale_factor);
                self.scale_factor = scale_factor;
                if let Some(editor) = self.editor.as_mut() {
                    editor.state.scale_factor = scale_factor;
                }
                Task::none()
            }
            Message::ConfigSaved(result) => {
                if let Err(e) = result {
                    log::warn!("Failed to save config: {}", e);
                    self.status = format!("Could not save settings: {}", e);
                }
                Task::none()
            }
        }
    }

    /// Render the application view
    pub fn view(&self) -> Element<'_, Message> {
        let header = self.view_header();

        let mut content = column![header].spacing(16);
        if let Some(editor) = self.editor.as_ref() {
            content = content.push(self.view_editor(editor));
        }
        content = content.push(scrollable(self.view_cards()).height(Length::Fill));

        container(content)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Shortest refresh interval among running previews
    pub(crate) fn tick_interval(&self) -> Option<Duration> {
        let editor = self
            .editor
            .as_ref()
            .map(|e| &e.session)
            .filter(|s| s.playback_state().is_playing)
            .map(|s| s.tick_interval());
        let cards = self.cards.iter().filter_map(|c| c.preview.tick_interval());
        editor.into_iter().chain(cards).min()
    }

    /// Playhead updates only while something is playing
    pub fn subscription(&self) -> Subscription<Message> {
        use iced::time;

        match self.tick_interval() {
            Some(interval) => time::every(interval).map(|_| Message::Tick),
            None => Subscription::none(),
        }
    }

    fn view_header(&self) -> Element<'_, Message> {
        let autoplay = if self.config.preview.preferences.autoplay_previews {
            "Autoplay previews: on"
        } else {
            "Autoplay previews: off"
        };

        row![
            text("hookline-studio").size(24),
            Space::new().width(Length::Fill),
            text(&self.status).size(13),
            button(text(autoplay).size(13))
                .on_press(Message::ToggleAutoplay)
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
    }

    fn view_editor<'a>(&'a self, editor: &'a EditorPanel) -> Element<'a, Message> {
        let waveform = trim_editor(
            &editor.state,
            Message::TrimDragged,
            Message::TrimCommitted,
            Message::EditorSeek,
        );

        let bounds = editor.state.region.to_bounds();
        let range = if editor.state.is_loading() {
            String::from("Loading...")
        } else {
            format!(
                "{} - {}{}",
                format_time(bounds.start),
                format_time(bounds.end),
                if editor.dirty { " (unsaved)" } else { "" }
            )
        };

        let play_label = if editor.state.is_playing || editor.session.is_play_pending() {
            "Pause"
        } else {
            "Play"
        };
        let ready = !editor.session.is_loading();

        let controls = row![
            button(text(play_label)).on_press(Message::TogglePlay),
            button(text("-1s")).on_press_maybe(ready.then_some(Message::NudgeTrim(-1.0))),
            button(text("+1s")).on_press_maybe(ready.then_some(Message::NudgeTrim(1.0))),
            Space::new().width(Length::Fill),
            text(range).size(14),
            button(text("Save"))
                .on_press_maybe(ready.then_some(Message::SaveTrim))
                .style(button::primary),
            button(text("Close"))
                .on_press(Message::CloseEditor)
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        column![text(&editor.song.title).size(18), waveform, controls]
            .spacing(8)
            .into()
    }

    fn view_cards(&self) -> Element<'_, Message> {
        let in_player = self.main_player_song();
        let muted = self.config.preview.preferences.muted;

        let mut rows = column![].spacing(10);
        let indexed: Vec<(usize, &SongCard)> = self.cards.iter().enumerate().collect();
        for chunk in indexed.chunks(CARDS_PER_ROW) {
            let cards: Vec<Element<'_, Message>> = chunk
                .iter()
                .map(|&(index, card)| {
                    let status = HoverCardStatus {
                        is_playing: card.preview.is_playing(),
                        progress: card.preview.progress() as f32,
                        muted,
                        in_main_player: in_player.as_ref() == Some(&card.song.id),
                    };
                    hover_card(
                        &card.song.title,
                        status,
                        Message::CardEntered(index),
                        Message::CardExited(index),
                        Message::ToggleMute(index),
                        Message::OpenEditor(index),
                    )
                })
                .collect();
            rows = rows.push(Row::from_vec(cards).spacing(10));
        }
        rows.into()
    }
}

/// `m:ss.s`
fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor();
    format!("{}:{:04.1}", minutes as u64, seconds - minutes * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.0");
        assert_eq!(format_time(75.3), "1:15.3");
        assert_eq!(format_time(-3.0), "0:00.0");
    }
}
