//! Hover card view function

use iced::widget::{button, column, container, mouse_area, progress_bar, row, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Padding};

use crate::theme::{CARD_ACTIVE_COLOR, CARD_COLOR};

/// Card width in pixels
const CARD_WIDTH: f32 = 220.0;

/// Snapshot of one card's preview
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoverCardStatus {
    pub is_playing: bool,
    /// Fraction of the preview window played
    pub progress: f32,
    pub muted: bool,
    /// Song is loaded in the main player, so hover previews are skipped
    pub in_main_player: bool,
}

/// Create a song card
///
/// # Arguments
/// * `title` - Song title
/// * `status` - Current preview snapshot
/// * `on_enter` / `on_exit` - Pointer entered / left the card
/// * `on_toggle_mute` - Mute button pressed
/// * `on_edit` - "Edit preview" pressed
pub fn hover_card<'a, Message: Clone + 'a>(
    title: &'a str,
    status: HoverCardStatus,
    on_enter: Message,
    on_exit: Message,
    on_toggle_mute: Message,
    on_edit: Message,
) -> Element<'a, Message> {
    let mute_label = if status.muted { "Unmute" } else { "Mute" };
    let badge = if status.in_main_player {
        "In player"
    } else if status.is_playing {
        "Previewing"
    } else {
        ""
    };

    let header = row![
        text(title).size(16),
        Space::new().width(Length::Fill),
        text(badge).size(11),
    ]
    .align_y(Alignment::Center);

    let controls = row![
        button(text(mute_label).size(12))
            .padding(Padding::from([2, 8]))
            .on_press(on_toggle_mute),
        button(text("Edit preview").size(12))
            .padding(Padding::from([2, 8]))
            .on_press(on_edit),
    ]
    .spacing(6);

    let progress = status.progress.clamp(0.0, 1.0);
    let content = column![
        header,
        container(progress_bar(0.0..=1.0, progress)).width(Length::Fill),
        controls,
    ]
    .spacing(6);

    let background = if status.is_playing {
        CARD_ACTIVE_COLOR
    } else {
        CARD_COLOR
    };

    let card = container(content)
        .padding(10)
        .width(Length::Fixed(CARD_WIDTH))
        .style(move |_theme| container::Style {
            background: Some(Background::Color(background)),
            border: Border {
                color: Color::from_rgb(0.3, 0.3, 0.3),
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        });

    mouse_area(card).on_enter(on_enter).on_exit(on_exit).into()
}
