//! Canvas Program for the trim editor
//!
//! Paints a [`RegionScene`] through a geometry cache that is only cleared
//! when the [`SceneKey`] changes, and turns pointer events into drag,
//! commit and seek callbacks. Escape during a drag puts the window back.

use std::cell::Cell;

use hookline_core::trim::TrimBounds;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::{keyboard, mouse, Point, Rectangle, Size, Theme};

use super::drag::{pixel_to_time, DragController, DragOutcome};
use super::scene::{build_scene, RegionScene, SceneKey, SurfaceSize};
use super::state::TrimEditorState;
use crate::theme::{
    BACKGROUND, BAND_COLOR, BAR_COLOR, BAR_SELECTED_COLOR, CURSOR_COLOR, HANDLE_COLOR,
    PLACEHOLDER_COLOR,
};

// =============================================================================
// Canvas Interaction State
// =============================================================================

/// Per-widget state kept by iced between frames
pub struct TrimInteraction {
    pub drag: DragController,
    cache: canvas::Cache,
    key: Cell<Option<SceneKey>>,
}

impl Default for TrimInteraction {
    fn default() -> Self {
        Self {
            drag: DragController::default(),
            cache: canvas::Cache::new(),
            key: Cell::new(None),
        }
    }
}

// =============================================================================
// Trim Canvas Program
// =============================================================================

/// Canvas program for the draggable preview window
///
/// * `on_drag` - called with the new window start while dragging
/// * `on_commit` - called with the final bounds when the drag ends
/// * `on_seek` - called with a track time when the user clicks outside the window
pub struct TrimCanvas<'a, Message, DragFn, CommitFn, SeekFn>
where
    DragFn: Fn(f64) -> Message,
    CommitFn: Fn(TrimBounds) -> Message,
    SeekFn: Fn(f64) -> Message,
{
    pub state: &'a TrimEditorState,
    pub on_drag: DragFn,
    pub on_commit: CommitFn,
    pub on_seek: SeekFn,
}

impl<'a, Message, DragFn, CommitFn, SeekFn> Program<Message>
    for TrimCanvas<'a, Message, DragFn, CommitFn, SeekFn>
where
    Message: Clone,
    DragFn: Fn(f64) -> Message,
    CommitFn: Fn(TrimBounds) -> Message,
    SeekFn: Fn(f64) -> Message,
{
    type State = TrimInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if self.state.is_loading() {
            return None;
        }

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let outcome = interaction.drag.press(
                    position.x,
                    bounds.width,
                    &self.state.region,
                    self.state.handle_tolerance,
                );
                match outcome {
                    DragOutcome::Started => None,
                    _ => {
                        let time = pixel_to_time(
                            position.x,
                            bounds.width,
                            self.state.region.total_duration(),
                        );
                        Some(canvas::Action::publish((self.on_seek)(time)))
                    }
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                // Absolute position: the drag continues outside the canvas
                match interaction.drag.drag(position.x - bounds.x, bounds.width) {
                    DragOutcome::Moved(start) => {
                        Some(canvas::Action::publish((self.on_drag)(start)))
                    }
                    _ => None,
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                match interaction.drag.release() {
                    DragOutcome::Committed(bounds) => {
                        Some(canvas::Action::publish((self.on_commit)(bounds)))
                    }
                    _ => None,
                }
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => {
                let origin = interaction.drag.cancel()?;
                Some(canvas::Action::publish((self.on_drag)(origin)))
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.drag.is_dragging() {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if !self.state.is_loading() => {
                let total = self.state.region.total_duration();
                let time = pixel_to_time(position.x, bounds.width, total);
                if self.state.region.contains(time) {
                    mouse::Interaction::Grab
                } else {
                    mouse::Interaction::Pointer
                }
            }
            _ => mouse::Interaction::default(),
        }
    }

    fn draw(
        &self,
        interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let Some(waveform) = self.state.waveform.as_ref() else {
            return vec![draw_placeholder(renderer, bounds.size())];
        };

        let surface = SurfaceSize::new(bounds.width, bounds.height, self.state.scale_factor);
        let key = self.state.scene_key(surface);
        if interaction.key.get() != Some(key) {
            interaction.cache.clear();
            interaction.key.set(Some(key));
        }

        let geometry = interaction.cache.draw(renderer, bounds.size(), |frame| {
            let scene = build_scene(
                waveform.buckets(),
                &self.state.region,
                self.state.playhead,
                self.state.is_playing,
                surface,
            );
            paint_scene(frame, &scene);
        });

        vec![geometry]
    }
}

// =============================================================================
// Painting
// =============================================================================

fn draw_placeholder(renderer: &iced::Renderer, size: Size) -> Geometry {
    let mut frame = Frame::new(renderer, size);
    frame.fill_rectangle(Point::ORIGIN, size, BACKGROUND);
    frame.fill_rectangle(
        Point::new(size.width * 0.3, size.height / 2.0 - 2.0),
        Size::new(size.width * 0.4, 4.0),
        PLACEHOLDER_COLOR,
    );
    frame.into_geometry()
}

fn paint_scene(frame: &mut Frame, scene: &RegionScene) {
    let width = scene.size.width;
    let height = scene.size.height;
    let center_y = height / 2.0;

    frame.fill_rectangle(Point::ORIGIN, Size::new(width, height), BACKGROUND);

    if scene.band.width > 0.0 {
        frame.fill_rectangle(
            Point::new(scene.band.x, 0.0),
            Size::new(scene.band.width, height),
            BAND_COLOR,
        );
    }

    for bar in &scene.bars {
        let color = if bar.selected { BAR_SELECTED_COLOR } else { BAR_COLOR };
        frame.fill_rectangle(
            Point::new(bar.x, center_y - bar.half_height),
            Size::new(bar.width, (bar.half_height * 2.0).max(scene.size.pixel())),
            color,
        );
    }

    if scene.band.width > 0.0 {
        for &x in &scene.handles {
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                Stroke::default().with_color(HANDLE_COLOR).with_width(2.0),
            );
        }
    }

    if let Some(x) = scene.cursor {
        frame.stroke(
            &Path::line(Point::new(x, 0.0), Point::new(x, height)),
            Stroke::default().with_color(CURSOR_COLOR).with_width(2.0),
        );
    }
}
