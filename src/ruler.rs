//! The iced widget: a canvas program wrapping a [`RulerSurface`].

use std::collections::VecDeque;

use iced::time::{Duration, Instant};
use iced::widget::canvas;
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme};
use iced::{mouse, window};

use crate::config::RulerConfig;
use crate::renderer::{MarkerLayer, RenderKey};
use crate::surface::RulerSurface;

/// How far ahead of release a fling is projected.
const FLING_PROJECTION_SECS: f32 = 0.25;
/// Cursor samples older than this do not count towards release velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);
/// Pixels scrolled per wheel line.
const WHEEL_LINE_PIXELS: f32 = 20.0;
const POINTER_WIDTH: f32 = 1.0;
const POINTER_HEIGHT: f32 = 25.0;
/// Emitted values remembered while waiting for the owner to echo them back.
const MAX_PENDING_ECHOES: usize = 64;

// ================================================================================
// Interaction State
// ================================================================================

/// An in-progress drag, in coordinates relative to the widget bounds.
#[derive(Debug, Clone)]
pub struct DragState {
    pub start_x: f32,
    pub start_offset: f32,
    samples: VecDeque<(Instant, f32)>,
}

impl DragState {
    fn new(x: f32, offset: f32, now: Instant) -> Self {
        let mut samples = VecDeque::new();
        samples.push_back((now, x));
        Self {
            start_x: x,
            start_offset: offset,
            samples,
        }
    }

    fn record(&mut self, x: f32, now: Instant) {
        self.samples.push_back((now, x));
        while let Some(&(time, _)) = self.samples.front() {
            if now.saturating_duration_since(time) > VELOCITY_WINDOW && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Cursor velocity in pixels per second over the recent samples.
    fn velocity(&self, now: Instant) -> f32 {
        let (Some(&(first_time, first_x)), Some(&(last_time, last_x))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        if now.saturating_duration_since(last_time) > VELOCITY_WINDOW {
            return 0.0;
        }
        let elapsed = last_time.saturating_duration_since(first_time).as_secs_f32();
        if elapsed <= f32::EPSILON {
            return 0.0;
        }
        (last_x - first_x) / elapsed
    }
}

/// Tells owner-driven value changes apart from the owner echoing back a
/// value the ruler itself published.
#[derive(Debug, Default)]
struct ValueSync {
    last_seen: Option<f32>,
    echoes: VecDeque<f32>,
}

impl ValueSync {
    fn is_external_change(&mut self, incoming: f32) -> bool {
        if self.last_seen == Some(incoming) {
            return false;
        }
        self.last_seen = Some(incoming);
        if let Some(position) = self.echoes.iter().position(|v| *v == incoming) {
            self.echoes.drain(..=position);
            return false;
        }
        true
    }

    fn published(&mut self, value: f32) {
        self.echoes.push_back(value);
        if self.echoes.len() > MAX_PENDING_ECHOES {
            self.echoes.pop_front();
        }
    }

    fn forget(&mut self) {
        self.last_seen = None;
        self.echoes.clear();
    }
}

/// State for the canvas program (persists across frames via iced's widget tree).
pub struct RulerState {
    pub surface: RulerSurface,
    pub drag: Option<DragState>,
    layer: MarkerLayer,
    cache: canvas::Cache,
    drawn: Option<(RenderKey, f32)>,
    sync: ValueSync,
}

impl Default for RulerState {
    fn default() -> Self {
        Self {
            surface: RulerSurface::default(),
            drag: None,
            layer: MarkerLayer::default(),
            cache: canvas::Cache::new(),
            drawn: None,
            sync: ValueSync::default(),
        }
    }
}

impl std::fmt::Debug for RulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulerState")
            .field("surface", &self.surface)
            .field("drag", &self.drag)
            .field("drawn", &self.drawn)
            .finish_non_exhaustive()
    }
}

impl RulerState {
    /// Clears the cached geometry when the marker layer or scroll offset moved.
    fn refresh_cache(&mut self) -> bool {
        let key = self.surface.render_key();
        self.layer.update(key, self.surface.markers());
        let drawn = (key, self.surface.scroll_offset());
        if self.drawn == Some(drawn) {
            return false;
        }
        self.drawn = Some(drawn);
        self.cache.clear();
        true
    }
}

// ================================================================================
// Ruler
// ================================================================================

pub struct Ruler<'a, Message> {
    config: RulerConfig,
    current_value: f32,
    pointer_color: Option<Color>,
    height: Length,
    on_change: Option<Box<dyn Fn(f32) -> Message + 'a>>,
}

impl<'a, Message: 'a> Ruler<'a, Message> {
    pub fn new(config: RulerConfig, current_value: f32) -> Self {
        Self {
            config,
            current_value,
            pointer_color: None,
            height: Length::Fixed(40.0),
            on_change: None,
        }
    }

    /// Message produced whenever the user scrubs to a new value.
    pub fn on_change(mut self, on_change: impl Fn(f32) -> Message + 'a) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Colour of the centred pointer. Defaults to the theme's text colour.
    pub fn pointer_color(mut self, color: Color) -> Self {
        self.pointer_color = Some(color);
        self
    }

    pub fn height(mut self, height: impl Into<Length>) -> Self {
        self.height = height.into();
        self
    }

    pub fn view(self) -> Element<'a, Message> {
        let height = self.height;
        canvas(self).width(Length::Fill).height(height).into()
    }

    /// Pushes the owner's configuration into the surface and lays it out.
    fn sync(&self, state: &mut RulerState, viewport: Size, now: Instant) {
        let surface = &mut state.surface;
        if surface.range() != self.config.range {
            surface.set_range(self.config.range);
            // the owner's value wins over the reset one
            state.sync.forget();
        }
        if surface.scale_definitions() != self.config.scale_definitions.as_slice() {
            surface.set_scale_definitions(self.config.scale_definitions.clone());
        }
        surface.set_side_offset(self.config.side_offset);
        surface.set_maximum_drawable_width(self.config.maximum_drawable_width);
        surface.set_animation_durations(
            self.config.recentre_duration,
            self.config.settle_duration,
        );

        if state.sync.is_external_change(self.current_value) {
            surface.set_current_value(self.current_value, now);
        }
        surface.layout(viewport, now);
    }
}

/// Horizontal scroll distance for a wheel event, falling back to the
/// vertical axis for plain mouse wheels.
fn wheel_pixels(delta: &mouse::ScrollDelta) -> f32 {
    let (x, y, factor) = match *delta {
        mouse::ScrollDelta::Lines { x, y } => (x, y, WHEEL_LINE_PIXELS),
        mouse::ScrollDelta::Pixels { x, y } => (x, y, 1.0),
    };
    let primary = if x.abs() > f32::EPSILON { x } else { y };
    -primary * factor
}

// ================================================================================
// canvas::Program implementation
// ================================================================================

impl<Message> canvas::Program<Message> for Ruler<'_, Message> {
    type State = RulerState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let now = match event {
            Event::Window(window::Event::RedrawRequested(now)) => *now,
            _ => Instant::now(),
        };
        self.sync(state, bounds.size(), now);

        let mut captured = false;
        let changed = match event {
            Event::Window(window::Event::RedrawRequested(_)) => state.surface.tick(now),

            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.surface.begin_drag();
                state.drag = Some(DragState::new(
                    position.x,
                    state.surface.scroll_offset(),
                    now,
                ));
                captured = true;
                None
            }

            Event::Mouse(mouse::Event::CursorMoved { position, .. }) => match state.drag.as_mut() {
                Some(drag) => {
                    let x = position.x - bounds.x;
                    drag.record(x, now);
                    let offset = drag.start_offset - (x - drag.start_x);
                    captured = true;
                    state.surface.drag_to(offset)
                }
                None => None,
            },

            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let drag = state.drag.take()?;
                let velocity = drag.velocity(now);
                let target = state.surface.scroll_offset() - velocity * FLING_PROJECTION_SECS;
                state.surface.end_drag(target, now);
                captured = true;
                None
            }

            Event::Mouse(mouse::Event::WheelScrolled { delta, .. }) => {
                if state.drag.is_some() || !cursor.is_over(bounds) {
                    return None;
                }
                let pixels = wheel_pixels(delta);
                if pixels.abs() < f32::EPSILON {
                    return None;
                }
                captured = true;
                state.surface.scroll_by(pixels, now)
            }

            _ => None,
        };

        let redraw = state.refresh_cache() || state.surface.is_animating();

        let action = match (changed, self.on_change.as_ref()) {
            (Some(value), Some(on_change)) => {
                state.sync.published(value);
                // Publish triggers a redraw, which triggers another update cycle
                Some(canvas::Action::publish((on_change)(value)))
            }
            _ if redraw => Some(canvas::Action::request_redraw()),
            _ if captured => Some(canvas::Action::capture()),
            _ => None,
        };

        if captured {
            action.map(canvas::Action::and_capture)
        } else {
            action
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let offset = state.surface.scroll_offset();
        let marks = state
            .cache
            .draw(renderer, bounds.size(), |frame| state.layer.fill(frame, offset));

        let mut pointer = canvas::Frame::new(renderer, bounds.size());
        let height = POINTER_HEIGHT.min(bounds.height);
        pointer.fill_rectangle(
            Point::new(bounds.width / 2.0 - POINTER_WIDTH / 2.0, bounds.height - height),
            Size::new(POINTER_WIDTH, height),
            self.pointer_color.unwrap_or(theme.palette().text),
        );

        vec![marks, pointer.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.drag.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
