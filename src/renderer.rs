//! Turns a marker set into positioned rectangles and fills them on a canvas frame.

use crate::markers::MarkerSet;
use crate::scale::MarkAlignment;
use iced::widget::canvas;
use iced::{Color, Point, Size};

// ================================================================================
// Render Key & Mark Rectangles
// ================================================================================

/// Everything the marker layer's pixels depend on. The layer is only
/// re-rendered when this changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderKey {
    /// Bumped by the surface every time the marker set is regenerated.
    pub revision: u64,
    pub span: f32,
    pub drawable_width: f32,
    pub surface_height: f32,
    pub side_offset: f32,
}

/// One filled rectangle, in drawable (content) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkRect {
    /// Horizontal position of the marker value; the rectangle is centred on it.
    pub center: f32,
    pub top_left: Point,
    pub size: Size,
    pub color: Color,
}

// ================================================================================
// Free Functions
// ================================================================================

/// Lays out every marker as a rectangle.
///
/// The first marker sits at `side_offset`; each following one is placed
/// `(value - previous value) * pitch` pixels further right, where the pitch
/// is `drawable_width / span`.
pub fn render_markers(
    markers: &MarkerSet,
    span: f32,
    drawable_width: f32,
    surface_height: f32,
    side_offset: f32,
) -> Vec<MarkRect> {
    let pitch = drawable_width / span;
    if !pitch.is_finite() || pitch <= 0.0 {
        return Vec::new();
    }

    let mut rects = Vec::with_capacity(markers.len());
    let mut position = side_offset;
    let mut previous: Option<f32> = None;

    for marker in markers {
        if let Some(previous) = previous {
            position += (marker.value - previous) * pitch;
        }
        previous = Some(marker.value);

        let size = marker.definition.mark_size;
        let y = match marker.definition.alignment {
            MarkAlignment::Top => 0.0,
            MarkAlignment::Center => (surface_height - size.height) / 2.0,
            MarkAlignment::Bottom => surface_height - size.height,
        };

        rects.push(MarkRect {
            center: position,
            top_left: Point::new(position - size.width / 2.0, y),
            size,
            color: marker.definition.color,
        });
    }

    rects
}

// ================================================================================
// Marker Layer
// ================================================================================

/// The rendered marker rectangles, memoized on their [`RenderKey`].
#[derive(Debug, Default)]
pub struct MarkerLayer {
    key: Option<RenderKey>,
    rects: Vec<MarkRect>,
    widest: f32,
}

impl MarkerLayer {
    /// Re-renders when `key` differs from the one the layer was last
    /// rendered with. Returns whether it did.
    pub fn update(&mut self, key: RenderKey, markers: &MarkerSet) -> bool {
        if self.key == Some(key) {
            return false;
        }
        self.rects = render_markers(
            markers,
            key.span,
            key.drawable_width,
            key.surface_height,
            key.side_offset,
        );
        self.widest = self
            .rects
            .iter()
            .map(|r| r.size.width)
            .fold(0.0, f32::max);
        self.key = Some(key);
        true
    }

    pub fn key(&self) -> Option<RenderKey> {
        self.key
    }

    pub fn rects(&self) -> &[MarkRect] {
        &self.rects
    }

    /// Rectangles overlapping the horizontal content span `[left, right]`.
    pub fn visible(&self, left: f32, right: f32) -> &[MarkRect] {
        let margin = self.widest / 2.0;
        let first = self
            .rects
            .partition_point(|r| r.center + margin < left);
        let last = self
            .rects
            .partition_point(|r| r.center - margin <= right);
        &self.rects[first..last.max(first)]
    }

    /// Fills the rectangles visible at `scroll_offset` into a frame the size
    /// of the viewport.
    pub(crate) fn fill(&self, frame: &mut canvas::Frame, scroll_offset: f32) {
        let width = frame.width();
        for rect in self.visible(scroll_offset, scroll_offset + width) {
            let top_left = Point::new(rect.top_left.x - scroll_offset, rect.top_left.y);
            frame.fill_rectangle(top_left, rect.size, rect.color);
        }
    }
}
