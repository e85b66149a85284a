//! Conversion between scroll offsets in pixels and domain values.

use crate::range::RulerRange;
use crate::scale::{ScaleDefinition, max_scale};

/// Number of coarse-scale increments shown per screen width once the range
/// is too long to fit in one screenful.
pub const INCREMENTS_PER_SCREEN: f32 = 5.0;

/// Maps scroll offsets to values and back for one laid-out ruler.
///
/// Both directions share the same offset coefficient (pixels per domain
/// unit), so they are exact inverses up to floating point rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetMapping {
    pub range_start: f32,
    pub span: f32,
    pub drawable_width: f32,
    /// Distance from the left edge of the viewport to the pointer, minus the
    /// side offset the first mark is drawn at.
    pub left_inset: f32,
}

impl OffsetMapping {
    pub fn new(range: &RulerRange, drawable_width: f32, left_inset: f32) -> Self {
        Self {
            range_start: range.start(),
            span: range.span(),
            drawable_width,
            left_inset,
        }
    }

    /// Pixels per domain unit. Zero when the mapping is degenerate.
    pub fn offset_coefficient(&self) -> f32 {
        let coefficient = self.drawable_width / self.span;
        if coefficient.is_finite() && coefficient > 0.0 {
            coefficient
        } else {
            0.0
        }
    }

    pub fn value_for_offset(&self, offset: f32) -> f32 {
        let coefficient = self.offset_coefficient();
        if coefficient == 0.0 {
            return self.range_start;
        }
        self.range_start + (offset + self.left_inset) / coefficient
    }

    pub fn offset_for_value(&self, value: f32) -> f32 {
        let coefficient = self.offset_coefficient();
        if coefficient == 0.0 {
            return 0.0;
        }
        (value - self.range_start) * coefficient - self.left_inset
    }
}

/// Rounds `value` to the nearest multiple of `granularity`.
///
/// A granularity that is not finite and positive leaves the value as is.
pub fn snap(value: f32, granularity: f32) -> f32 {
    if !(granularity.is_finite() && granularity > 0.0) {
        return value;
    }
    (value / granularity).round() * granularity
}

/// Width of the drawable ruler for a viewport `bounds_width` pixels wide.
///
/// Ranges shorter than five coarse increments get one screen width per
/// domain unit; longer ones show five coarse increments per screen. The
/// result never exceeds `maximum_width`.
pub fn fitted_width(
    range: &RulerRange,
    definitions: &[ScaleDefinition],
    bounds_width: f32,
    maximum_width: f32,
) -> f32 {
    let Some(coarsest) = max_scale(definitions) else {
        return 0.0;
    };
    if range.is_empty() || bounds_width.is_nan() || bounds_width <= 0.0 {
        return 0.0;
    }

    let per_screen = INCREMENTS_PER_SCREEN * coarsest;
    let divisor = if range.span() < per_screen {
        1.0
    } else {
        per_screen
    };
    let width = (bounds_width / divisor * range.span()).min(maximum_width);
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}
