//! Marker generation: turns a range and a set of scale families into one
//! sorted, deduplicated sequence of ticks.

use std::collections::BTreeMap;

use crate::range::RulerRange;
use crate::scale::{ScaleDefinition, min_scale};

/// A family producing more marks than this is skipped.
pub const MAX_MARKERS_PER_SCALE: usize = 200_000;

/// Fraction of a step tolerated when deciding whether the last stop still
/// lies on the range.
const STEP_EPSILON: f64 = 1e-4;

/// Fraction of the finest scale under which two values are the same mark.
const DEDUP_EPSILON: f64 = 1e-3;

/// A single tick at a domain value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub value: f32,
    pub definition: ScaleDefinition,
}

/// Markers sorted ascending by value, at most one per value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }
}

impl<'a> IntoIterator for &'a MarkerSet {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

/// Number of stops a family of interval `scale` has on a span of `span`
/// units, endpoints included.
pub fn stop_count(span: f32, scale: f32) -> usize {
    if !(scale.is_finite() && scale > 0.0) || !span.is_finite() || span < 0.0 {
        return 0;
    }
    let steps = (f64::from(span) / f64::from(scale) + STEP_EPSILON).floor();
    if steps >= (MAX_MARKERS_PER_SCALE as f64) {
        return usize::MAX;
    }
    steps as usize + 1
}

/// Generates the marker set for `range`.
///
/// Families are walked from the finest to the coarsest scale, so where two
/// families land on the same value the coarser one wins. Stops closer than
/// the `f32` resolution at the range's location collapse into one marker.
///
/// A family that would produce more than [`MAX_MARKERS_PER_SCALE`] markers is
/// skipped with a warning; the remaining families are still generated. A
/// zero-length range, an empty set of families, or a non-positive surface
/// width all produce an empty set.
pub fn generate(
    range: &RulerRange,
    definitions: &[ScaleDefinition],
    surface_width: f32,
) -> MarkerSet {
    if range.is_empty() || surface_width.is_nan() || surface_width <= 0.0 {
        return MarkerSet::empty();
    }
    let Some(finest) = min_scale(definitions) else {
        return MarkerSet::empty();
    };

    let start = f64::from(range.start());
    let end = range.end();
    let tolerance = f64::from(finest) * DEDUP_EPSILON;

    let mut sorted: Vec<&ScaleDefinition> = definitions.iter().filter(|d| d.is_valid()).collect();
    sorted.sort_by(|a, b| a.scale.total_cmp(&b.scale));

    let mut by_value: BTreeMap<i64, Marker> = BTreeMap::new();
    for definition in sorted {
        let count = stop_count(range.span(), definition.scale);
        if count > MAX_MARKERS_PER_SCALE {
            log::warn!(
                "skipping scale {}: more than {} markers on {}",
                definition.scale,
                MAX_MARKERS_PER_SCALE,
                range
            );
            continue;
        }

        let step = f64::from(definition.scale);
        for i in 0..count {
            let offset = i as f64 * step;
            let value = ((start + offset) as f32).min(end);
            let key = (offset / tolerance).round() as i64;
            by_value.insert(
                key,
                Marker {
                    value,
                    definition: *definition,
                },
            );
        }
    }

    let mut markers: Vec<Marker> = by_value.into_values().collect();
    markers.dedup_by(|next, kept| {
        if next.value != kept.value {
            return false;
        }
        if next.definition.scale > kept.definition.scale {
            *kept = *next;
        }
        true
    });

    MarkerSet { markers }
}
