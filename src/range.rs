//! The directed numeric interval a ruler spans.

use std::fmt;

/// A directed interval starting at `location` and extending by `length`.
///
/// `length` may be negative; every consumer works on the normalized
/// `[start, end]` pair instead of the raw fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerRange {
    pub location: f32,
    pub length: f32,
}

impl RulerRange {
    pub fn new(location: f32, length: f32) -> Self {
        Self { location, length }
    }

    /// The smaller of the two endpoints.
    pub fn start(&self) -> f32 {
        self.location.min(self.location + self.length)
    }

    /// The larger of the two endpoints.
    pub fn end(&self) -> f32 {
        self.location.max(self.location + self.length)
    }

    /// Absolute length of the interval.
    pub fn span(&self) -> f32 {
        self.length.abs()
    }

    /// A zero-length (or non-finite) range has nothing to draw.
    pub fn is_empty(&self) -> bool {
        !self.length.is_finite() || !self.location.is_finite() || self.length == 0.0
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.start() && value <= self.end()
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.start(), self.end())
    }
}

impl Default for RulerRange {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for RulerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location: {} length: {}", self.location, self.length)
    }
}
