//! Scale definitions: families of evenly spaced tick marks.

use bon::Builder;
use iced::{Color, Size};

/// Where a mark sits vertically inside the ruler surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MarkAlignment {
    /// Anchored at `y = 0`.
    Top,
    /// Vertically centered in the surface.
    Center,
    /// Anchored at `surface_height - mark_height`.
    #[default]
    Bottom,
}

/// One family of ticks placed every `scale` domain units.
#[derive(Clone, Copy, Debug, PartialEq, Builder)]
pub struct ScaleDefinition {
    /// Interval between two ticks of this family. Must be finite and positive
    /// to produce any marks.
    pub scale: f32,
    /// Width and height of each mark in pixels.
    #[builder(default = Size::new(1.0, 10.0))]
    pub mark_size: Size,
    #[builder(default = Color::WHITE)]
    pub color: Color,
    #[builder(default)]
    pub alignment: MarkAlignment,
}

impl ScaleDefinition {
    pub fn new(scale: f32, mark_size: Size, color: Color) -> Self {
        Self {
            scale,
            mark_size,
            color,
            alignment: MarkAlignment::default(),
        }
    }

    /// Whether this family can produce marks at all.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }

    /// The stock pair of families: fine ticks every 0.2 and whole units.
    pub fn defaults() -> Vec<ScaleDefinition> {
        vec![
            ScaleDefinition::new(
                0.2,
                Size::new(1.0, 10.0),
                Color::from_rgba(1.0, 1.0, 1.0, 0.7),
            ),
            ScaleDefinition::new(1.0, Size::new(1.0, 10.0), Color::WHITE),
        ]
    }
}

/// Finest valid scale, which doubles as the snap granularity.
pub fn min_scale(definitions: &[ScaleDefinition]) -> Option<f32> {
    definitions
        .iter()
        .filter(|d| d.is_valid())
        .map(|d| d.scale)
        .reduce(f32::min)
}

/// Coarsest valid scale, used by the width-fitting policy.
pub fn max_scale(definitions: &[ScaleDefinition]) -> Option<f32> {
    definitions
        .iter()
        .filter(|d| d.is_valid())
        .map(|d| d.scale)
        .reduce(f32::max)
}
