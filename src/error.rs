//! Configuration problems that leave a ruler empty or partly drawn.

use thiserror::Error;

use crate::range::RulerRange;

/// Reasons a configuration draws an empty (or partly empty) ruler.
///
/// None of these are fatal: the ruler still lays out and simply has
/// nothing to show for the affected part.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("range ({0}) has zero length")]
    EmptyRange(RulerRange),
    #[error("no scale definitions configured")]
    NoScaleDefinitions,
    #[error("scale {scale} is not a finite positive interval")]
    InvalidScale { scale: f32 },
    #[error("scale {scale} would produce more than {limit} markers")]
    TooManyMarkers { scale: f32, limit: usize },
}
