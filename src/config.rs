//! Owner-facing configuration of a ruler.

use bon::Builder;
use iced::time::Duration;

use crate::error::ConfigIssue;
use crate::markers::{MAX_MARKERS_PER_SCALE, stop_count};
use crate::range::RulerRange;
use crate::scale::ScaleDefinition;

/// Pixels between the drawable's left edge and the first mark.
pub const DEFAULT_SIDE_OFFSET: f32 = 16.0;
/// Hard cap on the drawable ruler width.
pub const DEFAULT_MAXIMUM_DRAWABLE_WIDTH: f32 = 10_000.0;

#[derive(Clone, Debug, PartialEq, Builder)]
pub struct RulerConfig {
    #[builder(default = RulerRange::new(3.0, 7.0))]
    pub range: RulerRange,
    #[builder(default = ScaleDefinition::defaults())]
    pub scale_definitions: Vec<ScaleDefinition>,
    /// Value selected before the owner sets one.
    #[builder(default = 3.0)]
    pub initial_value: f32,
    #[builder(default = DEFAULT_SIDE_OFFSET)]
    pub side_offset: f32,
    #[builder(default = DEFAULT_MAXIMUM_DRAWABLE_WIDTH)]
    pub maximum_drawable_width: f32,
    /// Length of the programmatic glide to an externally set value.
    #[builder(default = Duration::from_millis(200))]
    pub recentre_duration: Duration,
    /// Length of the glide to the snapped rest position after a release.
    #[builder(default = Duration::from_millis(300))]
    pub settle_duration: Duration,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RulerConfig {
    /// Reports the first reason this configuration would draw nothing, or
    /// would drop a scale family.
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.range.is_empty() {
            return Err(ConfigIssue::EmptyRange(self.range));
        }
        if self.scale_definitions.is_empty() {
            return Err(ConfigIssue::NoScaleDefinitions);
        }
        for definition in &self.scale_definitions {
            if !definition.is_valid() {
                return Err(ConfigIssue::InvalidScale {
                    scale: definition.scale,
                });
            }
            if stop_count(self.range.span(), definition.scale) > MAX_MARKERS_PER_SCALE {
                return Err(ConfigIssue::TooManyMarkers {
                    scale: definition.scale,
                    limit: MAX_MARKERS_PER_SCALE,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RulerConfig::default();
        assert_eq!(config.range, RulerRange::new(3.0, 7.0));
        assert_eq!(config.scale_definitions.len(), 2);
        assert_eq!(config.initial_value, 3.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_degenerate_config() {
        let config = RulerConfig::builder()
            .range(RulerRange::new(1.0, 0.0))
            .build();
        assert_eq!(
            config.validate(),
            Err(ConfigIssue::EmptyRange(RulerRange::new(1.0, 0.0)))
        );

        let config = RulerConfig::builder().scale_definitions(vec![]).build();
        assert_eq!(config.validate(), Err(ConfigIssue::NoScaleDefinitions));

        let config = RulerConfig::builder()
            .scale_definitions(vec![ScaleDefinition::builder().scale(-2.0).build()])
            .build();
        assert_eq!(
            config.validate(),
            Err(ConfigIssue::InvalidScale { scale: -2.0 })
        );

        let config = RulerConfig::builder()
            .range(RulerRange::new(0.0, 1_000_000.0))
            .scale_definitions(vec![ScaleDefinition::builder().scale(0.5).build()])
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigIssue::TooManyMarkers { .. })
        ));
    }

    #[test]
    fn test_issue_messages() {
        let issue = ConfigIssue::InvalidScale { scale: 0.0 };
        assert_eq!(issue.to_string(), "scale 0 is not a finite positive interval");
        assert_eq!(
            ConfigIssue::EmptyRange(RulerRange::new(2.0, 0.0)).to_string(),
            "range (location: 2 length: 0) has zero length"
        );
    }
}
