//! The scrollable ruler surface: owns the coordinate space, keeps the marker
//! set in sync with geometry, and turns scroll motion into value changes.

use std::mem;

use iced::Size;
use iced::time::{Duration, Instant};

use crate::animation::{Progress, ScrollAnimation};
use crate::config::RulerConfig;
use crate::mapping::{OffsetMapping, fitted_width, snap};
use crate::markers::{MarkerSet, generate};
use crate::range::RulerRange;
use crate::renderer::RenderKey;
use crate::scale::{ScaleDefinition, min_scale};
use crate::signal::{Signal, SubscriptionId};

// ================================================================================
// Scroll Phase
// ================================================================================

/// What is currently moving the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrollPhase {
    #[default]
    Idle,
    /// The user is dragging the ruler.
    Dragging,
    /// Gliding to the snapped rest position after a release. User driven, so
    /// value changes are reported.
    Settling(ScrollAnimation),
    /// Programmatic glide to `current_value`. Value changes are suppressed.
    Recentring(ScrollAnimation),
}

// ================================================================================
// Ruler Surface
// ================================================================================

#[derive(Debug)]
pub struct RulerSurface {
    config: RulerConfig,
    viewport: Size,
    laid_out: bool,
    drawable_width: f32,
    markers: MarkerSet,
    revision: u64,
    dirty: bool,
    scroll_offset: f32,
    current_value: f32,
    phase: ScrollPhase,
    value_changed: Signal<f32>,
}

impl Default for RulerSurface {
    fn default() -> Self {
        Self::new(RulerConfig::default())
    }
}

impl RulerSurface {
    pub fn new(config: RulerConfig) -> Self {
        Self {
            current_value: config.initial_value,
            config,
            viewport: Size::ZERO,
            laid_out: false,
            drawable_width: 0.0,
            markers: MarkerSet::empty(),
            revision: 0,
            dirty: true,
            scroll_offset: 0.0,
            phase: ScrollPhase::Idle,
            value_changed: Signal::new(),
        }
    }

    // ----- accessors -----

    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    pub fn range(&self) -> RulerRange {
        self.config.range
    }

    pub fn scale_definitions(&self) -> &[ScaleDefinition] {
        &self.config.scale_definitions
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Incremented every time the marker set is regenerated.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn drawable_width(&self) -> f32 {
        self.drawable_width
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn current_value(&self) -> f32 {
        self.current_value
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn is_programmatic_scroll(&self) -> bool {
        matches!(self.phase, ScrollPhase::Recentring(_))
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            ScrollPhase::Settling(_) | ScrollPhase::Recentring(_)
        )
    }

    /// Padding left of the first mark so it can sit under the centred pointer.
    pub fn left_inset(&self) -> f32 {
        self.viewport.width / 2.0 - self.config.side_offset
    }

    pub fn render_key(&self) -> RenderKey {
        RenderKey {
            revision: self.revision,
            span: self.config.range.span(),
            drawable_width: self.drawable_width,
            surface_height: self.viewport.height,
            side_offset: self.config.side_offset,
        }
    }

    // ----- subscribers -----

    /// Registers a callback run with every new settled value.
    pub fn on_value_changed(&mut self, subscriber: impl FnMut(&f32) + 'static) -> SubscriptionId {
        self.value_changed.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.value_changed.unsubscribe(id)
    }

    // ----- configuration -----

    /// Replaces the range and moves the selection to
    /// `ceil((location + length) / 2)`, kept inside the new range.
    pub fn set_range(&mut self, range: RulerRange) {
        if self.config.range == range {
            return;
        }
        self.config.range = range;
        if !range.is_empty() {
            let end = range.location + range.length;
            self.current_value = range.clamp((end / 2.0).ceil());
            self.invalidate();
        }
    }

    pub fn set_scale_definitions(&mut self, definitions: Vec<ScaleDefinition>) {
        if self.config.scale_definitions == definitions {
            return;
        }
        self.config.scale_definitions = definitions;
        self.invalidate();
    }

    pub fn set_side_offset(&mut self, side_offset: f32) {
        if self.config.side_offset != side_offset {
            self.config.side_offset = side_offset;
            self.invalidate();
        }
    }

    pub fn set_maximum_drawable_width(&mut self, maximum: f32) {
        if self.config.maximum_drawable_width != maximum {
            self.config.maximum_drawable_width = maximum;
            self.invalidate();
        }
    }

    pub fn set_animation_durations(&mut self, recentre: Duration, settle: Duration) {
        self.config.recentre_duration = recentre;
        self.config.settle_duration = settle;
    }

    /// Marks the marker set stale. The next [`Self::recompute`] regenerates it.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Refits the drawable width and regenerates markers when they are stale
    /// or the width changed. Returns whether markers were regenerated.
    pub fn recompute(&mut self) -> bool {
        let width = fitted_width(
            &self.config.range,
            &self.config.scale_definitions,
            self.viewport.width,
            self.config.maximum_drawable_width,
        );
        if !self.dirty && width == self.drawable_width {
            return false;
        }
        if width != self.drawable_width {
            log::debug!("drawable width {} -> {}", self.drawable_width, width);
        }
        if let Err(issue) = self.config.validate() {
            log::warn!("ruler configuration: {issue}");
        }

        self.drawable_width = width;
        self.markers = generate(&self.config.range, &self.config.scale_definitions, width);
        self.revision += 1;
        self.dirty = false;
        log::debug!(
            "regenerated {} markers for {} (revision {})",
            self.markers.len(),
            self.config.range,
            self.revision
        );
        true
    }

    /// Lays the surface out in a viewport of `viewport` size. When geometry
    /// changed the ruler glides back to the current value; the very first
    /// layout jumps there instead.
    pub fn layout(&mut self, viewport: Size, now: Instant) -> bool {
        let resized = self.viewport != viewport;
        self.viewport = viewport;
        let regenerated = self.recompute();
        if !(resized || regenerated) {
            return false;
        }

        if !self.laid_out {
            self.scroll_offset = self.target_offset(self.current_value);
            self.laid_out = self.drawable_width > 0.0;
        } else if self.phase != ScrollPhase::Dragging {
            self.start_recentring(now);
        }
        true
    }

    // ----- coordinate mapping -----

    pub fn mapping(&self) -> OffsetMapping {
        OffsetMapping::new(&self.config.range, self.drawable_width, self.left_inset())
    }

    pub fn value_for_offset(&self, offset: f32) -> f32 {
        self.mapping().value_for_offset(offset)
    }

    pub fn offset_for_value(&self, value: f32) -> f32 {
        self.mapping().offset_for_value(value)
    }

    /// The finest configured scale.
    pub fn snap_granularity(&self) -> Option<f32> {
        min_scale(&self.config.scale_definitions)
    }

    /// Snaps a raw value to the finest scale, kept inside the range.
    pub fn snapped(&self, raw: f32) -> f32 {
        let value = match self.snap_granularity() {
            Some(granularity) => snap(raw, granularity),
            None => raw,
        };
        self.config.range.clamp(value)
    }

    /// Scroll offsets that put the range start and end under the pointer.
    pub fn offset_bounds(&self) -> (f32, f32) {
        let range = self.config.range;
        let a = self.offset_for_value(range.start());
        let b = self.offset_for_value(range.end());
        (a.min(b), a.max(b))
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        let (lo, hi) = self.offset_bounds();
        if offset.is_finite() {
            offset.clamp(lo, hi)
        } else {
            lo
        }
    }

    fn target_offset(&self, value: f32) -> f32 {
        self.clamp_offset(self.offset_for_value(value))
    }

    // ----- programmatic scrolling -----

    /// Selects `value` from outside and glides the ruler to it without
    /// reporting a change. Values outside the range are clamped to its ends.
    pub fn set_current_value(&mut self, value: f32, now: Instant) {
        let value = self.config.range.clamp(value);
        if self.current_value == value {
            return;
        }
        self.current_value = value;
        self.start_recentring(now);
    }

    fn start_recentring(&mut self, now: Instant) {
        let target = self.target_offset(self.current_value);
        if !self.laid_out {
            self.scroll_offset = target;
            return;
        }
        let animation =
            ScrollAnimation::new(self.scroll_offset, target, now, self.config.recentre_duration);
        log::trace!("recentring on {} ({} -> {})", self.current_value, self.scroll_offset, target);
        self.transition(ScrollPhase::Recentring(animation));
    }

    /// Moves to `next`, ending whatever animation was running. Every phase
    /// change goes through here, so a recentring ends exactly once.
    fn transition(&mut self, next: ScrollPhase) {
        let previous = mem::replace(&mut self.phase, next);
        if let ScrollPhase::Recentring(_) = previous {
            log::trace!("recentring ended, now {:?}", self.phase);
        }
    }

    // ----- user scrolling -----

    pub fn begin_drag(&mut self) {
        self.transition(ScrollPhase::Dragging);
    }

    /// Scrolls to `offset` while dragging.
    pub fn drag_to(&mut self, offset: f32) -> Option<f32> {
        self.scroll_to(offset)
    }

    /// Releases a drag aimed at `target_offset`: the target is snapped to the
    /// finest scale and the ruler glides there. Returns the rest offset.
    pub fn end_drag(&mut self, target_offset: f32, now: Instant) -> f32 {
        let target = self.clamp_offset(target_offset);
        let value = self.snapped(self.value_for_offset(target));
        let rest = self.target_offset(value);

        let animation =
            ScrollAnimation::new(self.scroll_offset, rest, now, self.config.settle_duration);
        self.transition(ScrollPhase::Settling(animation));
        rest
    }

    /// Scrolls by `delta` pixels (wheel or trackpad), then settles on the
    /// grid.
    pub fn scroll_by(&mut self, delta: f32, now: Instant) -> Option<f32> {
        self.transition(ScrollPhase::Dragging);
        let changed = self.scroll_to(self.scroll_offset + delta);
        self.end_drag(self.scroll_offset, now);
        changed
    }

    /// Advances the running animation.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let phase = self.phase;
        match phase {
            ScrollPhase::Idle | ScrollPhase::Dragging => None,
            ScrollPhase::Settling(animation) => match animation.sample(now) {
                Progress::Running(offset) => self.scroll_to(offset),
                Progress::Finished(offset) => {
                    let changed = self.scroll_to(offset);
                    self.transition(ScrollPhase::Idle);
                    changed
                }
            },
            ScrollPhase::Recentring(animation) => {
                match animation.sample(now) {
                    Progress::Running(offset) => self.scroll_offset = offset,
                    Progress::Finished(offset) => {
                        self.scroll_offset = offset;
                        self.transition(ScrollPhase::Idle);
                    }
                }
                None
            }
        }
    }

    /// Applies a new scroll offset and reports the snapped value if it
    /// changed. Nothing is reported during a programmatic scroll.
    fn scroll_to(&mut self, offset: f32) -> Option<f32> {
        self.scroll_offset = self.clamp_offset(offset);
        if self.is_programmatic_scroll() {
            return None;
        }

        let value = self.snapped(self.value_for_offset(self.scroll_offset));
        if value == self.current_value {
            return None;
        }
        self.current_value = value;
        log::trace!("value changed to {value}");
        self.value_changed.emit(&value);
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn laid_out(now: Instant) -> RulerSurface {
        let mut surface = RulerSurface::default();
        surface.layout(Size::new(400.0, 40.0), now);
        surface
    }

    fn recorder(surface: &mut RulerSurface) -> Rc<RefCell<Vec<f32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.on_value_changed(move |v| sink.borrow_mut().push(*v));
        seen
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_layout_jumps_to_current_value() {
        let now = Instant::now();
        let surface = laid_out(now);

        // 7 units at five units per 400px screen
        assert_eq!(surface.drawable_width(), 560.0);
        assert_eq!(surface.left_inset(), 184.0);
        assert_eq!(surface.mapping().offset_coefficient(), 80.0);
        assert_eq!(surface.scroll_offset(), -184.0);
        assert_eq!(surface.current_value(), 3.0);
        assert_eq!(surface.phase(), ScrollPhase::Idle);
        assert_eq!(surface.markers().len(), 36);
        assert_eq!(surface.revision(), 1);
    }

    #[test]
    fn test_drag_reports_snapped_values_once() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        let seen = recorder(&mut surface);

        surface.begin_drag();
        let offset = surface.offset_for_value(4.07);
        assert_eq!(surface.drag_to(offset), Some(4.0));
        let offset = surface.offset_for_value(4.05);
        assert_eq!(surface.drag_to(offset), None);
        let offset = surface.offset_for_value(4.13);
        let changed = surface.drag_to(offset).expect("moved to the next grid line");
        assert!((changed - 4.2).abs() < 1e-4);

        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_release_rests_on_snapped_offset() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        let seen = recorder(&mut surface);

        surface.begin_drag();
        let rest = surface.end_drag(surface.offset_for_value(4.07), now);
        assert!((rest - surface.offset_for_value(4.0)).abs() < 1e-3);
        assert!(matches!(surface.phase(), ScrollPhase::Settling(_)));

        surface.tick(now + ms(150));
        surface.tick(now + ms(300));
        assert_eq!(surface.phase(), ScrollPhase::Idle);
        assert_eq!(surface.scroll_offset(), rest);
        assert!((surface.current_value() - 4.0).abs() < 1e-4);
        assert!(!seen.borrow().is_empty());
        assert!((seen.borrow().last().copied().unwrap_or_default() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_external_value_is_silent() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        let seen = recorder(&mut surface);

        surface.set_current_value(8.0, now);
        assert!(surface.is_programmatic_scroll());
        assert_eq!(surface.tick(now + ms(100)), None);

        // a second request while the first is still gliding
        surface.set_current_value(6.0, now + ms(100));
        assert!(surface.is_programmatic_scroll());
        assert_eq!(surface.tick(now + ms(200)), None);
        assert_eq!(surface.tick(now + ms(400)), None);

        assert_eq!(surface.phase(), ScrollPhase::Idle);
        assert!(!surface.is_programmatic_scroll());
        assert_eq!(surface.current_value(), 6.0);
        assert!((surface.scroll_offset() - surface.offset_for_value(6.0)).abs() < 1e-3);
        assert!(seen.borrow().is_empty());

        // the settled position maps back to the same value
        surface.begin_drag();
        assert_eq!(surface.drag_to(surface.scroll_offset()), None);
    }

    #[test]
    fn test_external_value_is_clamped_into_range() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        let seen = recorder(&mut surface);

        surface.set_current_value(50.0, now);
        assert_eq!(surface.current_value(), 10.0);
        surface.tick(now + ms(200));
        assert_eq!(surface.phase(), ScrollPhase::Idle);
        assert!((surface.scroll_offset() - surface.offset_for_value(10.0)).abs() < 1e-3);

        surface.set_current_value(-4.0, now + ms(200));
        assert_eq!(surface.current_value(), 3.0);
        surface.tick(now + ms(400));
        assert_eq!(surface.scroll_offset(), surface.offset_for_value(3.0));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_drag_interrupts_recentring() {
        let now = Instant::now();
        let mut surface = laid_out(now);

        surface.set_current_value(9.0, now);
        surface.tick(now + ms(50));
        surface.begin_drag();
        assert_eq!(surface.phase(), ScrollPhase::Dragging);
        assert!(!surface.is_programmatic_scroll());

        // ticking no longer moves anything
        let offset = surface.scroll_offset();
        assert_eq!(surface.tick(now + ms(500)), None);
        assert_eq!(surface.scroll_offset(), offset);
    }

    #[test]
    fn test_offsets_are_clamped_to_range() {
        let now = Instant::now();
        let mut surface = laid_out(now);

        surface.begin_drag();
        surface.drag_to(-10_000.0);
        assert_eq!(surface.scroll_offset(), surface.offset_for_value(3.0));
        assert_eq!(surface.current_value(), 3.0);

        let changed = surface.drag_to(10_000.0).expect("moved to the end");
        assert!((changed - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_range_regenerates_and_reselects() {
        let now = Instant::now();
        let mut surface = laid_out(now);

        surface.set_range(RulerRange::new(0.0, 20.0));
        assert_eq!(surface.current_value(), 10.0);
        assert!(surface.recompute());
        assert_eq!(surface.revision(), 2);
        assert_eq!(surface.markers().len(), 101);
        assert!(!surface.recompute());
    }

    #[test]
    fn test_zero_length_range_draws_nothing() {
        let now = Instant::now();
        let mut surface = laid_out(now);

        surface.set_range(RulerRange::new(5.0, 0.0));
        assert!(surface.recompute());
        assert!(surface.markers().is_empty());
        assert_eq!(surface.drawable_width(), 0.0);
        assert_eq!(surface.offset_for_value(7.0), 0.0);
        assert_eq!(surface.offset_bounds(), (0.0, 0.0));
    }

    #[test]
    fn test_resize_recentres_with_animation() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        assert!(!surface.layout(Size::new(400.0, 40.0), now));

        assert!(surface.layout(Size::new(800.0, 40.0), now));
        assert_eq!(surface.drawable_width(), 1_120.0);
        assert!(surface.is_programmatic_scroll());
        surface.tick(now + ms(200));
        assert_eq!(surface.scroll_offset(), surface.offset_for_value(3.0));

        // height alone changes the render key but not the markers
        let revision = surface.revision();
        assert!(surface.layout(Size::new(800.0, 60.0), now));
        assert_eq!(surface.revision(), revision);
        assert_eq!(surface.render_key().surface_height, 60.0);
    }

    #[test]
    fn test_scrolling_keeps_markers() {
        let now = Instant::now();
        let mut surface = laid_out(now);
        let revision = surface.revision();

        surface.begin_drag();
        surface.drag_to(surface.offset_for_value(5.3));
        surface.end_drag(surface.offset_for_value(5.3), now);
        surface.tick(now + ms(300));
        assert_eq!(surface.phase(), ScrollPhase::Idle);

        surface.scroll_by(-40.0, now + ms(300));
        surface.tick(now + ms(600));
        assert_eq!(surface.phase(), ScrollPhase::Idle);

        assert_eq!(surface.revision(), revision);
        assert!(!surface.recompute());
        assert_eq!(surface.markers().len(), 36);
    }

    #[test]
    fn test_wheel_scroll_settles_on_grid() {
        let now = Instant::now();
        let mut surface = laid_out(now);

        // 0.35 units to the right
        surface.scroll_by(28.0, now);
        surface.tick(now + ms(300));
        assert_eq!(surface.phase(), ScrollPhase::Idle);
        assert!((surface.current_value() - 3.4).abs() < 1e-4);
    }
}
