//! Eased scroll animations.

use iced::time::{Duration, Instant};

/// A glide of the scroll offset from one position to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f32,
    pub to: f32,
    pub start_time: Instant,
    pub duration: Duration,
}

/// Where an animation is at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Running(f32),
    Finished(f32),
}

impl ScrollAnimation {
    pub fn new(from: f32, to: f32, start_time: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
        }
    }

    pub fn sample(&self, now: Instant) -> Progress {
        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            return Progress::Finished(self.to);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        Progress::Running(self.from + (self.to - self.from) * ease_out_cubic(t))
    }
}

/// Ease-out cubic: decelerating to zero velocity.
fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
