//! A horizontal ruler / scroll-picker widget for iced.
//!
//! The ruler draws tick marks for one or more [`ScaleDefinition`]s over a
//! [`RulerRange`] and lets the user scrub through the range by dragging,
//! flinging or wheel-scrolling. The selected value always settles on a
//! multiple of the finest configured scale.
//!
//! The pieces are usable on their own:
//! - [`markers::generate`] builds the sorted, deduplicated [`MarkerSet`].
//! - [`RulerSurface`] owns the scroll coordinate space and the
//!   drag/settle/recentre state machine, without any dependency on a
//!   running iced application.
//! - [`Ruler`] wraps a surface in an iced canvas.
//!
//! ```no_run
//! use iced_ruler::{Ruler, RulerConfig};
//!
//! #[derive(Debug, Clone)]
//! enum Message {
//!     ValueChanged(f32),
//! }
//!
//! fn view(value: f32) -> iced::Element<'static, Message> {
//!     Ruler::new(RulerConfig::default(), value)
//!         .on_change(Message::ValueChanged)
//!         .view()
//! }
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod mapping;
pub mod markers;
pub mod range;
pub mod renderer;
pub mod ruler;
pub mod scale;
pub mod signal;
pub mod surface;

pub use config::RulerConfig;
pub use error::ConfigIssue;
pub use markers::{Marker, MarkerSet};
pub use range::RulerRange;
pub use ruler::Ruler;
pub use scale::{MarkAlignment, ScaleDefinition};
pub use surface::{RulerSurface, ScrollPhase};
