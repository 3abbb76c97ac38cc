//! # Postwire Composer
//!
//! Everything that happens before a draft is allowed near the network:
//! content and media validation against per-platform limits, the explicit
//! auto-truncate edit, authentication-gated platform selection, and the
//! 12-hour schedule-time builder.

pub mod draft;
pub mod limits;
pub mod schedule;

pub use draft::Composer;
pub use limits::{CombinedMediaLimits, MediaLimits, PlatformProfile, profile};
pub use schedule::{Meridiem, ScheduleBuilder};
