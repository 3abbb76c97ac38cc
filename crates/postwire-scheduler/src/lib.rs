//! # Postwire Scheduler
//!
//! The client-side half of the scheduled-post lifecycle:
//!
//! ```text
//! PostStore (local mirror of /api/posts/scheduled)
//!   |- refresh(): bounded fetch, cache preserved on failure
//!   |- after each successful refresh -> sweep()
//!   `- every 60s (SweeperHandle) -> refresh() + sweep()
//!
//! sweep(): due = scheduled AND scheduled_time < now
//!   executes due posts one at a time, in list order;
//!   success flips the local record to completed (optimistic),
//!   failure is logged and the pass continues.
//!
//! AlertReporter: one visible alert at a time, auto-dismissing,
//!   with a 15-minute rate-limit cool-down tracker.
//! ```
//!
//! The backend owns every record; this crate never invents posts, it only
//! mirrors, fires, and removes them.

pub mod alerts;
pub mod executor;
pub mod store;

pub use alerts::{Alert, AlertReporter, RateLimitStatus, Severity};
pub use executor::{SweepReport, SweeperHandle, refresh_and_sweep, spawn_sweeper, sweep};
pub use store::PostStore;
