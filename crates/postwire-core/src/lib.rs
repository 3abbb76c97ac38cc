//! # Postwire Core
//!
//! Shared foundation for the Postwire workspace: post and platform types,
//! the error taxonomy, the `PostBackend` trait seam, and configuration.
//!
//! Everything here is backend-agnostic. The HTTP implementation lives in
//! `postwire-client`; composition rules live in `postwire-composer`; the
//! store, sweeper, and alert reporter live in `postwire-scheduler`.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::PostwireConfig;
pub use error::{ErrorKind, PostwireError, Result};
pub use traits::PostBackend;
pub use types::{
    ExecuteOutcome, MediaFile, Platform, PlatformOutcome, PostDraft, PostStatus, ScheduledPost,
    TwitterCredentials,
};
