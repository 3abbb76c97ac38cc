//! # Postwire Client
//!
//! The reqwest-backed implementation of [`postwire_core::PostBackend`].
//! One method per backend endpoint, no retries, no caching; every failure
//! is classified into the workspace error taxonomy at this boundary.

pub mod api;

pub use api::ApiClient;
