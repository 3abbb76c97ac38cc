//! The seam between the workflow crates and the posting backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{ExecuteOutcome, PostDraft, ScheduledPost};

/// Remote posting backend.
///
/// `postwire-client` provides the HTTP implementation; tests substitute
/// in-memory fakes. All calls are independent asynchronous operations and
/// none of them retries internally.
#[async_trait]
pub trait PostBackend: Send + Sync {
    /// List the current user's scheduled and completed posts.
    ///
    /// Implementations must bound this call with an explicit timeout so a
    /// hung listing endpoint cannot stall a refresh.
    async fn list_scheduled(&self) -> Result<Vec<ScheduledPost>>;

    /// Fire a scheduled post now.
    async fn execute(&self, id: &str) -> Result<ExecuteOutcome>;

    /// Delete a scheduled post. Returns the backend's confirmation message.
    async fn delete(&self, id: &str) -> Result<String>;

    /// Publish a draft immediately.
    async fn publish(&self, draft: &PostDraft) -> Result<ExecuteOutcome>;

    /// Store a draft for future execution at `at`.
    async fn schedule(&self, draft: &PostDraft, at: DateTime<Utc>) -> Result<ExecuteOutcome>;
}
