//! In-memory mirror of the backend's scheduled-post list.
//!
//! The backend owns the records. This store is a read-mostly cache that is
//! overwritten wholesale on every successful refresh; there is no merge
//! logic. A failed refresh leaves the previous contents untouched, so the
//! user keeps seeing (stale) data instead of an empty list.
//!
//! Local mutations are optimistic: `mark_completed` flips a record without
//! server confirmation and the record is tracked as dirty until the next
//! confirmed refresh replaces it with server truth. Optimistic updates are
//! never rolled back; the periodic refresh is the only corrective.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use postwire_core::PostBackend;
use postwire_core::error::Result;
use postwire_core::types::{PostStatus, ScheduledPost};

/// Local cache of the current user's scheduled and completed posts.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<ScheduledPost>,
    /// Ids flipped locally since the last confirmed refresh.
    dirty: HashSet<String>,
    last_refresh: Option<DateTime<Utc>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[ScheduledPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Whether a record carries an unconfirmed local update.
    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    /// When the cache was last confirmed against the backend.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Ids of every due post, in list order.
    pub fn due_ids(&self, now: DateTime<Utc>) -> Vec<String> {
        self.posts
            .iter()
            .filter(|p| p.is_due(now))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Replace the cache with a fresh listing. On failure the existing
    /// contents are preserved and the error is returned so the caller can
    /// warn that cached data is being shown.
    pub async fn refresh(&mut self, backend: &dyn PostBackend) -> Result<usize> {
        match backend.list_scheduled().await {
            Ok(posts) => {
                let count = posts.len();
                self.posts = posts;
                self.dirty.clear();
                self.last_refresh = Some(Utc::now());
                tracing::debug!("Refreshed scheduled posts: {count} records");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Refresh failed, keeping {} cached posts: {e}", self.posts.len());
                Err(e)
            }
        }
    }

    /// Optimistically flip one record to completed. Returns false when the
    /// id is unknown.
    pub fn mark_completed(&mut self, id: &str) -> bool {
        match self.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.status = PostStatus::Completed;
                self.dirty.insert(id.to_string());
                true
            }
            None => false,
        }
    }

    /// Delete a post on the backend, then drop it locally. A failed delete
    /// leaves the list unchanged.
    pub async fn remove(&mut self, id: &str, backend: &dyn PostBackend) -> Result<String> {
        let message = backend.delete(id).await?;
        self.posts.retain(|p| p.id != id);
        self.dirty.remove(id);
        Ok(message)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::executor::tests::FakeBackend;
    use chrono::Duration;
    use postwire_core::types::Platform;

    pub(crate) fn post(id: &str, offset_minutes: i64, status: PostStatus) -> ScheduledPost {
        ScheduledPost {
            id: id.into(),
            content: format!("post {id}"),
            platforms: vec![Platform::Twitter],
            scheduled_time: Utc::now() + Duration::minutes(offset_minutes),
            status,
            media_paths: Vec::new(),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_wholesale() {
        let mut store = PostStore::new();
        let backend = FakeBackend::with_posts(vec![post("a", 10, PostStatus::Scheduled)]);
        assert_eq!(store.refresh(&backend).await.unwrap(), 1);

        backend.set_posts(vec![
            post("b", 5, PostStatus::Scheduled),
            post("c", 20, PostStatus::Completed),
        ]);
        assert_eq!(store.refresh(&backend).await.unwrap(), 2);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
    }

    #[tokio::test]
    async fn failed_refresh_preserves_cache() {
        let mut store = PostStore::new();
        let backend = FakeBackend::with_posts(vec![post("a", 10, PostStatus::Scheduled)]);
        store.refresh(&backend).await.unwrap();

        backend.fail_listing(true);
        assert!(store.refresh(&backend).await.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().content, "post a");
    }

    #[tokio::test]
    async fn mark_completed_is_dirty_until_refresh() {
        let mut store = PostStore::new();
        let backend = FakeBackend::with_posts(vec![post("a", -5, PostStatus::Scheduled)]);
        store.refresh(&backend).await.unwrap();

        assert!(store.mark_completed("a"));
        assert_eq!(store.get("a").unwrap().status, PostStatus::Completed);
        assert!(store.is_dirty("a"));
        assert!(!store.mark_completed("missing"));

        store.refresh(&backend).await.unwrap();
        assert!(!store.is_dirty("a"));
        // Server truth wins on refresh; the optimistic flip is not merged.
        assert_eq!(store.get("a").unwrap().status, PostStatus::Scheduled);
    }

    #[tokio::test]
    async fn failed_delete_leaves_post_visible() {
        let mut store = PostStore::new();
        let backend = FakeBackend::with_posts(vec![post("a", 10, PostStatus::Scheduled)]);
        store.refresh(&backend).await.unwrap();

        backend.fail_delete(true);
        assert!(store.remove("a", &backend).await.is_err());
        assert!(store.get("a").is_some());

        backend.fail_delete(false);
        let message = store.remove("a", &backend).await.unwrap();
        assert!(!message.is_empty());
        assert!(store.get("a").is_none());
    }

    #[test]
    fn due_ids_in_list_order() {
        let mut store = PostStore::new();
        store.posts = vec![
            post("late", -10, PostStatus::Scheduled),
            post("future", 10, PostStatus::Scheduled),
            post("later", -1, PostStatus::Scheduled),
            post("done", -30, PostStatus::Completed),
        ];
        assert_eq!(store.due_ids(Utc::now()), vec!["late", "later"]);
    }
}
