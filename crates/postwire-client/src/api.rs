//! REST client for the posting backend.
//!
//! Endpoints, exactly as served:
//! - `GET    /api/posts/scheduled`
//! - `POST   /api/posts/execute/{id}`
//! - `DELETE /api/posts/scheduled/{id}`
//! - `POST   /api/posts/publish`   (multipart)
//! - `POST   /api/posts/schedule`  (multipart, plus `scheduled_time`)
//!
//! A non-2xx status, a network failure, and an unparsable body all collapse
//! into the same failure path; the only distinction that survives is the
//! rate-limit classification done in `postwire-core`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postwire_core::config::PostwireConfig;
use postwire_core::error::{PostwireError, Result};
use postwire_core::traits::PostBackend;
use postwire_core::types::{ExecuteOutcome, PostDraft, ScheduledListing, ScheduledPost};

/// HTTP client for the posting backend.
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
    refresh_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &PostwireConfig) -> Self {
        Self {
            base: config.api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            refresh_timeout: Duration::from_secs(config.refresh_timeout_secs),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn transport_error(&self, what: &str, e: reqwest::Error) -> PostwireError {
        if e.is_timeout() {
            PostwireError::Timeout(self.refresh_timeout.as_secs())
        } else {
            PostwireError::Http(format!("{what} failed: {e}"))
        }
    }

    /// Turn a non-2xx response into a classified error, pulling the
    /// backend's `error`/`message` field out of the body when present.
    async fn failure(resp: reqwest::Response) -> PostwireError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        PostwireError::classify_api(status, extract_message(&body))
    }

    /// Build the shared multipart form for publish/schedule submissions.
    fn draft_form(draft: &PostDraft) -> Result<reqwest::multipart::Form> {
        let platform_names: Vec<&str> = draft.platforms.iter().map(|p| p.as_str()).collect();
        let platforms_json = serde_json::to_string(&platform_names)
            .map_err(|e| PostwireError::Http(format!("Encoding platforms failed: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .text("content", draft.content.clone())
            .text("platforms", platforms_json);

        if let Some(creds) = &draft.twitter_credentials {
            let creds_json = serde_json::to_string(creds)
                .map_err(|e| PostwireError::Http(format!("Encoding credentials failed: {e}")))?;
            form = form.text("twitter_credentials", creds_json);
        }

        for (index, media) in draft.media.iter().enumerate() {
            let part = reqwest::multipart::Part::bytes(media.data.clone())
                .file_name(media.name.clone())
                .mime_str(&media.mime)
                .map_err(|e| {
                    PostwireError::Validation(format!("Invalid media type \"{}\": {e}", media.mime))
                })?;
            form = form.part(format!("media_{index}"), part);
        }

        Ok(form)
    }

    async fn submit_draft(&self, path: &str, form: reqwest::multipart::Form) -> Result<ExecuteOutcome> {
        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error(path, e))?;
        parse_outcome(&body)
    }
}

#[async_trait]
impl PostBackend for ApiClient {
    async fn list_scheduled(&self) -> Result<Vec<ScheduledPost>> {
        // Bounded fetch: a hung listing endpoint aborts instead of stalling
        // the refresh. This timeout is per-call, not a client default.
        let resp = self
            .client
            .get(self.url("/api/posts/scheduled"))
            .header("Accept", "application/json")
            .timeout(self.refresh_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error("list scheduled", e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }

        let listing: ScheduledListing = resp
            .json()
            .await
            .map_err(|e| PostwireError::Http(format!("Invalid listing response: {e}")))?;
        tracing::debug!("Fetched {} scheduled posts", listing.posts.len());

        let now = Utc::now();
        Ok(listing
            .posts
            .into_iter()
            .map(|raw| raw.normalize(now))
            .collect())
    }

    async fn execute(&self, id: &str) -> Result<ExecuteOutcome> {
        let resp = self
            .client
            .post(self.url(&format!("/api/posts/execute/{id}")))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error("execute", e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error("execute", e))?;
        parse_outcome(&body)
    }

    async fn delete(&self, id: &str) -> Result<String> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/posts/scheduled/{id}")))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error("delete", e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error("delete", e))?;
        confirmation_message(&body)
    }

    async fn publish(&self, draft: &PostDraft) -> Result<ExecuteOutcome> {
        let form = Self::draft_form(draft)?;
        self.submit_draft("/api/posts/publish", form).await
    }

    async fn schedule(&self, draft: &PostDraft, at: DateTime<Utc>) -> Result<ExecuteOutcome> {
        let form = Self::draft_form(draft)?.text("scheduled_time", at.to_rfc3339());
        self.submit_draft("/api/posts/schedule", form).await
    }
}

/// Parse a success body. A 2xx status with an unparsable body is still a
/// failure: callers flip local state (completion, removal) only on a
/// confirmation they could actually read.
fn parse_outcome(body: &str) -> Result<ExecuteOutcome> {
    serde_json::from_str(body)
        .map_err(|e| PostwireError::Http(format!("Invalid response body: {e}")))
}

/// Parse a `{ message }` confirmation body, with the same strictness as
/// [`parse_outcome`]. The `message` field itself is optional.
fn confirmation_message(body: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PostwireError::Http(format!("Invalid response body: {e}")))?;
    Ok(value
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string())
}

/// Pull the human-readable message out of an error body. The backend uses
/// `error`, occasionally `message`; anything else falls back to the raw
/// text so classification still sees it.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use postwire_core::types::Platform;

    fn client_with_base(base: &str) -> ApiClient {
        let config = PostwireConfig {
            api_base: base.into(),
            ..PostwireConfig::default()
        };
        ApiClient::new(&config)
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = client_with_base("http://localhost:5000/");
        assert_eq!(
            client.url("/api/posts/scheduled"),
            "http://localhost:5000/api/posts/scheduled"
        );
    }

    #[test]
    fn extract_message_prefers_error_field() {
        assert_eq!(
            extract_message(r#"{"error": "rate limit exceeded", "message": "nope"}"#),
            "rate limit exceeded"
        );
        assert_eq!(
            extract_message(r#"{"message": "Post deleted successfully"}"#),
            "Post deleted successfully"
        );
        assert_eq!(extract_message("<html>gateway error</html>"), "<html>gateway error</html>");
    }

    #[test]
    fn unparsable_success_body_is_a_failure() {
        // A proxy can hand back 2xx with an HTML body; that must not count
        // as a confirmed execution or deletion.
        let err = parse_outcome("<html>502 from intermediate proxy</html>").unwrap_err();
        assert!(matches!(err, PostwireError::Http(_)));
        assert!(confirmation_message("<html>502 from intermediate proxy</html>").is_err());
    }

    #[test]
    fn parse_outcome_reads_results_map() {
        let outcome = parse_outcome(
            r#"{"message": "Scheduled post executed",
                "results": {"twitter": {"success": true, "message": "ok",
                                        "url": "https://x.com/i/status/1"}}}"#,
        )
        .unwrap();
        let results = outcome.results.unwrap();
        let twitter = &results["twitter"];
        assert!(twitter.success);
        assert_eq!(twitter.url.as_deref(), Some("https://x.com/i/status/1"));
    }

    #[test]
    fn confirmation_message_reads_message_field() {
        assert_eq!(
            confirmation_message(r#"{"message": "Post deleted successfully"}"#).unwrap(),
            "Post deleted successfully"
        );
        // Valid JSON without the field still confirms, just silently.
        assert_eq!(confirmation_message("{}").unwrap(), "");
    }

    #[test]
    fn draft_form_accepts_media() {
        let draft = PostDraft {
            content: "hi".into(),
            platforms: vec![Platform::Twitter],
            media: vec![postwire_core::types::MediaFile::new(
                "a.png",
                "image/png",
                vec![1, 2, 3],
            )],
            twitter_credentials: None,
        };
        assert!(ApiClient::draft_form(&draft).is_ok());
    }

    #[test]
    fn draft_form_rejects_bad_mime() {
        let draft = PostDraft {
            content: "hi".into(),
            platforms: vec![Platform::Twitter],
            media: vec![postwire_core::types::MediaFile::new(
                "a.png",
                "not a mime type\u{0}",
                vec![1],
            )],
            twitter_credentials: None,
        };
        assert!(ApiClient::draft_form(&draft).is_err());
    }
}
