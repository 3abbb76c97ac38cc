//! Post data model: the wire types the posting backend speaks and the
//! normalized records the rest of the workspace operates on.
//!
//! The backend owns every record. The client holds a read-mostly mirror, so
//! deserialization is deliberately forgiving: a record with a missing field
//! gets a sane default instead of poisoning the whole refresh.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target platforms understood by the posting backend.
///
/// Only Twitter is active today; the other identifiers appear in stored
/// records and are kept for wire fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    LinkedIn,
}

impl Platform {
    /// Wire name, as sent in the `platforms` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
        }
    }

    /// Display name with the leading capital the UI strings use.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::LinkedIn => "LinkedIn",
        }
    }

    /// Parse a wire name. Unknown names are dropped by normalization.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "twitter" => Some(Self::Twitter),
            "facebook" => Some(Self::Facebook),
            "linkedin" => Some(Self::LinkedIn),
            _ => None,
        }
    }

    /// Whether selecting this platform requires an authenticated session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Twitter)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a scheduled post, client view.
///
/// There is deliberately no failed state: a post whose execution fails
/// stays `Scheduled` and is retried on the next sweep or by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Scheduled,
    Completed,
}

/// A scheduled post as mirrored from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledPost {
    /// Backend-assigned UUID.
    pub id: String,
    /// Message text. Empty for media-only posts.
    pub content: String,
    /// Target platforms, in submission order.
    pub platforms: Vec<Platform>,
    /// When the post should fire.
    pub scheduled_time: DateTime<Utc>,
    pub status: PostStatus,
    /// Server-side paths of attached media, if any.
    #[serde(default)]
    pub media_paths: Vec<String>,
}

impl ScheduledPost {
    /// A post is due once its target time has passed and it has not fired.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.scheduled_time < now
    }
}

/// Raw listing record, before normalization. Every field except `id` may be
/// missing or malformed in backend responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScheduledPost {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub platforms: Option<serde_json::Value>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub media_paths: Option<Vec<String>>,
}

impl RawScheduledPost {
    /// Normalize into a [`ScheduledPost`], filling defaults:
    /// missing time becomes `now`, missing status becomes `scheduled`,
    /// missing content becomes empty, missing or malformed platforms
    /// become `[twitter]`.
    pub fn normalize(self, now: DateTime<Utc>) -> ScheduledPost {
        let platforms = match self.platforms {
            Some(serde_json::Value::Array(items)) => {
                let parsed: Vec<Platform> = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(Platform::parse)
                    .collect();
                if parsed.is_empty() {
                    vec![Platform::Twitter]
                } else {
                    parsed
                }
            }
            _ => vec![Platform::Twitter],
        };

        let status = match self.status.as_deref() {
            Some("completed") => PostStatus::Completed,
            _ => PostStatus::Scheduled,
        };

        ScheduledPost {
            id: self.id,
            content: self.content.unwrap_or_default(),
            platforms,
            scheduled_time: self.scheduled_time.unwrap_or(now),
            status,
            media_paths: self.media_paths.unwrap_or_default(),
        }
    }
}

/// Listing response body: `GET /api/posts/scheduled`.
#[derive(Debug, Deserialize)]
pub struct ScheduledListing {
    #[serde(default)]
    pub posts: Vec<RawScheduledPost>,
}

/// A media attachment staged for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    pub size: u64,
    pub data: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
            data,
        }
    }
}

/// Locally stored Twitter session payload, sent as the
/// `twitter_credentials` form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwitterCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// A validated draft ready for publish or schedule submission.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: String,
    pub platforms: Vec<Platform>,
    pub media: Vec<MediaFile>,
    pub twitter_credentials: Option<TwitterCredentials>,
}

/// Per-platform result inside an execute/publish response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
}

/// Success body of execute, publish, and schedule calls.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecuteOutcome {
    #[serde(default)]
    pub message: Option<String>,
    /// Echoed back by the schedule endpoint.
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub results: Option<HashMap<String, PlatformOutcome>>,
}
