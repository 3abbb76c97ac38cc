//! Per-platform posting limits.
//!
//! Limits are fixed constants, not fetched from anywhere. When several
//! platforms are selected the effective media constraints are the most
//! restrictive combination: minimum counts and sizes, intersection of
//! allowed MIME types.

use postwire_core::Platform;

pub const MB: u64 = 1024 * 1024;

/// Media constraints for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLimits {
    /// Maximum number of attachments per post.
    pub max_count: usize,
    /// Maximum size of a single file, bytes.
    pub max_bytes: u64,
    /// Accepted MIME types.
    pub allowed_types: &'static [&'static str],
}

/// Posting constraints for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Character limit for the message text.
    pub char_limit: usize,
    pub media: MediaLimits,
}

static TWITTER: PlatformProfile = PlatformProfile {
    char_limit: 280,
    media: MediaLimits {
        max_count: 4,
        max_bytes: 5 * MB,
        allowed_types: &["image/jpeg", "image/png", "image/gif", "video/mp4"],
    },
};

/// Look up the profile for a platform. Platforms without an active
/// integration have no profile and are skipped by validation.
pub fn profile(platform: Platform) -> Option<&'static PlatformProfile> {
    match platform {
        Platform::Twitter => Some(&TWITTER),
        Platform::Facebook | Platform::LinkedIn => None,
    }
}

/// Most restrictive media constraints across a platform selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedMediaLimits {
    pub max_count: usize,
    pub max_bytes: u64,
    pub allowed_types: Vec<&'static str>,
}

impl CombinedMediaLimits {
    /// Combine the limits of every selected platform that has a profile.
    /// Returns `None` when no selected platform constrains media.
    pub fn for_selection(platforms: &[Platform]) -> Option<Self> {
        let profiles: Vec<&PlatformProfile> =
            platforms.iter().filter_map(|p| profile(*p)).collect();
        if profiles.is_empty() {
            return None;
        }

        let max_count = profiles.iter().map(|p| p.media.max_count).min().unwrap_or(0);
        let max_bytes = profiles.iter().map(|p| p.media.max_bytes).min().unwrap_or(0);

        // Intersection of every profile's allowed types, keeping the first
        // profile's ordering.
        let mut allowed_types: Vec<&'static str> = profiles[0].media.allowed_types.to_vec();
        for p in &profiles[1..] {
            allowed_types.retain(|t| p.media.allowed_types.contains(t));
        }

        Some(Self {
            max_count,
            max_bytes,
            allowed_types,
        })
    }
}
