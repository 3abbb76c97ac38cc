//! The content composer: collects message text, platform selection, and
//! media, and refuses to produce a submittable draft until everything
//! passes the platform rules.
//!
//! All checks here are local. A draft that fails validation never reaches
//! the network.

use postwire_core::error::{PostwireError, Result};
use postwire_core::types::{MediaFile, Platform, PostDraft, TwitterCredentials};

use crate::limits::{CombinedMediaLimits, MB, profile};

/// Multi-step draft state, mirroring what a user assembles before
/// publishing or scheduling.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    content: String,
    selected: Vec<Platform>,
    media: Vec<MediaFile>,
    twitter_authenticated: bool,
    content_error: Option<String>,
}

impl Composer {
    pub fn new(twitter_authenticated: bool) -> Self {
        Self {
            twitter_authenticated,
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn selected(&self) -> &[Platform] {
        &self.selected
    }

    pub fn media(&self) -> &[MediaFile] {
        &self.media
    }

    /// Current character-limit error, if the content violates any selected
    /// platform's limit.
    pub fn content_error(&self) -> Option<&str> {
        self.content_error.as_deref()
    }

    /// Update the authenticated-session flag. Losing the session also
    /// deselects the platform that required it.
    pub fn set_twitter_authenticated(&mut self, authenticated: bool) {
        self.twitter_authenticated = authenticated;
        if !authenticated && self.selected.contains(&Platform::Twitter) {
            self.selected.retain(|p| *p != Platform::Twitter);
            self.revalidate();
        }
    }

    /// Select a target platform.
    ///
    /// Selecting a platform that requires authentication without a session
    /// fails and leaves the selection unchanged; the caller surfaces the
    /// message as a warning.
    pub fn select(&mut self, platform: Platform) -> Result<()> {
        if platform.requires_auth() && !self.twitter_authenticated {
            return Err(PostwireError::Validation(
                "Please connect your Twitter account first".into(),
            ));
        }
        if !self.selected.contains(&platform) {
            self.selected.push(platform);
        }
        self.revalidate();
        Ok(())
    }

    pub fn deselect(&mut self, platform: Platform) {
        self.selected.retain(|p| *p != platform);
        self.revalidate();
    }

    /// Replace the message text and re-run the character-limit check.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.content_error = check_content(&self.content, &self.selected);
    }

    /// Attach a batch of files. The whole batch is rejected if the combined
    /// count would exceed the limit, any file is too large, or any file's
    /// type is not accepted by every selected platform.
    pub fn attach(&mut self, files: Vec<MediaFile>) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        if let Some(message) = self.check_files(&files) {
            return Err(PostwireError::Validation(message));
        }
        self.media.extend(files);
        Ok(())
    }

    pub fn remove_media(&mut self, index: usize) {
        if index < self.media.len() {
            self.media.remove(index);
        }
    }

    /// Check every attached file plus the incoming batch against the
    /// current selection. Files attached before a constraining platform was
    /// selected are re-checked here, not grandfathered in.
    fn check_files(&self, incoming: &[MediaFile]) -> Option<String> {
        let limits = CombinedMediaLimits::for_selection(&self.selected)?;

        if self.media.len() + incoming.len() > limits.max_count {
            return Some(format!(
                "You can only attach up to {} files for the selected platforms",
                limits.max_count
            ));
        }

        for file in self.media.iter().chain(incoming) {
            if file.size > limits.max_bytes {
                return Some(format!(
                    "File \"{}\" exceeds the maximum size limit ({}MB)",
                    file.name,
                    limits.max_bytes / MB
                ));
            }
            if !limits.allowed_types.contains(&file.mime.as_str()) {
                return Some(format!(
                    "File type \"{}\" is not supported by all selected platforms",
                    file.mime
                ));
            }
        }

        None
    }

    /// Explicitly shorten the content to the strictest selected limit,
    /// keeping `limit - 3` characters plus an ellipsis. One-way edit.
    /// Returns true when the content actually changed.
    pub fn auto_truncate(&mut self) -> bool {
        let Some(limit) = self.strictest_char_limit() else {
            return false;
        };
        if self.content.chars().count() <= limit {
            return false;
        }
        let mut truncated: String = self.content.chars().take(limit - 3).collect();
        truncated.push_str("...");
        self.content = truncated;
        self.revalidate();
        true
    }

    fn strictest_char_limit(&self) -> Option<usize> {
        self.selected
            .iter()
            .filter_map(|p| profile(*p))
            .map(|p| p.char_limit)
            .min()
    }

    /// Run every submission check: content or media present, at least one
    /// platform, authenticated session where required, character limits,
    /// and media constraints.
    pub fn validate_for_submission(&self) -> Result<()> {
        if self.content.trim().is_empty() && self.media.is_empty() {
            return Err(PostwireError::Validation(
                "Please enter some content or attach media for your post".into(),
            ));
        }
        if self.selected.is_empty() {
            return Err(PostwireError::Validation(
                "Please select at least one platform".into(),
            ));
        }
        if self.selected.contains(&Platform::Twitter) && !self.twitter_authenticated {
            return Err(PostwireError::Validation(
                "Please authenticate your Twitter account before posting".into(),
            ));
        }
        if let Some(limit) = self.strictest_char_limit() {
            let len = self.content.chars().count();
            if len > limit {
                return Err(PostwireError::Validation(format!(
                    "Your content exceeds the {limit} character limit by {} characters. \
                     Please edit your content or use the auto-truncate feature.",
                    len - limit
                )));
            }
        }
        if let Some(message) = check_content(&self.content, &self.selected) {
            return Err(PostwireError::Validation(message));
        }
        if let Some(message) = self.check_files(&[]) {
            return Err(PostwireError::Validation(message));
        }
        Ok(())
    }

    /// Validate and produce a draft ready for the backend.
    pub fn into_draft(self, credentials: Option<TwitterCredentials>) -> Result<PostDraft> {
        self.validate_for_submission()?;
        Ok(PostDraft {
            content: self.content,
            platforms: self.selected,
            media: self.media,
            twitter_credentials: credentials,
        })
    }
}

/// Character-limit check against every selected platform. Returns a
/// combined human-readable error naming each violated platform, or `None`
/// when nothing is selected or everything fits.
pub fn check_content(text: &str, platforms: &[Platform]) -> Option<String> {
    if platforms.is_empty() {
        return None;
    }
    let len = text.chars().count();
    let errors: Vec<String> = platforms
        .iter()
        .filter_map(|p| profile(*p).map(|profile| (p, profile)))
        .filter(|(_, profile)| len > profile.char_limit)
        .map(|(p, profile)| {
            format!(
                "{} has a {} character limit ({}/{})",
                p.display_name(),
                profile.char_limit,
                len,
                profile.char_limit
            )
        })
        .collect();
    if errors.is_empty() {
        None
    } else {
        Some(errors.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authed_twitter_composer() -> Composer {
        let mut composer = Composer::new(true);
        composer.select(Platform::Twitter).unwrap();
        composer
    }

    fn png(name: &str, bytes: usize) -> MediaFile {
        MediaFile::new(name, "image/png", vec![0u8; bytes])
    }

    #[test]
    fn over_limit_names_platform_and_counts() {
        let mut composer = authed_twitter_composer();
        composer.set_content("x".repeat(300));
        let error = composer.content_error().unwrap();
        assert!(error.contains("Twitter has a 280 character limit"));
        assert!(error.contains("(300/280)"));
    }

    #[test]
    fn validation_is_idempotent() {
        let text = "y".repeat(300);
        let first = check_content(&text, &[Platform::Twitter]);
        let second = check_content(&text, &[Platform::Twitter]);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn no_platform_no_limit_check() {
        assert!(check_content(&"z".repeat(10_000), &[]).is_none());
    }

    #[test]
    fn submission_blocked_over_limit() {
        let mut composer = authed_twitter_composer();
        composer.set_content("x".repeat(300));
        let err = composer.validate_for_submission().unwrap_err();
        assert!(err.to_string().contains("by 20 characters"));
    }

    #[test]
    fn auto_truncate_fits_then_stops() {
        let mut composer = authed_twitter_composer();
        composer.set_content("a".repeat(300));
        assert!(composer.auto_truncate());
        assert_eq!(composer.content().chars().count(), 280);
        assert!(composer.content().ends_with("..."));
        assert!(composer.content_error().is_none());
        // Idempotent once at or under the limit.
        let snapshot = composer.content().to_string();
        assert!(!composer.auto_truncate());
        assert_eq!(composer.content(), snapshot);
    }

    #[test]
    fn select_gated_without_session() {
        let mut composer = Composer::new(false);
        let err = composer.select(Platform::Twitter).unwrap_err();
        assert!(err.to_string().contains("connect your Twitter account"));
        assert!(composer.selected().is_empty());
    }

    #[test]
    fn deauth_deselects_twitter() {
        let mut composer = authed_twitter_composer();
        composer.set_twitter_authenticated(false);
        assert!(composer.selected().is_empty());
    }

    #[test]
    fn media_batch_rejected_wholesale() {
        let mut composer = authed_twitter_composer();
        // One good file, one oversized: nothing gets attached.
        let err = composer
            .attach(vec![png("ok.png", 1024), png("big.png", 6 * 1024 * 1024)])
            .unwrap_err();
        assert!(err.to_string().contains("big.png"));
        assert!(composer.media().is_empty());
    }

    #[test]
    fn media_type_outside_intersection_rejected() {
        let mut composer = authed_twitter_composer();
        let pdf = MediaFile::new("doc.pdf", "application/pdf", vec![0u8; 16]);
        let err = composer.attach(vec![pdf]).unwrap_err();
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn media_count_includes_existing() {
        let mut composer = authed_twitter_composer();
        composer
            .attach(vec![png("1.png", 8), png("2.png", 8), png("3.png", 8)])
            .unwrap();
        let err = composer
            .attach(vec![png("4.png", 8), png("5.png", 8)])
            .unwrap_err();
        assert!(err.to_string().contains("up to 4 files"));
        assert_eq!(composer.media().len(), 3);
    }

    #[test]
    fn media_unconstrained_without_profiled_platform() {
        let mut composer = Composer::new(false);
        composer
            .attach(vec![MediaFile::new("any.bin", "application/octet-stream", vec![0u8; 64])])
            .unwrap();
        assert_eq!(composer.media().len(), 1);
    }

    #[test]
    fn media_rechecked_once_platform_selected() {
        // Attached while nothing constrained media, so it goes through.
        let mut composer = Composer::new(true);
        let pdf = MediaFile::new("report.pdf", "application/pdf", vec![0u8; 10 * 1024 * 1024]);
        composer.attach(vec![pdf]).unwrap();

        // Selecting Twitter afterwards must not grandfather the file in.
        composer.select(Platform::Twitter).unwrap();
        composer.set_content("hello");
        let err = composer.validate_for_submission().unwrap_err();
        assert!(err.to_string().contains("report.pdf"));
    }

    #[test]
    fn empty_draft_rejected() {
        let composer = authed_twitter_composer();
        let err = composer.validate_for_submission().unwrap_err();
        assert!(err.to_string().contains("content or attach media"));
    }

    #[test]
    fn media_only_draft_allowed() {
        let mut composer = authed_twitter_composer();
        composer.attach(vec![png("pic.png", 64)]).unwrap();
        composer.validate_for_submission().unwrap();
        let draft = composer.into_draft(None).unwrap();
        assert_eq!(draft.content, "");
        assert_eq!(draft.media.len(), 1);
    }

    #[test]
    fn no_platform_selected_rejected() {
        let mut composer = Composer::new(true);
        composer.set_content("hello");
        let err = composer.validate_for_submission().unwrap_err();
        assert!(err.to_string().contains("at least one platform"));
    }
}
