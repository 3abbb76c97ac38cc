//! Transient user-facing feedback for asynchronous actions.
//!
//! One alert is visible at a time; raising a new one replaces the old.
//! Alerts auto-dismiss after a fixed duration and can be dismissed by
//! hand. Rate-limit failures get special handling: instead of the default
//! error alert the reporter raises a warning and records a cool-down that
//! expires a fixed 15 minutes later (the backend exposes no reset header
//! to parse).

use chrono::{DateTime, Duration, Utc};
use postwire_core::error::{ErrorKind, PostwireError};
use serde::Serialize;

/// How long an alert stays visible before auto-dismissing.
pub const ALERT_TTL_SECS: i64 = 6;

/// Estimated rate-limit cool-down. A constant, not server-provided.
pub const RATE_LIMIT_COOLDOWN_MINUTES: i64 = 15;

/// Alert severity, in increasing order of trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A single transient alert.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    fn expired(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at > Duration::seconds(ALERT_TTL_SECS)
    }
}

/// Active rate-limit cool-down.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatus {
    /// The error text that tripped the detection.
    pub message: String,
    /// Estimated time the limit lifts: detection time + 15 minutes.
    pub resets_at: DateTime<Utc>,
}

/// Single-slot alert reporter with rate-limit tracking.
#[derive(Debug, Default)]
pub struct AlertReporter {
    current: Option<Alert>,
    rate_limit: Option<RateLimitStatus>,
}

impl AlertReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible alert, if any and not yet auto-dismissed.
    pub fn current(&self, now: DateTime<Utc>) -> Option<&Alert> {
        self.current.as_ref().filter(|a| !a.expired(now))
    }

    /// Manual dismissal.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The active cool-down, if a rate limit was detected and no success
    /// has cleared it since.
    pub fn rate_limit(&self) -> Option<&RateLimitStatus> {
        self.rate_limit.as_ref()
    }

    /// Raise an alert, replacing whatever was visible.
    pub fn raise(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("alert [{severity:?}]: {message}");
        self.current = Some(Alert {
            severity,
            message,
            raised_at: Utc::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(Severity::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.raise(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(Severity::Error, message);
    }

    /// Report a successful remote action. Also clears any rate-limit
    /// cool-down, since the platform evidently accepted a call again.
    pub fn success(&mut self, message: impl Into<String>) {
        self.rate_limit = None;
        self.raise(Severity::Success, message);
    }

    /// Report a failed remote action.
    ///
    /// Rate-limit failures suppress the default error alert in favor of a
    /// warning plus a cool-down estimate; everything else becomes a plain
    /// error alert.
    pub fn failure(&mut self, err: &PostwireError) {
        match err.kind() {
            ErrorKind::RateLimited => {
                let resets_at = Utc::now() + Duration::minutes(RATE_LIMIT_COOLDOWN_MINUTES);
                self.rate_limit = Some(RateLimitStatus {
                    message: err.to_string(),
                    resets_at,
                });
                self.warning("Rate limit exceeded. Please try again later.");
            }
            _ => {
                self.error(format!("Error: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_alert_replaces_old() {
        let mut reporter = AlertReporter::new();
        reporter.info("first");
        reporter.error("second");
        let alert = reporter.current(Utc::now()).unwrap();
        assert_eq!(alert.severity, Severity::Error);
        assert_eq!(alert.message, "second");
    }

    #[test]
    fn alerts_auto_dismiss() {
        let mut reporter = AlertReporter::new();
        reporter.info("hello");
        let later = Utc::now() + Duration::seconds(ALERT_TTL_SECS + 1);
        assert!(reporter.current(later).is_none());
        // Still present just before the deadline.
        let just_before = Utc::now() + Duration::seconds(ALERT_TTL_SECS - 1);
        assert!(reporter.current(just_before).is_some());
    }

    #[test]
    fn manual_dismiss() {
        let mut reporter = AlertReporter::new();
        reporter.warning("heads up");
        reporter.dismiss();
        assert!(reporter.current(Utc::now()).is_none());
    }

    #[test]
    fn rate_limit_failure_warns_with_cooldown() {
        let mut reporter = AlertReporter::new();
        let before = Utc::now();
        let err = PostwireError::classify_api(500, "429 Too Many Requests".into());
        reporter.failure(&err);

        let alert = reporter.current(Utc::now()).unwrap();
        assert_eq!(alert.severity, Severity::Warning);

        let status = reporter.rate_limit().unwrap();
        assert!(status.message.contains("Too Many Requests"));
        let expected = before + Duration::minutes(RATE_LIMIT_COOLDOWN_MINUTES);
        let drift = (status.resets_at - expected).num_seconds().abs();
        assert!(drift < 5, "reset estimate should be now + 15 minutes");
    }

    #[test]
    fn plain_failure_is_error_severity() {
        let mut reporter = AlertReporter::new();
        let err = PostwireError::Api {
            status: 500,
            message: "boom".into(),
        };
        reporter.failure(&err);
        let alert = reporter.current(Utc::now()).unwrap();
        assert_eq!(alert.severity, Severity::Error);
        assert!(reporter.rate_limit().is_none());
    }

    #[test]
    fn success_clears_cooldown() {
        let mut reporter = AlertReporter::new();
        reporter.failure(&PostwireError::RateLimited("rate limit".into()));
        assert!(reporter.rate_limit().is_some());
        reporter.success("Post published successfully!");
        assert!(reporter.rate_limit().is_none());
        assert_eq!(
            reporter.current(Utc::now()).unwrap().severity,
            Severity::Success
        );
    }
}
