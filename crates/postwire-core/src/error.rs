//! Postwire error taxonomy.
//!
//! Every remote failure is classified once, at the transport boundary, into
//! a variant the rest of the workspace can match on. The rate-limit variant
//! exists so callers never have to grep error text themselves; the substring
//! heuristic the posting backend forces on us lives in exactly one place
//! (`looks_rate_limited`).

use thiserror::Error;

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, PostwireError>;

/// All errors produced by Postwire crates.
#[derive(Debug, Error)]
pub enum PostwireError {
    /// Transport-level failure: connection refused, DNS, TLS, broken body.
    #[error("http error: {0}")]
    Http(String),

    /// A request exceeded its bounded timeout and was aborted.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Backend answered with a non-2xx status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend (or the platform behind it) is rate limiting us.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Local validation failure. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Configuration load/save problems.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification used by the alert reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    Timeout,
    Validation,
    Remote,
    Local,
}

impl PostwireError {
    /// Classify for alert routing.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Http(_) | Self::Api { .. } => ErrorKind::Remote,
            Self::Config(_) | Self::Io(_) => ErrorKind::Local,
        }
    }

    /// Promote an API error to `RateLimited` when status or message says so.
    ///
    /// The backend does not return a structured code; a 429 status or one of
    /// a small set of message substrings is the only signal available.
    pub fn classify_api(status: u16, message: String) -> Self {
        if status == 429 || looks_rate_limited(&message) {
            Self::RateLimited(message)
        } else {
            Self::Api { status, message }
        }
    }
}

/// Substring heuristic for spotting platform rate limiting in error text.
pub fn looks_rate_limited(message: &str) -> bool {
    message.contains("rate limit")
        || message.contains("429")
        || message.contains("Too Many Requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_429_status() {
        let err = PostwireError::classify_api(429, "slow down".into());
        assert!(matches!(err, PostwireError::RateLimited(_)));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    #[test]
    fn classify_rate_limit_substrings() {
        for msg in [
            "Twitter API rate limit exceeded",
            "error 429 from upstream",
            "429 Too Many Requests",
        ] {
            let err = PostwireError::classify_api(500, msg.into());
            assert!(matches!(err, PostwireError::RateLimited(_)), "{msg}");
        }
    }

    #[test]
    fn classify_plain_api_error() {
        let err = PostwireError::classify_api(500, "internal error".into());
        assert!(matches!(err, PostwireError::Api { status: 500, .. }));
        assert_eq!(err.kind(), ErrorKind::Remote);
    }

    #[test]
    fn validation_never_remote() {
        let err = PostwireError::Validation("too long".into());
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
