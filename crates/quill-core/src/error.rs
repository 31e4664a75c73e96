//! Unified error types for Quill

use thiserror::Error;

/// Unified error type for all Quill operations
///
/// Variants map onto the failure taxonomy the run logic branches on:
/// `Network` and `MalformedResponse` are transient and eligible for retry,
/// `RateLimited` triggers a cooperative abort, `UiStructural` and
/// `Validation` are fatal for the current run.
#[derive(Error, Debug)]
pub enum QuillError {
    // Completion endpoint errors
    #[error("completion endpoint returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("gave up after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<QuillError>,
    },

    #[error("authentication error: {0}")]
    Auth(String),

    // Platform-signaled quota
    #[error("platform rate limit: {0}")]
    RateLimited(String),

    // Browser / UI errors
    #[error("browser error: {0}")]
    Browser(String),

    #[error("expected UI element missing: {0}")]
    UiStructural(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    // Content errors
    #[error("validation failed: {0}")]
    Validation(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl QuillError {
    /// Whether a failed remote call may be retried.
    ///
    /// Malformed responses count as retryable: on shared free-tier
    /// endpoints a truncated payload is usually as transient as a 503.
    pub fn is_retryable(&self) -> bool {
        match self {
            QuillError::Network(_) => true,
            QuillError::Timeout(_) => true,
            QuillError::MalformedResponse(_) => true,
            QuillError::Remote { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Short classification label used in retry logs.
    pub fn class(&self) -> &'static str {
        match self {
            QuillError::Network(_) => "network",
            QuillError::MalformedResponse(_) => "malformed-response",
            QuillError::Remote { .. } => "remote-status",
            QuillError::RetryExhausted { .. } => "retry-exhausted",
            QuillError::Auth(_) => "auth",
            QuillError::RateLimited(_) => "rate-limit",
            QuillError::Browser(_) => "browser",
            QuillError::UiStructural(_) => "ui-structural",
            QuillError::Timeout(_) => "timeout",
            QuillError::Validation(_) => "validation",
            QuillError::Io(_) => "io",
            QuillError::Serialization(_) => "serialization",
            QuillError::Other(_) => "other",
        }
    }
}

/// Result type alias using QuillError
pub type Result<T> = std::result::Result<T, QuillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(QuillError::Network("reset".into()).is_retryable());
        assert!(QuillError::MalformedResponse("no choices".into()).is_retryable());
        assert!(QuillError::Remote {
            status: 503,
            body: "overloaded".into()
        }
        .is_retryable());
        assert!(QuillError::Remote {
            status: 429,
            body: "slow down".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_non_retryable_classes() {
        assert!(!QuillError::Remote {
            status: 401,
            body: "bad key".into()
        }
        .is_retryable());
        assert!(!QuillError::UiStructural("save button missing".into()).is_retryable());
        assert!(!QuillError::Validation("draft too short".into()).is_retryable());
        assert!(!QuillError::RateLimited("follow limit".into()).is_retryable());
    }

    #[test]
    fn test_retry_exhausted_keeps_cause() {
        let err = QuillError::RetryExhausted {
            attempts: 3,
            source: Box::new(QuillError::Network("refused".into())),
        };
        assert!(err.to_string().contains("3 attempts"));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("refused"));
    }

    #[test]
    fn test_class_labels() {
        assert_eq!(QuillError::Timeout("editor".into()).class(), "timeout");
        assert_eq!(
            QuillError::MalformedResponse("x".into()).class(),
            "malformed-response"
        );
    }
}
