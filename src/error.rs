//! Error types for ghstats.
//!
//! The GitHub client and the aggregator return these unchanged; only the
//! presentation layer turns them into user-facing text.

use std::time::Duration;

use crate::github::Endpoint;

/// The main error type for ghstats operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be parsed into an owner/name pair.
    #[error("invalid repository reference '{input}': {reason}")]
    InvalidReference {
        /// The text the user supplied.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// GitHub answered 404 for the repository.
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// The request could not be sent or GitHub answered with a non-success status.
    #[error("request to {endpoint} failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    RequestFailed {
        /// Endpoint the request was aimed at.
        endpoint: Endpoint,
        /// HTTP status, absent for transport failures.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// GitHub refused the request because the rate limit is exhausted.
    #[error("rate limited by GitHub{}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimited {
        /// How long until the limit resets, when GitHub says.
        retry_after: Option<Duration>,
    },

    /// A record was missing a required field or carried an unusable value.
    #[error("malformed record: field `{field}` {reason}")]
    MalformedRecord {
        /// Path of the offending field, e.g. `commit.author.date`.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Chart rendering failed.
    #[error("chart rendering failed: {0}")]
    Plot(String),

    /// Image encoding error while saving a chart.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::malformed(field, "is missing")
    }
}

/// A specialized Result type for ghstats operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_failed_display_with_status() {
        let err = Error::RequestFailed {
            endpoint: Endpoint::Commits,
            status: Some(502),
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to commits failed with status 502: Bad Gateway"
        );
    }

    #[test]
    fn test_request_failed_display_without_status() {
        let err = Error::RequestFailed {
            endpoint: Endpoint::Metadata,
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to repository metadata failed: connection refused"
        );
    }

    #[test]
    fn test_rate_limited_display() {
        let err = Error::RateLimited {
            retry_after: Some(Duration::from_secs(42)),
        };
        assert_eq!(err.to_string(), "rate limited by GitHub, retry after 42s");

        let err = Error::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limited by GitHub");
    }

    #[test]
    fn test_malformed_record_display() {
        let err = Error::missing("commit.author.date");
        assert_eq!(
            err.to_string(),
            "malformed record: field `commit.author.date` is missing"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
