//! Error taxonomy for remote store operations.
//!
//! Every facade call returns `Result<_, StoreError>` so callers can
//! tell "no rows" apart from "the call failed". Transport failures
//! map to [`StoreError::Network`]; HTTP statuses are classified where
//! the response is available, since only the caller knows which
//! entity it asked for.

use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("validation rejected: {message}")]
    Validation { message: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("rate limited{}", .retry_after_secs.map_or_else(String::new, |secs| format!(" (retry after {secs}s)")))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("operation cancelled")]
    Cancelled,

    #[error("unexpected response (HTTP {status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl StoreError {
    pub fn network(message: impl Into<String>) -> Self {
        StoreError::Network {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        StoreError::Auth {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }

    /// `what` is the noun shown to the user, e.g. `"opportunity"`.
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound { what: what.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        StoreError::RateLimited { retry_after_secs }
    }

    /// Catch-all for statuses and bodies nothing else claims. Decode
    /// failures use status 0.
    pub fn unexpected(status: u16, message: impl Into<String>) -> Self {
        StoreError::Unexpected {
            status,
            message: message.into(),
        }
    }

    /// True for 401/403-class failures where a token refresh or
    /// re-login is the fix.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, StoreError::Auth { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited { .. })
    }

    /// Retry-after seconds when rate limited.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            StoreError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::unexpected(0, format!("undecodable response body: {err}"))
        } else if let Some(status) = err.status() {
            StoreError::unexpected(status.as_u16(), err.to_string())
        } else {
            StoreError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(StoreError::auth("bad token").is_auth_error());
        assert!(!StoreError::network("timeout").is_auth_error());
        assert!(!StoreError::not_found("company").is_auth_error());
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::not_found("opportunity").is_not_found());
        assert!(!StoreError::conflict("duplicate key").is_not_found());
    }

    #[test]
    fn test_is_cancelled() {
        assert!(StoreError::Cancelled.is_cancelled());
        assert!(!StoreError::network("reset").is_cancelled());
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(StoreError::rate_limited(Some(30)).retry_after(), Some(30));
        assert_eq!(StoreError::rate_limited(None).retry_after(), None);
        assert_eq!(StoreError::auth("nope").retry_after(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::not_found("contact").to_string(),
            "contact not found"
        );
        assert_eq!(
            StoreError::rate_limited(Some(30)).to_string(),
            "rate limited (retry after 30s)"
        );
        assert_eq!(StoreError::rate_limited(None).to_string(), "rate limited");
        assert_eq!(
            StoreError::unexpected(500, "internal error").to_string(),
            "unexpected response (HTTP 500): internal error"
        );
        assert_eq!(StoreError::Cancelled.to_string(), "operation cancelled");
    }
}
