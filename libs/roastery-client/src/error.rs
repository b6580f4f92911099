//! Client error types using thiserror 2.0.

use thiserror::Error;

/// Errors returned by the Roastery API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A required connection parameter was empty
    #[error("invalid client configuration: {0} must not be empty")]
    InvalidConfig(&'static str),

    /// The API rejected the request as unauthenticated or forbidden
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The API was unreachable or failed server-side
    #[error("Roastery unavailable: {0}")]
    Unavailable(String),

    /// The API reported success but returned no usable token
    #[error("sign-in returned an empty token")]
    EmptyResponse,

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Http(_))
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthFailed(msg.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Roastery unavailable: connection refused");

        let err = ClientError::InvalidConfig("username");
        assert_eq!(
            err.to_string(),
            "invalid client configuration: username must not be empty"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::unavailable("timeout").is_retryable());
        assert!(!ClientError::auth_failed("bad password").is_retryable());
        assert!(!ClientError::EmptyResponse.is_retryable());
        assert!(!ClientError::InvalidConfig("url").is_retryable());
    }
}
