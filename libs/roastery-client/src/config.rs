//! Client credentials and connection settings.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ClientError;

/// Connection parameters for a Roastery deployment.
///
/// The password is wrapped in [`SecretString`] and never appears in
/// `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    /// Base URL of the Roastery API, without a trailing slash
    pub url: String,
    /// Sign-in username
    pub username: String,
    /// Sign-in password
    pub password: SecretString,
    /// Request timeout
    pub timeout: Duration,
}

impl Credentials {
    /// Create credentials with the default timeout.
    ///
    /// Trailing slashes on the URL are trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty parameter.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let url = url.into().trim_end_matches('/').to_string();
        let username = username.into();
        let password = password.into();

        if url.is_empty() {
            return Err(ClientError::InvalidConfig("url"));
        }
        if username.is_empty() {
            return Err(ClientError::InvalidConfig("username"));
        }
        if password.is_empty() {
            return Err(ClientError::InvalidConfig("password"));
        }

        Ok(Self {
            url,
            username,
            password: SecretString::from(password),
            timeout: Duration::from_secs(30),
        })
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parameters_are_rejected() {
        assert!(matches!(
            Credentials::new("", "alice", "hunter2"),
            Err(ClientError::InvalidConfig("url"))
        ));
        assert!(matches!(
            Credentials::new("https://roastery.test", "", "hunter2"),
            Err(ClientError::InvalidConfig("username"))
        ));
        assert!(matches!(
            Credentials::new("https://roastery.test", "alice", ""),
            Err(ClientError::InvalidConfig("password"))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let credentials = Credentials::new("https://roastery.test/", "alice", "hunter2").unwrap();
        assert_eq!(credentials.url, "https://roastery.test");
    }

    #[test]
    fn test_with_timeout() {
        let credentials = Credentials::new("https://roastery.test", "alice", "hunter2")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(credentials.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("https://roastery.test", "alice", "hunter2").unwrap();
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }
}
