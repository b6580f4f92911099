//! Roastery HTTP client with credential redaction and logging integration.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::Credentials;
use crate::error::{ClientError, ClientResult};
use crate::types::{SignInRequest, SignInResponse, UserToken};

/// Client for one Roastery deployment, bound to one set of credentials.
///
/// Holds a pooled HTTP connection and is cheap to share behind an
/// `Arc`. A single call either succeeds or fails; there is no retry
/// logic here.
pub struct RoasteryClient {
    credentials: Credentials,
    http: Client,
}

impl RoasteryClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Credentials) -> ClientResult<Self> {
        let http = ClientBuilder::new()
            .timeout(credentials.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .use_rustls_tls()
            .build()?;

        Ok(Self { credentials, http })
    }

    /// Sign in and mint a user token.
    ///
    /// # Errors
    ///
    /// Fails with `AuthFailed` when the API rejects the credentials,
    /// `Unavailable` on transport or server faults, and `EmptyResponse`
    /// when a successful reply carries no token.
    #[instrument(skip(self), fields(username = %self.credentials.username))]
    pub async fn sign_in(&self) -> ClientResult<UserToken> {
        debug!("signing in to Roastery");

        let url = format!("{}/signin", self.credentials.url);
        let body = SignInRequest {
            username: &self.credentials.username,
            password: self.credentials.password.expose_secret(),
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::unavailable(e.to_string()))?;

        let response = check_status(response).await?;
        let signin: SignInResponse = response.json().await?;

        if signin.token.is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        Ok(UserToken {
            user_id: signin.user_id,
            token: signin.token,
        })
    }

    /// Sign out, invalidating `token` upstream.
    ///
    /// # Errors
    ///
    /// Fails with `AuthFailed` when the API no longer recognizes the
    /// token and `Unavailable` on transport or server faults.
    #[instrument(skip(self, token))]
    pub async fn sign_out(&self, token: &str) -> ClientResult<()> {
        debug!("signing out of Roastery");

        let url = format!("{}/signout", self.credentials.url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ClientError::unavailable(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}

impl fmt::Debug for RoasteryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoasteryClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Map non-success statuses onto client errors.
async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    match status.as_u16() {
        401 | 403 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::auth_failed(format!("status {status}: {text}")))
        }
        s if s >= 500 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::unavailable(format!("status {status}: {text}")))
        }
        _ if !status.is_success() => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::unavailable(format!("status {status}: {text}")))
        }
        _ => Ok(response),
    }
}
