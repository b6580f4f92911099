//! Wire types for the Roastery API.

use serde::{Deserialize, Serialize};

/// Sign-in request body.
#[derive(Debug, Serialize)]
pub(crate) struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Sign-in response body.
#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    pub user_id: i64,
    pub token: String,
}

/// A minted Roastery user token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserToken {
    /// Numeric id of the upstream user the token belongs to
    pub user_id: i64,
    /// Opaque token value, as returned by the API
    pub token: String,
}
