//! Credential issuance.
//!
//! The only code path that talks to the Roastery API for issuance. A
//! single sign-in call either succeeds or the operation fails; there
//! are no retries.

use std::time::Duration;

use cellar_sdk::Lease;
use serde_json::{Map, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::backend::RoasteryBackend;
use crate::error::{EngineError, EngineResult};

/// Secret type the host uses to route lifecycle callbacks back here.
pub const USER_TOKEN_TYPE: &str = "roastery_user_token";

impl RoasteryBackend {
    /// Issue a Roastery user token for the named role.
    ///
    /// Resolves the role, signs in as its bound user through the cached
    /// client, and packages the minted token as a lease. The lease's
    /// public data carries the token, a fresh random token id, the
    /// upstream user id, and the username; its internal data carries the
    /// token and the owning role name for revoke/renew.
    ///
    /// # Errors
    ///
    /// Fails when the role does not exist, when no usable configuration
    /// is stored, or when the upstream call fails or returns no token.
    #[instrument(skip(self))]
    pub async fn issue(&self, role_name: &str) -> EngineResult<Lease> {
        let role = self
            .fetch_role(role_name)
            .await?
            .ok_or_else(|| EngineError::RoleNotFound(role_name.to_string()))?;

        let client = self.client().await?;
        let minted = client.sign_in().await.map_err(EngineError::Upstream)?;

        // The Roastery API does not track token ids; this random id is
        // the only local correlation key for the credential.
        let token_id = Uuid::new_v4();

        let mut data = Map::new();
        data.insert("token".to_string(), Value::from(minted.token.clone()));
        data.insert("token_id".to_string(), Value::from(token_id.to_string()));
        data.insert("user_id".to_string(), Value::from(minted.user_id));
        data.insert("username".to_string(), Value::from(role.username.clone()));

        let mut internal = Map::new();
        internal.insert("token".to_string(), Value::from(minted.token));
        internal.insert("role".to_string(), Value::from(role_name.to_string()));

        let mut lease = Lease::new(USER_TOKEN_TYPE, data, internal);
        if role.ttl > Duration::ZERO {
            lease = lease.with_ttl(role.ttl);
        }
        if role.max_ttl > Duration::ZERO {
            lease = lease.with_max_ttl(role.max_ttl);
        }

        Ok(lease)
    }
}
