//! Lease lifecycle callbacks: revoke and renew.

use std::time::Duration;

use cellar_sdk::Lease;
use roastery_client::ClientError;
use tracing::{debug, info, instrument};

use crate::backend::RoasteryBackend;
use crate::error::{EngineError, EngineResult};

impl RoasteryBackend {
    /// Revoke the token bound to `lease` by signing out upstream.
    ///
    /// Revocation is idempotent: an upstream rejection of the token as
    /// unauthenticated means it is already dead and counts as success.
    /// Transport and server faults surface so the host's lease manager
    /// can retry.
    ///
    /// # Errors
    ///
    /// Fails when the lease carries no token in its internal data, when
    /// no client can be built, or when the upstream call faults.
    #[instrument(skip(self, lease))]
    pub async fn revoke_token(&self, lease: &Lease) -> EngineResult<()> {
        let token = lease
            .internal_str("token")
            .ok_or(EngineError::MalformedLease { key: "token" })?;

        let client = self.client().await?;
        match client.sign_out(token).await {
            Ok(()) => {
                info!("revoked Roastery user token");
                Ok(())
            }
            Err(ClientError::AuthFailed(reason)) => {
                debug!(%reason, "token already invalid upstream, treating revoke as done");
                Ok(())
            }
            Err(err) => Err(EngineError::Upstream(err)),
        }
    }

    /// Renew `lease`, resetting its TTL bounds from the owning role's
    /// current values.
    ///
    /// Never contacts the upstream API. A zero role duration resets the
    /// bound to the host default.
    ///
    /// # Errors
    ///
    /// Fails when the lease carries no role binding or when the role was
    /// deleted since issuance; the lease is left untouched on failure.
    #[instrument(skip(self, lease))]
    pub async fn renew_token(&self, lease: &mut Lease) -> EngineResult<()> {
        let role_name = lease
            .internal_str("role")
            .ok_or(EngineError::MalformedLease { key: "role" })?
            .to_string();

        let role = self
            .fetch_role(&role_name)
            .await?
            .ok_or(EngineError::RoleNotFound(role_name))?;

        lease.ttl = (role.ttl > Duration::ZERO).then_some(role.ttl);
        lease.max_ttl = (role.max_ttl > Duration::ZERO).then_some(role.max_ttl);

        info!(ttl = ?lease.ttl, max_ttl = ?lease.max_ttl, "renewed lease TTL bounds");
        Ok(())
    }
}
