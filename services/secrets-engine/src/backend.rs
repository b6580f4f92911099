//! The backend instance: shared state, client cache, and dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use cellar_sdk::{Lease, Operation, PluginError, Request, Response, SecretsPlugin, Storage};
use roastery_client::{Credentials, RoasteryClient};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::CONFIG_KEY;
use crate::error::{EngineError, EngineResult};
use crate::roles::ROLE_PREFIX;

const BACKEND_HELP: &str = "\
The Roastery secrets engine mints short-lived Roastery user tokens.

Write connection parameters to `config`, define roles under `role/<name>`
binding a Roastery username and TTL bounds, then read `creds/<name>` to
issue a lease-bound token. The host revokes or renews issued tokens
through the engine's lease callbacks.";

/// One mounted instance of the Roastery secrets engine.
///
/// Owns the storage handle the host provided for this mount and a cached
/// upstream client derived from the stored configuration. The cache is
/// the only shared mutable state; everything else lives in storage.
pub struct RoasteryBackend {
    pub(crate) storage: Arc<dyn Storage>,
    client: RwLock<Option<Arc<RoasteryClient>>>,
}

impl RoasteryBackend {
    /// Create a backend over the host's storage for this mount.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            client: RwLock::new(None),
        }
    }

    /// Get the Roastery client bound to the current configuration,
    /// constructing and caching one if none exists.
    ///
    /// Double-checked acquisition: the read-lock fast path serves the
    /// common case; the slot is re-checked after taking the write lock
    /// so construction happens at most once per invalidation.
    ///
    /// # Errors
    ///
    /// Fails when no configuration is stored, when the stored
    /// configuration cannot build a client, or on a storage fault.
    pub async fn client(&self) -> EngineResult<Arc<RoasteryClient>> {
        {
            let cached = self.client.read().await;
            if let Some(client) = cached.as_ref() {
                return Ok(Arc::clone(client));
            }
        }

        let mut slot = self.client.write().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let config = self
            .read_config()
            .await?
            .ok_or(EngineError::NotConfigured)?;
        let credentials = Credentials::new(config.url, config.username, config.password)
            .map_err(|e| EngineError::InvalidConfiguration(e.to_string()))?;
        let client = Arc::new(RoasteryClient::new(credentials).map_err(EngineError::Upstream)?);

        debug!("constructed new Roastery client");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Drop the cached client so the next [`Self::client`] call rebuilds
    /// it from the current configuration.
    pub async fn invalidate_client(&self) {
        let mut slot = self.client.write().await;
        if slot.take().is_some() {
            debug!("invalidated cached Roastery client");
        }
    }

    async fn dispatch(&self, req: Request) -> EngineResult<Response> {
        let path = req.path.trim_matches('/');

        if path == CONFIG_KEY {
            return match req.operation {
                Operation::Read => self.handle_config_read().await,
                Operation::Create | Operation::Update => {
                    self.handle_config_write(req.operation, &req.fields).await
                }
                Operation::Delete => self.handle_config_delete().await,
                op => Err(EngineError::unsupported(op, path)),
            };
        }

        if path == "role" {
            return match req.operation {
                Operation::List => self.handle_role_list().await,
                op => Err(EngineError::unsupported(op, path)),
            };
        }

        if let Some(name) = path.strip_prefix(ROLE_PREFIX) {
            // The host schema types role names as lowercase strings.
            let name = name.to_lowercase();
            return match req.operation {
                Operation::Read => self.handle_role_read(&name).await,
                Operation::Create | Operation::Update => {
                    self.handle_role_write(&name, &req.fields).await
                }
                Operation::Delete => self.handle_role_delete(&name).await,
                op => Err(EngineError::unsupported(op, path)),
            };
        }

        if let Some(name) = path.strip_prefix("creds/") {
            let name = name.to_lowercase();
            return match req.operation {
                Operation::Read | Operation::Update => {
                    let lease = self.issue(&name).await?;
                    info!(role = %name, "issued Roastery user token");
                    Ok(Response::with_lease(lease))
                }
                op => Err(EngineError::unsupported(op, path)),
            };
        }

        Err(EngineError::unsupported(req.operation, path))
    }
}

#[async_trait]
impl SecretsPlugin for RoasteryBackend {
    async fn handle(&self, req: Request) -> Result<Response, PluginError> {
        self.dispatch(req).await.map_err(Into::into)
    }

    async fn exists(&self, req: &Request) -> Result<bool, PluginError> {
        let path = req.path.trim_matches('/');
        if path == CONFIG_KEY {
            return self.config_exists().await.map_err(Into::into);
        }
        if let Some(name) = path.strip_prefix(ROLE_PREFIX) {
            let role = self.fetch_role(&name.to_lowercase()).await.map_err(PluginError::from)?;
            return Ok(role.is_some());
        }
        Ok(false)
    }

    async fn revoke(&self, lease: &Lease) -> Result<(), PluginError> {
        self.revoke_token(lease).await.map_err(Into::into)
    }

    async fn renew(&self, lease: &mut Lease) -> Result<(), PluginError> {
        self.renew_token(lease).await.map_err(Into::into)
    }

    async fn invalidate(&self, key: &str) {
        if key == CONFIG_KEY {
            self.invalidate_client().await;
        }
    }

    fn help(&self) -> &str {
        BACKEND_HELP
    }
}
