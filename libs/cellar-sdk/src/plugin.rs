//! The plugin trait invoked by the Cellar host.

use async_trait::async_trait;
use thiserror::Error;

use crate::lease::Lease;
use crate::request::{Request, Response};

/// Error envelope a plugin returns to the host.
///
/// The host maps the kind onto its wire protocol: user errors become
/// client-visible failures, internal faults are reported as server-side
/// errors.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The request was invalid or named something that does not exist
    #[error("{0}")]
    User(String),

    /// The plugin hit a fault: storage, upstream transport, or a bug
    #[error("internal error: {0}")]
    Internal(String),
}

impl PluginError {
    /// Create a user-facing error.
    #[must_use]
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Create an internal fault.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the error should be shown to the requesting client.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// A secrets plugin mounted into the Cellar host.
///
/// The host owns routing, schema validation, storage durability, and the
/// lease clock; a plugin implements the operations behind one mount.
#[async_trait]
pub trait SecretsPlugin: Send + Sync {
    /// Handle a dispatched request.
    async fn handle(&self, req: Request) -> Result<Response, PluginError>;

    /// Report whether the record addressed by `req` currently exists.
    ///
    /// The host calls this before a write to decide between a create and
    /// an update operation.
    async fn exists(&self, req: &Request) -> Result<bool, PluginError>;

    /// Revoke the secret bound to `lease`.
    ///
    /// Invoked by the host's lease manager, not by direct user request.
    /// On failure the host keeps the lease and retries later.
    async fn revoke(&self, lease: &Lease) -> Result<(), PluginError>;

    /// Renew `lease`, refreshing its TTL bounds in place.
    async fn renew(&self, lease: &mut Lease) -> Result<(), PluginError>;

    /// React to an external write of a stored key.
    ///
    /// The host calls this when another node wrote the key, so derived
    /// state can be dropped.
    async fn invalidate(&self, key: &str);

    /// Synopsis for the host's help surface.
    fn help(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_flagged() {
        let err = PluginError::user("missing role name");
        assert!(err.is_user());
        assert_eq!(err.to_string(), "missing role name");
    }

    #[test]
    fn test_internal_errors_are_prefixed() {
        let err = PluginError::internal("storage backend error: disk full");
        assert!(!err.is_user());
        assert_eq!(
            err.to_string(),
            "internal error: storage backend error: disk full"
        );
    }
}
