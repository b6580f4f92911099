//! Engine error types using thiserror 2.0.

use cellar_sdk::request::{FieldError, Operation};
use cellar_sdk::{PluginError, StorageError};
use roastery_client::ClientError;
use thiserror::Error;

/// Errors surfaced by the secrets engine.
///
/// Validation, missing-field, and not-found errors are user-facing;
/// storage faults, upstream failures, and malformed lease data are
/// internal. [`PluginError`] carries that split to the host.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A mandatory field was absent or empty
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the absent field
        field: &'static str,
    },

    /// A supplied value failed validation
    #[error("{0}")]
    Validation(String),

    /// A role was addressed with an empty name
    #[error("role name must not be empty")]
    InvalidRoleName,

    /// The named role does not exist
    #[error("role {0:?} does not exist")]
    RoleNotFound(String),

    /// No connection configuration has been stored
    #[error("backend is not configured; write connection parameters to config first")]
    NotConfigured,

    /// The stored configuration cannot build a client
    #[error("invalid connection configuration: {0}")]
    InvalidConfiguration(String),

    /// Lease internal data is missing a key or holds a non-string value
    #[error("lease internal data is missing or malformed at key {key:?}")]
    MalformedLease {
        /// The internal data key that was absent or mistyped
        key: &'static str,
    },

    /// The path does not support the requested operation
    #[error("unsupported operation: {operation} {path}")]
    Unsupported {
        /// Requested operation
        operation: Operation,
        /// Request path
        path: String,
    },

    /// The Roastery API call failed
    #[error("upstream API error: {0}")]
    Upstream(#[source] ClientError),

    /// The host storage collaborator failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A request field carried the wrong type
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unsupported-operation error.
    #[must_use]
    pub fn unsupported(operation: Operation, path: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            path: path.into(),
        }
    }
}

impl From<EngineError> for PluginError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MissingField { .. }
            | EngineError::Validation(_)
            | EngineError::InvalidRoleName
            | EngineError::RoleNotFound(_)
            | EngineError::NotConfigured
            | EngineError::InvalidConfiguration(_)
            | EngineError::Unsupported { .. }
            | EngineError::Field(_) => Self::user(err.to_string()),
            EngineError::MalformedLease { .. }
            | EngineError::Upstream(_)
            | EngineError::Storage(_) => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::MissingField { field: "username" };
        assert_eq!(err.to_string(), "missing required field: username");

        let err = EngineError::RoleNotFound("barista".to_string());
        assert_eq!(err.to_string(), "role \"barista\" does not exist");

        let err = EngineError::unsupported(Operation::List, "creds/barista");
        assert_eq!(err.to_string(), "unsupported operation: list creds/barista");
    }

    #[test]
    fn test_user_errors_map_to_user_plugin_errors() {
        for err in [
            EngineError::MissingField { field: "url" },
            EngineError::validation("ttl exceeds max_ttl"),
            EngineError::InvalidRoleName,
            EngineError::RoleNotFound("gone".to_string()),
            EngineError::NotConfigured,
        ] {
            assert!(PluginError::from(err).is_user());
        }
    }

    #[test]
    fn test_faults_map_to_internal_plugin_errors() {
        for err in [
            EngineError::MalformedLease { key: "token" },
            EngineError::Storage(StorageError::backend("disk full")),
            EngineError::Upstream(ClientError::unavailable("connection refused")),
        ] {
            assert!(!PluginError::from(err).is_user());
        }
    }
}
