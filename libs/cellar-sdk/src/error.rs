//! Storage error types using thiserror 2.0.

use thiserror::Error;

/// Errors surfaced by the host's storage collaborator.
///
/// The storage engine itself is opaque to plugins; anything that goes
/// wrong inside it is reported as a backend fault. Serialization covers
/// the JSON encoding and decoding of storage entries.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying storage engine failed
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Entry encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::backend("disk full");
        assert_eq!(err.to_string(), "storage backend error: disk full");
    }
}
