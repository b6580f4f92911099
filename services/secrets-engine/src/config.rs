//! Connection configuration storage.
//!
//! A single record under the `config` key holds the Roastery connection
//! parameters. Absence means "unconfigured"; the latest write fully
//! replaces prior state. Writes and deletes invalidate the cached
//! client so the next issuance picks up fresh parameters.

use std::fmt;

use cellar_sdk::{FieldData, Operation, Response, StorageEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::backend::RoasteryBackend;
use crate::error::{EngineError, EngineResult};

/// Storage key for the connection configuration record.
pub const CONFIG_KEY: &str = "config";

/// Roastery connection parameters.
///
/// The password never appears in `Debug` output or in read responses.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Sign-in username
    pub username: String,
    /// Sign-in password
    pub password: String,
    /// Base URL of the Roastery API
    pub url: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

impl RoasteryBackend {
    /// Read the stored configuration, if any.
    ///
    /// # Errors
    ///
    /// Fails on a storage fault or an undecodable record.
    pub async fn read_config(&self) -> EngineResult<Option<ConnectionConfig>> {
        match self.storage.get(CONFIG_KEY).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }

    /// True when a configuration record is stored.
    ///
    /// # Errors
    ///
    /// Fails on a storage fault.
    pub async fn config_exists(&self) -> EngineResult<bool> {
        Ok(self.storage.get(CONFIG_KEY).await?.is_some())
    }

    pub(crate) async fn handle_config_read(&self) -> EngineResult<Response> {
        match self.read_config().await? {
            Some(config) => {
                let mut data = Map::new();
                data.insert("username".to_string(), Value::from(config.username));
                data.insert("url".to_string(), Value::from(config.url));
                Ok(Response::with_data(data))
            }
            None => Ok(Response::empty()),
        }
    }

    #[instrument(skip(self, fields))]
    pub(crate) async fn handle_config_write(
        &self,
        operation: Operation,
        fields: &FieldData,
    ) -> EngineResult<Response> {
        let existing = self.read_config().await?;
        if operation == Operation::Update && existing.is_none() {
            return Err(EngineError::validation(
                "configuration does not exist; create it first",
            ));
        }

        let mut config = existing.unwrap_or_default();
        if let Some(username) = fields.get_str("username")? {
            config.username = username.to_string();
        }
        if let Some(password) = fields.get_str("password")? {
            config.password = password.to_string();
        }
        if let Some(url) = fields.get_str("url")? {
            config.url = url.to_string();
        }

        for (field, value) in [
            ("username", &config.username),
            ("password", &config.password),
            ("url", &config.url),
        ] {
            if value.is_empty() {
                return Err(EngineError::MissingField { field });
            }
        }

        self.storage
            .put(StorageEntry::json(CONFIG_KEY, &config)?)
            .await?;
        self.invalidate_client().await;

        info!(username = %config.username, url = %config.url, "stored connection configuration");
        Ok(Response::empty())
    }

    #[instrument(skip(self))]
    pub(crate) async fn handle_config_delete(&self) -> EngineResult<Response> {
        self.storage.delete(CONFIG_KEY).await?;
        self.invalidate_client().await;

        info!("deleted connection configuration");
        Ok(Response::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            url: "https://roastery.test".to_string(),
        };

        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }
}
