//! Role storage.
//!
//! A role binds a Roastery username and TTL bounds under `role/<name>`.
//! Roles are the template for issuance: `creds/<name>` mints a token for
//! the role's bound user with the role's TTL policy. A zero duration
//! means the host default applies.

use std::time::Duration;

use cellar_sdk::{FieldData, Response, StorageEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::backend::RoasteryBackend;
use crate::error::{EngineError, EngineResult};

/// Storage key prefix for role records.
pub const ROLE_PREFIX: &str = "role/";

/// A stored role record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Roastery username the role issues tokens for
    pub username: String,
    /// Default lease TTL; zero means the host default
    pub ttl: Duration,
    /// Upper renewal bound; zero means the host default
    pub max_ttl: Duration,
}

impl RoleEntry {
    /// Merge supplied fields onto an existing record, or build a fresh
    /// one when none exists.
    ///
    /// Unsupplied fields keep their prior values. The merged record must
    /// name a username, and its TTL must not exceed a non-zero MaxTTL.
    ///
    /// # Errors
    ///
    /// Fails when the merged record has no username, when a field
    /// carries the wrong type, or when the TTL bound is violated.
    pub fn merged(existing: Option<Self>, fields: &FieldData) -> EngineResult<Self> {
        let mut entry = existing.unwrap_or_default();

        if let Some(username) = fields.get_str("username")? {
            entry.username = username.to_string();
        }
        if let Some(ttl) = fields.get_duration_secs("ttl")? {
            entry.ttl = ttl;
        }
        if let Some(max_ttl) = fields.get_duration_secs("max_ttl")? {
            entry.max_ttl = max_ttl;
        }

        if entry.username.is_empty() {
            return Err(EngineError::MissingField { field: "username" });
        }
        if entry.max_ttl > Duration::ZERO && entry.ttl > entry.max_ttl {
            return Err(EngineError::validation("ttl cannot exceed max_ttl"));
        }

        Ok(entry)
    }

    fn response_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("username".to_string(), Value::from(self.username.clone()));
        data.insert("ttl".to_string(), Value::from(self.ttl.as_secs()));
        data.insert("max_ttl".to_string(), Value::from(self.max_ttl.as_secs()));
        data
    }
}

fn role_key(name: &str) -> String {
    format!("{ROLE_PREFIX}{name}")
}

impl RoasteryBackend {
    /// Fetch the role stored under `name`, if any.
    ///
    /// # Errors
    ///
    /// Fails when the name is empty, on a storage fault, or on an
    /// undecodable record.
    pub async fn fetch_role(&self, name: &str) -> EngineResult<Option<RoleEntry>> {
        if name.is_empty() {
            return Err(EngineError::InvalidRoleName);
        }
        match self.storage.get(&role_key(name)).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn handle_role_read(&self, name: &str) -> EngineResult<Response> {
        match self.fetch_role(name).await? {
            Some(role) => Ok(Response::with_data(role.response_data())),
            None => Ok(Response::empty()),
        }
    }

    #[instrument(skip(self, fields))]
    pub(crate) async fn handle_role_write(
        &self,
        name: &str,
        fields: &FieldData,
    ) -> EngineResult<Response> {
        let existing = self.fetch_role(name).await?;
        let entry = RoleEntry::merged(existing, fields)?;

        self.storage
            .put(StorageEntry::json(role_key(name), &entry)?)
            .await?;

        info!(role = %name, username = %entry.username, "stored role");
        Ok(Response::empty())
    }

    #[instrument(skip(self))]
    pub(crate) async fn handle_role_delete(&self, name: &str) -> EngineResult<Response> {
        if name.is_empty() {
            return Err(EngineError::InvalidRoleName);
        }
        self.storage.delete(&role_key(name)).await?;

        info!(role = %name, "deleted role");
        Ok(Response::empty())
    }

    pub(crate) async fn handle_role_list(&self) -> EngineResult<Response> {
        let names = self.storage.list(ROLE_PREFIX).await?;
        Ok(Response::with_keys(names))
    }
}
