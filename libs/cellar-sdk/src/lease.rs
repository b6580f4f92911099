//! Lease descriptor for issued secrets.
//!
//! A lease binds an issued credential to TTL metadata and an internal
//! payload the host replays when it later revokes or renews the secret.
//! The host enforces expiry; plugins only report the bounds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A lease-bound secret produced by a plugin.
///
/// `data` is returned to the caller; `internal_data` is visible only to
/// the plugin's revoke/renew callbacks. A `None` TTL or MaxTTL means the
/// host default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    /// Secret type name, used by the host to route lifecycle callbacks
    pub secret_type: String,
    /// Public response data
    pub data: Map<String, Value>,
    /// Internal data replayed on revoke/renew, never shown to callers
    #[serde(default)]
    pub internal_data: Map<String, Value>,
    /// Requested time-to-live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
    /// Upper renewal bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ttl: Option<Duration>,
}

impl Lease {
    /// Create a lease with host-default TTL bounds.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        data: Map<String, Value>,
        internal_data: Map<String, Value>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            data,
            internal_data,
            ttl: None,
            max_ttl: None,
        }
    }

    /// Set the lease TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the lease MaxTTL.
    #[must_use]
    pub fn with_max_ttl(mut self, max_ttl: Duration) -> Self {
        self.max_ttl = Some(max_ttl);
        self
    }

    /// Get an internal data entry as a string.
    ///
    /// Returns `None` when the key is absent or the value is not a
    /// string.
    #[must_use]
    pub fn internal_str(&self, key: &str) -> Option<&str> {
        self.internal_data.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_lease() -> Lease {
        let mut data = Map::new();
        data.insert("token".to_string(), json!("tok-1"));
        let mut internal = Map::new();
        internal.insert("token".to_string(), json!("tok-1"));
        internal.insert("role".to_string(), json!("barista"));
        Lease::new("user_token", data, internal)
    }

    #[test]
    fn test_builder_sets_ttl_bounds() {
        let lease = sample_lease()
            .with_ttl(Duration::from_secs(60))
            .with_max_ttl(Duration::from_secs(120));

        assert_eq!(lease.ttl, Some(Duration::from_secs(60)));
        assert_eq!(lease.max_ttl, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_internal_str_absent_or_mistyped_is_none() {
        let mut lease = sample_lease();
        lease
            .internal_data
            .insert("attempts".to_string(), json!(3));

        assert_eq!(lease.internal_str("token"), Some("tok-1"));
        assert_eq!(lease.internal_str("missing"), None);
        assert_eq!(lease.internal_str("attempts"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let lease = sample_lease().with_ttl(Duration::from_secs(90));
        let encoded = serde_json::to_string(&lease).unwrap();
        let decoded: Lease = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, lease);
    }

    #[test]
    fn test_host_default_bounds_are_omitted_from_wire() {
        let lease = sample_lease();
        let encoded = serde_json::to_value(&lease).unwrap();
        assert!(encoded.get("ttl").is_none());
        assert!(encoded.get("max_ttl").is_none());
    }
}
