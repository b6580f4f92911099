//! Property tests for role merge and TTL validation.

use std::time::Duration;

use cellar_sdk::FieldData;
use proptest::prelude::*;
use roastery_secrets_engine::{EngineError, RoleEntry};
use serde_json::{Map, Value, json};

fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

fn role_strategy() -> impl Strategy<Value = RoleEntry> {
    (username_strategy(), 0u64..100_000, 0u64..100_000).prop_map(|(username, ttl, max_ttl)| {
        RoleEntry {
            username,
            ttl: Duration::from_secs(ttl),
            max_ttl: Duration::from_secs(max_ttl),
        }
    })
}

fn fields_from(entries: &[(&str, Value)]) -> FieldData {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert((*key).to_string(), value.clone());
    }
    FieldData::new(map)
}

proptest! {
    /// Merging onto an existing record overwrites exactly the supplied
    /// fields and keeps the rest.
    #[test]
    fn merge_overwrites_only_supplied_fields(
        existing in role_strategy(),
        new_ttl in 0u64..100_000,
        supply_ttl in any::<bool>(),
    ) {
        // Keep the TTL bound satisfiable regardless of what we supply.
        let mut existing = existing;
        existing.max_ttl = Duration::ZERO;

        let fields = if supply_ttl {
            fields_from(&[("ttl", json!(new_ttl))])
        } else {
            fields_from(&[])
        };

        let merged = RoleEntry::merged(Some(existing.clone()), &fields).unwrap();

        prop_assert_eq!(&merged.username, &existing.username);
        prop_assert_eq!(merged.max_ttl, existing.max_ttl);
        if supply_ttl {
            prop_assert_eq!(merged.ttl, Duration::from_secs(new_ttl));
        } else {
            prop_assert_eq!(merged.ttl, existing.ttl);
        }
    }

    /// A fresh record is exactly the supplied fields plus zero defaults.
    #[test]
    fn create_takes_supplied_fields_verbatim(
        username in username_strategy(),
        ttl in 0u64..100_000,
    ) {
        let fields = fields_from(&[("username", json!(username.clone())), ("ttl", json!(ttl))]);
        let merged = RoleEntry::merged(None, &fields).unwrap();

        prop_assert_eq!(merged.username, username);
        prop_assert_eq!(merged.ttl, Duration::from_secs(ttl));
        prop_assert_eq!(merged.max_ttl, Duration::ZERO);
    }

    /// Any ttl above a non-zero max_ttl is rejected as a validation
    /// error, never accepted and never a fault.
    #[test]
    fn ttl_above_max_ttl_is_always_rejected(
        username in username_strategy(),
        max_ttl in 1u64..100_000,
        excess in 1u64..100_000,
    ) {
        let fields = fields_from(&[
            ("username", json!(username)),
            ("ttl", json!(max_ttl + excess)),
            ("max_ttl", json!(max_ttl)),
        ]);

        let err = RoleEntry::merged(None, &fields).unwrap_err();
        prop_assert!(matches!(err, EngineError::Validation(_)));
    }

    /// A zero max_ttl never bounds the ttl.
    #[test]
    fn zero_max_ttl_accepts_any_ttl(
        username in username_strategy(),
        ttl in 0u64..10_000_000,
    ) {
        let fields = fields_from(&[
            ("username", json!(username)),
            ("ttl", json!(ttl)),
            ("max_ttl", json!(0)),
        ]);

        prop_assert!(RoleEntry::merged(None, &fields).is_ok());
    }

    /// Merging is idempotent: applying the same fields twice yields the
    /// record the first application produced.
    #[test]
    fn merge_is_idempotent(
        existing in proptest::option::of(role_strategy()),
        username in username_strategy(),
        ttl in 0u64..100_000,
    ) {
        let fields = fields_from(&[
            ("username", json!(username)),
            ("ttl", json!(ttl)),
            ("max_ttl", json!(0)),
        ]);

        let once = RoleEntry::merged(existing, &fields).unwrap();
        let twice = RoleEntry::merged(Some(once.clone()), &fields).unwrap();
        prop_assert_eq!(once, twice);
    }
}
