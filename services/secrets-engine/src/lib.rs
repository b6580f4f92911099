//! Roastery credential-issuance engine for the Cellar secrets host.
//!
//! The engine stores Roastery connection parameters and named roles,
//! mints short-lived Roastery user tokens bound to host-managed leases,
//! and services the host's revoke/renew callbacks. Durability, lease
//! expiry, and request routing belong to the host; this crate is purely
//! reactive behind the [`cellar_sdk::SecretsPlugin`] contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod creds;
pub mod error;
pub mod roles;
pub mod token;

pub use backend::RoasteryBackend;
pub use config::ConnectionConfig;
pub use creds::USER_TOKEN_TYPE;
pub use error::{EngineError, EngineResult};
pub use roles::RoleEntry;
