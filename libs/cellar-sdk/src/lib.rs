//! Host-side contracts for Cellar secrets plugins.
//!
//! This crate provides the narrow interfaces a secrets plugin needs from
//! the Cellar host platform:
//! - A durable key-value storage abstraction with JSON entry helpers
//! - An in-memory storage implementation for tests and local development
//! - The lease descriptor the host tracks for issued secrets
//! - Typed request, response, and field envelopes produced by the host's
//!   schema/dispatch layer
//! - The `SecretsPlugin` trait the host invokes against a mount

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod lease;
pub mod plugin;
pub mod request;
pub mod storage;

pub use error::StorageError;
pub use lease::Lease;
pub use plugin::{PluginError, SecretsPlugin};
pub use request::{FieldData, FieldError, Operation, Request, Response};
pub use storage::{MemoryStorage, Storage, StorageEntry};
