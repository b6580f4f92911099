//! HTTP client for the Roastery identity API.
//!
//! Provides sign-in (mint a user token) and sign-out (invalidate a
//! token) against a Roastery deployment, with credential redaction and
//! retryability classification on errors.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::RoasteryClient;
pub use config::Credentials;
pub use error::{ClientError, ClientResult};
pub use types::UserToken;
