//! SSH key client and data models for the Hetzner Cloud API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::SshKeyClient;
pub use models::{SshKey, SshKeyCreateOpts, SshKeyListOpts, SshKeyUpdateOpts};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
