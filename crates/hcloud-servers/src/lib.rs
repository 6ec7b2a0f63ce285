//! Server client and data models for the Hetzner Cloud API.
//!
//! [`ServerClient`] covers the server lifecycle: create, inspect, update,
//! delete and the power actions. [`ServerTypeClient`] looks up the hardware
//! profiles servers are created with.
//!
//! # Example
//!
//! ```no_run
//! use hcloud_core::ApiClient;
//! use hcloud_servers::{ServerClient, ServerCreateOpts};
//!
//! # async fn example() -> hcloud_core::Result<()> {
//! let client = ServerClient::new(ApiClient::new("my-token")?);
//!
//! let opts = ServerCreateOpts::new("web-1", "cx22", "ubuntu-24.04").with_location("fsn1");
//! let (created, _) = client.create(&opts).await?;
//! println!("created {} ({})", created.server.name, created.server.id);
//!
//! let (action, _) = client.reboot(created.server.id).await?;
//! println!("reboot action {} is {}", action.id, action.status);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod server_types;

pub use client::ServerClient;
pub use models::{
    Datacenter, IdOrName, Location, Server, ServerCreateImageOpts, ServerCreateImageResult,
    ServerCreateOpts, ServerCreateResult, ServerListOpts, ServerProtection, ServerPublicNet,
    ServerPublicNetIpv4, ServerPublicNetIpv6, ServerPublicNetIpv6DnsPtr,
    ServerResetPasswordResult, ServerStatus, ServerType, ServerUpdateOpts,
};
pub use server_types::{ServerTypeClient, ServerTypeListOpts};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
