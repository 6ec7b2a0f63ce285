//! Async client for the Hetzner Cloud API.
//!
//! [`Client`] bundles the resource clients for servers, server types, SSH
//! keys, images and actions behind one authenticated connection pool.
//!
//! # Example
//!
//! ```no_run
//! use hcloud::{Client, HcloudConfig, ListOpts, ServerListOpts};
//!
//! # async fn example() -> hcloud::Result<()> {
//! let client = Client::from_config(HcloudConfig::from_env()?)?;
//!
//! // One page
//! let opts = ServerListOpts {
//!     list: ListOpts::new().with_per_page(10),
//!     ..ServerListOpts::default()
//! };
//! let (servers, response) = client.servers().list(&opts).await?;
//! println!("{} servers on page {:?}", servers.len(), response.pagination().map(|p| p.page));
//!
//! // Every page
//! for key in client.ssh_keys().all().await? {
//!     println!("{} {}", key.name, key.fingerprint);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

mod client;

pub use client::{Client, ClientBuilder};

pub use hcloud_actions::{Action, ActionClient, ActionListOpts, ActionStatus};
pub use hcloud_core::{
    ApiClient, ApiError, ClientConfig, Error, ErrorCode, HcloudConfig, ListOpts, Meta,
    Pagination, Response, Result, Transport,
};
pub use hcloud_images::{Image, ImageClient, ImageListOpts, ImageType, ImageUpdateOpts};
pub use hcloud_servers::{
    IdOrName, Server, ServerClient, ServerCreateImageOpts, ServerCreateImageResult,
    ServerCreateOpts, ServerCreateResult, ServerListOpts, ServerResetPasswordResult,
    ServerStatus, ServerType, ServerTypeClient, ServerTypeListOpts, ServerUpdateOpts,
};
pub use hcloud_ssh_keys::{SshKey, SshKeyClient, SshKeyCreateOpts, SshKeyListOpts, SshKeyUpdateOpts};

/// Typed resource IDs.
pub mod id {
    pub use hcloud_core::id::*;
}
