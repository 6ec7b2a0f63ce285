//! Action client and data models for the Hetzner Cloud API.
//!
//! Actions describe asynchronous operations started by other endpoints, such
//! as powering on a server. This crate reads them; waiting for completion is
//! left to the caller.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ActionClient;
pub use models::{Action, ActionError, ActionListOpts, ActionResource, ActionStatus};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
