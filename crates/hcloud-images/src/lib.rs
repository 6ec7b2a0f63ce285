//! Image client and data models for the Hetzner Cloud API.
//!
//! Covers system images, snapshots and backups. Snapshots are created from a
//! server; see the server client's `create_image` action.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ImageClient;
pub use models::{
    Image, ImageCreatedFrom, ImageListOpts, ImageProtection, ImageStatus, ImageType,
    ImageUpdateOpts,
};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
