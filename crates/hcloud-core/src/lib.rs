//! # hcloud-core
//!
//! Core types and utilities for working with the Hetzner Cloud API.
//!
//! This crate provides the pieces every resource client builds on: the
//! authenticated JSON transport, the error taxonomy, pagination handling and
//! strongly-typed resource IDs.
//!
//! ## Modules
//!
//! - [`client`] - HTTP transport, request building and error mapping
//! - [`config`] - Endpoint, token and timeout configuration
//! - [`error`] - Error types and provider error codes
//! - [`id`] - Strongly-typed integer IDs for resources
//! - [`pagination`] - Fetch-every-page aggregation
//! - [`query`] - Query parameter encoding and list options
//! - [`response`] - Response metadata and pagination info

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod pagination;
pub mod query;
pub mod response;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, ClientConfig, Transport};
pub use config::HcloudConfig;
pub use error::{ApiError, Error, ErrorCode, Result};
pub use pagination::fetch_all_pages;
pub use query::{ListOpts, QueryParams};
pub use response::{Meta, Pagination, Response};
