//! Response metadata returned alongside every decoded API payload.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Pagination block found in `meta.pagination` of list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number.
    pub page: u32,
    /// Entries per page.
    pub per_page: u32,
    /// Previous page, if any.
    #[serde(default)]
    pub previous_page: Option<u32>,
    /// Next page, if any.
    #[serde(default)]
    pub next_page: Option<u32>,
    /// Last page; absent when the total is unknown.
    #[serde(default)]
    pub last_page: Option<u32>,
    /// Total number of entries; absent when unknown.
    #[serde(default)]
    pub total_entries: Option<u64>,
}

impl Pagination {
    /// Returns true when no further page needs to be fetched.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        match self.last_page {
            Some(last) => self.page >= last,
            None => self.next_page.is_none(),
        }
    }
}

/// The `meta` object of a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Pagination info, present on list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetaEnvelope {
    #[serde(default)]
    pub(crate) meta: Meta,
}

/// Raw HTTP outcome of a call: status, headers and parsed metadata.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed body metadata.
    pub meta: Meta,
}

impl Response {
    /// Create a response without metadata.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            meta: Meta::default(),
        }
    }

    /// Attach parsed metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Shortcut to the pagination block.
    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.meta.pagination.as_ref()
    }
}
