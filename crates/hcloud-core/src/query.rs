//! Query parameter encoding and shared list options.
//!
//! [`QueryParams`] collects URL query pairs from optional values, and
//! [`ListOpts`] carries the pagination and label-selector parameters that
//! every list endpoint accepts.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use validator::Validate;

use crate::error::Result;

/// Largest page size accepted by the API.
pub const MAX_PER_PAGE: u32 = 50;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append the shared list options.
    pub fn push_list_opts(&mut self, opts: &ListOpts) {
        self.push_opt("page", opts.page);
        self.push_opt("per_page", opts.per_page);
        self.push_opt("label_selector", opts.label_selector.as_deref());
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pagination and filtering options shared by all list endpoints.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListOpts {
    /// Page to fetch, starting at 1.
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Entries per page.
    #[validate(range(min = 1, max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Label selector expression, e.g. `env=prod,!legacy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
}

impl ListOpts {
    /// Create empty list options (server-side defaults apply).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page: None,
            per_page: None,
            label_selector: None,
        }
    }

    /// Set the page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the label selector.
    #[must_use]
    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    /// Validate and convert into URL query pairs.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `page` or `per_page` is out of range.
    pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        self.validate()?;
        let mut params = QueryParams::new();
        params.push_list_opts(self);
        Ok(params.into_pairs())
    }
}
