//! Action models shared by every resource that triggers asynchronous work.

use chrono::{DateTime, Utc};
use hcloud_core::id::ActionId;
use hcloud_core::query::{ListOpts, QueryParams};
use hcloud_core::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress state of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Still in progress.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Error,
    /// A status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ActionStatus {
    /// Return the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource affected by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResource {
    /// Resource ID.
    pub id: u64,
    /// Resource type, e.g. `server` or `image`.
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// Error details of a failed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// An asynchronous operation started by the API.
///
/// Returned as a snapshot; the `status` does not update on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action ID.
    pub id: ActionId,
    /// Command that was executed, e.g. `start_server`.
    pub command: String,
    /// Current status.
    pub status: ActionStatus,
    /// Progress in percent.
    #[serde(default)]
    pub progress: u8,
    /// Start time.
    pub started: DateTime<Utc>,
    /// Finish time; absent while running.
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    /// Resources the action relates to.
    #[serde(default)]
    pub resources: Vec<ActionResource>,
    /// Error details when `status` is `error`.
    #[serde(default)]
    pub error: Option<ActionError>,
}

impl Action {
    /// Returns true once the action has finished, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, ActionStatus::Success | ActionStatus::Error)
    }
}

/// Parameters supported by the `/actions` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ActionListOpts {
    /// Pagination and label selector.
    pub list: ListOpts,
    /// Only return actions with one of these statuses.
    pub status: Vec<ActionStatus>,
    /// Sort expression, e.g. `id:desc`.
    pub sort: Vec<String>,
}

impl ActionListOpts {
    /// Convert the parameters into URL query pairs.
    ///
    /// # Errors
    ///
    /// Returns a validation error if pagination values are out of range.
    pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let mut params = QueryParams::new();
        for (key, value) in self.list.to_pairs()? {
            params.push(key, value);
        }
        for status in &self.status {
            params.push("status", status);
        }
        for sort in &self.sort {
            params.push("sort", sort);
        }
        Ok(params.into_pairs())
    }
}
