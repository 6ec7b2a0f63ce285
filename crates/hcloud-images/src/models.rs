//! Image models.

use chrono::{DateTime, Utc};
use hcloud_core::id::{ImageId, ServerId};
use hcloud_core::query::{ListOpts, QueryParams};
use hcloud_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// Operating system image provided by the platform.
    System,
    /// User-created snapshot.
    Snapshot,
    /// Automatic backup bound to a server.
    Backup,
    /// Application image provided by the platform.
    App,
    /// A type this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ImageType {
    /// Return the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Snapshot => "snapshot",
            Self::Backup => "backup",
            Self::App => "app",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Ready to use.
    Available,
    /// Still being created.
    Creating,
    /// Not usable.
    Unavailable,
    /// A status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ImageStatus {
    /// Return the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Creating => "creating",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server an image was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCreatedFrom {
    /// Server ID.
    pub id: ServerId,
    /// Server name at creation time.
    pub name: String,
}

/// Protection flags of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProtection {
    /// Deletion is blocked.
    #[serde(default)]
    pub delete: bool,
}

/// Representation of an image as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Image ID.
    pub id: ImageId,
    /// Unique name; only set for system and app images.
    #[serde(default)]
    pub name: Option<String>,
    /// Image kind.
    #[serde(rename = "type")]
    pub image_type: ImageType,
    /// Availability.
    pub status: ImageStatus,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Size of the image file in GB.
    #[serde(default)]
    pub image_size: Option<f64>,
    /// Size of the disk contained in the image in GB.
    #[serde(default)]
    pub disk_size: f64,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Source server for snapshots and backups.
    #[serde(default)]
    pub created_from: Option<ImageCreatedFrom>,
    /// Server a backup is bound to.
    #[serde(default)]
    pub bound_to: Option<ServerId>,
    /// Operating system flavor, e.g. `ubuntu`.
    #[serde(default)]
    pub os_flavor: String,
    /// Operating system version.
    #[serde(default)]
    pub os_version: Option<String>,
    /// Whether the image can be deployed quickly.
    #[serde(default)]
    pub rapid_deploy: bool,
    /// Deprecation time, if deprecated.
    #[serde(default)]
    pub deprecated: Option<DateTime<Utc>>,
    /// Protection flags.
    #[serde(default)]
    pub protection: ImageProtection,
    /// User-defined labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Image {
    /// Returns true if the image is marked as deprecated.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }
}

/// Parameters supported by the `/images` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ImageListOpts {
    /// Pagination and label selector.
    pub list: ListOpts,
    /// Filter by image type.
    pub image_type: Vec<ImageType>,
    /// Filter by status.
    pub status: Vec<ImageStatus>,
    /// Filter by the server a backup is bound to.
    pub bound_to: Option<ServerId>,
    /// Include deprecated images.
    pub include_deprecated: Option<bool>,
    /// Filter by name.
    pub name: Option<String>,
    /// Sort expressions.
    pub sort: Vec<String>,
}

impl ImageListOpts {
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
        for image_type in &self.image_type {
            params.push("type", image_type);
        }
        for status in &self.status {
            params.push("status", status);
        }
        params.push_opt("bound_to", self.bound_to);
        params.push_opt("include_deprecated", self.include_deprecated);
        params.push_opt("name", self.name.as_deref());
        for sort in &self.sort {
            params.push("sort", sort);
        }
        Ok(params.into_pairs())
    }
}

/// Parameters for updating an image.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImageUpdateOpts {
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Convert the image; only `snapshot` is accepted.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    /// Replacement labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl ImageUpdateOpts {
    /// Check the options before sending them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unsupported conversion target.
    pub fn check(&self) -> Result<()> {
        match self.image_type {
            None | Some(ImageType::Snapshot) => Ok(()),
            Some(other) => Err(Error::ValidationError(format!(
                "images can only be converted to snapshot, not {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_opts_to_pairs() {
        let opts = ImageListOpts {
            list: ListOpts::new().with_per_page(10),
            image_type: vec![ImageType::System, ImageType::App],
            bound_to: Some(ServerId::new(5)),
            name: Some("ubuntu-22.04".into()),
            ..ImageListOpts::default()
        };

        let pairs = opts.to_pairs().unwrap();
        assert!(pairs.contains(&("per_page", "10".into())));
        assert!(pairs.contains(&("type", "system".into())));
        assert!(pairs.contains(&("type", "app".into())));
        assert!(pairs.contains(&("bound_to", "5".into())));
        assert!(pairs.contains(&("name", "ubuntu-22.04".into())));
        assert!(!pairs.iter().any(|(k, _)| *k == "include_deprecated"));
    }

    #[test]
    fn update_opts_serialize_only_set_fields() {
        let opts = ImageUpdateOpts {
            description: Some("nightly".into()),
            ..ImageUpdateOpts::default()
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"description": "nightly"})
        );
    }

    #[test]
    fn update_opts_reject_non_snapshot_conversion() {
        let opts = ImageUpdateOpts {
            image_type: Some(ImageType::Backup),
            ..ImageUpdateOpts::default()
        };
        assert!(matches!(opts.check(), Err(Error::ValidationError(_))));

        let opts = ImageUpdateOpts {
            image_type: Some(ImageType::Snapshot),
            ..ImageUpdateOpts::default()
        };
        assert!(opts.check().is_ok());
    }
}
