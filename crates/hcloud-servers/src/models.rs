//! Server and server type models.
//!
//! Read models mirror the API representation. Create and update options are
//! validated locally before they are sent.

use chrono::{DateTime, Utc};
use hcloud_actions::Action;
use hcloud_core::id::{
    DatacenterId, ImageId, LocationId, ServerId, ServerTypeId, SshKeyId,
};
use hcloud_core::query::{ListOpts, QueryParams};
use hcloud_core::{Error, Result};
use hcloud_images::{Image, ImageType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;
use validator::Validate;

/// Server power and provisioning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Server is being provisioned
    Initializing,
    /// Server is booting
    Starting,
    /// Server is running
    Running,
    /// Server is shutting down
    Stopping,
    /// Server is powered off
    Off,
    /// Server is being deleted
    Deleting,
    /// Server is being migrated to another host
    Migrating,
    /// Server is being rebuilt from an image
    Rebuilding,
    /// State not known to this crate
    #[serde(other)]
    Unknown,
}

impl ServerStatus {
    /// Wire representation, as used in the `status` list filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Off => "off",
            Self::Deleting => "deleting",
            Self::Migrating => "migrating",
            Self::Rebuilding => "rebuilding",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware profile a server runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerType {
    /// Server type ID.
    pub id: ServerTypeId,
    /// Short name, e.g. `cx22`.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Number of virtual cores.
    pub cores: u32,
    /// Memory in GB.
    pub memory: f64,
    /// Disk size in GB.
    pub disk: f64,
    /// `local` or `network`.
    #[serde(default)]
    pub storage_type: String,
    /// `shared` or `dedicated`.
    #[serde(default)]
    pub cpu_type: String,
    /// CPU architecture, `x86` or `arm`.
    #[serde(default)]
    pub architecture: Option<String>,
    /// Whether the type is deprecated.
    #[serde(default)]
    pub deprecated: Option<bool>,
}

/// Physical location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location ID.
    pub id: LocationId,
    /// Short name, e.g. `fsn1`.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country: String,
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Latitude of the city.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude of the city.
    #[serde(default)]
    pub longitude: f64,
    /// Network zone, e.g. `eu-central`.
    #[serde(default)]
    pub network_zone: String,
}

/// Datacenter a server is placed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datacenter {
    /// Datacenter ID.
    pub id: DatacenterId,
    /// Short name, e.g. `fsn1-dc14`.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Location of the datacenter.
    pub location: Location,
}

/// Public IPv4 address of a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPublicNetIpv4 {
    /// Address.
    pub ip: Ipv4Addr,
    /// Whether the address is blocked.
    #[serde(default)]
    pub blocked: bool,
    /// Reverse DNS entry.
    #[serde(default)]
    pub dns_ptr: Option<String>,
}

/// Reverse DNS entry for one address of an IPv6 network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPublicNetIpv6DnsPtr {
    /// Address inside the network.
    pub ip: String,
    /// Hostname.
    pub dns_ptr: String,
}

/// Public IPv6 network of a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPublicNetIpv6 {
    /// Network in CIDR notation.
    pub ip: String,
    /// Whether the network is blocked.
    #[serde(default)]
    pub blocked: bool,
    /// Reverse DNS entries.
    #[serde(default)]
    pub dns_ptr: Vec<ServerPublicNetIpv6DnsPtr>,
}

/// Public network configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPublicNet {
    /// Primary IPv4 address.
    #[serde(default)]
    pub ipv4: Option<ServerPublicNetIpv4>,
    /// Primary IPv6 network.
    #[serde(default)]
    pub ipv6: Option<ServerPublicNetIpv6>,
    /// IDs of floating IPs assigned to the server.
    #[serde(default)]
    pub floating_ips: Vec<u64>,
}

/// Protection flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProtection {
    /// Server cannot be deleted.
    #[serde(default)]
    pub delete: bool,
    /// Server cannot be rebuilt.
    #[serde(default)]
    pub rebuild: bool,
}

/// Representation of a server as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Server ID.
    pub id: ServerId,
    /// Unique name.
    pub name: String,
    /// Current state.
    pub status: ServerStatus,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Public network configuration.
    #[serde(default)]
    pub public_net: ServerPublicNet,
    /// Hardware profile.
    pub server_type: ServerType,
    /// Placement.
    pub datacenter: Datacenter,
    /// Image the server was created from; absent once the image is deleted.
    #[serde(default)]
    pub image: Option<Image>,
    /// Whether the server boots into the rescue system.
    #[serde(default)]
    pub rescue_enabled: bool,
    /// Whether the server is locked by a running action.
    #[serde(default)]
    pub locked: bool,
    /// Backup window, if backups are enabled.
    #[serde(default)]
    pub backup_window: Option<String>,
    /// Outbound traffic for the current billing period in bytes.
    #[serde(default)]
    pub outgoing_traffic: Option<u64>,
    /// Inbound traffic for the current billing period in bytes.
    #[serde(default)]
    pub ingoing_traffic: Option<u64>,
    /// Free traffic for the current billing period in bytes.
    #[serde(default)]
    pub included_traffic: u64,
    /// Protection flags.
    #[serde(default)]
    pub protection: ServerProtection,
    /// User-defined labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Server {
    /// Returns true if the server is powered on.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == ServerStatus::Running
    }

    /// Primary public IPv4 address, if any.
    #[must_use]
    pub fn public_ipv4(&self) -> Option<Ipv4Addr> {
        self.public_net.ipv4.as_ref().map(|net| net.ip)
    }
}

/// Reference to another resource by ID or by name.
///
/// Serialized as a bare number or string, which is how the API accepts
/// server types, images, SSH keys, locations and datacenters on create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdOrName {
    /// Numeric ID.
    Id(u64),
    /// Unique name.
    Name(String),
}

impl From<&str> for IdOrName {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IdOrName {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

macro_rules! id_or_name_from {
    ($($id:ty),*) => {
        $(
            impl From<$id> for IdOrName {
                fn from(id: $id) -> Self {
                    Self::Id(id.get())
                }
            }
        )*
    };
}

id_or_name_from!(ServerTypeId, ImageId, SshKeyId, LocationId, DatacenterId);

/// Parameters supported by the `/servers` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ServerListOpts {
    /// Pagination and label selector.
    pub list: ListOpts,
    /// Filter by name.
    pub name: Option<String>,
    /// Filter by state; may be repeated.
    pub status: Vec<ServerStatus>,
    /// Sort keys such as `id:asc` or `created:desc`.
    pub sort: Vec<String>,
}

impl ServerListOpts {
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
        params.push_opt("name", self.name.as_deref());
        for status in &self.status {
            params.push("status", status);
        }
        for sort in &self.sort {
            params.push("sort", sort);
        }
        Ok(params.into_pairs())
    }
}

/// Parameters for creating a server.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct ServerCreateOpts {
    /// Unique name, also used as hostname.
    #[validate(length(min = 1, message = "missing name"))]
    pub name: String,
    /// Server type by ID or name.
    #[validate(required(message = "missing server type"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<IdOrName>,
    /// Image by ID or name.
    #[validate(required(message = "missing image"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<IdOrName>,
    /// SSH keys injected into the server.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<IdOrName>,
    /// Location; mutually exclusive with `datacenter`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<IdOrName>,
    /// Datacenter; mutually exclusive with `location`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<IdOrName>,
    /// Cloud-init user data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Start the server once it is created. The API defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after_create: Option<bool>,
    /// User-defined labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl ServerCreateOpts {
    /// Create options with the required fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        server_type: impl Into<IdOrName>,
        image: impl Into<IdOrName>,
    ) -> Self {
        Self {
            name: name.into(),
            server_type: Some(server_type.into()),
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// Add an SSH key.
    #[must_use]
    pub fn with_ssh_key(mut self, key: impl Into<IdOrName>) -> Self {
        self.ssh_keys.push(key.into());
        self
    }

    /// Place the server in a location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<IdOrName>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Place the server in a datacenter.
    #[must_use]
    pub fn with_datacenter(mut self, datacenter: impl Into<IdOrName>) -> Self {
        self.datacenter = Some(datacenter.into());
        self
    }

    /// Attach cloud-init user data.
    #[must_use]
    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }

    /// Control whether the server starts after creation.
    #[must_use]
    pub fn with_start_after_create(mut self, start: bool) -> Self {
        self.start_after_create = Some(start);
        self
    }

    /// Attach labels.
    #[must_use]
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Validate required fields and placement.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is missing or both
    /// location and datacenter are set.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.location.is_some() && self.datacenter.is_some() {
            return Err(Error::ValidationError(
                "location and datacenter are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a server create call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerCreateResult {
    /// The new server.
    pub server: Server,
    /// Action tracking the creation.
    #[serde(default)]
    pub action: Option<Action>,
    /// Follow-up actions, such as the initial power on.
    #[serde(default)]
    pub next_actions: Vec<Action>,
    /// Generated root password; absent when SSH keys were supplied.
    #[serde(default)]
    pub root_password: Option<String>,
}

/// Parameters for updating a server.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct ServerUpdateOpts {
    /// New name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Outcome of a root password reset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerResetPasswordResult {
    /// Action tracking the reset.
    pub action: Action,
    /// The new root password.
    pub root_password: String,
}

/// Parameters for creating an image from a server.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ServerCreateImageOpts {
    /// `snapshot` (default) or `backup`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    /// Description of the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-defined labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl ServerCreateImageOpts {
    /// Reject image types the API cannot create from a server.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any type other than snapshot or backup.
    pub fn check(&self) -> Result<()> {
        match self.image_type {
            None | Some(ImageType::Snapshot | ImageType::Backup) => Ok(()),
            Some(other) => Err(Error::ValidationError(format!(
                "invalid image type: {other}"
            ))),
        }
    }
}

/// Outcome of creating an image from a server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerCreateImageResult {
    /// The image being created.
    pub image: Image,
    /// Action tracking the image creation.
    pub action: Action,
}
