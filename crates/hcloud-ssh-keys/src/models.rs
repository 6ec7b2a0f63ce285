//! SSH key models.

use chrono::{DateTime, Utc};
use hcloud_core::id::SshKeyId;
use hcloud_core::query::{ListOpts, QueryParams};
use hcloud_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Representation of an SSH key as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    /// SSH key ID.
    pub id: SshKeyId,
    /// Unique name.
    pub name: String,
    /// MD5 fingerprint of the public key.
    pub fingerprint: String,
    /// Public key in OpenSSH format.
    pub public_key: String,
    /// User-defined labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Parameters supported by the `/ssh_keys` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct SshKeyListOpts {
    /// Pagination and label selector.
    pub list: ListOpts,
    /// Filter by name.
    pub name: Option<String>,
    /// Filter by fingerprint.
    pub fingerprint: Option<String>,
}

impl SshKeyListOpts {
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
        params.push_opt("fingerprint", self.fingerprint.as_deref());
        Ok(params.into_pairs())
    }
}

/// Parameters for creating an SSH key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct SshKeyCreateOpts {
    /// Unique name.
    #[validate(length(min = 1, message = "missing name"))]
    pub name: String,
    /// Public key in OpenSSH format.
    #[validate(length(min = 1, message = "missing public key"))]
    pub public_key: String,
    /// User-defined labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl SshKeyCreateOpts {
    /// Create options with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into(),
            labels: None,
        }
    }

    /// Attach labels.
    #[must_use]
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }
}

/// Parameters for updating an SSH key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct SshKeyUpdateOpts {
    /// New name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_opts_require_name_and_public_key() {
        assert!(SshKeyCreateOpts::new("", "ssh-ed25519 AAAA").validate().is_err());
        assert!(SshKeyCreateOpts::new("laptop", "").validate().is_err());
        assert!(SshKeyCreateOpts::new("laptop", "ssh-ed25519 AAAA")
            .validate()
            .is_ok());
    }

    #[test]
    fn create_opts_body_shape() {
        let mut labels = HashMap::new();
        labels.insert("team".to_string(), "infra".to_string());
        let opts = SshKeyCreateOpts::new("laptop", "ssh-ed25519 AAAA").with_labels(labels);

        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"name": "laptop", "public_key": "ssh-ed25519 AAAA", "labels": {"team": "infra"}})
        );
    }

    #[test]
    fn update_opts_reject_empty_name() {
        let opts = SshKeyUpdateOpts {
            name: Some(String::new()),
            labels: None,
        };
        assert!(opts.validate().is_err());
        assert!(SshKeyUpdateOpts::default().validate().is_ok());
    }

    #[test]
    fn list_opts_to_pairs() {
        let opts = SshKeyListOpts {
            fingerprint: Some("b7:2f:30".into()),
            ..SshKeyListOpts::default()
        };
        assert_eq!(
            opts.to_pairs().unwrap(),
            vec![("fingerprint", "b7:2f:30".to_string())]
        );
    }
}
