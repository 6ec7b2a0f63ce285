//! Configuration structures for Hetzner Cloud clients.
//!
//! [`HcloudConfig`] holds what identifies a client against the API: the
//! endpoint, the bearer token and the request timeout. It can be built in
//! code, deserialized from a config file, or read from the environment.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hetzner.cloud/v1";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "HCLOUD_TOKEN";

/// Environment variable overriding the API endpoint.
pub const ENDPOINT_ENV: &str = "HCLOUD_ENDPOINT";

/// Configuration for a Hetzner Cloud client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HcloudConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API token sent as a bearer token
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "deserialize_token"
    )]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Application name appended to the User-Agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    /// Application version appended to the User-Agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_version: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl HcloudConfig {
    /// Create a configuration for the default endpoint with the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// Read the configuration from `HCLOUD_TOKEN` and `HCLOUD_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or the endpoint is invalid.
    pub fn from_env() -> Result<Self, Error> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| Error::ConfigError(format!("{TOKEN_ENV} is not set")))?;

        let mut config = Self::new(token);
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config = config.with_endpoint(endpoint);
        }

        config.check()?;
        Ok(config)
    }

    /// Set the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Identify the calling application in the User-Agent header.
    #[must_use]
    pub fn with_application(
        mut self,
        name: impl Into<String>,
        version: Option<impl Into<String>>,
    ) -> Self {
        self.application_name = Some(name.into());
        self.application_version = version.map(Into::into);
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the invalid fields.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Expose the token for building the Authorization header.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret())
    }

    /// Build the User-Agent suffix for the configured application, if any.
    #[must_use]
    pub fn application_suffix(&self) -> Option<String> {
        let name = self.application_name.as_deref()?;
        Some(match self.application_version.as_deref() {
            Some(version) => format!("{name}/{version}"),
            None => name.to_string(),
        })
    }

    /// Parse and validate the endpoint URL.
    ///
    /// A trailing slash is ensured so relative paths join below the API prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        let mut endpoint = self.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Url::parse(&endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")))
    }
}

impl Default for HcloudConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            application_name: None,
            application_version: None,
        }
    }
}
