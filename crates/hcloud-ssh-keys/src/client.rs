//! Asynchronous client for the `/ssh_keys` endpoints.

use crate::models::{SshKey, SshKeyCreateOpts, SshKeyListOpts, SshKeyUpdateOpts};
use hcloud_core::id::SshKeyId;
use hcloud_core::{fetch_all_pages, ApiClient, ListOpts, Response, Result};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize)]
struct SshKeyGetResponse {
    ssh_key: SshKey,
}

#[derive(Debug, Deserialize)]
struct SshKeyListResponse {
    ssh_keys: Vec<SshKey>,
}

/// Client for managing SSH keys.
#[derive(Clone)]
pub struct SshKeyClient {
    inner: ApiClient,
}

impl SshKeyClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Fetch an SSH key; `None` if it does not exist.
    pub async fn get(&self, id: SshKeyId) -> Result<(Option<SshKey>, Response)> {
        let path = format!("ssh_keys/{id}");
        let (body, response) = self.inner.get_optional::<SshKeyGetResponse>(&path).await?;
        Ok((body.map(|body| body.ssh_key), response))
    }

    /// Fetch an SSH key by name; `None` if no key has that name.
    pub async fn get_by_name(&self, name: &str) -> Result<(Option<SshKey>, Response)> {
        let opts = SshKeyListOpts {
            name: Some(name.to_string()),
            ..SshKeyListOpts::default()
        };
        let (keys, response) = self.list(&opts).await?;
        Ok((keys.into_iter().next(), response))
    }

    /// Fetch an SSH key by fingerprint; `None` if no key matches.
    pub async fn get_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<(Option<SshKey>, Response)> {
        let opts = SshKeyListOpts {
            fingerprint: Some(fingerprint.to_string()),
            ..SshKeyListOpts::default()
        };
        let (keys, response) = self.list(&opts).await?;
        Ok((keys.into_iter().next(), response))
    }

    /// List one page of SSH keys.
    pub async fn list(&self, opts: &SshKeyListOpts) -> Result<(Vec<SshKey>, Response)> {
        let params = opts.to_pairs()?;
        let (body, response) = self
            .inner
            .get::<SshKeyListResponse>("ssh_keys", &params)
            .await?;
        Ok((body.ssh_keys, response))
    }

    /// Fetch every SSH key.
    pub async fn all(&self) -> Result<Vec<SshKey>> {
        self.all_with_opts(&SshKeyListOpts::default()).await
    }

    /// Fetch every SSH key matching the filters.
    pub async fn all_with_opts(&self, opts: &SshKeyListOpts) -> Result<Vec<SshKey>> {
        fetch_all_pages(opts.list.clone(), |list: ListOpts| {
            let opts = SshKeyListOpts {
                list,
                ..opts.clone()
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    /// Create an SSH key.
    ///
    /// Missing name or public key fails locally without contacting the API.
    pub async fn create(&self, opts: &SshKeyCreateOpts) -> Result<(SshKey, Response)> {
        opts.validate()?;
        let (body, response) = self
            .inner
            .post::<_, SshKeyGetResponse>("ssh_keys", Some(opts))
            .await?;
        info!(ssh_key = %body.ssh_key.id, name = %body.ssh_key.name, "created SSH key");
        Ok((body.ssh_key, response))
    }

    /// Update name or labels of an SSH key.
    pub async fn update(
        &self,
        id: SshKeyId,
        opts: &SshKeyUpdateOpts,
    ) -> Result<(SshKey, Response)> {
        opts.validate()?;
        let path = format!("ssh_keys/{id}");
        let (body, response) = self
            .inner
            .put::<_, SshKeyGetResponse>(&path, opts)
            .await?;
        Ok((body.ssh_key, response))
    }

    /// Delete an SSH key.
    pub async fn delete(&self, id: SshKeyId) -> Result<Response> {
        let path = format!("ssh_keys/{id}");
        let response = self.inner.delete(&path).await?;
        info!(ssh_key = %id, "deleted SSH key");
        Ok(response)
    }
}
