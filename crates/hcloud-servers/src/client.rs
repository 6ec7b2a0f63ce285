//! Asynchronous client for the `/servers` endpoints.

use crate::models::{
    Server, ServerCreateImageOpts, ServerCreateImageResult, ServerCreateOpts, ServerCreateResult,
    ServerListOpts, ServerResetPasswordResult, ServerUpdateOpts,
};
use hcloud_actions::Action;
use hcloud_core::id::ServerId;
use hcloud_core::{fetch_all_pages, ApiClient, ListOpts, Response, Result};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize)]
struct ServerGetResponse {
    server: Server,
}

#[derive(Debug, Deserialize)]
struct ServerListResponse {
    servers: Vec<Server>,
}

#[derive(Debug, Deserialize)]
struct ServerActionResponse {
    action: Action,
}

/// Client for managing servers and running their lifecycle actions.
#[derive(Clone)]
pub struct ServerClient {
    inner: ApiClient,
}

impl ServerClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Fetch a server; `None` if it does not exist.
    pub async fn get(&self, id: ServerId) -> Result<(Option<Server>, Response)> {
        let path = format!("servers/{id}");
        let (body, response) = self.inner.get_optional::<ServerGetResponse>(&path).await?;
        Ok((body.map(|body| body.server), response))
    }

    /// Fetch a server by name; `None` if no server has that name.
    pub async fn get_by_name(&self, name: &str) -> Result<(Option<Server>, Response)> {
        let opts = ServerListOpts {
            name: Some(name.to_string()),
            ..ServerListOpts::default()
        };
        let (servers, response) = self.list(&opts).await?;
        Ok((servers.into_iter().next(), response))
    }

    /// List one page of servers.
    pub async fn list(&self, opts: &ServerListOpts) -> Result<(Vec<Server>, Response)> {
        let params = opts.to_pairs()?;
        let (body, response) = self
            .inner
            .get::<ServerListResponse>("servers", &params)
            .await?;
        Ok((body.servers, response))
    }

    /// Fetch every server.
    pub async fn all(&self) -> Result<Vec<Server>> {
        self.all_with_opts(&ServerListOpts::default()).await
    }

    /// Fetch every server matching the filters.
    pub async fn all_with_opts(&self, opts: &ServerListOpts) -> Result<Vec<Server>> {
        fetch_all_pages(opts.list.clone(), |list: ListOpts| {
            let opts = ServerListOpts {
                list,
                ..opts.clone()
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    /// Create a server.
    ///
    /// Missing name, server type or image fails locally without contacting
    /// the API.
    pub async fn create(&self, opts: &ServerCreateOpts) -> Result<(ServerCreateResult, Response)> {
        opts.check()?;
        let (result, response) = self
            .inner
            .post::<_, ServerCreateResult>("servers", Some(opts))
            .await?;
        info!(server = %result.server.id, name = %result.server.name, "created server");
        Ok((result, response))
    }

    /// Update name or labels of a server.
    pub async fn update(
        &self,
        id: ServerId,
        opts: &ServerUpdateOpts,
    ) -> Result<(Server, Response)> {
        opts.validate()?;
        let path = format!("servers/{id}");
        let (body, response) = self
            .inner
            .put::<_, ServerGetResponse>(&path, opts)
            .await?;
        Ok((body.server, response))
    }

    /// Delete a server.
    pub async fn delete(&self, id: ServerId) -> Result<Response> {
        let path = format!("servers/{id}");
        let response = self.inner.delete(&path).await?;
        info!(server = %id, "deleted server");
        Ok(response)
    }

    /// Power a server on.
    pub async fn poweron(&self, id: ServerId) -> Result<(Action, Response)> {
        self.action(id, "poweron").await
    }

    /// Cut power to a server, like pulling the plug.
    pub async fn poweroff(&self, id: ServerId) -> Result<(Action, Response)> {
        self.action(id, "poweroff").await
    }

    /// Send an ACPI reboot request.
    pub async fn reboot(&self, id: ServerId) -> Result<(Action, Response)> {
        self.action(id, "reboot").await
    }

    /// Hard reset a server.
    pub async fn reset(&self, id: ServerId) -> Result<(Action, Response)> {
        self.action(id, "reset").await
    }

    /// Send an ACPI shutdown request.
    pub async fn shutdown(&self, id: ServerId) -> Result<(Action, Response)> {
        self.action(id, "shutdown").await
    }

    /// Reset the root password. The server must be running.
    pub async fn reset_password(
        &self,
        id: ServerId,
    ) -> Result<(ServerResetPasswordResult, Response)> {
        let path = format!("servers/{id}/actions/reset_password");
        let (result, response) = self
            .inner
            .post::<(), ServerResetPasswordResult>(&path, None)
            .await?;
        info!(server = %id, action = %result.action.id, "requested root password reset");
        Ok((result, response))
    }

    /// Create a snapshot or backup image from a server.
    pub async fn create_image(
        &self,
        id: ServerId,
        opts: Option<&ServerCreateImageOpts>,
    ) -> Result<(ServerCreateImageResult, Response)> {
        if let Some(opts) = opts {
            opts.check()?;
        }
        let path = format!("servers/{id}/actions/create_image");
        let (result, response) = self
            .inner
            .post::<_, ServerCreateImageResult>(&path, opts)
            .await?;
        info!(server = %id, image = %result.image.id, "requested image creation");
        Ok((result, response))
    }

    async fn action(&self, id: ServerId, name: &str) -> Result<(Action, Response)> {
        let path = format!("servers/{id}/actions/{name}");
        let (body, response) = self
            .inner
            .post::<(), ServerActionResponse>(&path, None)
            .await?;
        info!(server = %id, action = %body.action.id, command = name, "requested server action");
        Ok((body.action, response))
    }
}
