//! Top-level client wiring the resource clients to one transport.

use std::sync::Arc;

use hcloud_actions::ActionClient;
use hcloud_core::{ApiClient, ApiClientBuilder, ClientConfig, HcloudConfig, Result, Transport};
use hcloud_images::ImageClient;
use hcloud_servers::{ServerClient, ServerTypeClient};
use hcloud_ssh_keys::SshKeyClient;
use tracing::debug;

/// Entry point to every resource of the API.
///
/// Cloning is cheap; all clones share the same connection pool.
#[derive(Clone)]
pub struct Client {
    api: ApiClient,
    servers: ServerClient,
    server_types: ServerTypeClient,
    ssh_keys: SshKeyClient,
    images: ImageClient,
    actions: ActionClient,
}

impl Client {
    /// Create a client for the public API with the given token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::from_config(HcloudConfig::new(token))
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the configuration is invalid.
    pub fn from_config(config: HcloudConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a client with custom HTTP settings or transport.
    #[must_use]
    pub fn builder(config: HcloudConfig) -> ClientBuilder {
        ClientBuilder {
            inner: ApiClient::builder(config),
        }
    }

    /// Wrap an already configured API client.
    #[must_use]
    pub fn from_api_client(api: ApiClient) -> Self {
        Self {
            servers: ServerClient::new(api.clone()),
            server_types: ServerTypeClient::new(api.clone()),
            ssh_keys: SshKeyClient::new(api.clone()),
            images: ImageClient::new(api.clone()),
            actions: ActionClient::new(api.clone()),
            api,
        }
    }

    /// Servers and their lifecycle actions.
    #[must_use]
    pub fn servers(&self) -> &ServerClient {
        &self.servers
    }

    /// Server types.
    #[must_use]
    pub fn server_types(&self) -> &ServerTypeClient {
        &self.server_types
    }

    /// SSH keys.
    #[must_use]
    pub fn ssh_keys(&self) -> &SshKeyClient {
        &self.ssh_keys
    }

    /// Images, snapshots and backups.
    #[must_use]
    pub fn images(&self) -> &ImageClient {
        &self.images
    }

    /// Actions.
    #[must_use]
    pub fn actions(&self) -> &ActionClient {
        &self.actions
    }

    /// The underlying API client, for endpoints without a typed wrapper.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    inner: ApiClientBuilder,
}

impl ClientBuilder {
    /// Override HTTP settings such as timeouts and pooling.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(http_config);
        self
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a config error if the configuration is invalid, or an error if
    /// the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let api = self.inner.build()?;
        debug!(endpoint = %api.endpoint(), "hcloud client ready");
        Ok(Client::from_api_client(api))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcloud_core::id::{ActionId, ServerId, SshKeyId};
    use hcloud_core::Error;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> Client {
        Client::from_config(HcloudConfig::new("secret-token").with_endpoint(server.uri())).unwrap()
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let config = HcloudConfig::new("token").with_endpoint("not a url");
        assert!(matches!(
            Client::from_config(config).err(),
            Some(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn resource_clients_share_the_authenticated_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/actions/13"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": {
                    "id": 13,
                    "command": "start_server",
                    "status": "success",
                    "progress": 100,
                    "started": "2016-01-30T23:50:00+00:00",
                    "finished": "2016-01-30T23:51:00+00:00",
                    "resources": [{"id": 42, "type": "server"}],
                    "error": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/ssh_keys/3"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/servers/42/actions/shutdown"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "action": {
                    "id": 14,
                    "command": "shutdown_server",
                    "status": "running",
                    "progress": 0,
                    "started": "2016-01-30T23:52:00+00:00",
                    "finished": null,
                    "resources": [{"id": 42, "type": "server"}],
                    "error": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let (action, _) = client.actions().get(ActionId::new(13)).await.unwrap();
        assert!(action.unwrap().is_finished());

        client.ssh_keys().delete(SshKeyId::new(3)).await.unwrap();

        let (action, _) = client.servers().shutdown(ServerId::new(42)).await.unwrap();
        assert_eq!(action.id, ActionId::new(14));
    }

    #[tokio::test]
    async fn clones_hit_the_same_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": []})))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let clone = client.clone();
        assert!(client.images().all().await.unwrap().is_empty());
        assert!(clone.images().all().await.unwrap().is_empty());
        assert_eq!(client.api().endpoint(), clone.api().endpoint());
    }
}
