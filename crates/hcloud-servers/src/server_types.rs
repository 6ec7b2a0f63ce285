//! Read-only client for the `/server_types` endpoints.

use crate::models::ServerType;
use hcloud_core::id::ServerTypeId;
use hcloud_core::{fetch_all_pages, ApiClient, ListOpts, QueryParams, Response, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ServerTypeGetResponse {
    server_type: ServerType,
}

#[derive(Debug, Deserialize)]
struct ServerTypeListResponse {
    server_types: Vec<ServerType>,
}

/// Parameters supported by the `/server_types` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ServerTypeListOpts {
    /// Pagination.
    pub list: ListOpts,
    /// Filter by name.
    pub name: Option<String>,
}

impl ServerTypeListOpts {
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
        Ok(params.into_pairs())
    }
}

/// Client for looking up server types.
#[derive(Clone)]
pub struct ServerTypeClient {
    inner: ApiClient,
}

impl ServerTypeClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Fetch a server type; `None` if it does not exist.
    pub async fn get(&self, id: ServerTypeId) -> Result<(Option<ServerType>, Response)> {
        let path = format!("server_types/{id}");
        let (body, response) = self
            .inner
            .get_optional::<ServerTypeGetResponse>(&path)
            .await?;
        Ok((body.map(|body| body.server_type), response))
    }

    /// Fetch a server type by name, e.g. `cx22`.
    pub async fn get_by_name(&self, name: &str) -> Result<(Option<ServerType>, Response)> {
        let opts = ServerTypeListOpts {
            name: Some(name.to_string()),
            ..ServerTypeListOpts::default()
        };
        let (types, response) = self.list(&opts).await?;
        Ok((types.into_iter().next(), response))
    }

    /// List one page of server types.
    pub async fn list(&self, opts: &ServerTypeListOpts) -> Result<(Vec<ServerType>, Response)> {
        let params = opts.to_pairs()?;
        let (body, response) = self
            .inner
            .get::<ServerTypeListResponse>("server_types", &params)
            .await?;
        Ok((body.server_types, response))
    }

    /// Fetch every server type.
    pub async fn all(&self) -> Result<Vec<ServerType>> {
        fetch_all_pages(ListOpts::default(), |list: ListOpts| {
            let opts = ServerTypeListOpts { list, name: None };
            async move { self.list(&opts).await }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcloud_core::HcloudConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ServerTypeClient {
        let config = HcloudConfig::new("token").with_endpoint(server.uri());
        ServerTypeClient::new(ApiClient::builder(config).build().unwrap())
    }

    fn server_type_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": name.to_uppercase(),
            "cores": 2,
            "memory": 4.0,
            "disk": 40,
            "storage_type": "local",
            "cpu_type": "shared",
            "architecture": "x86",
            "deprecated": false
        })
    }

    #[tokio::test]
    async fn get_server_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server_types/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server_type": server_type_json(1, "cx22")
            })))
            .mount(&server)
            .await;

        let (server_type, _) = test_client(&server)
            .get(ServerTypeId::new(1))
            .await
            .unwrap();
        let server_type = server_type.unwrap();
        assert_eq!(server_type.name, "cx22");
        assert_eq!(server_type.cores, 2);
    }

    #[tokio::test]
    async fn get_server_type_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server_types"))
            .and(query_param("name", "cax11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server_types": [server_type_json(45, "cax11")]
            })))
            .mount(&server)
            .await;

        let (server_type, _) = test_client(&server).get_by_name("cax11").await.unwrap();
        assert_eq!(server_type.map(|t| t.id), Some(ServerTypeId::new(45)));
    }

    #[tokio::test]
    async fn all_server_types_without_pagination_meta() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server_types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server_types": [server_type_json(1, "cx22"), server_type_json(2, "cx32")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let types = test_client(&server).all().await.unwrap();
        assert_eq!(types.len(), 2);
    }
}
