//! HTTP transport for the Hetzner Cloud API.
//!
//! [`ApiClient`] turns a method, a relative path, query pairs and an optional
//! JSON body into an authenticated request, hands it to a [`Transport`], and
//! maps the outcome back into either a decoded payload plus [`Response`] or an
//! [`Error`]. Every resource client in the workspace shares one `ApiClient`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::HcloudConfig;
use crate::error::{ApiError, Error, ErrorResponse, Result};
use crate::response::{MetaEnvelope, Response};

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("hcloud-rust/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
///
/// Configures timeouts, connection pooling and request logging of the
/// underlying HTTP stack.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully prepared HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Request headers, including authentication.
    pub headers: HeaderMap,
    /// Encoded JSON body.
    pub body: Option<Bytes>,
}

/// An HTTP response as received from the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Undecoded body.
    pub body: Bytes,
}

/// Executes prepared requests.
///
/// The default implementation is [`ReqwestTransport`]; tests plug in their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns a transport error if no response could be obtained.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression)
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Builder for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientBuilder {
    config: HcloudConfig,
    http_config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    /// Create a builder from a [`HcloudConfig`].
    #[must_use]
    pub fn new(config: HcloudConfig) -> Self {
        Self {
            http_config: ClientConfig::new().with_timeout(config.timeout()),
            config,
            transport: None,
        }
    }

    /// Override the HTTP client configuration.
    ///
    /// Replaces every HTTP setting, including the request timeout seeded
    /// from [`HcloudConfig::request_timeout_secs`].
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid or the
    /// token cannot be used as a header value.
    pub fn build(self) -> Result<ApiClient> {
        self.config.check()?;
        let endpoint = self.config.parse_endpoint()?;

        let http_config = self.http_config;

        let authorization = match self.config.token() {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    Error::ConfigError("API token contains invalid characters".to_string())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            None => {
                warn!("no API token configured, requests will be unauthenticated");
                None
            }
        };

        let user_agent = match self.config.application_suffix() {
            Some(suffix) => format!("{suffix} {DEFAULT_USER_AGENT}"),
            None => DEFAULT_USER_AGENT.to_string(),
        };
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|_| Error::ConfigError(format!("Invalid User-Agent `{user_agent}`")))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&http_config)?),
        };

        Ok(ApiClient {
            transport,
            endpoint,
            authorization,
            user_agent,
            enable_logging: http_config.enable_logging,
        })
    }
}

/// Authenticated JSON client shared by all resource clients.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    authorization: Option<HeaderValue>,
    user_agent: HeaderValue,
    enable_logging: bool,
}

impl ApiClient {
    /// Construct a client for the default endpoint with the given token.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ApiClientBuilder::new(HcloudConfig::new(token)).build()
    }

    /// Start a builder from the configuration.
    #[must_use]
    pub fn builder(config: HcloudConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    /// Return the API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a transport, API or parse error.
    pub async fn get<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<(R, Response)>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::GET, path, params, None).await
    }

    /// GET a JSON document, mapping a `not_found` API error to `None`.
    ///
    /// # Errors
    ///
    /// Returns any error other than `not_found`.
    pub async fn get_optional<R>(&self, path: &str) -> Result<(Option<R>, Response)>
    where
        R: DeserializeOwned,
    {
        let (response, body) = self.dispatch(Method::GET, path, &[], None).await?;
        if !response.status.is_success() {
            let err = error_from_body(response.status, &body);
            if err.is_not_found() {
                debug!(path, "resource not found");
                return Ok((None, response));
            }
            return Err(err);
        }

        let value = decode(path, &body)?;
        Ok((Some(value), response))
    }

    /// POST a JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns an encode, transport, API or parse error.
    pub async fn post<B, R>(&self, path: &str, body: Option<&B>) -> Result<(R, Response)>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], body).await
    }

    /// PUT a JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns an encode, transport, API or parse error.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<(R, Response)>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// DELETE a resource; the response body is not decoded.
    ///
    /// # Errors
    ///
    /// Returns a transport or API error.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let (response, _) = self.execute(Method::DELETE, path, &[], None).await?;
        Ok(response)
    }

    /// Send a request with an optional JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns an encode, transport, API or parse error.
    pub async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<(R, Response)>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body
            .map(|payload| serde_json::to_vec(payload).map(Bytes::from))
            .transpose()
            .map_err(|err| Error::EncodeError(format!("request body for `{path}`: {err}")))?;

        let (response, bytes) = self.execute(method, path, params, body).await?;
        let value = decode(path, &bytes)?;
        Ok((value, response))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<Bytes>,
    ) -> Result<(Response, Bytes)> {
        let (response, bytes) = self.dispatch(method, path, params, body).await?;
        if response.status.is_success() {
            Ok((response, bytes))
        } else {
            Err(error_from_body(response.status, &bytes))
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<Bytes>,
    ) -> Result<(Response, Bytes)> {
        let mut url = self.build_url(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if self.enable_logging {
            debug!(method = %method, path, ?params, "sending API request");
        }

        let raw = self
            .transport
            .send(ApiRequest {
                method: method.clone(),
                url,
                headers,
                body,
            })
            .await?;

        if self.enable_logging {
            debug!(method = %method, path, status = %raw.status, "received API response");
        }

        let meta = if raw.body.is_empty() {
            Default::default()
        } else {
            serde_json::from_slice::<MetaEnvelope>(&raw.body)
                .map(|envelope| envelope.meta)
                .unwrap_or_default()
        };

        let response = Response::new(raw.status, raw.headers).with_meta(meta);
        Ok((response, raw.body))
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
    }
}

fn decode<R>(path: &str, body: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|err| {
        Error::ParseError(format!("Failed to parse API response for `{path}`: {err}"))
    })
}

fn error_from_body(status: StatusCode, body: &[u8]) -> Error {
    if let Ok(parsed) = serde_json::from_slice::<ErrorResponse>(body) {
        return Error::Api(ApiError::from_detail(status, parsed.error));
    }

    let text = String::from_utf8_lossy(body);
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("API temporarily unavailable ({status}): {text}"))
        }
        _ => Error::HttpError(format!("API responded with status {status}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Thing {
        id: u64,
    }

    #[derive(Debug, Deserialize)]
    struct ThingEnvelope {
        thing: Thing,
    }

    fn raw(status: StatusCode, body: serde_json::Value) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn mock_client(transport: MockTransport) -> ApiClient {
        ApiClient::builder(HcloudConfig::new("token-123"))
            .with_transport(Arc::new(transport))
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT));
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.enable_logging);
        assert!(config.enable_compression);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_logging(false)
            .with_compression(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_logging);
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let result = ApiClient::builder(HcloudConfig::new("t").with_endpoint("nope")).build();
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_request_carries_auth_and_user_agent() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|request| {
            assert_eq!(request.method, Method::GET);
            assert_eq!(
                request.url.as_str(),
                "https://api.hetzner.cloud/v1/things/1"
            );
            assert_eq!(request.headers[AUTHORIZATION], "Bearer token-123");
            assert!(request.headers[USER_AGENT]
                .to_str()
                .unwrap()
                .starts_with("hcloud-rust/"));
            assert!(request.body.is_none());
            Ok(raw(StatusCode::OK, json!({"thing": {"id": 1}})))
        });

        let client = mock_client(transport);
        let (envelope, response): (ThingEnvelope, _) = client.get("/things/1", &[]).await.unwrap();
        assert_eq!(envelope.thing.id, 1);
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.pagination().is_none());
    }

    #[tokio::test]
    async fn test_structured_error_maps_to_api_error() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(raw(
                StatusCode::LOCKED,
                json!({"error": {"code": "locked", "message": "server is locked"}}),
            ))
        });

        let client = mock_client(transport);
        let err = client
            .post::<_, serde_json::Value>("things/1/actions/poweron", None::<&()>)
            .await
            .unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.code, ErrorCode::Locked);
        assert_eq!(api.status, StatusCode::LOCKED);
        assert_eq!(api.message, "server is locked");
    }

    #[tokio::test]
    async fn test_unstructured_error_maps_by_status() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(raw(StatusCode::SERVICE_UNAVAILABLE, json!("maintenance"))));

        let client = mock_client(transport);
        let err = client
            .get::<serde_json::Value>("things", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unstructured_client_error_is_http_error() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(RawResponse {
                status: StatusCode::BAD_REQUEST,
                headers: HeaderMap::new(),
                body: Bytes::from_static(b"<html>bad</html>"),
            })
        });

        let client = mock_client(transport);
        let err = client
            .get::<serde_json::Value>("things", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
    }

    #[tokio::test]
    async fn test_get_optional_not_found_is_none() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(raw(
                StatusCode::NOT_FOUND,
                json!({"error": {"code": "not_found", "message": "thing not found"}}),
            ))
        });

        let client = mock_client(transport);
        let (thing, response) = client
            .get_optional::<ThingEnvelope>("things/9")
            .await
            .unwrap();
        assert!(thing.is_none());
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_optional_other_errors_propagate() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(raw(
                StatusCode::FORBIDDEN,
                json!({"error": {"code": "forbidden", "message": "nope"}}),
            ))
        });

        let client = mock_client(transport);
        let err = client
            .get_optional::<ThingEnvelope>("things/9")
            .await
            .unwrap_err();
        assert_eq!(err.api_error().map(|e| &e.code), Some(&ErrorCode::Forbidden));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(Error::Timeout("deadline elapsed".to_string())));

        let client = mock_client(transport);
        let err = client.delete("things/1").await.unwrap_err();
        assert_eq!(err, Error::Timeout("deadline elapsed".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(raw(StatusCode::OK, json!({"unexpected": true}))));

        let client = mock_client(transport);
        let err = client.get::<ThingEnvelope>("things/1", &[]).await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn test_reqwest_transport_sends_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/things/1"))
            .and(header("authorization", "Bearer abc"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"thing": {"id": 1}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/things"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "things": [],
                "meta": {"pagination": {"page": 2, "per_page": 50, "last_page": 2}}
            })))
            .mount(&server)
            .await;

        let config = HcloudConfig::new("abc").with_endpoint(format!("{}/v1", server.uri()));
        let client = ApiClient::builder(config).build().unwrap();

        let (envelope, _): (ThingEnvelope, _) = client
            .put("things/1", &json!({"name": "renamed"}))
            .await
            .unwrap();
        assert_eq!(envelope.thing.id, 1);

        let params = vec![("page", "2".to_string()), ("per_page", "50".to_string())];
        let (_, response): (serde_json::Value, _) = client.get("things", &params).await.unwrap();
        let pagination = response.pagination().unwrap();
        assert_eq!(pagination.page, 2);
        assert!(pagination.is_last_page());
    }

    #[tokio::test]
    async fn test_http_config_timeout_applies_to_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = HcloudConfig::new("t").with_endpoint(server.uri());
        let client = ApiClient::builder(config)
            .with_http_config(ClientConfig::new().with_timeout(Duration::from_millis(200)))
            .build()
            .unwrap();

        let err = client
            .get::<serde_json::Value>("slow", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_request_timeout_secs_seeds_http_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = HcloudConfig::new("t")
            .with_endpoint(server.uri())
            .with_timeout(1);
        let client = ApiClient::builder(config).build().unwrap();

        let err = client
            .get::<serde_json::Value>("slow", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "unexpected error: {err:?}");
    }
}
