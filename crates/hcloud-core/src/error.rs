//! Error types for Hetzner Cloud operations.
//!
//! This module separates failures into three groups: local errors raised before
//! a request leaves the process (validation, encoding, bad endpoints), transport
//! errors raised by the HTTP stack, and API errors reported by the provider in a
//! structured `{"error": {...}}` body.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Hetzner Cloud operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Options failed local validation; no request was sent.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    EncodeError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint or request path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed, or the provider answered with an unstructured error.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for API: {0}")]
    Timeout(String),

    /// API could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error reported by the API.
    #[error("{0}")]
    Api(ApiError),
}

/// Specialized result type for Hetzner Cloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Provider-defined error codes.
///
/// Unknown codes are preserved in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// Insufficient permissions for this request
    Forbidden,
    /// Request was made with an invalid or unknown token
    Unauthorized,
    /// Error while parsing or processing the input
    InvalidInput,
    /// Payload contains a JSON error
    JsonError,
    /// The item you are trying to access is locked
    Locked,
    /// Entity not found
    NotFound,
    /// Error when sending too many requests
    RateLimitExceeded,
    /// Error when exceeding the maximum quantity of a resource
    ResourceLimitExceeded,
    /// The requested resource is currently unavailable
    ResourceUnavailable,
    /// Error within a service
    ServiceError,
    /// One or more of the object's fields must be unique
    UniquenessError,
    /// The actions you are trying to perform are protected
    Protected,
    /// Cannot perform operation due to maintenance
    Maintenance,
    /// The resource has changed during the request
    Conflict,
    /// The corresponding resource does not support the action
    UnsupportedError,
    /// The token is only allowed to perform GET requests
    TokenReadonly,
    /// Unknown error
    UnknownError,
    /// Any code this crate does not know about yet
    Other(String),
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::InvalidInput => "invalid_input",
            Self::JsonError => "json_error",
            Self::Locked => "locked",
            Self::NotFound => "not_found",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::ResourceLimitExceeded => "resource_limit_exceeded",
            Self::ResourceUnavailable => "resource_unavailable",
            Self::ServiceError => "service_error",
            Self::UniquenessError => "uniqueness_error",
            Self::Protected => "protected",
            Self::Maintenance => "maintenance",
            Self::Conflict => "conflict",
            Self::UnsupportedError => "unsupported_error",
            Self::TokenReadonly => "token_readonly",
            Self::UnknownError => "unknown_error",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "forbidden" => Self::Forbidden,
            "unauthorized" => Self::Unauthorized,
            "invalid_input" => Self::InvalidInput,
            "json_error" => Self::JsonError,
            "locked" => Self::Locked,
            "not_found" => Self::NotFound,
            "rate_limit_exceeded" => Self::RateLimitExceeded,
            "resource_limit_exceeded" => Self::ResourceLimitExceeded,
            "resource_unavailable" => Self::ResourceUnavailable,
            "service_error" => Self::ServiceError,
            "uniqueness_error" => Self::UniquenessError,
            "protected" => Self::Protected,
            "maintenance" => Self::Maintenance,
            "conflict" => Self::Conflict,
            "unsupported_error" => Self::UnsupportedError,
            "token_readonly" => Self::TokenReadonly,
            "unknown_error" => Self::UnknownError,
            _ => Self::Other(code),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the API in a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: StatusCode,
    /// Provider error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional code-specific details
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an API error from a decoded error body.
    #[must_use]
    pub fn from_detail(status: StatusCode, detail: ErrorDetail) -> Self {
        Self {
            status,
            code: detail.code,
            message: detail.message,
            details: detail.details,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {} ({}): {}", self.code, self.status, self.message)
    }
}

/// Error envelope as sent by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Additional error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// API errors report the provider code; everything else a fixed local code.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EncodeError(_) => "ENCODE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::Api(err) => err.code.as_str(),
        }
    }

    /// Returns the API error, if the provider reported one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the provider reported the resource as not found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(err) if err.code == ErrorCode::NotFound)
    }

    /// Returns true if the error was raised before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EncodeError(_)
                | Self::ConfigError(_)
                | Self::InvalidEndpoint(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_builder() {
            Self::InvalidEndpoint(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_error(code: ErrorCode) -> Error {
        Error::Api(ApiError {
            status: StatusCode::NOT_FOUND,
            code,
            message: "server with ID 42 not found".to_string(),
            details: None,
        })
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ValidationError("missing name".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::EncodeError("test".to_string()).error_code(),
            "ENCODE_ERROR"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(api_error(ErrorCode::NotFound).error_code(), "not_found");
    }

    #[test]
    fn test_error_display() {
        let err = Error::ValidationError("missing name".to_string());
        assert_eq!(err.to_string(), "Validation error: missing name");

        let err = api_error(ErrorCode::NotFound);
        assert_eq!(
            err.to_string(),
            "API error not_found (404 Not Found): server with ID 42 not found"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(api_error(ErrorCode::NotFound).is_not_found());
        assert!(!api_error(ErrorCode::Forbidden).is_not_found());
        assert!(!Error::HttpError("404".to_string()).is_not_found());
    }

    #[test]
    fn test_is_local() {
        assert!(Error::ValidationError("x".to_string()).is_local());
        assert!(Error::EncodeError("x".to_string()).is_local());
        assert!(!Error::Timeout("x".to_string()).is_local());
        assert!(!api_error(ErrorCode::Locked).is_local());
    }

    #[test]
    fn test_error_code_unknown_is_preserved() {
        let code = ErrorCode::from("placement_error".to_string());
        assert_eq!(code, ErrorCode::Other("placement_error".to_string()));
        assert_eq!(code.as_str(), "placement_error");
    }

    #[test]
    fn test_error_response_deserialization() {
        let body = json!({
            "error": {
                "code": "invalid_input",
                "message": "invalid input in field 'name'",
                "details": {"fields": [{"name": "name", "messages": ["is too long"]}]}
            }
        });

        let response: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.error.code, ErrorCode::InvalidInput);
        assert_eq!(response.error.message, "invalid input in field 'name'");
        assert!(response.error.details.is_some());

        let api = ApiError::from_detail(StatusCode::UNPROCESSABLE_ENTITY, response.error);
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_error_response_serialization_skips_missing_details() {
        let response = ErrorResponse {
            error: ErrorDetail {
                code: ErrorCode::Locked,
                message: "server is locked".to_string(),
                details: None,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"locked\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let hcloud_err: Error = err.into();
        assert!(matches!(hcloud_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let hcloud_err: Error = err.into();
        assert!(matches!(hcloud_err, Error::ParseError(_)));
    }

    #[test]
    fn test_api_error_accessor() {
        let err = api_error(ErrorCode::Conflict);
        assert_eq!(err.api_error().map(|e| &e.code), Some(&ErrorCode::Conflict));
        assert!(Error::Timeout("t".to_string()).api_error().is_none());
    }
}
