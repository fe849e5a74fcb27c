// src/utils/error.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type MovieRecResult<T> = Result<T, MovieRecError>;

/// Custom error details for additional context
pub type ErrorDetails = HashMap<String, serde_json::Value>;

/// Main error type for the movie proxy backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecError {
    pub message: String,
    pub details: Option<Box<ErrorDetails>>,
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub endpoint: Option<String>,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[default]
    UnknownError,
    ValidationError,
    AuthenticationError,
    NotFoundError,
    RateLimitError,
    UpstreamServerError,
    ExternalApiError,
    NetworkError,
    TimeoutError,
    DeserializationError,
    ConfigurationError,
    CacheUnavailable,
    InternalError,
}

impl ErrorKind {
    /// Transient failures worth another attempt. Rate limits and other 4xx
    /// application errors are final: retrying them cannot succeed and burns
    /// upstream quota.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::TimeoutError | ErrorKind::NetworkError | ErrorKind::UpstreamServerError
        )
    }
}

impl fmt::Display for MovieRecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MovieRecError {}

impl MovieRecError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            status: None,
            error_code: None,
            endpoint: None,
            kind,
        }
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(Box::new(details));
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    // Convenience constructors for common error types

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
            .with_status(400)
            .with_code("VALIDATION_ERROR")
    }

    pub fn authentication_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationError, message)
            .with_status(401)
            .with_code("AUTH_ERROR")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundError, message)
            .with_status(404)
            .with_code("NOT_FOUND")
    }

    pub fn rate_limit_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimitError, message)
            .with_status(429)
            .with_code("RATE_LIMIT")
    }

    pub fn upstream_server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamServerError, message)
            .with_status(502)
            .with_code("UPSTREAM_SERVER_ERROR")
    }

    pub fn external_api_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalApiError, message)
            .with_status(502)
            .with_code("EXTERNAL_API_ERROR")
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message)
            .with_status(503)
            .with_code("NETWORK_ERROR")
    }

    pub fn timeout_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TimeoutError, message)
            .with_status(504)
            .with_code("TIMEOUT_ERROR")
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationError, message)
            .with_status(502)
            .with_code("PARSE_ERROR")
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigurationError, message)
            .with_status(500)
            .with_code("CONFIG_ERROR")
    }

    /// Internal signal only. The cache layer absorbs it into a fallback to
    /// the origin fetch; it must never reach the handler boundary.
    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CacheUnavailable, message)
            .with_status(500)
            .with_code("CACHE_UNAVAILABLE")
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
            .with_status(500)
            .with_code("INTERNAL_ERROR")
    }

    /// Map a non-2xx upstream response to an error kind. The body is scanned
    /// for TMDB's `status_message` so callers see the provider's own wording
    /// when one is present.
    pub fn from_upstream_status(status: u16, body: &str) -> Self {
        let upstream_message = extract_status_message(body);
        let message = |what: &str| match &upstream_message {
            Some(m) => format!("{} ({}): {}", what, status, m),
            None => format!("{} ({})", what, status),
        };

        let mut details = ErrorDetails::new();
        details.insert(
            "upstream_status".to_string(),
            serde_json::Value::from(status),
        );

        let error = match status {
            401 | 403 => Self::authentication_error(message("Upstream rejected credentials")),
            404 => Self::not_found(message("Resource not found upstream")),
            429 => Self::rate_limit_error(message("Upstream rate limit exceeded")),
            500..=599 => Self::upstream_server_error(message("Upstream server error")),
            _ => Self::external_api_error(message("Unexpected upstream response")),
        };

        error.with_details(details)
    }
}

/// TMDB error payloads look like `{"status_code": 7, "status_message": "..."}`.
fn extract_status_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("status_message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

impl From<serde_json::Error> for MovieRecError {
    fn from(err: serde_json::Error) -> Self {
        MovieRecError::parse_error(format!("JSON parsing error: {}", err))
    }
}

impl From<url::ParseError> for MovieRecError {
    fn from(err: url::ParseError) -> Self {
        MovieRecError::validation_error(format!("URL parse error: {}", err))
    }
}

impl From<reqwest::Error> for MovieRecError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MovieRecError::timeout_error(format!("HTTP request timed out: {}", err))
        } else if err.is_connect() {
            MovieRecError::network_error(format!("HTTP connection failed: {}", err))
        } else if err.is_decode() {
            MovieRecError::parse_error(format!("Failed to decode HTTP response: {}", err))
        } else {
            MovieRecError::network_error(format!("HTTP request failed: {}", err))
        }
    }
}
