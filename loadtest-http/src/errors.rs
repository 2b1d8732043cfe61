//! HTTP error types

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("No mock response available in offline mode for {0}")]
    NoMockResponse(String),
}

impl HttpError {
    /// Short machine-readable kind, used when a failure is folded into a sample
    pub fn kind(&self) -> &'static str {
        match self {
            HttpError::NetworkError(e) if e.is_timeout() => "timeout",
            HttpError::NetworkError(e) if e.is_connect() => "connection_refused",
            HttpError::NetworkError(_) => "network",
            HttpError::InvalidUrl(_)
            | HttpError::InvalidHeaderName(_)
            | HttpError::InvalidHeaderValue(_)
            | HttpError::InvalidJson(_) => "invalid_request",
            HttpError::NoMockResponse(_) => "no_mock",
        }
    }
}
