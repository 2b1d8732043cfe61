//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpRequest, HttpResponse};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// HTTP client trait the scenario sends requests through
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Canned answer served in offline mode
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    /// Simulated server latency
    pub delay: Duration,
    pub body: JsonValue,
}

impl MockResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            delay: Duration::ZERO,
            body: JsonValue::Null,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = body;
        self
    }
}

/// HTTP Manager sharing one pooled client across all virtual users
#[derive(Debug, Clone)]
pub struct HttpManager {
    offline: bool,
    mocks: HashMap<String, MockResponse>,
    client: Client,
}

impl HttpManager {
    /// Create a new HttpManager in online mode with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {:?}, pool size per host: {}",
            config.timeout, config.max_idle_per_host
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()?;

        Ok(Self {
            offline: false,
            mocks: HashMap::new(),
            client,
        })
    }

    /// Set offline mode
    pub fn set_offline(&mut self) {
        self.offline = true;
        debug!("HttpManager set to offline mode");
    }

    /// Add a single HTTP mock
    pub fn add_mock(&mut self, method: HttpMethod, url: &str, response: MockResponse) {
        let key = format!("{}:{}", method.as_str(), url);
        self.mocks.insert(key, response);
        debug!("Added HTTP mock for {} {}", method, url);
    }

    fn find_mock(&self, request: &HttpRequest) -> Option<&MockResponse> {
        if let Some(mock) = self.mocks.get(&request.mock_key()) {
            return Some(mock);
        }

        // Fall back to a partial URL match for the same method
        self.mocks.iter().find_map(|(key, mock)| {
            let (mock_method, mock_url) = key.split_once(':')?;
            let matches = mock_method.eq_ignore_ascii_case(request.method.as_str())
                && (request.url.contains(mock_url) || mock_url.contains(request.url.as_str()));
            matches.then_some(mock)
        })
    }

    async fn send_offline(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let start = Instant::now();
        let mock = self
            .find_mock(request)
            .ok_or_else(|| HttpError::NoMockResponse(request.mock_key()))?;

        if !mock.delay.is_zero() {
            tokio::time::sleep(mock.delay).await;
        }

        let body_len = match &mock.body {
            JsonValue::Null => 0,
            body => serde_json::to_vec(body)?.len(),
        };

        trace!("Served mock {} for {}", mock.status, request.mock_key());
        Ok(HttpResponse {
            status: mock.status,
            duration: start.elapsed(),
            body_len,
        })
    }

    fn build_headers(request: &HttpRequest) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in &request.headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeaderName(key.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeaderValue(key.to_string()))?;
            header_map.insert(header_name, header_value);
        }
        Ok(header_map)
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        if self.offline {
            return self.send_offline(request).await;
        }

        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(reqwest::Method::from(request.method), url)
            .headers(Self::build_headers(request)?);

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let duration = start.elapsed();

        trace!(
            "{} {} -> {} in {:?}",
            request.method,
            request.url,
            status,
            duration
        );

        Ok(HttpResponse {
            status,
            duration,
            body_len: body.len(),
        })
    }
}
