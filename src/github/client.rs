// GitHub API HTTP client.
// Handles authentication headers, size and time limits, and request logging.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{GateError, Result};
use crate::log::Logger;

/// Largest response body accepted, in bytes.
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Connect plus read timeout for one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const MAX_REDIRECTS: usize = 3;

const USER_AGENT_VALUE: &str = concat!("hubgate/", env!("CARGO_PKG_VERSION"));

/// Where a response body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Expired cache entry served because the refresh failed.
    StaleCache,
}

/// Status and body of one GET.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl RemoteResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            source: ResponseSource::Network,
        }
    }

    /// A body served from the cache. Only 200 responses are ever cached.
    pub fn cached(body: Vec<u8>, source: ResponseSource) -> Self {
        Self {
            status: 200,
            body,
            source,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Require a 200 and decode the body.
    pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        if !self.is_ok() {
            return Err(GateError::RemoteStatus {
                url: url.to_string(),
                status: self.status,
            });
        }
        serde_json::from_slice(&self.body).map_err(|source| GateError::MalformedPayload {
            url: url.to_string(),
            source,
        })
    }
}

/// Performs one authenticated GET.
pub trait Transport {
    fn get(&self, url: &str, token: &str) -> Result<RemoteResponse>;
}

/// Blocking reqwest transport.
pub struct HttpTransport {
    client: Client,
    max_bytes: u64,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_limits(REQUEST_TIMEOUT, MAX_RESPONSE_BYTES)
    }

    pub fn with_limits(timeout: Duration, max_bytes: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, max_bytes })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, token: &str) -> Result<RemoteResponse> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", token))
            .send()?;

        let status = response.status().as_u16();
        let limit = self.max_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(GateError::ResponseTooLarge { limit });
        }

        let body = read_limited(response, limit)?;
        Ok(RemoteResponse::new(status, body))
    }
}

/// Read a body of unknown length, failing once it exceeds `limit` bytes.
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    // Read one byte past the limit so an oversized body is rejected, not truncated.
    let mut body = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|e| GateError::Transport(e.to_string()))?;
    if body.len() as u64 > limit {
        return Err(GateError::ResponseTooLarge { limit });
    }
    Ok(body)
}

/// GitHub API client bound to an endpoint and a service token.
pub struct GitHubClient {
    transport: Box<dyn Transport>,
    endpoint: String,
    token: String,
    logger: Logger,
}

impl GitHubClient {
    /// Create a client over HTTP for the given config.
    pub fn new(config: &Config, logger: Logger) -> Result<Self> {
        Ok(Self::with_transport(
            Box::new(HttpTransport::new()?),
            config,
            logger,
        ))
    }

    pub fn with_transport(transport: Box<dyn Transport>, config: &Config, logger: Logger) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            logger,
        }
    }

    /// API base URL, ending in `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The service token used when no other credential is given.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// GET `url`, authenticating with `token` or the service token.
    pub fn fetch(&self, url: &str, token: Option<&str>) -> Result<RemoteResponse> {
        let token = token.unwrap_or(&self.token);
        self.logger.scope(|| info!(url, "http get"));

        let result = self.transport.get(url, token);

        self.logger.scope(|| match &result {
            Ok(response) => info!(
                url,
                status = response.status,
                bytes = response.size(),
                "http response"
            ),
            Err(e) => debug!(url, error = %e, "http request failed"),
        });
        result
    }
}
