//! HTTP client abstraction for testability

use super::types::FetchError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default User-Agent string for HTTP requests.
/// Some registries reject requests without one.
const DEFAULT_USER_AGENT: &str = concat!("sitescout/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP GET operations.
///
/// This abstraction allows dependency injection of mock clients in tests,
/// so adapters can be exercised without network access. All the registries
/// this crate talks to are query-parameter driven, so a single
/// parameterized GET covers every adapter.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request with query parameters.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL to request
    /// * `params` - Query parameters appended to the URL
    ///
    /// # Returns
    ///
    /// The response body as bytes, or a [`FetchError`] on transport
    /// failure, non-success status, or timeout.
    fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new client with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        debug!(url, "issuing provider request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "provider returned non-success status");
            if status.is_server_error() {
                return Err(FetchError::Unavailable(format!("HTTP {}", status)));
            }
            return Err(FetchError::Network(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(body.to_vec())
    }
}
