//! Page fetching through the scraping proxy
//!
//! Every outbound request goes to the proxy endpoint with the target URL and the
//! credential as query parameters. Bodies are read incrementally and cut at the
//! configured size ceiling so a huge page never sits in memory in full.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{FetchSettings, ProxySettings};

/// Errors that can occur during a single proxied fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    #[error("Upstream returned HTTP status {0}")]
    Status(u16),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// A fetched page, body already truncated.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code returned through the proxy
    pub status: u16,
    /// Response body (possibly truncated)
    pub body: String,
    /// Whether the body was cut at the size ceiling
    pub truncated: bool,
}

/// HTTP client that relays every request through the scraping proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_content_bytes: usize,
}

impl ProxyClient {
    /// Build a client from proxy and fetch settings.
    ///
    /// Timeouts are applied per request so search and page fetches can differ.
    pub fn new(proxy: &ProxySettings, fetch: &FetchSettings) -> Result<Self, FetchError> {
        Url::parse(&proxy.endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", proxy.endpoint)))?;

        let client = reqwest::Client::builder()
            .user_agent(fetch.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            endpoint: proxy.endpoint.clone(),
            api_key: proxy.api_key.clone().unwrap_or_default(),
            max_content_bytes: fetch.max_content_bytes,
        })
    }

    /// The proxy URL that fetches `target` on our behalf.
    pub fn proxied_url(&self, target: &str) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &self.endpoint,
            &[("api_key", self.api_key.as_str()), ("url", target)],
        )
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Fetch `target` through the proxy, failing on timeouts and non-2xx statuses.
    pub async fn fetch(&self, target: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let proxied = self.proxied_url(target)?;

        let mut response = self
            .client
            .get(proxied)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut bytes: Vec<u8> = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(|e| classify(e, timeout))? {
            let room = self.max_content_bytes.saturating_sub(bytes.len());
            if chunk.len() > room {
                bytes.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(
            target_url = target,
            status = status.as_u16(),
            bytes = bytes.len(),
            truncated,
            "fetched page"
        );

        Ok(FetchedPage {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
            truncated,
        })
    }
}

// The proxied URL carries the credential, so it is stripped before the error travels on.
fn classify(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Http(error.without_url())
    }
}
