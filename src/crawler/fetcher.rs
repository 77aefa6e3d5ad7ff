//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made while crawling a site:
//! - Building HTTP clients with the audit user agent
//! - GET requests that follow redirects (max 10 hops)
//! - Error classification into timeout / network / HTTP status failures
//! - A single https → http retry when TLS negotiation fails

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::url::downgrade_to_http;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested (after any protocol downgrade)
    pub requested_url: Url,
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Reasons a fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete before the deadline
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// Connection, DNS, TLS, or body-read failure
    #[error("Network error for {url}: {message}")]
    Network {
        url: String,
        message: String,
        /// True when the failure happened during TLS negotiation
        tls: bool,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Returns true if this failure came from TLS/certificate negotiation
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Network { tls: true, .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Overall per-request deadline
///
/// # Example
///
/// ```no_run
/// use ranksight::config::UserAgentConfig;
/// use ranksight::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );

    Client::builder()
        .user_agent(user_agent.header_value())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-page HTTP fetcher shared by every step of a crawl
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from crawler and user-agent configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, Duration::from_millis(crawler.fetch_timeout_ms))?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns its body
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | TLS/certificate failure on `https://` | Retry once on `http://` |
    /// | Timeout | Fail with `Timeout` |
    /// | Any other connection failure | Fail with `Network` |
    /// | Non-2xx status | Fail with `HttpStatus` |
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match self.fetch_once(url).await {
            Err(err) if err.is_tls() => match downgrade_to_http(url) {
                Some(http_url) => {
                    tracing::warn!("TLS failure for {} ({}), retrying over http", url, err);
                    self.fetch_once(&http_url).await
                }
                None => Err(err),
            },
            result => result,
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, &e))?;

        Ok(FetchedPage {
            requested_url: url.clone(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Maps a reqwest error onto the fetch failure taxonomy
fn classify_error(url: &Url, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
        };
    }

    FetchError::Network {
        url: url.to_string(),
        message: error.to_string(),
        tls: is_tls_failure(error),
    }
}

/// Walks the error's source chain looking for a TLS handshake failure
///
/// The top-level reqwest message embeds the URL, so only the sources are
/// inspected. OpenSSL reports through its message text, rustls through an
/// `InvalidData` I/O error.
fn is_tls_failure(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);

    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::InvalidData {
                return true;
            }
        }

        let message = err.to_string().to_ascii_lowercase();
        if ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| message.contains(needle))
        {
            return true;
        }

        source = err.source();
    }

    false
}
