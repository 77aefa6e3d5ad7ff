//! PageSpeed Insights client

use crate::config::PageSpeedConfig;
use crate::pagespeed::types::{PageSpeedResult, PsiResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Reasons a PageSpeed Insights call produced no measurements
#[derive(Debug, Error)]
pub enum PageSpeedError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("No lighthouse data")]
    MissingLighthouse,
}

/// A source of page-speed measurements that always answers
///
/// Implementations absorb their own failures and return
/// `PageSpeedResult::degraded` instead.
#[async_trait]
pub trait PageSpeedProvider: Send + Sync {
    async fn analyze(&self, url: &str) -> PageSpeedResult;
}

/// Google PageSpeed Insights v5 client
pub struct PageSpeedClient {
    client: Client,
    config: PageSpeedConfig,
}

impl PageSpeedClient {
    /// Creates a client with the configured timeout
    pub fn new(config: &PageSpeedConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Runs one Lighthouse analysis
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses, undecodable bodies,
    /// and responses without a `lighthouseResult`.
    pub async fn fetch_report(&self, url: &str) -> Result<PageSpeedResult, PageSpeedError> {
        let mut query: Vec<(&str, &str)> =
            vec![("url", url), ("strategy", self.config.strategy.as_str())];
        if let Some(key) = self.config.api_key.as_deref() {
            query.push(("key", key));
        }

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageSpeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: PsiResponse = serde_json::from_str(&body)?;

        payload
            .lighthouse_result
            .map(|lighthouse| lighthouse.to_result())
            .ok_or(PageSpeedError::MissingLighthouse)
    }
}

#[async_trait]
impl PageSpeedProvider for PageSpeedClient {
    async fn analyze(&self, url: &str) -> PageSpeedResult {
        match self.fetch_report(url).await {
            Ok(result) => {
                tracing::debug!("PageSpeed score for {}: {}", url, result.score);
                result
            }
            Err(e) => {
                tracing::warn!("PageSpeed unavailable for {}, using defaults: {}", url, e);
                PageSpeedResult::degraded(e.to_string())
            }
        }
    }
}
