use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Config, Error, PageFetcher, Result};
use tracing::debug;

/// Fetches pages over HTTP with a browser User-Agent and a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.request_timeout, &config.user_agent)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::NetworkFailure(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkFailure(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::NetworkFailure(format!("{}: {}", url, e)))
    }
}

/// Serves canned pages keyed by exact URL; anything else is a network failure.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    search_page: Option<String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Page returned for any Google News search URL.
    pub fn with_search_page(mut self, html: impl Into<String>) -> Self {
        self.search_page = Some(html.into());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(page) = self.pages.get(url) {
            return Ok(page.clone());
        }
        match &self.search_page {
            Some(page) if url.starts_with(crate::discovery::SEARCH_ENDPOINT) => Ok(page.clone()),
            _ => Err(Error::NetworkFailure(format!("no canned page for {}", url))),
        }
    }
}

/// Fails every request, as if the network were down.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingFetcher;

#[async_trait]
impl PageFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(Error::NetworkFailure(format!("connection refused: {}", url)))
    }
}
