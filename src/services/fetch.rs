//! Byte fetching for template configuration and images.
//!
//! The pipeline depends only on [`Fetch`]; [`HttpFetcher`] is the networked
//! implementation and [`MemoryFetcher`] serves canned responses.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};

/// Source of raw bytes addressed by URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the body at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches over HTTP(S), and from disk for `file://` URLs.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
        }
    }

    /// The underlying HTTP client.
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(path) = url.strip_prefix("file://") {
            return fs_err::read(path).map_err(|e| Error::io(e, std::path::PathBuf::from(path)));
        }

        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!("Request to {url} returned {status}")));
        }

        let bytes = resp.bytes()
            .await
            .map_err(|e| Error::Network(format!("Reading body from {url} failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Serves bytes from a fixed map; unknown URLs fail as a network error.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response body for `url`.
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Network(format!("Request to {url} returned 404 Not Found")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[tokio::test]
    async fn memory_fetcher_serves_registered_urls() {
        let fetcher = MemoryFetcher::new().with("https://x/a.png", vec![1, 2, 3]);
        assert_eq!(fetcher.fetch("https://x/a.png").await.unwrap(), vec![1, 2, 3]);
        assert!(matches!(fetcher.fetch("https://x/b.png").await, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn http_fetcher_reads_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        std::fs::write(&path, b"{}").unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(1));
        let body = fetcher.fetch(&format!("file://{}", path.display())).await.unwrap();
        assert_eq!(body, b"{}");
    }
}
