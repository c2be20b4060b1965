//! Remote document sources.
//!
//! [`DocumentSource`] is the seam between the sync pipeline and the network.
//! [`HttpSource`] fetches raw files over HTTP(S) with reqwest; tests plug in
//! an in-memory implementation instead.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;

/// Something that serves repository files by relative path.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable location of `path`, used in progress and error messages.
    fn describe(&self, path: &str) -> String;

    /// Fetch `path` as UTF-8 text.
    async fn fetch_text(&self, path: &str) -> Result<String>;

    /// Fetch `path` as raw bytes.
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// Fetches files relative to a raw-content base URL.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.source.raw_base_url,
            Duration::from_secs(config.http.timeout_secs),
            &config.http.user_agent,
        )
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = join_url(&self.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Unexpected status for {}", url))?;
        Ok(response)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let response = self.get(path).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", self.describe(path)))?;
        Ok(text)
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.get(path).await?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", self.describe(path)))?;
        Ok(bytes.to_vec())
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches("./").trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_single_slash() {
        assert_eq!(
            join_url("https://example.com/repo/", "/README.md"),
            "https://example.com/repo/README.md"
        );
        assert_eq!(
            join_url("https://example.com/repo", "CIP-0001/README.md"),
            "https://example.com/repo/CIP-0001/README.md"
        );
        assert_eq!(
            join_url("https://example.com/repo", "./img.png"),
            "https://example.com/repo/img.png"
        );
        assert_eq!(join_url("https://example.com/", ""), "https://example.com");
    }

    #[tokio::test]
    async fn http_source_fetches_text_and_bytes() {
        let mut server = mockito::Server::new_async().await;
        let text_mock = server
            .mock("GET", "/README.md")
            .with_status(200)
            .with_body("# Index")
            .create_async()
            .await;
        let bytes_mock = server
            .mock("GET", "/CIP-0001/diagram.png")
            .with_status(200)
            .with_body([0x89u8, b'P', b'N', b'G'])
            .create_async()
            .await;

        let source = HttpSource::new(&server.url(), Duration::from_secs(5), "pmirror-test").unwrap();
        assert_eq!(source.fetch_text("README.md").await.unwrap(), "# Index");
        assert_eq!(
            source.fetch_bytes("CIP-0001/diagram.png").await.unwrap(),
            vec![0x89u8, b'P', b'N', b'G']
        );

        text_mock.assert_async().await;
        bytes_mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_source_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.md")
            .with_status(404)
            .create_async()
            .await;

        let source = HttpSource::new(&server.url(), Duration::from_secs(5), "pmirror-test").unwrap();
        let err = source.fetch_text("missing.md").await.unwrap_err();
        assert!(format!("{:#}", err).contains("missing.md"), "{:#}", err);
    }
}
