//! Web Crawler Module
//!
//! Shallow same-host crawling for site bootstrap: one primary page plus a
//! handful of internal pages, each fetched under timeout and size caps.

pub mod html;
pub mod snapshot;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::domain::traits::PageFetcher;
use crate::infrastructure::config::CrawlerConfig;
use crate::util::truncate_chars;

pub use snapshot::{build_site_snapshot, fetch_primary_html};

/// Reasons a page fetch is rejected
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
}

/// reqwest-backed page fetcher
pub struct HttpFetcher {
    client: Client,
    max_body_chars: usize,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            max_body_chars: config.max_body_chars,
        })
    }

    /// GET a page, accepting only 2xx `text/html` responses
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(FetchError::InvalidContentType(content_type));
        }

        let body = response.text().await?;
        Ok(truncate_chars(&body, self.max_body_chars).to_string())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Page fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(status: &str, content_type: &str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_rejects_error_status() {
        let url = serve_once("404 Not Found", "text/html", "<title>Missing</title>".to_string()).await;
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();

        assert!(matches!(fetcher.fetch(&url).await, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_rejects_non_html() {
        let url = serve_once("200 OK", "application/pdf", "%PDF-1.7".to_string()).await;
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();

        assert!(matches!(
            fetcher.fetch(&url).await,
            Err(FetchError::InvalidContentType(ct)) if ct == "application/pdf"
        ));
    }

    #[tokio::test]
    async fn test_accepts_html_with_charset() {
        let url = serve_once("200 OK", "text/html; charset=utf-8", "<title>Hi</title>".to_string()).await;
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();

        assert_eq!(fetcher.fetch_html(&url).await.as_deref(), Some("<title>Hi</title>"));
    }

    #[tokio::test]
    async fn test_truncates_large_body() {
        let body = format!("<p>{}</p>", "é".repeat(500));
        let url = serve_once("200 OK", "text/html", body).await;
        let config = CrawlerConfig {
            max_body_chars: 40,
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();

        let html = fetcher.fetch(&url).await.unwrap();
        assert_eq!(html.chars().count(), 40);
        assert!(html.starts_with("<p>ééé"));
    }

    #[test]
    fn test_http_fetcher_builds_from_defaults() {
        let fetcher = HttpFetcher::new(&CrawlerConfig::default());
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_real_page() {
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
        let html = fetcher.fetch_html("https://example.com").await;
        assert!(html.map(|h| h.contains("Example Domain")).unwrap_or(false));
    }
}
