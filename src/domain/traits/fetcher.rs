use async_trait::async_trait;

/// Fetches one HTML page.
///
/// Implementations swallow every failure (timeout, non-2xx status, non-HTML
/// content type, transport error) and report it as `None`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Option<String>;
}
