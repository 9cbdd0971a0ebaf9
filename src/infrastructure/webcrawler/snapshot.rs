//! Site snapshot: primary page plus a few same-host pages

use futures::future::join_all;

use super::html::{extract_internal_links, parse_page};
use crate::domain::entities::ParsedPage;
use crate::domain::traits::PageFetcher;

/// Fetch the base URL, retrying once over plain HTTP when HTTPS fails.
/// Returns the URL that answered along with its HTML.
pub async fn fetch_primary_html(fetcher: &dyn PageFetcher, base_url: &str) -> Option<(String, String)> {
    if let Some(html) = fetcher.fetch_html(base_url).await {
        return Some((base_url.to_string(), html));
    }

    if let Some(rest) = strip_https(base_url) {
        let fallback_url = format!("http://{}", rest);
        tracing::info!(url = %fallback_url, "HTTPS fetch failed, retrying over HTTP");
        if let Some(html) = fetcher.fetch_html(&fallback_url).await {
            return Some((fallback_url, html));
        }
    }

    None
}

fn strip_https(url: &str) -> Option<&str> {
    let prefix = url.get(..8)?;
    prefix.eq_ignore_ascii_case("https://").then(|| &url[8..])
}

/// Crawl up to `max_pages` pages: the primary page first, then internal
/// pages linked from it in link order.
///
/// An empty result means the primary page was unreachable. Secondary pages
/// that fail are skipped.
pub async fn build_site_snapshot(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    max_pages: usize,
) -> Vec<ParsedPage> {
    let Some((primary_url, primary_html)) = fetch_primary_html(fetcher, base_url).await else {
        return Vec::new();
    };

    let mut pages = vec![parse_page(&primary_url, &primary_html)];
    let links = extract_internal_links(&primary_html, &primary_url, max_pages.saturating_sub(1));

    let fetches = links.iter().map(|link| async move {
        let html = fetcher.fetch_html(link).await;
        (link, html)
    });

    for (link, html) in join_all(fetches).await {
        match html {
            Some(html) => pages.push(parse_page(link, &html)),
            None => tracing::debug!(url = %link, "Skipping unreachable page"),
        }
    }

    tracing::info!(url = %primary_url, pages = pages.len(), "Site snapshot built");
    pages
}
