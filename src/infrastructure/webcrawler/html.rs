//! Regex-based HTML text extraction
//!
//! Works on static markup only. Every pattern tolerates malformed input: an
//! unmatched tag simply fails to match and is left to the generic tag
//! stripper.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use url::Url;

use crate::domain::entities::ParsedPage;
use crate::util::truncate_chars;

/// Max headings kept per page
pub const HEADING_LIMIT: usize = 4;
/// Chars of flattened text kept as the page snippet
pub const SNIPPET_CHARS: usize = 650;

// Unterminated blocks run to the end of the document
static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script\b.*?(?:</script\s*>|$)").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b.*?(?:</style\s*>|$)").unwrap());
static NOSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<noscript\b.*?(?:</noscript\s*>|$)").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&(nbsp|amp|quot|#39);").unwrap());

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static META_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<meta\b[^>]*>").unwrap());
static META_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bname\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static META_PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bproperty\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static META_CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>|<h2\b[^>]*>(.*?)</h2\s*>").unwrap());

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#).unwrap());
static SKIP_SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:mailto:|tel:|javascript:)").unwrap());
static ASSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:pdf|jpg|jpeg|png|webp|gif|zip|svg|js|css)$").unwrap());

/// First non-empty of two alternative capture groups
fn either<'h>(caps: &Captures<'h>, a: usize, b: usize) -> Option<&'h str> {
    caps.get(a).or_else(|| caps.get(b)).map(|m| m.as_str())
}

fn attribute<'h>(re: &Regex, tag: &'h str) -> Option<&'h str> {
    re.captures(tag).and_then(|caps| either(&caps, 1, 2))
}

/// Flatten markup to plain text.
///
/// Drops script/style/noscript blocks with their contents, removes tags,
/// decodes `&nbsp;` `&amp;` `&quot;` `&#39;` and collapses whitespace.
pub fn strip_tags(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = NOSCRIPT_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = ENTITY_RE.replace_all(&text, |caps: &Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "nbsp" => " ",
            "amp" => "&",
            "quot" => "\"",
            _ => "'",
        }
    });

    // Stray angle brackets from broken markup
    text.replace(['<', '>'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .map(|caps| strip_tags(&caps[1]))
        .unwrap_or_default()
}

/// Content of the first `description` / `og:description` meta tag
pub fn extract_meta_description(html: &str) -> String {
    for tag in META_RE.find_iter(html) {
        let tag = tag.as_str();
        let content = match attribute(&META_CONTENT_RE, tag) {
            Some(content) if !content.trim().is_empty() => content,
            _ => continue,
        };

        let is_description = [&*META_NAME_RE, &*META_PROPERTY_RE].iter().any(|re| {
            attribute(re, tag)
                .map(|key| matches!(key.trim().to_lowercase().as_str(), "description" | "og:description"))
                .unwrap_or(false)
        });

        if is_description {
            return content.trim().to_string();
        }
    }

    String::new()
}

/// Distinct h1/h2 texts in document order
pub fn extract_headings(html: &str, limit: usize) -> Vec<String> {
    let mut output: Vec<String> = Vec::new();

    for caps in HEADING_RE.captures_iter(html) {
        if output.len() >= limit {
            break;
        }
        let cleaned = strip_tags(either(&caps, 1, 2).unwrap_or(""));
        if !cleaned.is_empty() && !output.contains(&cleaned) {
            output.push(cleaned);
        }
    }

    output
}

/// Origin plus path, without query, fragment or trailing slash
pub fn canonicalize_url(url: &Url) -> String {
    let path = url.path();
    let path = if path == "/" { path } else { path.trim_end_matches('/') };
    format!("{}{}", url.origin().ascii_serialization(), path)
}

/// Same-host page links, canonicalized and deduplicated.
///
/// Skips fragments, `mailto:`/`tel:`/`javascript:` links, other hosts,
/// common asset extensions and the base page itself.
pub fn extract_internal_links(html: &str, base_url: &str, limit: usize) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let base_canonical = canonicalize_url(&base);
    let mut links: Vec<String> = Vec::new();

    for caps in LINK_RE.captures_iter(html) {
        if links.len() >= limit {
            break;
        }

        let href = either(&caps, 1, 2).unwrap_or("").trim();
        if href.is_empty() || href.starts_with('#') || SKIP_SCHEME_RE.is_match(href) {
            continue;
        }

        let Ok(parsed) = base.join(href) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str() != base.host_str() {
            continue;
        }
        if ASSET_RE.is_match(parsed.path()) {
            continue;
        }

        let canonical = canonicalize_url(&parsed);
        if canonical != base_canonical && !links.contains(&canonical) {
            links.push(canonical);
        }
    }

    links
}

pub fn parse_page(url: &str, html: &str) -> ParsedPage {
    ParsedPage {
        url: url.to_string(),
        title: extract_title(html),
        meta_description: extract_meta_description(html),
        headings: extract_headings(html, HEADING_LIMIT),
        snippet: truncate_chars(&strip_tags(html), SNIPPET_CHARS).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_removes_blocks() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script type="text/javascript">var secret = "<b>x</b>";</script></head>
            <body><noscript>Enable JS</noscript><p>Hello&nbsp;&amp;  <b>World</b></p></body></html>"#;
        let text = strip_tags(html);
        assert_eq!(text, "Hello & World");
    }

    #[test]
    fn test_strip_tags_tolerates_broken_markup() {
        let text = strip_tags("a < b and c > d <p unclosed");
        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
        assert!(text.starts_with("a"));

        let text = strip_tags("before<script>alert('x')");
        assert_eq!(text, "before");
    }

    #[test]
    fn test_strip_tags_decodes_entities_case_insensitively() {
        assert_eq!(strip_tags("It&#39;s &QUOT;fine&quot;"), "It's \"fine\"");
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("<title>\n  Acme | <b>Plumbing</b> </title>"), "Acme | Plumbing");
        assert_eq!(extract_title("<p>no title</p>"), "");
    }

    #[test]
    fn test_meta_description_prefers_description_keys() {
        let html = r#"<meta charset="utf-8">
            <meta name="viewport" content="width=device-width">
            <meta property="og:description" content=" We're the best plumbers ">
            <meta name="description" content="Second">"#;
        assert_eq!(extract_meta_description(html), "We're the best plumbers");
        assert_eq!(extract_meta_description("<meta name='keywords' content='a,b'>"), "");
    }

    #[test]
    fn test_meta_description_attribute_order() {
        let html = r#"<META CONTENT="Reversed order" NAME="Description">"#;
        assert_eq!(extract_meta_description(html), "Reversed order");
    }

    #[test]
    fn test_extract_headings() {
        let html = "<h1>Main</h1><h2 class='x'>Sub <em>one</em></h2><h3>skip</h3>\
                    <h2>Main</h2><h1></h1><h2>Three</h2><h2>Four</h2><h2>Five</h2>";
        assert_eq!(extract_headings(html, 4), vec!["Main", "Sub one", "Three", "Four"]);
    }

    #[test]
    fn test_extract_internal_links() {
        let html = r##"
            <a href="/services/">Services</a>
            <a href="#top">Top</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="TEL:123">Call</a>
            <a class="x" href="https://example.com/services?ref=nav#a">Dup</a>
            <a href="https://other.com/page">Other</a>
            <a href="/brochure.PDF">PDF</a>
            <a href="https://example.com/">Home</a>
            <a href='about'>About</a>
            <a href="/blog">Blog</a>
            <a href="/contact">Contact</a>
        "##;
        let links = extract_internal_links(html, "https://example.com", 3);
        assert_eq!(
            links,
            vec![
                "https://example.com/services",
                "https://example.com/about",
                "https://example.com/blog",
            ]
        );
    }

    #[test]
    fn test_canonicalize_url() {
        let url = Url::parse("https://example.com/a/b/?q=1#frag").unwrap();
        assert_eq!(canonicalize_url(&url), "https://example.com/a/b");
        let root = Url::parse("http://example.com").unwrap();
        assert_eq!(canonicalize_url(&root), "http://example.com/");
    }

    #[test]
    fn test_parse_page_snippet_is_bounded() {
        let body = "word ".repeat(500);
        let html = format!("<title>T</title><body>{}</body>", body);
        let page = parse_page("https://example.com", &html);
        assert_eq!(page.title, "T");
        assert_eq!(page.snippet.chars().count(), SNIPPET_CHARS);
    }
}
