//! Self-identifying terms that must never leak into generated prompts

use crate::domain::entities::ParsedPage;
use crate::util::unique;

/// Shortest term worth forbidding
const MIN_TERM_CHARS: usize = 3;

/// Lowercase alphanumeric tokens of at least three chars
fn slug_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

/// Domain without its last dot-segment
fn domain_root(domain: &str) -> &str {
    match domain.rsplit_once('.') {
        Some((root, tld))
            if !tld.is_empty() && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') =>
        {
            root
        }
        _ => domain,
    }
}

/// Homepage title up to the first `-`, `|` or `:` separator
fn title_root(title: &str) -> &str {
    let root = title.split(['-', '|', ':']).next().unwrap_or("").trim();
    if root.is_empty() {
        title.trim()
    } else {
        root
    }
}

/// Terms identifying the site: the domain, its root and root tokens, and the
/// homepage title root and its tokens. Lowercase, unique, three chars or more.
pub fn build_forbidden_terms(domain: &str, pages: &[ParsedPage]) -> Vec<String> {
    let mut terms = vec![domain.to_lowercase()];

    let root = domain_root(domain);
    terms.extend(slug_tokens(root));
    terms.push(root.to_lowercase());

    if let Some(title) = pages.first().map(|p| p.title.as_str()).filter(|t| !t.trim().is_empty()) {
        let root = title_root(title);
        terms.extend(slug_tokens(root));
        terms.push(root.to_lowercase());
    }

    unique(
        terms
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| t.chars().count() >= MIN_TERM_CHARS),
    )
}

/// Case-insensitive substring test against every term
pub fn has_forbidden_term(text: &str, terms: &[String]) -> bool {
    let lower = text.to_lowercase();
    terms.iter().any(|term| {
        let term = term.trim().to_lowercase();
        !term.is_empty() && lower.contains(&term)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home(title: &str) -> Vec<ParsedPage> {
        vec![ParsedPage {
            url: "https://acme-plumbing.co.uk".to_string(),
            title: title.to_string(),
            meta_description: String::new(),
            headings: Vec::new(),
            snippet: String::new(),
        }]
    }

    #[test]
    fn test_domain_terms() {
        let terms = build_forbidden_terms("acme-plumbing.co.uk", &[]);
        assert_eq!(terms, vec!["acme-plumbing.co.uk", "acme", "plumbing", "acme-plumbing.co"]);
    }

    #[test]
    fn test_title_terms() {
        let terms = build_forbidden_terms("bestfix.io", &home("BestFix Pros | Emergency repairs: 24/7"));
        assert!(terms.contains(&"bestfix.io".to_string()));
        assert!(terms.contains(&"bestfix".to_string()));
        assert!(terms.contains(&"pros".to_string()));
        assert!(terms.contains(&"bestfix pros".to_string()));
        assert!(!terms.iter().any(|t| t.contains("emergency")));
        // "bestfix" appears once despite coming from domain and title
        assert_eq!(terms.iter().filter(|t| *t == "bestfix").count(), 1);
    }

    #[test]
    fn test_short_terms_dropped() {
        let terms = build_forbidden_terms("ab.io", &home("Go"));
        assert_eq!(terms, vec!["ab.io"]);
    }

    #[test]
    fn test_has_forbidden_term() {
        let terms = vec!["acme".to_string(), "acme.com".to_string()];
        assert!(has_forbidden_term("Is ACME any good?", &terms));
        assert!(!has_forbidden_term("Best plumbers in Leeds", &terms));
        assert!(!has_forbidden_term("anything", &[String::new()]));
    }
}
