//! Topical term and location mining over a page corpus

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::collections::HashMap;

use super::forbidden::has_forbidden_term;
use crate::domain::entities::{merged_corpus, ParsedPage, SiteContext};
use crate::util::unique;

/// Terms computed before the forbidden filter
const CONTEXT_TERM_POOL: usize = 22;
/// Terms kept in the context
const CONTEXT_TERM_LIMIT: usize = 16;
const LOCATION_LIMIT: usize = 6;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][a-z0-9-]{3,}").unwrap());
static CAPITALIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]{2,}(?:\s+[A-Z][a-z]{2,}){0,2}\b").unwrap());

pub const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "been", "being", "below", "between", "both",
    "because", "before", "cannot", "could", "every", "from", "have", "having", "into",
    "just", "like", "many", "more", "most", "other", "over", "same", "some", "such",
    "than", "that", "their", "there", "these", "they", "this", "those", "through",
    "under", "very", "what", "when", "where", "which", "while", "with", "your",
    "http", "https", "www", "home", "page", "contact", "privacy", "terms", "cookie",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Most frequent non-stop-word terms, by descending count.
/// Equal counts keep first-seen order.
pub fn top_terms(text: &str, count: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in WORD_RE.find_iter(&lower).map(|m| m.as_str()) {
        if is_stop_word(word) {
            continue;
        }
        match index.get(word) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(word, order.len());
                order.push((word, 1));
            }
        }
    }

    // Stable: ties stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(count)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Capitalized 1-3 word phrases from titles, descriptions and headings that
/// could name a place
pub fn extract_location_candidates(pages: &[ParsedPage], forbidden_terms: &[String]) -> Vec<String> {
    let source = pages
        .iter()
        .map(|page| {
            let mut parts = vec![page.title.as_str(), page.meta_description.as_str()];
            parts.extend(page.headings.iter().map(String::as_str));
            parts.join(" | ")
        })
        .collect::<Vec<_>>()
        .join(" | ");

    let candidates = CAPITALIZED_RE
        .find_iter(&source)
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| value.chars().count() >= 3)
        .filter(|value| !has_forbidden_term(value, forbidden_terms))
        .filter(|value| !is_stop_word(&value.to_lowercase()));

    unique(candidates).into_iter().take(LOCATION_LIMIT).collect()
}

fn page_summary(index: usize, page: &ParsedPage) -> String {
    let or_na = |s: &str| if s.is_empty() { "n/a".to_string() } else { s.to_string() };
    let headings = if page.headings.is_empty() {
        "n/a".to_string()
    } else {
        page.headings.join(" | ")
    };

    [
        format!("Page {} ({})", index + 1, page.path()),
        format!("Title: {}", or_na(&page.title)),
        format!("Description: {}", or_na(&page.meta_description)),
        format!("Headings: {}", headings),
        format!("Snippet: {}", page.snippet),
    ]
    .join("\n")
}

/// Digest of the crawled pages plus mined terms and locations
pub fn build_context(domain: &str, pages: &[ParsedPage], forbidden_terms: &[String]) -> SiteContext {
    let page_summaries = pages
        .iter()
        .enumerate()
        .map(|(i, page)| page_summary(i, page))
        .collect::<Vec<_>>()
        .join("\n\n");

    let suggested_terms = top_terms(&merged_corpus(pages), CONTEXT_TERM_POOL)
        .into_iter()
        .filter(|term| !has_forbidden_term(term, forbidden_terms))
        .take(CONTEXT_TERM_LIMIT)
        .collect();

    SiteContext {
        summary: [
            format!("Domain: {}", domain),
            format!("Pages analyzed: {}", pages.len()),
            page_summaries,
        ]
        .join("\n\n"),
        suggested_terms,
        location_candidates: extract_location_candidates(pages, forbidden_terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, description: &str, headings: &[&str], snippet: &str) -> ParsedPage {
        ParsedPage {
            url: "https://acme.com/services".to_string(),
            title: title.to_string(),
            meta_description: description.to_string(),
            headings: headings.iter().map(|h| h.to_string()).collect(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_top_terms_orders_by_frequency() {
        let text = "Plumbing repair, plumbing install, PLUMBING advice. Boiler repair. Drain.";
        assert_eq!(top_terms(text, 3), vec!["plumbing", "repair", "install"]);
    }

    #[test]
    fn test_top_terms_skips_stop_words_and_short_words() {
        let text = "about your home page with the best cats and dogs";
        assert_eq!(top_terms(text, 10), vec!["best", "cats", "dogs"]);
    }

    #[test]
    fn test_top_terms_deterministic() {
        let text = "alpha beta gamma delta alpha gamma epsilon zeta beta";
        assert_eq!(top_terms(text, 5), top_terms(text, 5));
        assert_eq!(top_terms(text, 3), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_location_candidates() {
        let pages = vec![page(
            "Acme Plumbing - Leeds",
            "Emergency plumbers serving Leeds and North Yorkshire",
            &["Contact", "Our Team In Harrogate"],
            "",
        )];
        let forbidden = vec!["acme".to_string()];
        let locations = extract_location_candidates(&pages, &forbidden);

        assert_eq!(
            locations,
            vec!["Leeds", "Emergency", "North Yorkshire", "Our Team", "Harrogate"]
        );
    }

    #[test]
    fn test_location_candidates_capped() {
        let headings = ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf"];
        let pages = vec![page("", "", &headings, "")];
        assert_eq!(extract_location_candidates(&pages, &[]).len(), 6);
    }

    #[test]
    fn test_build_context() {
        let pages = vec![page(
            "Acme | Boiler Service",
            "Boiler repair in Leeds",
            &["Boiler installs"],
            "acme boiler boiler repair",
        )];
        let forbidden = vec!["acme".to_string(), "acme.com".to_string()];
        let context = build_context("acme.com", &pages, &forbidden);

        assert!(context.summary.starts_with("Domain: acme.com\n\nPages analyzed: 1\n\nPage 1 (/services)"));
        assert!(context.summary.contains("Headings: Boiler installs"));
        assert_eq!(context.suggested_terms[0], "boiler");
        assert!(!context.suggested_terms.iter().any(|t| t.contains("acme")));
        assert!(context.location_candidates.contains(&"Leeds".to_string()));
    }
}
