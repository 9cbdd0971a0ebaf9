//! Deterministic, offline prompt generator
//!
//! Fills five question templates from the most frequent site terms and the
//! mined locations. Always produces exactly the requested number of prompts.

use super::forbidden::has_forbidden_term;
use super::terms::top_terms;
use crate::domain::entities::{merged_corpus, ModelOutput, ParsedPage, PromptCandidate, PromptCategory};
use crate::util::truncate_chars;

/// Terms mined for the template slots
const FALLBACK_TERM_POOL: usize = 24;
const NAME_MAX_CHARS: usize = 60;
const DEFAULT_LOCATIONS: [&str; 3] = ["Paris", "London", "New York"];
/// Used when every default location is itself forbidden
const GENERIC_LOCATION: &str = "my area";

fn render(category: PromptCategory, term_a: &str, term_b: &str, audience: &str, location: &str) -> String {
    match category {
        PromptCategory::Informational => {
            format!("What should {audience} know before choosing {term_a} in {location}?")
        }
        PromptCategory::Commercial => {
            format!("What are the best {term_a} providers offering {term_b} for {audience} in {location}?")
        }
        PromptCategory::Transactional => {
            format!("I need {term_a} for {audience} in {location}. Which company should I contact first?")
        }
        PromptCategory::Comparison => {
            format!("Compare top {term_a} options in {location} and explain how {term_b} differs for {audience}.")
        }
        PromptCategory::Local => {
            format!("What does {term_a} usually include for {audience} in {location}, and how is {term_b} handled?")
        }
    }
}

fn fallback_locations(location_candidates: &[String], forbidden_terms: &[String]) -> Vec<String> {
    if !location_candidates.is_empty() {
        return location_candidates.to_vec();
    }

    let defaults: Vec<String> = DEFAULT_LOCATIONS
        .iter()
        .map(|l| l.to_string())
        .filter(|l| !has_forbidden_term(l, forbidden_terms))
        .collect();

    if defaults.is_empty() {
        vec![GENERIC_LOCATION.to_string()]
    } else {
        defaults
    }
}

/// Template prompts built from the page corpus
pub fn build_fallback(
    pages: &[ParsedPage],
    count: usize,
    forbidden_terms: &[String],
    location_candidates: &[String],
) -> ModelOutput {
    let terms: Vec<String> = top_terms(&merged_corpus(pages), FALLBACK_TERM_POOL)
        .into_iter()
        .filter(|term| !has_forbidden_term(term, forbidden_terms))
        .collect();

    let primary_term = terms.first().map(String::as_str).unwrap_or("services");
    let secondary_term = terms.get(1).map(String::as_str).unwrap_or("support");
    let audience = terms.get(2).map(String::as_str).unwrap_or("businesses");
    let locations = fallback_locations(location_candidates, forbidden_terms);

    let prompts = (0..count)
        .map(|index| {
            let category = PromptCategory::ALL[index % PromptCategory::ALL.len()];
            let term_a = terms
                .get(index % terms.len().max(1))
                .map(String::as_str)
                .unwrap_or(primary_term);
            let term_b = terms
                .get((index + 1) % terms.len().max(1))
                .map(String::as_str)
                .unwrap_or(secondary_term);
            let location = &locations[index % locations.len()];

            let name = format!("{}: {}", category, term_a);
            PromptCandidate {
                name: truncate_chars(&name, NAME_MAX_CHARS).to_string(),
                content: render(category, term_a, term_b, audience, location),
                category: Some(category.as_str().to_string()),
                best_page_url: None,
            }
        })
        .collect();

    let mut discoveries = Vec::new();
    if !terms.is_empty() {
        let top: Vec<&str> = terms.iter().take(5).map(String::as_str).collect();
        discoveries.push(format!("Top repeated topics: {}", top.join(", ")));
    }
    discoveries.push(format!("Generated fallback prompts from {} scanned pages.", pages.len()));
    discoveries.push("Run a GEO batch now to validate mention and citation rates.".to_string());

    ModelOutput { discoveries, prompts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<ParsedPage> {
        vec![ParsedPage {
            url: "https://acme.com".to_string(),
            title: "Acme Heating".to_string(),
            meta_description: "Boiler repair and boiler servicing for landlords".to_string(),
            headings: vec!["Boiler repair".to_string(), "Radiators".to_string()],
            snippet: "acme boiler repair radiators landlords heating".to_string(),
        }]
    }

    #[test]
    fn test_exact_count_for_all_valid_counts() {
        let forbidden = vec!["acme".to_string()];
        for count in 10..=40 {
            let output = build_fallback(&pages(), count, &forbidden, &[]);
            assert_eq!(output.prompts.len(), count);
            for prompt in &output.prompts {
                assert!(!prompt.content.trim().is_empty());
                let category = prompt.category.as_deref().unwrap();
                assert!(PromptCategory::ALL.iter().any(|c| c.as_str() == category));
            }
        }
    }

    #[test]
    fn test_no_forbidden_terms_leak() {
        let forbidden = vec!["acme".to_string(), "acme.com".to_string()];
        let output = build_fallback(&pages(), 20, &forbidden, &["Leeds".to_string()]);
        assert!(output
            .prompts
            .iter()
            .all(|p| !has_forbidden_term(&p.content, &forbidden) && !has_forbidden_term(&p.name, &forbidden)));
        assert!(output.prompts.iter().all(|p| p.content.contains("Leeds")));
    }

    #[test]
    fn test_templates_rotate() {
        let output = build_fallback(&pages(), 6, &[], &[]);
        let categories: Vec<_> = output.prompts.iter().filter_map(|p| p.category.as_deref()).collect();
        assert_eq!(
            categories,
            vec!["informational", "commercial", "transactional", "comparison", "local", "informational"]
        );
        assert!(output.prompts[0].content.ends_with("in Paris?"));
        assert!(output.prompts[1].content.contains("in London"));
        assert!(output.prompts[2].content.contains("in New York"));
    }

    #[test]
    fn test_empty_corpus_uses_generic_terms() {
        let output = build_fallback(&[], 10, &["paris".to_string()], &[]);
        assert_eq!(output.prompts.len(), 10);
        assert!(output.prompts[0].content.contains("services"));
        assert!(output.prompts.iter().all(|p| !p.content.contains("Paris")));
        assert_eq!(output.discoveries[0], "Generated fallback prompts from 0 scanned pages.");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(build_fallback(&pages(), 12, &[], &[]), build_fallback(&pages(), 12, &[], &[]));
    }
}
