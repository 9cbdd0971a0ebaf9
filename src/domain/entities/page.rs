//! Pages fetched from a site and the context mined from them

use serde::{Deserialize, Serialize};

/// One successfully fetched and parsed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPage {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    /// Distinct h1/h2 texts in document order
    pub headings: Vec<String>,
    /// Leading slice of the flattened page text
    pub snippet: String,
}

impl ParsedPage {
    /// URL path, `/` when the URL cannot be parsed
    pub fn path(&self) -> String {
        url::Url::parse(&self.url)
            .map(|u| u.path().to_string())
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Title, description, headings and snippet as one string
    pub fn merged_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.meta_description,
            self.headings.join(" "),
            self.snippet
        )
    }
}

/// Digest of a crawled site, fed to prompt synthesis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    pub summary: String,
    pub suggested_terms: Vec<String>,
    pub location_candidates: Vec<String>,
}

/// Concatenated text of all pages
pub fn merged_corpus(pages: &[ParsedPage]) -> String {
    pages
        .iter()
        .map(ParsedPage::merged_text)
        .collect::<Vec<_>>()
        .join(" ")
}
