//! Cleanup of prompt candidates before they are stored

use std::collections::HashSet;

use super::forbidden::has_forbidden_term;
use crate::domain::entities::PromptCandidate;
use crate::util::truncate_chars;

/// Content longer than this gets a shortened derived name
const NAME_PREVIEW_MAX: usize = 56;
const NAME_PREVIEW_CUT: usize = 53;

fn preview_name(content: &str) -> String {
    if content.chars().count() > NAME_PREVIEW_MAX {
        format!("{}...", truncate_chars(content, NAME_PREVIEW_CUT).trim())
    } else {
        content.to_string()
    }
}

fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Drop empty, forbidden and duplicate candidates and cap at `count`.
///
/// Duplicates compare lowercase content. A blank name is replaced with a
/// preview of the content.
pub fn normalize_prompt_candidates(
    candidates: &[PromptCandidate],
    count: usize,
    forbidden_terms: &[String],
) -> Vec<PromptCandidate> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for candidate in candidates {
        if normalized.len() >= count {
            break;
        }

        let content = candidate.content.trim();
        if content.is_empty() {
            continue;
        }
        if has_forbidden_term(content, forbidden_terms) || has_forbidden_term(&candidate.name, forbidden_terms) {
            continue;
        }
        if !seen.insert(content.to_lowercase()) {
            continue;
        }

        let name = candidate.name.trim();
        normalized.push(PromptCandidate {
            name: if name.is_empty() { preview_name(content) } else { name.to_string() },
            content: content.to_string(),
            category: trimmed_or_none(candidate.category.as_deref()),
            best_page_url: trimmed_or_none(candidate.best_page_url.as_deref()),
        });
    }

    normalized
}

/// Append `extra` prompts whose content is not already present until
/// `count` is reached
pub fn top_up(prompts: &mut Vec<PromptCandidate>, extra: Vec<PromptCandidate>, count: usize) {
    for candidate in extra {
        if prompts.len() >= count {
            break;
        }
        let key = candidate.content.to_lowercase();
        if prompts.iter().any(|p| p.content.to_lowercase() == key) {
            continue;
        }
        prompts.push(candidate);
    }
}
