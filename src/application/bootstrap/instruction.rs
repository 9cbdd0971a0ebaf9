//! Instruction payload sent to providers for prompt generation

use crate::domain::entities::{PromptCategory, SiteContext};

/// Single user message asking a model for `count` unbranded prompts
pub fn build_instruction(count: usize, context: &SiteContext, forbidden_terms: &[String]) -> String {
    let categories: Vec<&str> = PromptCategory::ALL.iter().map(|c| c.as_str()).collect();

    let mut lines = vec![
        "Generate starter GEO prompts for this website.".to_string(),
        "Primary goal: evaluate whether this website appears in generic, non-branded searches.".to_string(),
        r#"Return JSON only with this schema: {"discoveries": string[], "prompts": [{"name": string, "content": string, "category": string, "best_page_url": string|null}]}."#.to_string(),
        format!("Generate exactly {} prompts.", count),
        format!("Categories should be one of: {}.", categories.join(", ")),
        "Prompts must be natural user questions, specific, and non-duplicated.".to_string(),
        "Do not include or mention the website/app/company name in any prompt.".to_string(),
        "Do not include domain names in any prompt.".to_string(),
        format!("Forbidden terms: {}", forbidden_terms.join(", ")),
    ];

    if context.location_candidates.is_empty() {
        lines.push("Include local intent in many prompts and include city/region wording where natural.".to_string());
    } else {
        lines.push(format!(
            "Include local intent in many prompts and use these locations when relevant: {}",
            context.location_candidates.join(", ")
        ));
    }

    lines.push("If you are unsure about best_page_url, set it to null.".to_string());

    if !context.suggested_terms.is_empty() {
        lines.push(format!("Suggested terms: {}", context.suggested_terms.join(", ")));
    }

    lines.push(String::new());
    lines.push(context.summary.clone());
    lines.join("\n")
}
