//! Lenient parsing of model replies into `ModelOutput`
//!
//! Provider output is untrusted. The reply is tried as raw JSON, then as
//! the body of a fenced code block, then as the span between the first `{`
//! and the last `}`. The first attempt yielding an object with a `prompts`
//! array wins.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde_json::Value;

use crate::domain::entities::{ModelOutput, PromptCandidate};

static FENCED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)```").unwrap());

fn attempts(raw: &str) -> Vec<&str> {
    let mut attempts = vec![raw.trim()];

    if let Some(body) = FENCED_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
    {
        attempts.push(body);
    }

    if let (Some(first), Some(last)) = (raw.find('{'), raw.rfind('}')) {
        if last > first {
            attempts.push(&raw[first..=last]);
        }
    }

    attempts
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn candidate(value: &Value) -> Option<PromptCandidate> {
    let object = value.as_object()?;
    Some(PromptCandidate {
        name: object.get("name")?.as_str()?.to_string(),
        content: object.get("content")?.as_str()?.to_string(),
        category: optional_string(object.get("category")),
        best_page_url: optional_string(object.get("best_page_url")),
    })
}

fn from_value(value: &Value) -> Option<ModelOutput> {
    let prompts = value.get("prompts")?.as_array()?;

    let discoveries = value
        .get("discoveries")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    Some(ModelOutput {
        discoveries,
        prompts: prompts.iter().filter_map(candidate).collect(),
    })
}

/// `None` when no attempt parses; callers fall back to templates
pub fn parse_model_output(raw: &str) -> Option<ModelOutput> {
    attempts(raw).into_iter().find_map(|candidate| {
        serde_json::from_str::<Value>(candidate)
            .ok()
            .and_then(|value| from_value(&value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelOutput {
        ModelOutput {
            discoveries: vec!["Strong local focus".to_string()],
            prompts: vec![
                PromptCandidate::new("Boilers", "Who repairs boilers near Leeds?").with_category("local"),
                PromptCandidate::new("Costs", "How much does a new boiler cost?"),
            ],
        }
    }

    #[test]
    fn test_parses_serialized_output() {
        let raw = serde_json::to_string(&sample()).unwrap();
        assert_eq!(parse_model_output(&raw), Some(sample()));
    }

    #[test]
    fn test_rejects_non_json() {
        assert_eq!(parse_model_output("not json at all"), None);
        assert_eq!(parse_model_output(""), None);
    }

    #[test]
    fn test_parses_fenced_block() {
        let raw = "Here you go:\n```json\n{\"prompts\": [{\"name\": \"a\", \"content\": \"b\"}]}\n```\nEnjoy!";
        let output = parse_model_output(raw).unwrap();
        assert_eq!(output.prompts.len(), 1);
        assert!(output.discoveries.is_empty());
    }

    #[test]
    fn test_parses_brace_span() {
        let raw = "Sure! {\"discoveries\": [\"x\", 3, null], \"prompts\": []} Hope this helps.";
        let output = parse_model_output(raw).unwrap();
        assert_eq!(output.discoveries, vec!["x"]);
        assert!(output.prompts.is_empty());
    }

    #[test]
    fn test_requires_prompts_array() {
        assert_eq!(parse_model_output(r#"{"discoveries": ["x"]}"#), None);
        assert_eq!(parse_model_output(r#"{"prompts": "none"}"#), None);
        assert_eq!(parse_model_output(r#"["prompts"]"#), None);
    }

    #[test]
    fn test_filters_malformed_prompts() {
        let raw = r#"{"prompts": [
            {"name": "ok", "content": "Fine question?", "category": 7, "best_page_url": null},
            {"name": 1, "content": "bad name"},
            {"content": "missing name"},
            "just a string",
            null
        ]}"#;
        let output = parse_model_output(raw).unwrap();
        assert_eq!(output.prompts.len(), 1);
        assert_eq!(output.prompts[0].category, None);
    }
}
