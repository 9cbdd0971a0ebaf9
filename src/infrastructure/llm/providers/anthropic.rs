//! Anthropic Provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::{
    LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, DEFAULT_MAX_TOKENS, LLM,
};

/// Anthropic API endpoint
const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
/// Model used for connectivity checks
const TEST_MODEL: &str = "claude-haiku-4-20250514";

/// Anthropic provider
pub struct AnthropicProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or("claude-sonnet-4-20250514").to_string(),
        }
    }

    /// Get base URL for API
    fn base_url(&self) -> String {
        format!("{}/messages", API_BASE)
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<Usage>,
}

/// Content block
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Usage information
#[derive(Deserialize, Debug)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Text blocks joined by newlines; other block types are dropped
fn into_response(chat_response: ChatResponse, model: &str) -> LLMResponse {
    let content = chat_response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let usage = chat_response.usage.map(|u| LLMUsage {
        prompt_tokens: Some(u.input_tokens),
        completion_tokens: Some(u.output_tokens),
        total_tokens: Some(u.input_tokens + u.output_tokens),
    });

    LLMResponse {
        content,
        model: model.to_string(),
        usage,
        finish_reason: chat_response.stop_reason,
    }
}

#[async_trait]
impl LLM for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        let model = model.unwrap_or(&self.model);

        let request = ChatRequest {
            model,
            max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages: &messages,
            temperature,
        };

        let response = self
            .client
            .post(self.base_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        Ok(into_response(chat_response, model))
    }

    async fn test_connection(&self) -> bool {
        self.chat(vec![LLMMessage::user("Hi")], Some(TEST_MODEL), None, Some(10))
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_joins_text_blocks() {
        let body = r#"{
            "id": "msg_1", "type": "message", "role": "assistant",
            "content": [
                {"type": "text", "text": "First"},
                {"type": "tool_use", "id": "t1", "name": "search", "input": {}},
                {"type": "text", "text": "Second"}
            ],
            "stop_reason": "end_turn", "stop_sequence": null,
            "usage": {"input_tokens": 10, "output_tokens": 4}
        }"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        let response = into_response(chat, "claude-haiku-4-20250514");

        assert_eq!(response.content, "First\nSecond");
        assert_eq!(response.finish_reason.as_deref(), Some("end_turn"));
        assert_eq!(response.usage.unwrap().total_tokens, Some(14));
    }

    #[test]
    fn test_request_always_sets_max_tokens() {
        let messages = vec![LLMMessage::user("Hi")];
        let request = ChatRequest {
            model: "claude-haiku-4-20250514",
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: &messages,
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 2048);
        assert!(json.get("temperature").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires ANTHROPIC_API_KEY environment variable
    async fn test_anthropic_query() {
        let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");
        let provider = AnthropicProvider::new(api_key, None);

        let reply = provider
            .query("What is 2+2? Answer with a number.", TEST_MODEL)
            .await
            .expect("Query failed");

        assert!(reply.contains('4'));
    }
}
