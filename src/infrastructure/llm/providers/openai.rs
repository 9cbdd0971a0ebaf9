//! OpenAI Provider

use async_trait::async_trait;
use reqwest::Client;

use super::openai_compat::{chat_completion, ChatRequest, WebSearchOptions};
use crate::infrastructure::llm::{LLMMessage, LLMResponse, LLMResult, LLM};

/// OpenAI API endpoint
const API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider
pub struct OpenAIProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or("gpt-4o").to_string(),
        }
    }

    /// Get base URL for API
    fn base_url(&self) -> String {
        format!("{}/chat/completions", API_BASE)
    }
}

/// Search-preview models browse the web when asked to
fn search_options(model: &str) -> Option<WebSearchOptions> {
    model.contains("search").then_some(WebSearchOptions {
        search_context_size: "medium",
    })
}

#[async_trait]
impl LLM for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
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
            messages: &messages,
            temperature,
            max_tokens,
            web_search_options: search_options(model),
        };

        chat_completion(&self.client, &self.base_url(), &self.api_key, &request).await
    }

    async fn test_connection(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/models", API_BASE))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await;

        matches!(result, Ok(response) if response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_only_for_search_models() {
        assert!(search_options("gpt-4o-search-preview").is_some());
        assert!(search_options("gpt-4o-mini").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires OPENAI_API_KEY environment variable
    async fn test_openai_query() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let provider = OpenAIProvider::new(api_key, None);

        let reply = provider
            .query("Say 'hello' in exactly one word.", "gpt-4o-mini")
            .await
            .expect("Query failed");

        assert!(!reply.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_invalid_key_fails_connection_test() {
        let provider = OpenAIProvider::new("sk-invalid", None);
        assert!(!provider.test_connection().await);
    }
}
