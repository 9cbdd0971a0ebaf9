//! Perplexity Provider - search-grounded answers over an OpenAI-compatible API

use async_trait::async_trait;
use reqwest::Client;

use super::openai_compat::{chat_completion, ChatRequest};
use crate::infrastructure::llm::{LLMMessage, LLMResponse, LLMResult, LLM};

/// Perplexity API endpoint
const API_BASE: &str = "https://api.perplexity.ai";

/// Perplexity provider
pub struct PerplexityProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl PerplexityProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or("sonar").to_string(),
        }
    }

    /// Get base URL for API
    fn base_url(&self) -> String {
        format!("{}/chat/completions", API_BASE)
    }
}

#[async_trait]
impl LLM for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        let request = ChatRequest {
            model: model.unwrap_or(&self.model),
            messages: &messages,
            temperature,
            max_tokens,
            web_search_options: None,
        };

        chat_completion(&self.client, &self.base_url(), &self.api_key, &request).await
    }

    async fn test_connection(&self) -> bool {
        self.chat(vec![LLMMessage::user("Hi")], Some("sonar"), None, Some(10))
            .await
            .is_ok()
    }
}
