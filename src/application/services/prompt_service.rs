//! Prompt library, collections and single-prompt generation

use std::sync::Arc;
use tracing::warn;

use crate::application::errors::{PromptError, StorageError};
use crate::domain::entities::{Collection, Prompt, ProviderKind};
use crate::domain::traits::Store;
use crate::infrastructure::llm::{LLMConfig, ProviderFactory};

pub const DEFAULT_PROMPT_LIMIT: usize = 200;
pub const MAX_PROMPT_LIMIT: usize = 500;

/// Providers tried, in order, for single-prompt generation
const GENERATION_PROVIDERS: [ProviderKind; 2] = [ProviderKind::OpenAI, ProviderKind::Anthropic];

const SYSTEM_PROMPT: &str = "You are an expert at creating prompts for testing AI visibility and GEO (Generative Engine Optimization).

Your task is to generate a natural, conversational prompt that a real user might ask an AI assistant. The prompt should:
1. Be a genuine question or request that would naturally lead to product/service recommendations
2. Include relevant context that makes the question specific and realistic
3. Be phrased naturally, as a real person would ask
4. Be optimized for GEO - designed to surface mentions of specific brands/products in AI responses

Do NOT:
- Include any meta-instructions or explanations
- Make the prompt sound artificial or SEO-stuffed
- Use generic phrasing

Output ONLY the prompt text, nothing else.";

/// Clamp a requested list size to `1..=500`; missing means 200
pub fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_PROMPT_LIMIT,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).unwrap_or(MAX_PROMPT_LIMIT).min(MAX_PROMPT_LIMIT),
    }
}

fn generation_request(topic: &str, category: Option<&str>) -> String {
    let mut message = format!("{}\n\nGenerate a GEO-optimized prompt about: {}", SYSTEM_PROMPT, topic);
    if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
        message.push_str(&format!("\nCategory: {}", category));
    }
    message
}

pub struct PromptService {
    store: Arc<dyn Store>,
    providers: Arc<dyn ProviderFactory>,
    llm: LLMConfig,
}

impl PromptService {
    pub fn new(store: Arc<dyn Store>, providers: Arc<dyn ProviderFactory>, llm: LLMConfig) -> Self {
        Self { store, providers, llm }
    }

    pub async fn list_prompts(&self, limit: Option<i64>) -> Result<Vec<Prompt>, PromptError> {
        Ok(self.store.list_prompts(clamp_limit(limit)).await?)
    }

    pub async fn create_prompt(&self, name: &str, content: &str, category: Option<&str>) -> Result<Prompt, PromptError> {
        let (name, content) = (name.trim(), content.trim());
        if name.is_empty() || content.is_empty() {
            return Err(PromptError::InvalidRequest("Name and content are required".to_string()));
        }
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.store.insert_prompt(name, content, category).await?)
    }

    pub async fn delete_prompt(&self, id: i64) -> Result<(), PromptError> {
        if self.store.delete_prompt(id).await? {
            Ok(())
        } else {
            Err(PromptError::NotFound(format!("prompt {}", id)))
        }
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, PromptError> {
        Ok(self.store.list_collections().await?)
    }

    pub async fn create_collection(&self, name: &str, prompt_ids: &[i64]) -> Result<Collection, PromptError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PromptError::InvalidRequest("Name is required".to_string()));
        }
        Ok(self.store.create_collection(name, prompt_ids).await?)
    }

    /// Replace the prompts of a collection
    pub async fn set_collection_prompts(&self, id: i64, prompt_ids: &[i64]) -> Result<(), PromptError> {
        self.store.set_collection_prompts(id, prompt_ids).await.map_err(|e| match e {
            StorageError::NotFound(what) => PromptError::NotFound(what),
            other => other.into(),
        })
    }

    pub async fn delete_collection(&self, id: i64) -> Result<(), PromptError> {
        if self.store.delete_collection(id).await? {
            Ok(())
        } else {
            Err(PromptError::NotFound(format!("collection {}", id)))
        }
    }

    /// Draft one natural user question about `topic`.
    ///
    /// Tries OpenAI, then Anthropic, with whichever keys are configured.
    pub async fn generate_prompt(&self, topic: &str, category: Option<&str>) -> Result<String, PromptError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PromptError::InvalidRequest("Topic is required".to_string()));
        }

        let settings = self.store.get_settings().await?.with_fallback_keys(
            self.llm.api_key(ProviderKind::OpenAI),
            self.llm.api_key(ProviderKind::Anthropic),
            self.llm.api_key(ProviderKind::Perplexity),
        );
        let request = generation_request(topic, category);

        for kind in GENERATION_PROVIDERS {
            let Some(api_key) = settings.api_key(kind) else {
                continue;
            };

            match self.providers.create(kind, api_key).query(&request, self.llm.model(kind)).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(_) => warn!(provider = kind.as_str(), "Prompt generation returned no text"),
                Err(e) => warn!(provider = kind.as_str(), "Prompt generation failed: {}", e),
            }
        }

        Err(PromptError::GenerationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), 200);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-4)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(10_000)), 500);
    }

    #[test]
    fn test_generation_request() {
        let request = generation_request("running shoes", Some(" comparison "));
        assert!(request.starts_with("You are an expert"));
        assert!(request.ends_with("Generate a GEO-optimized prompt about: running shoes\nCategory: comparison"));
        assert!(!generation_request("shoes", Some("")).contains("Category:"));
    }
}
