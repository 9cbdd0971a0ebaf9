//! LLM Configuration

use serde::{Deserialize, Serialize};

use crate::domain::entities::ProviderKind;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-haiku-4-20250514";
const DEFAULT_PERPLEXITY_MODEL: &str = "sonar";

/// LLM Configuration
///
/// Models are the ones used for prompt generation. API keys only come from
/// the environment and back up keys missing from stored settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    #[serde(skip)]
    pub openai_api_key: Option<String>,
    #[serde(skip)]
    pub anthropic_api_key: Option<String>,
    #[serde(skip)]
    pub perplexity_api_key: Option<String>,

    /// Default model for each provider
    pub openai_model: Option<String>,
    pub anthropic_model: Option<String>,
    pub perplexity_model: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            perplexity_api_key: None,
            openai_model: Some(DEFAULT_OPENAI_MODEL.to_string()),
            anthropic_model: Some(DEFAULT_ANTHROPIC_MODEL.to_string()),
            perplexity_model: Some(DEFAULT_PERPLEXITY_MODEL.to_string()),
        }
    }
}

impl LLMConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Overlay environment variables
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        } else if let Ok(key) = std::env::var("CLAUDE_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("PERPLEXITY_API_KEY") {
            self.perplexity_api_key = Some(key);
        }

        if let Ok(model) = std::env::var("GEO_OPENAI_MODEL") {
            self.openai_model = Some(model);
        }
        if let Ok(model) = std::env::var("GEO_ANTHROPIC_MODEL") {
            self.anthropic_model = Some(model);
        }
        if let Ok(model) = std::env::var("GEO_PERPLEXITY_MODEL") {
            self.perplexity_model = Some(model);
        }

        self
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::OpenAI => self.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Perplexity => self.perplexity_api_key.as_deref(),
        }
    }

    /// Get model for a provider
    pub fn model(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::OpenAI => self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL),
            ProviderKind::Anthropic => self.anthropic_model.as_deref().unwrap_or(DEFAULT_ANTHROPIC_MODEL),
            ProviderKind::Perplexity => self.perplexity_model.as_deref().unwrap_or(DEFAULT_PERPLEXITY_MODEL),
        }
    }
}
