//! Provider construction from a kind and a key

use std::sync::Arc;

use super::{AnthropicProvider, OpenAIProvider, PerplexityProvider};
use crate::domain::entities::ProviderKind;
use crate::infrastructure::llm::LLM;

/// Builds provider clients. Services take this instead of concrete
/// providers so tests can substitute scripted models.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: ProviderKind, api_key: &str) -> Arc<dyn LLM>;
}

/// Factory for the real HTTP providers
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpProviderFactory;

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, kind: ProviderKind, api_key: &str) -> Arc<dyn LLM> {
        match kind {
            ProviderKind::OpenAI => Arc::new(OpenAIProvider::new(api_key, None)),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key, None)),
            ProviderKind::Perplexity => Arc::new(PerplexityProvider::new(api_key, None)),
        }
    }
}
