//! LLM integration - Multi-provider AI support

pub mod config;
pub mod providers;
pub mod traits;

pub use config::LLMConfig;
pub use providers::{
    AnthropicProvider, HttpProviderFactory, OpenAIProvider, PerplexityProvider, ProviderFactory,
};
pub use traits::{LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, DEFAULT_MAX_TOKENS, LLM};
