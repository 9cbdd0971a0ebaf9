//! LLM Providers

pub mod anthropic;
pub mod factory;
pub mod openai;
mod openai_compat;
pub mod perplexity;

pub use anthropic::AnthropicProvider;
pub use factory::{HttpProviderFactory, ProviderFactory};
pub use openai::OpenAIProvider;
pub use perplexity::PerplexityProvider;
