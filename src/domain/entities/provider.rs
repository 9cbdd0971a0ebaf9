//! Provider catalogue

use serde::{Deserialize, Serialize};

/// AI chat provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Perplexity,
}

impl ProviderKind {
    /// Priority order used when generating prompts
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Perplexity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Perplexity => "perplexity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Perplexity => "Perplexity",
        }
    }

    /// Models offered for visibility runs
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAI => &["gpt-4o-search-preview", "gpt-4o", "gpt-4o-mini"],
            ProviderKind::Anthropic => &["claude-sonnet-4-20250514", "claude-haiku-4-20250514"],
            ProviderKind::Perplexity => &["sonar-pro", "sonar"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "perplexity" => Ok(ProviderKind::Perplexity),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}
