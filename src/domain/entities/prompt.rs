//! Prompts: generated candidates and stored library entries

use serde::{Deserialize, Serialize};

/// Intent category of a test prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Informational,
    Commercial,
    Transactional,
    Comparison,
    Local,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Informational,
        PromptCategory::Commercial,
        PromptCategory::Transactional,
        PromptCategory::Comparison,
        PromptCategory::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptCategory::Informational => "informational",
            PromptCategory::Commercial => "commercial",
            PromptCategory::Transactional => "transactional",
            PromptCategory::Comparison => "comparison",
            PromptCategory::Local => "local",
        }
    }
}

impl std::fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt proposed by a model or by the template generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCandidate {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub best_page_url: Option<String>,
}

impl PromptCandidate {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            category: None,
            best_page_url: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Shape shared by parsed model replies and the fallback generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub discoveries: Vec<String>,
    pub prompts: Vec<PromptCandidate>,
}

/// Prompt stored in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: String,
}

/// Named group of library prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub prompt_ids: Vec<i64>,
}
