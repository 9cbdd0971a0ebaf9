use serde::{Deserialize, Serialize};

use super::{ProviderKind, Signal};

/// One prompt sent to one provider model, with the signals found in the reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    pub prompt_id: i64,
    pub provider: String,
    pub model: String,
    pub response: String,
    pub signals: Signal,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWithPrompt {
    #[serde(flatten)]
    pub run: Run,
    pub prompt_name: String,
    pub prompt_content: String,
}

/// Provider and model pair a prompt is sent to, written `provider:model`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTarget {
    pub provider: ProviderKind,
    pub model: String,
}

impl std::str::FromStr for RunTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected provider:model, got {}", s))?;
        let model = model.trim();
        if model.is_empty() {
            return Err(format!("Missing model in {}", s));
        }
        Ok(Self {
            provider: provider.trim().parse()?,
            model: model.to_string(),
        })
    }
}
