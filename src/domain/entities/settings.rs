use serde::{Deserialize, Serialize};

use super::ProviderKind;

/// Single-row application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub tracked_domain: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub updated_at: String,
}

impl Settings {
    /// Configured key for a provider; blank keys count as missing
    pub fn api_key(&self, provider: ProviderKind) -> Option<&str> {
        let key = match provider {
            ProviderKind::OpenAI => self.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Perplexity => self.perplexity_api_key.as_deref(),
        };
        key.map(str::trim).filter(|k| !k.is_empty())
    }

    /// Fill missing keys from another source (environment)
    pub fn with_fallback_keys(
        mut self,
        openai: Option<&str>,
        anthropic: Option<&str>,
        perplexity: Option<&str>,
    ) -> Self {
        if self.api_key(ProviderKind::OpenAI).is_none() {
            self.openai_api_key = openai.map(str::to_string);
        }
        if self.api_key(ProviderKind::Anthropic).is_none() {
            self.anthropic_api_key = anthropic.map(str::to_string);
        }
        if self.api_key(ProviderKind::Perplexity).is_none() {
            self.perplexity_api_key = perplexity.map(str::to_string);
        }
        self
    }

    /// Copy safe to display: keys reduced to `***` plus their last 4 chars,
    /// blank keys dropped
    pub fn masked(&self) -> Self {
        Self {
            tracked_domain: self.tracked_domain.clone(),
            openai_api_key: self.api_key(ProviderKind::OpenAI).map(mask_key),
            anthropic_api_key: self.api_key(ProviderKind::Anthropic).map(mask_key),
            perplexity_api_key: self.api_key(ProviderKind::Perplexity).map(mask_key),
            updated_at: self.updated_at.clone(),
        }
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("***{}", tail)
}

/// Partial settings update.
///
/// `None` leaves a field untouched. Keys that still carry the `***` mask are
/// ignored, and an empty key clears the stored value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SettingsUpdate {
    pub tracked_domain: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
}

impl SettingsUpdate {
    /// Key updates to apply, as (column, new value)
    pub fn key_changes(&self) -> Vec<(&'static str, Option<String>)> {
        [
            ("openai_api_key", &self.openai_api_key),
            ("anthropic_api_key", &self.anthropic_api_key),
            ("perplexity_api_key", &self.perplexity_api_key),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            let value = value.as_ref()?;
            if value.starts_with("***") {
                return None;
            }
            let value = value.trim();
            Some((column, (!value.is_empty()).then(|| value.to_string())))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked() {
        let settings = Settings {
            openai_api_key: Some("sk-abcdef1234".to_string()),
            anthropic_api_key: Some("ab".to_string()),
            ..Default::default()
        };
        let masked = settings.masked();
        assert_eq!(masked.openai_api_key.as_deref(), Some("***1234"));
        assert_eq!(masked.anthropic_api_key.as_deref(), Some("***ab"));
        assert_eq!(masked.perplexity_api_key, None);
    }

    #[test]
    fn test_masked_drops_blank_keys() {
        let settings = Settings {
            openai_api_key: Some(String::new()),
            perplexity_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let masked = settings.masked();
        assert_eq!(masked.openai_api_key, None);
        assert_eq!(masked.perplexity_api_key, None);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let settings = Settings {
            openai_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.api_key(ProviderKind::OpenAI), None);
    }

    #[test]
    fn test_fallback_keys_do_not_override() {
        let settings = Settings {
            openai_api_key: Some("stored".to_string()),
            ..Default::default()
        }
        .with_fallback_keys(Some("env-openai"), Some("env-anthropic"), None);
        assert_eq!(settings.api_key(ProviderKind::OpenAI), Some("stored"));
        assert_eq!(settings.api_key(ProviderKind::Anthropic), Some("env-anthropic"));
        assert_eq!(settings.api_key(ProviderKind::Perplexity), None);
    }

    #[test]
    fn test_key_changes_skip_masked_and_clear_empty() {
        let update = SettingsUpdate {
            tracked_domain: None,
            openai_api_key: Some("***1234".to_string()),
            anthropic_api_key: Some("".to_string()),
            perplexity_api_key: Some("pplx-new".to_string()),
        };
        assert_eq!(
            update.key_changes(),
            vec![
                ("anthropic_api_key", None),
                ("perplexity_api_key", Some("pplx-new".to_string())),
            ]
        );
    }
}
