//! Site bootstrap: crawl a website and seed a prompt collection from it

use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use crate::application::bootstrap::{
    build_context, build_fallback, build_forbidden_terms, build_instruction, normalize_prompt_candidates,
    parse_model_output, top_up,
};
use crate::application::errors::BootstrapError;
use crate::domain::entities::{BootstrapReport, BootstrapRequest, ModelOutput, ProviderKind, Settings};
use crate::domain::traits::{PageFetcher, Store};
use crate::infrastructure::config::Config;
use crate::infrastructure::llm::ProviderFactory;
use crate::infrastructure::webcrawler::build_site_snapshot;

const MAX_DISCOVERIES: usize = 6;

/// Website input reduced to a bare host and the URL to crawl from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteTarget {
    /// Lowercase host without `www.`
    pub domain: String,
    /// Scheme and host only
    pub base_url: String,
}

/// Parse user input such as `Example.com`, `www.example.com/about` or
/// `http://example.com`. Input without a scheme is treated as HTTPS.
pub fn normalize_website_input(input: &str) -> Result<WebsiteTarget, BootstrapError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BootstrapError::MissingDomain);
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| BootstrapError::InvalidDomain(e.to_string()))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| BootstrapError::InvalidDomain(trimmed.to_string()))?
        .to_lowercase();

    let scheme = if parsed.scheme() == "http" { "http" } else { "https" };
    let domain = host.strip_prefix("www.").unwrap_or(&host).to_string();

    Ok(WebsiteTarget {
        domain,
        base_url: format!("{}://{}", scheme, host),
    })
}

/// Service that turns a website into a stored prompt collection
pub struct BootstrapService {
    store: Arc<dyn Store>,
    fetcher: Arc<dyn PageFetcher>,
    providers: Arc<dyn ProviderFactory>,
    config: Config,
}

impl BootstrapService {
    pub fn new(
        store: Arc<dyn Store>,
        fetcher: Arc<dyn PageFetcher>,
        providers: Arc<dyn ProviderFactory>,
        config: Config,
    ) -> Self {
        Self {
            store,
            fetcher,
            providers,
            config,
        }
    }

    pub async fn bootstrap(&self, request: &BootstrapRequest) -> Result<BootstrapReport, BootstrapError> {
        let count = self.config.bootstrap.clamp_count(request.count);
        let domain = request.domain.as_deref().unwrap_or_default();
        let target = normalize_website_input(domain)?;

        info!(domain = %target.domain, count, "Bootstrapping prompts");

        let pages = build_site_snapshot(self.fetcher.as_ref(), &target.base_url, self.config.crawler.max_pages).await;
        if pages.is_empty() {
            return Err(BootstrapError::SiteUnreachable(target.base_url));
        }

        let forbidden_terms = build_forbidden_terms(&target.domain, &pages);
        let context = build_context(&target.domain, &pages, &forbidden_terms);

        let settings = self.settings_with_env_keys().await?;
        let instruction = build_instruction(count, &context, &forbidden_terms);
        let generated = self.generate_with_model(&settings, &instruction).await;

        let fallback = build_fallback(&pages, count, &forbidden_terms, &context.location_candidates);
        let (output, provider_used) = match generated {
            Some((output, kind)) => (output, Some(kind)),
            None => (fallback.clone(), None),
        };

        let mut prompts = normalize_prompt_candidates(&output.prompts, count, &forbidden_terms);
        if prompts.len() < self.config.bootstrap.min_count {
            let extra = normalize_prompt_candidates(&fallback.prompts, count, &forbidden_terms);
            top_up(&mut prompts, extra, count);
        }

        if prompts.is_empty() {
            return Err(BootstrapError::GenerationFailed);
        }

        let collection_name = format!("Auto {}", target.domain);
        let collection_id = self
            .store
            .create_collection_with_prompts(&collection_name, &prompts)
            .await
            .map_err(|e| {
                error!(collection = %collection_name, "Failed to store bootstrap prompts: {}", e);
                e
            })?;

        let discoveries = report_discoveries(&output, pages.len(), &target.domain, &context.suggested_terms);

        info!(
            collection_id,
            prompts = prompts.len(),
            provider = provider_used.map(|k| k.as_str()).unwrap_or("fallback"),
            "Bootstrap complete"
        );

        Ok(BootstrapReport {
            collection_id,
            collection_name,
            created_prompts: prompts.len(),
            discoveries,
            provider_used: provider_used.map(|k| k.as_str().to_string()),
            pages_scanned: pages.len(),
        })
    }

    async fn settings_with_env_keys(&self) -> Result<Settings, BootstrapError> {
        let llm = &self.config.llm;
        Ok(self.store.get_settings().await?.with_fallback_keys(
            llm.api_key(ProviderKind::OpenAI),
            llm.api_key(ProviderKind::Anthropic),
            llm.api_key(ProviderKind::Perplexity),
        ))
    }

    /// Ask each configured provider in priority order; the first reply that
    /// parses wins. Failures are logged and skipped.
    async fn generate_with_model(&self, settings: &Settings, instruction: &str) -> Option<(ModelOutput, ProviderKind)> {
        for kind in ProviderKind::ALL {
            let Some(api_key) = settings.api_key(kind) else {
                continue;
            };

            let provider = self.providers.create(kind, api_key);
            let model = self.config.llm.model(kind);

            match provider.query(instruction, model).await {
                Ok(raw) => match parse_model_output(&raw) {
                    Some(output) => return Some((output, kind)),
                    None => warn!(provider = kind.as_str(), "Bootstrap reply was not usable JSON"),
                },
                Err(e) => warn!(provider = kind.as_str(), "Bootstrap generation failed: {}", e),
            }
        }

        None
    }
}

fn report_discoveries(output: &ModelOutput, pages_scanned: usize, domain: &str, suggested_terms: &[String]) -> Vec<String> {
    let discoveries: Vec<String> = output
        .discoveries
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .take(MAX_DISCOVERIES)
        .map(str::to_string)
        .collect();

    if !discoveries.is_empty() {
        return discoveries;
    }

    let terms = suggested_terms.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
    vec![
        format!("Scanned {} pages from {}.", pages_scanned, domain),
        format!("Main terms: {}.", if terms.is_empty() { "n/a" } else { terms.as_str() }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_website_input() {
        let target = normalize_website_input("  WWW.Example.com/about?x=1 ").unwrap();
        assert_eq!(target.domain, "example.com");
        assert_eq!(target.base_url, "https://www.example.com");

        let target = normalize_website_input("http://shop.example.org").unwrap();
        assert_eq!(target.domain, "shop.example.org");
        assert_eq!(target.base_url, "http://shop.example.org");
    }

    #[test]
    fn test_normalize_website_input_rejects() {
        assert!(matches!(normalize_website_input("   "), Err(BootstrapError::MissingDomain)));
        assert!(matches!(
            normalize_website_input("exa mple.com"),
            Err(BootstrapError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_report_discoveries_defaults() {
        let output = ModelOutput {
            discoveries: vec!["  ".to_string()],
            prompts: Vec::new(),
        };
        let discoveries = report_discoveries(&output, 3, "example.com", &[]);
        assert_eq!(
            discoveries,
            vec!["Scanned 3 pages from example.com.", "Main terms: n/a."]
        );
    }

    #[test]
    fn test_report_discoveries_capped() {
        let output = ModelOutput {
            discoveries: (0..9).map(|i| format!(" finding {} ", i)).collect(),
            prompts: Vec::new(),
        };
        let discoveries = report_discoveries(&output, 1, "example.com", &[]);
        assert_eq!(discoveries.len(), 6);
        assert_eq!(discoveries[0], "finding 0");
    }
}
