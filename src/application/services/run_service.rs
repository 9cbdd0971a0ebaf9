//! Visibility runs: send a stored prompt to provider models and record signals

use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::errors::RunError;
use crate::application::signals::extract_signals;
use crate::domain::entities::{Prompt, ProviderKind, RunTarget, RunWithPrompt, Settings};
use crate::domain::traits::Store;
use crate::infrastructure::llm::{LLMConfig, ProviderFactory};

/// Runs listed per page
pub const RUN_HISTORY_LIMIT: usize = 100;

pub struct RunService {
    store: Arc<dyn Store>,
    providers: Arc<dyn ProviderFactory>,
    llm: LLMConfig,
}

impl RunService {
    pub fn new(store: Arc<dyn Store>, providers: Arc<dyn ProviderFactory>, llm: LLMConfig) -> Self {
        Self { store, providers, llm }
    }

    /// Query every target concurrently. Failed targets are logged and left
    /// out; the call fails only when none succeed.
    pub async fn execute_run(&self, prompt_id: i64, targets: &[RunTarget]) -> Result<Vec<RunWithPrompt>, RunError> {
        if prompt_id <= 0 || targets.is_empty() {
            return Err(RunError::InvalidRequest("prompt_id and providers are required".to_string()));
        }

        let prompt = self
            .store
            .get_prompt(prompt_id)
            .await?
            .ok_or(RunError::PromptNotFound(prompt_id))?;

        let settings = self.store.get_settings().await?.with_fallback_keys(
            self.llm.api_key(ProviderKind::OpenAI),
            self.llm.api_key(ProviderKind::Anthropic),
            self.llm.api_key(ProviderKind::Perplexity),
        );

        let outcomes = join_all(targets.iter().map(|target| self.run_one(&prompt, &settings, target))).await;

        let mut runs = Vec::with_capacity(outcomes.len());
        for (target, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(run) => runs.push(run),
                Err(e) => error!(provider = target.provider.as_str(), model = %target.model, "Run failed: {}", e),
            }
        }

        if runs.is_empty() {
            return Err(RunError::AllRunsFailed);
        }

        info!(prompt_id, succeeded = runs.len(), requested = targets.len(), "Run batch complete");
        Ok(runs)
    }

    async fn run_one(&self, prompt: &Prompt, settings: &Settings, target: &RunTarget) -> Result<RunWithPrompt, RunError> {
        let model = target.model.trim();
        if model.is_empty() {
            return Err(RunError::InvalidRequest(format!("model is required for {}", target.provider)));
        }

        let api_key = settings
            .api_key(target.provider)
            .ok_or_else(|| RunError::MissingApiKey(target.provider.to_string()))?;

        let provider = self.providers.create(target.provider, api_key);
        let response = provider
            .query(&prompt.content, model)
            .await
            .map_err(|e| RunError::Provider(e.to_string()))?;

        let signals = extract_signals(&response, &settings.tracked_domain);
        let run = self
            .store
            .insert_run(prompt.id, target.provider.as_str(), model, &response, &signals)
            .await?;

        Ok(RunWithPrompt {
            run,
            prompt_name: prompt.name.clone(),
            prompt_content: prompt.content.clone(),
        })
    }

    /// Most recent runs, newest first
    pub async fn list_runs(&self) -> Result<Vec<RunWithPrompt>, RunError> {
        Ok(self.store.list_runs(RUN_HISTORY_LIMIT).await?)
    }

    /// Check a key against the provider without storing anything
    pub async fn test_provider(&self, kind: ProviderKind, api_key: &str) -> Result<bool, RunError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(RunError::InvalidRequest("provider and api_key are required".to_string()));
        }

        let ok = self.providers.create(kind, api_key).test_connection().await;
        info!(provider = kind.as_str(), success = ok, "Provider connection test");
        Ok(ok)
    }
}
