use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::{
    Collection, Prompt, PromptCandidate, Run, RunWithPrompt, Settings, SettingsUpdate, Signal,
};

/// Store trait - abstraction for data persistence
#[async_trait]
pub trait Store: Send + Sync {
    // Settings
    async fn get_settings(&self) -> Result<Settings, StorageError>;
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), StorageError>;

    // Prompt library
    async fn list_prompts(&self, limit: usize) -> Result<Vec<Prompt>, StorageError>;
    async fn get_prompt(&self, id: i64) -> Result<Option<Prompt>, StorageError>;
    async fn insert_prompt(
        &self,
        name: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<Prompt, StorageError>;
    async fn delete_prompt(&self, id: i64) -> Result<bool, StorageError>;

    // Collections
    async fn list_collections(&self) -> Result<Vec<Collection>, StorageError>;
    async fn create_collection(&self, name: &str, prompt_ids: &[i64]) -> Result<Collection, StorageError>;
    async fn set_collection_prompts(&self, id: i64, prompt_ids: &[i64]) -> Result<(), StorageError>;
    async fn delete_collection(&self, id: i64) -> Result<bool, StorageError>;

    /// Create a collection, insert every prompt and link it, all or nothing.
    /// Returns the collection id.
    async fn create_collection_with_prompts(
        &self,
        name: &str,
        prompts: &[PromptCandidate],
    ) -> Result<i64, StorageError>;

    // Runs
    async fn insert_run(
        &self,
        prompt_id: i64,
        provider: &str,
        model: &str,
        response: &str,
        signals: &Signal,
    ) -> Result<Run, StorageError>;
    async fn list_runs(&self, limit: usize) -> Result<Vec<RunWithPrompt>, StorageError>;
}
