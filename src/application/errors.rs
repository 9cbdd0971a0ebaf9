//! Application layer errors

use thiserror::Error;

/// Bootstrap pipeline errors
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("domain is required")]
    MissingDomain,

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("could not fetch website: {0}")]
    SiteUnreachable(String),

    #[error("failed to generate prompts")]
    GenerationFailed,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl BootstrapError {
    /// HTTP-style status for callers that surface errors to users
    pub fn status_code(&self) -> u16 {
        match self {
            BootstrapError::MissingDomain
            | BootstrapError::InvalidDomain(_)
            | BootstrapError::SiteUnreachable(_) => 400,
            BootstrapError::GenerationFailed | BootstrapError::Storage(_) => 500,
        }
    }

    /// Short reason safe to show to users
    pub fn reason(&self) -> &'static str {
        match self {
            BootstrapError::MissingDomain => "domain is required",
            BootstrapError::InvalidDomain(_) => "invalid domain",
            BootstrapError::SiteUnreachable(_) => "could not fetch website",
            BootstrapError::GenerationFailed => "failed to generate prompts",
            BootstrapError::Storage(_) => "Failed to bootstrap prompts",
        }
    }
}

/// Visibility run errors
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(i64),

    #[error("API key not configured for {0}")]
    MissingApiKey(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("All runs failed")]
    AllRunsFailed,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Prompt library and generation errors
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No API keys configured or all providers failed")]
    GenerationFailed,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database lock poisoned")]
    Lock,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
