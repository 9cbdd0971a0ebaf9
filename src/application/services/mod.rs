//! Application services - Business logic orchestration

pub mod bootstrap_service;
pub mod prompt_service;
pub mod run_service;

pub use bootstrap_service::{normalize_website_input, BootstrapService, WebsiteTarget};
pub use prompt_service::PromptService;
pub use run_service::RunService;
