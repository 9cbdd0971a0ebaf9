//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Bootstrap: pure pipeline stages that turn crawled pages into prompts
//! - Signals: visibility signal extraction from AI responses
//! - Services: orchestration over storage, crawling and providers
//! - Errors: Domain-specific errors

pub mod bootstrap;
pub mod errors;
pub mod services;
pub mod signals;
