//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite persistence
//! - LLM: AI provider clients
//! - Webcrawler: page fetching and HTML extraction

pub mod config;
pub mod database;
pub mod llm;
pub mod webcrawler;
