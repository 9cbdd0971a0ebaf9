//! Domain layer - Core data types with no I/O
//!
//! This layer contains:
//! - Entities: pages, prompts, signals, runs, settings
//! - Traits: Abstractions for infrastructure (Store, PageFetcher)

pub mod entities;
pub mod traits;
