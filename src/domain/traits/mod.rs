//! Domain traits - Abstractions for infrastructure implementations

pub mod fetcher;
pub mod store;

pub use fetcher::PageFetcher;
pub use store::Store;
