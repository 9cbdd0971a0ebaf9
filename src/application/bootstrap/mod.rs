//! Site bootstrap pipeline stages
//!
//! Pure functions: data in, data out. Crawling lives in
//! `infrastructure::webcrawler`, orchestration in `BootstrapService`.

pub mod fallback;
pub mod forbidden;
pub mod instruction;
pub mod normalize;
pub mod parse;
pub mod terms;

pub use fallback::build_fallback;
pub use forbidden::{build_forbidden_terms, has_forbidden_term};
pub use instruction::build_instruction;
pub use normalize::{normalize_prompt_candidates, top_up};
pub use parse::parse_model_output;
pub use terms::{build_context, extract_location_candidates, top_terms};
