//! GEO visibility tracker
//!
//! Seeds test prompts from a crawled website, sends them to AI providers and
//! records whether the tracked domain was mentioned or cited in the replies.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod util;
