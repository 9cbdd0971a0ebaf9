//! Domain entities - Core business objects with no external dependencies

pub mod bootstrap;
pub mod page;
pub mod prompt;
pub mod provider;
pub mod run;
pub mod settings;
pub mod signal;

pub use bootstrap::{BootstrapReport, BootstrapRequest};
pub use page::{merged_corpus, ParsedPage, SiteContext};
pub use prompt::{Collection, ModelOutput, Prompt, PromptCandidate, PromptCategory};
pub use provider::ProviderKind;
pub use run::{Run, RunTarget, RunWithPrompt};
pub use settings::{Settings, SettingsUpdate};
pub use signal::Signal;
