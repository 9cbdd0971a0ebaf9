use serde::{Deserialize, Serialize};

/// Visibility signals of a tracked domain in one AI response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub mentioned: bool,
    pub cited: bool,
    /// Unique URLs in order of first appearance
    pub urls: Vec<String>,
    /// Excerpts around each mention of the domain
    pub context: Vec<String>,
}
