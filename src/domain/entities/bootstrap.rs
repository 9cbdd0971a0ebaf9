use serde::{Deserialize, Serialize};

/// Request to seed a prompt collection from a website
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BootstrapRequest {
    pub domain: Option<String>,
    pub count: Option<i64>,
}

impl BootstrapRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            count: None,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }
}

/// Outcome of a successful bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BootstrapReport {
    pub collection_id: i64,
    pub collection_name: String,
    pub created_prompts: usize,
    pub discoveries: Vec<String>,
    pub provider_used: Option<String>,
    pub pages_scanned: usize,
}
