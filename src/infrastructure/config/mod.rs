//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::infrastructure::llm::LLMConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub crawler: CrawlerConfig,
    pub bootstrap: BootstrapConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("geotracker.db"),
        }
    }
}

/// Site crawl limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Response bodies are cut to this many chars
    pub max_body_chars: usize,
    /// Primary page included
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "GEOTracker/1.0".to_string(),
            timeout_ms: 8_000,
            max_body_chars: 400_000,
            max_pages: 5,
        }
    }
}

/// Number of prompts a bootstrap may create
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BootstrapConfig {
    pub default_count: usize,
    pub min_count: usize,
    pub max_count: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            default_count: 30,
            min_count: 10,
            max_count: 40,
        }
    }
}

impl BootstrapConfig {
    /// Requested count clamped to the allowed range; missing or zero means default
    pub fn clamp_count(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.default_count,
            Some(n) if n < 0 => self.min_count,
            Some(n) => usize::try_from(n)
                .unwrap_or(self.max_count)
                .clamp(self.min_count, self.max_count),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bootstrap;
        if b.min_count == 0 || b.min_count > b.max_count {
            return Err(ConfigError::InvalidValue(format!(
                "bootstrap count range {}..={} is empty",
                b.min_count, b.max_count
            )));
        }
        if self.crawler.max_pages == 0 {
            return Err(ConfigError::InvalidValue("crawler.max-pages must be at least 1".to_string()));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingField("crawler.user-agent".to_string()));
        }
        Ok(())
    }

    /// Overlay environment variables
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var("GEO_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Ok(agent) = std::env::var("GEO_USER_AGENT") {
            self.crawler.user_agent = agent;
        }

        if let Ok(timeout) = std::env::var("GEO_FETCH_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.crawler.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid GEO_FETCH_TIMEOUT_MS: {}", timeout),
            }
        }

        self.llm = self.llm.with_env();
        self
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clamp_count() {
        let bootstrap = BootstrapConfig::default();
        assert_eq!(bootstrap.clamp_count(None), 30);
        assert_eq!(bootstrap.clamp_count(Some(0)), 30);
        assert_eq!(bootstrap.clamp_count(Some(3)), 10);
        assert_eq!(bootstrap.clamp_count(Some(-5)), 10);
        assert_eq!(bootstrap.clamp_count(Some(25)), 25);
        assert_eq!(bootstrap.clamp_count(Some(400)), 40);
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database:\n  path: /tmp/geo.db\nbootstrap:\n  max-count: 20").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/geo.db"));
        assert_eq!(config.bootstrap.max_count, 20);
        assert_eq!(config.bootstrap.min_count, 10);
        assert_eq!(config.crawler.timeout_ms, 8_000);
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.crawler.user_agent, "GEOTracker/1.0");
        assert_eq!(parsed.bootstrap.default_count, 30);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bootstrap:\n  min-count: 50\n  max-count: 40").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(Config::load("/nonexistent/geo.yaml"), Err(ConfigError::Parse(_))));
    }
}
