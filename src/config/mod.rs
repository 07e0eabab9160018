//! Configuration for sitedex

mod crawl;
mod embedding;
mod logging;
mod storage;

pub use crawl::{ChunkingConfig, CrawlConfig};
pub use embedding::EmbeddingConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use storage::StorageConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default user agent for all HTTP requests
pub const DEFAULT_USER_AGENT: &str = "sitedex/0.1 (+https://github.com/sitedex/sitedex)";

/// Main configuration for a sitedex run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Crawl traversal and filtering configuration
    pub crawl: CrawlConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Vector store configuration
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Crawl validation
        if self.crawl.base_url.is_empty() {
            errors.push("crawl base_url must not be empty".to_string());
        } else if url::Url::parse(&self.crawl.base_url).is_err() {
            errors.push(format!(
                "crawl base_url '{}' is not a valid URL",
                self.crawl.base_url
            ));
        }
        if self.crawl.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.crawl.article_min_path_segments == 0 {
            errors.push("article_min_path_segments must be positive".to_string());
        }

        // Chunking validation
        if self.chunking.max_words == 0 {
            errors.push("max_words must be positive".to_string());
        }
        if self.chunking.max_words > 8192 {
            errors.push("max_words must be <= 8192".to_string());
        }

        // Embedding validation
        if self.embedding.dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if self.embedding.dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }
        if self.embedding.max_batch_size == 0 {
            errors.push("embedding max_batch_size must be positive".to_string());
        }
        if self.embedding.endpoint.is_empty() {
            errors.push("embedding endpoint must not be empty".to_string());
        }

        // Storage validation
        if self.storage.url.is_empty() {
            errors.push("storage url must not be empty".to_string());
        }
        if self.storage.collection.is_empty() {
            errors.push("storage collection must not be empty".to_string());
        }
        if self.storage.batch_size == 0 {
            errors.push("storage batch_size must be positive".to_string());
        }
        if self.storage.max_attempts == 0 {
            errors.push("storage max_attempts must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }

    /// The crawl base URL, parsed. Callers should have run `validate` first.
    pub fn base_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.crawl.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base_url '{}': {}", self.crawl.base_url, e))
    }
}
