//! Vector store configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Qdrant-compatible vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store base URL (e.g., "http://localhost:6333")
    pub url: String,
    /// API key; falls back to the QDRANT_API_KEY environment variable
    pub api_key: Option<String>,
    /// Collection name
    pub collection: String,
    /// Points per upsert batch
    pub batch_size: usize,
    /// Attempts per batch before it is dropped
    pub max_attempts: u32,
    /// Base backoff between attempts (seconds); grows linearly per attempt
    pub backoff_base_secs: u64,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "site_content".to_string(),
            batch_size: 3,
            max_attempts: 5,
            backoff_base_secs: 1,
            timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    /// API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("QDRANT_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_conservative_backend() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.batch_size, 3);
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.backoff_base_secs, 1);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.collection, "site_content");
    }
}
