//! Embedding service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the OpenAI-compatible embedding endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// API endpoint (e.g., "https://api.openai.com/v1/embeddings")
    pub endpoint: String,
    /// API key; falls back to the OPENAI_API_KEY environment variable
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Embedding dimensions, fixed by the model
    pub dimensions: usize,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
    /// Maximum texts per request; larger inputs are split
    pub max_batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/embeddings".to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            timeout_secs: 30,
            max_batch_size: 100,
        }
    }
}

impl EmbeddingConfig {
    /// API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_openai() {
        let cfg = EmbeddingConfig::default();
        assert_eq!(cfg.endpoint, "https://api.openai.com/v1/embeddings");
        assert_eq!(cfg.model, "text-embedding-3-small");
        assert_eq!(cfg.dimensions, 1536);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_batch_size, 100);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut cfg = EmbeddingConfig::default();
        cfg.api_key = Some("sk-config".to_string());
        assert_eq!(cfg.resolve_api_key(), Some("sk-config".to_string()));
    }
}
