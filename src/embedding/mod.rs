//! Remote embeddings over an OpenAI-compatible API
//!
//! One operation: a batch of texts in, one vector per text out, order
//! preserved. Failures propagate to the caller untried: embeddings are
//! cheap to redo on a future run, so retry budget belongs to the storage
//! writer, not here.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::types::Embedding;

/// Errors from the embedding service
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("embedding service returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
    #[error("invalid embedding configuration: {0}")]
    Config(String),
}

/// Embedding seam: the orchestrator only sees this trait
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// One vector per input text, order-preserving
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Output dimension, fixed by the configured model
    fn dimensions(&self) -> usize;
}

/// Client for an OpenAI-compatible `/embeddings` endpoint
pub struct HttpEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Embedding,
    index: usize,
}

impl HttpEmbedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.resolve_api_key() {
            let auth = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth)
                    .map_err(|e| EmbeddingError::Config(format!("invalid API key: {}", e)))?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            // Only text-embedding-3-* models accept an explicit dimension
            dimensions: if self.config.model.contains("text-embedding-3") {
                Some(self.config.dimensions)
            } else {
                None
            },
        };

        debug!("embedding {} texts via {}", texts.len(), self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        sort_and_check(parsed.data, texts.len())
    }
}

/// Restore request order by index and verify one vector per input
fn sort_and_check(
    mut data: Vec<EmbeddingData>,
    expected: usize,
) -> Result<Vec<Embedding>, EmbeddingError> {
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.len() <= self.config.max_batch_size {
            return self.request_embeddings(texts).await;
        }

        // Oversize inputs split transparently; order is preserved because
        // sub-batches complete sequentially.
        let mut all = Vec::with_capacity(texts.len());
        for sub in texts.chunks(self.config.max_batch_size) {
            all.extend(self.request_embeddings(sub).await?);
        }
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(index: usize, value: f32) -> EmbeddingData {
        EmbeddingData {
            embedding: vec![value; 3],
            index,
        }
    }

    #[test]
    fn response_order_is_restored_by_index() {
        let out = sort_and_check(vec![data(2, 2.0), data(0, 0.0), data(1, 1.0)], 3).unwrap();
        assert_eq!(out[0], vec![0.0; 3]);
        assert_eq!(out[1], vec![1.0; 3]);
        assert_eq!(out[2], vec![2.0; 3]);
    }

    #[test]
    fn count_mismatch_is_an_error() {
        let err = sort_and_check(vec![data(0, 0.0)], 2).unwrap_err();
        match err {
            EmbeddingError::CountMismatch { expected, got } => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected CountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn response_json_deserializes() {
        let body = r#"{
            "data": [
                {"embedding": [0.1, 0.2], "index": 0},
                {"embedding": [0.3, 0.4], "index": 1}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 8, "total_tokens": 8}
        }"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn request_includes_dimensions_only_for_v3_models() {
        let input = vec!["a".to_string()];
        let v3 = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &input,
            dimensions: Some(1536),
        };
        let json = serde_json::to_value(&v3).unwrap();
        assert_eq!(json["dimensions"], 1536);

        let legacy = EmbeddingRequest {
            model: "text-embedding-ada-002",
            input: &input,
            dimensions: None,
        };
        let json = serde_json::to_value(&legacy).unwrap();
        assert!(json.get("dimensions").is_none());
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let embedder = HttpEmbedder::new(EmbeddingConfig {
            endpoint: "http://127.0.0.1:1/embeddings".to_string(),
            ..EmbeddingConfig::default()
        })
        .unwrap();
        let out = embedder.embed(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
