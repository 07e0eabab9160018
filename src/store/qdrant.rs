//! Qdrant REST client
//!
//! Talks to a Qdrant-compatible HTTP API: collection and payload-index
//! setup, point upserts, the URL existence check backing the dedup gate,
//! and nearest-neighbor search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::StorageConfig;
use crate::types::{IndexPoint, ScoredPoint};

use super::{PointStore, StoreError};

/// Client for one collection of a Qdrant instance
pub struct QdrantStore {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    #[serde(default)]
    points: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: Option<ScrollResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    points_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfoResponse {
    result: Option<CollectionInfo>,
}

/// Body for collection creation: cosine metric, fixed dimension
fn collection_body(dimensions: usize) -> Value {
    json!({
        "vectors": {
            "size": dimensions,
            "distance": "Cosine",
        }
    })
}

/// Body for the keyword payload index on `url`
fn url_index_body() -> Value {
    json!({
        "field_name": "url",
        "field_schema": "keyword",
    })
}

/// Body for the dedup existence check: exact match on `payload.url`,
/// capped at one result, nothing fetched back
fn scroll_body(url: &str) -> Value {
    json!({
        "filter": {
            "must": [
                {"key": "url", "match": {"value": url}}
            ]
        },
        "limit": 1,
        "with_payload": false,
        "with_vector": false,
    })
}

fn search_body(vector: &[f32], limit: usize) -> Value {
    json!({
        "vector": vector,
        "limit": limit,
        "with_payload": true,
    })
}

impl QdrantStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.resolve_api_key() {
            headers.insert(
                "api-key",
                HeaderValue::from_str(key.trim())
                    .map_err(|e| StoreError::Unexpected(format!("invalid API key: {}", e)))?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    /// Convert a non-success response into an `Api` error with its body
    async fn api_error(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        StoreError::Api { status, message }
    }
}

#[async_trait]
impl PointStore for QdrantStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        let response = self.client.get(self.collection_url("")).send().await?;
        let status = response.status();
        if status.is_success() {
            info!("collection '{}' already exists", self.collection);
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            return Err(Self::api_error(response).await);
        }

        let response = self
            .client
            .put(self.collection_url(""))
            .json(&collection_body(dimensions))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        info!(
            "created collection '{}' ({} dims, cosine)",
            self.collection, dimensions
        );
        Ok(())
    }

    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.collection_url("/index"))
            .json(&url_index_body())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Recreating an existing index is reported as a client error;
        // that outcome satisfies the contract.
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            if message.to_lowercase().contains("exist") {
                info!("payload index on 'url' already exists");
                return Ok(());
            }
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Err(Self::api_error(response).await)
    }

    async fn is_url_indexed(&self, url: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .post(self.collection_url("/points/scroll"))
            .json(&scroll_body(url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let parsed: ScrollResponse = response.json().await?;
        let points = parsed
            .result
            .ok_or_else(|| StoreError::Unexpected("scroll response missing result".to_string()))?
            .points;
        Ok(!points.is_empty())
    }

    async fn upsert(&self, points: &[IndexPoint]) -> Result<(), StoreError> {
        let response = self
            .client
            .put(format!("{}?wait=true", self.collection_url("/points")))
            .json(&json!({ "points": points }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, StoreError> {
        let response = self
            .client
            .post(self.collection_url("/points/search"))
            .json(&search_body(vector, limit))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.result)
    }

    async fn point_count(&self) -> Result<u64, StoreError> {
        let response = self.client.get(self.collection_url("")).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let parsed: CollectionInfoResponse = response.json().await?;
        parsed
            .result
            .and_then(|info| info.points_count)
            .ok_or_else(|| StoreError::Unexpected("collection info missing points_count".to_string()))
    }
}
