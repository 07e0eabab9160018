//! Vector store client, retry executor, and batching index writer
//!
//! The store is the only durable artifact of a run: a collection of
//! `IndexPoint`s queryable by `payload.url` through a keyword index. Setup
//! operations are idempotent and never destructive; an existing collection
//! is left untouched.

pub mod qdrant;
pub mod retry;
pub mod writer;

pub use qdrant::QdrantStore;
pub use retry::{with_retry, RetryPolicy, Transient};
pub use writer::{IndexWriter, WriteOutcome};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{IndexPoint, ScoredPoint};

/// Errors from the vector store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected store response: {0}")]
    Unexpected(String),
}

impl Transient for StoreError {
    /// Whether a retry of the same request could plausibly succeed
    fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Unexpected(_) => false,
        }
    }
}

/// Store seam: the orchestrator and writer only see this trait
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Create the collection if absent (cosine metric, given dimension);
    /// leave it untouched if present.
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), StoreError>;

    /// Create the keyword payload index on `url` if absent.
    async fn ensure_url_index(&self) -> Result<(), StoreError>;

    /// Whether any stored point's `payload.url` equals the given URL.
    /// Existence check only, limited to one result.
    async fn is_url_indexed(&self, url: &str) -> Result<bool, StoreError>;

    /// Write one batch of points. Single attempt; retries belong to the
    /// `IndexWriter`.
    async fn upsert(&self, points: &[IndexPoint]) -> Result<(), StoreError>;

    /// Nearest-neighbor search over stored vectors.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, StoreError>;

    /// Number of points currently stored.
    async fn point_count(&self) -> Result<u64, StoreError>;
}
