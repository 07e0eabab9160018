//! Sitedex: crawl a website and index its text into a vector database
//!
//! A single-site crawl-to-vector-index pipeline:
//! - Frontier-driven traversal of the site's internal link graph
//! - Visible-text extraction from HTML with link harvesting
//! - Greedy word-bounded chunking
//! - Remote embeddings via an OpenAI-compatible API
//! - Durable storage in a Qdrant-compatible vector store with URL-based
//!   deduplication, so re-runs only index pages not already present

pub mod chunking;
pub mod config;
pub mod crawl;
pub mod embedding;
pub mod pipeline;
pub mod shutdown;
pub mod store;
pub mod types;
pub mod util;

pub use config::Config;
pub use types::*;
