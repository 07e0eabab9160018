//! Crawl orchestration
//!
//! `CrawlPipeline` wires the frontier, fetcher, chunker, embedder, dedup
//! gate, and index writer into one engine with two entry points: a full
//! site crawl and an incremental new-articles pass. Service handles are
//! constructed by the caller and injected; the pipeline holds no global
//! state.

pub mod buffer;
pub mod crawler;

pub use buffer::WriteBuffer;
pub use crawler::CrawlPipeline;
