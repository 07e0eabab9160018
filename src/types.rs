//! Core types for the sitedex pipeline

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// How a fetched URL was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Parseable HTML; text and links were extracted
    Html,
    /// Reachable, but the response did not declare an HTML content type
    NonHtml,
    /// Media or document file, skipped by extension before any request
    Media,
    /// Network error, timeout, or non-2xx status
    Unreachable,
}

/// Result of one fetch attempt. Always well-formed: failures are encoded in
/// `kind`, never raised to the caller.
#[derive(Debug, Clone)]
pub struct Page {
    /// Canonical absolute URL, fragment stripped
    pub url: Url,
    pub kind: ContentKind,
    /// Page title, falling back to the URL when absent
    pub title: String,
    /// Extracted visible text; empty when below the minimum word threshold
    pub text: String,
    /// Deduplicated outbound candidate URLs, same-site only
    pub links: Vec<Url>,
}

impl Page {
    /// A page with no content and no links, used for every non-HTML outcome
    pub fn empty(url: Url, kind: ContentKind) -> Self {
        let title = url.to_string();
        Self {
            url,
            kind,
            title,
            text: String::new(),
            links: Vec::new(),
        }
    }

    /// Whether this page has text worth chunking and indexing
    pub fn is_indexable(&self) -> bool {
        self.kind == ContentKind::Html && !self.text.is_empty()
    }
}

/// A bounded word-span of a page's text, the unit sent to the embedder
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub source_url: String,
    pub source_title: String,
    /// Position within the page, informational only
    pub ordinal: usize,
    pub text: String,
}

/// Payload stored alongside each vector; `url` is the dedup lookup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// The durable unit written to the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPoint {
    /// Fresh per chunk, never derived from the URL: re-indexing a page adds
    /// new points rather than overwriting
    pub id: Uuid,
    pub vector: Embedding,
    pub payload: PointPayload,
}

impl IndexPoint {
    pub fn new(chunk: &Chunk, vector: Embedding) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            payload: PointPayload {
                url: chunk.source_url.clone(),
                title: chunk.source_title.clone(),
                text: chunk.text.clone(),
            },
        }
    }
}

/// A nearest-neighbor search hit
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: Uuid,
    pub score: f32,
    pub payload: Option<PointPayload>,
}

/// Counters reported at the end of every run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs popped from the frontier and processed
    pub pages_visited: u64,
    /// Skipped before fetch: already present in the store
    pub pages_already_indexed: u64,
    /// Fetch failed (network error, timeout, non-2xx)
    pub pages_unreachable: u64,
    /// Reachable but not HTML, or media by extension
    pub pages_not_html: u64,
    /// HTML below the minimum word threshold; links still harvested
    pub pages_under_length: u64,
    /// Embedding call failed; page abandoned for this run
    pub pages_embed_failed: u64,
    /// Candidate URLs accepted by the frontier
    pub urls_discovered: u64,
    /// Points durably written
    pub points_written: u64,
    /// Points dropped after exhausting upsert retries
    pub points_dropped: u64,
}

impl CrawlStats {
    /// Fold another stats block into this one
    pub fn merge(&mut self, other: &CrawlStats) {
        self.pages_visited += other.pages_visited;
        self.pages_already_indexed += other.pages_already_indexed;
        self.pages_unreachable += other.pages_unreachable;
        self.pages_not_html += other.pages_not_html;
        self.pages_under_length += other.pages_under_length;
        self.pages_embed_failed += other.pages_embed_failed;
        self.urls_discovered += other.urls_discovered;
        self.points_written += other.points_written;
        self.points_dropped += other.points_dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/post").unwrap()
    }

    #[test]
    fn empty_page_has_no_text_or_links() {
        let page = Page::empty(page_url(), ContentKind::Unreachable);
        assert_eq!(page.kind, ContentKind::Unreachable);
        assert!(page.text.is_empty());
        assert!(page.links.is_empty());
        assert_eq!(page.title, "https://example.com/post");
    }

    #[test]
    fn only_html_with_text_is_indexable() {
        let mut page = Page::empty(page_url(), ContentKind::Html);
        assert!(!page.is_indexable(), "empty text should not be indexable");

        page.text = "some extracted words".to_string();
        assert!(page.is_indexable());

        page.kind = ContentKind::NonHtml;
        assert!(!page.is_indexable());
    }

    #[test]
    fn index_points_get_fresh_ids() {
        let chunk = Chunk {
            source_url: "https://example.com/post".to_string(),
            source_title: "Post".to_string(),
            ordinal: 0,
            text: "chunk text".to_string(),
        };
        let a = IndexPoint::new(&chunk, vec![0.0; 4]);
        let b = IndexPoint::new(&chunk, vec![0.0; 4]);
        assert_ne!(a.id, b.id, "same chunk must produce distinct point ids");
        assert_eq!(a.payload, b.payload);
    }

    #[test]
    fn point_serializes_with_flat_payload() {
        let chunk = Chunk {
            source_url: "https://example.com/a".to_string(),
            source_title: "A".to_string(),
            ordinal: 1,
            text: "words".to_string(),
        };
        let point = IndexPoint::new(&chunk, vec![0.25, 0.5]);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["vector"], serde_json::json!([0.25, 0.5]));
        assert_eq!(json["payload"]["url"], "https://example.com/a");
        assert_eq!(json["payload"]["title"], "A");
        assert_eq!(json["payload"]["text"], "words");
        // Qdrant accepts UUIDs as strings
        assert!(json["id"].is_string());
    }
}
