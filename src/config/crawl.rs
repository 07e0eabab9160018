//! Crawl traversal, filtering, and chunking configuration

use serde::{Deserialize, Serialize};

use super::DEFAULT_USER_AGENT;

/// Web crawl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Site base URL; the crawl never leaves URLs prefixed by it
    pub base_url: String,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Pages with fewer words than this are mined for links but not indexed
    pub min_word_count: usize,
    /// Path extensions skipped without issuing a request
    pub media_extensions: Vec<String>,
    /// Substrings that disqualify a discovered URL (case-insensitive)
    pub link_denylist: Vec<String>,
    /// Check the store for the URL before fetching (full-crawl mode)
    pub dedup_before_fetch: bool,
    /// Minimum non-empty path segments for a listing-page link to count as
    /// an article in incremental mode
    pub article_min_path_segments: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com/".to_string(),
            request_timeout_secs: 10,
            min_word_count: 30,
            media_extensions: vec![
                ".jpg".to_string(),
                ".jpeg".to_string(),
                ".png".to_string(),
                ".gif".to_string(),
                ".svg".to_string(),
                ".webp".to_string(),
                ".mp4".to_string(),
                ".mov".to_string(),
                ".avi".to_string(),
                ".mp3".to_string(),
                ".webm".to_string(),
                ".pdf".to_string(),
                ".zip".to_string(),
                ".rar".to_string(),
                ".7z".to_string(),
                ".doc".to_string(),
                ".docx".to_string(),
                ".xlsx".to_string(),
                ".pptx".to_string(),
            ],
            link_denylist: vec![
                "facebook.com".to_string(),
                "twitter.com".to_string(),
                "linkedin.com".to_string(),
                "pinterest".to_string(),
                "utm_".to_string(),
                "share".to_string(),
                "login".to_string(),
                "wp-login".to_string(),
                "password".to_string(),
                "checkpoint".to_string(),
                "redirect".to_string(),
                "r.php".to_string(),
                "wp-json".to_string(),
                "mailto:".to_string(),
                "tel:".to_string(),
            ],
            dedup_before_fetch: true,
            article_min_path_segments: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum words per chunk
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: 350 }
    }
}
