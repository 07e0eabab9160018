//! URL frontier: discovered-but-unprocessed URLs plus the visited set
//!
//! In-memory, scoped to one run. Ordering is LIFO; only termination and
//! no-revisit are correctness requirements. Seen-sets store xxh3 hashes of
//! the canonical URL string to bound memory on large sites.

use std::collections::HashSet;
use url::Url;

/// Crawl frontier with at-most-once dispensing per URL
#[derive(Debug, Default)]
pub struct Frontier {
    /// Hashes of URLs already popped and processed this run
    visited: HashSet<u64>,
    /// Hashes of URLs currently waiting in `to_visit`
    queued: HashSet<u64>,
    /// Discovered-but-unprocessed URLs, popped from the back
    to_visit: Vec<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_url(url: &Url) -> u64 {
        xxhash_rust::xxh3::xxh3_64(url.as_str().as_bytes())
    }

    /// Offer a discovered URL. No-op (returns false) if it was already
    /// visited this run or is already queued, so dense link graphs cannot
    /// grow the queue without bound.
    pub fn offer(&mut self, url: Url) -> bool {
        let hash = Self::hash_url(&url);
        if self.visited.contains(&hash) || !self.queued.insert(hash) {
            return false;
        }
        self.to_visit.push(url);
        true
    }

    /// Next URL to process, or `None` when the frontier is drained
    pub fn next(&mut self) -> Option<Url> {
        let url = self.to_visit.pop()?;
        self.queued.remove(&Self::hash_url(&url));
        Some(url)
    }

    /// Record a URL as processed; later offers of it are rejected
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(Self::hash_url(url));
    }

    /// Whether a URL has been marked visited this run
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&Self::hash_url(url))
    }

    /// Number of URLs waiting to be processed
    pub fn pending(&self) -> usize {
        self.to_visit.len()
    }

    /// Number of URLs processed this run
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
