//! Splitting page text into bounded word spans for embedding
//!
//! Greedy accumulation: words fill the current chunk until `max_words`,
//! then a new chunk starts. No overlap. Joining the chunks of a page back
//! together with single spaces reproduces the whitespace-normalized input,
//! so no words are lost or duplicated.

use crate::types::{Chunk, Page};

/// Split text into word spans of at most `max_words` words each.
///
/// Deterministic for a given input. Every chunk except possibly the last
/// holds exactly `max_words` words; the final partial chunk is emitted when
/// non-empty. `max_words` of zero produces no chunks.
pub fn split_words(text: &str, max_words: usize) -> Vec<String> {
    if max_words == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(max_words);
    for word in text.split_whitespace() {
        current.push(word);
        if current.len() >= max_words {
            chunks.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

/// Chunk an indexable page, carrying its URL and title onto each chunk
pub fn chunk_page(page: &Page, max_words: usize) -> Vec<Chunk> {
    split_words(&page.text, max_words)
        .into_iter()
        .enumerate()
        .map(|(ordinal, text)| Chunk {
            source_url: page.url.to_string(),
            source_title: page.title.clone(),
            ordinal,
            text,
        })
        .collect()
}
