//! Site crawling: traversal state, fetching, and content extraction
//!
//! Components:
//! - `Frontier`: discovered/visited URL bookkeeping driving the traversal
//! - `PageFetcher`: HTTP fetching with content classification
//! - `ContentExtractor`: visible text, title, and candidate links from HTML

pub mod extractor;
pub mod fetcher;
pub mod frontier;

pub use extractor::ContentExtractor;
pub use fetcher::{PageFetch, PageFetcher};
pub use frontier::Frontier;

use url::Url;

/// Resolve an href against its page URL into the canonical absolute form:
/// fragment stripped, everything else as the parser normalizes it.
///
/// Returns `None` for hrefs that do not resolve to a URL at all.
pub fn canonical_url(page_url: &Url, href: &str) -> Option<Url> {
    let mut resolved = page_url.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// Whether a same-site URL looks like a content article: at least
/// `min_segments` non-empty path segments. Listing pages, category roots,
/// and the homepage all fall short.
pub fn is_article_like(url: &Url, min_segments: usize) -> bool {
    let segments = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).count())
        .unwrap_or(0);
    segments >= min_segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/posts/intro").unwrap()
    }

    #[test]
    fn canonical_url_resolves_relative_hrefs() {
        let url = canonical_url(&base(), "/about").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");

        let url = canonical_url(&base(), "sibling").unwrap();
        assert_eq!(url.as_str(), "https://example.com/posts/sibling");
    }

    #[test]
    fn canonical_url_strips_fragments() {
        let url = canonical_url(&base(), "https://example.com/page#section-2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn canonical_url_keeps_absolute_targets() {
        let url = canonical_url(&base(), "https://other.example/x").unwrap();
        assert_eq!(url.as_str(), "https://other.example/x");
    }

    #[test]
    fn article_heuristic_counts_path_segments() {
        let article = Url::parse("https://example.com/2024/some-post-title").unwrap();
        assert!(is_article_like(&article, 2));

        let listing = Url::parse("https://example.com/news").unwrap();
        assert!(!is_article_like(&listing, 2));

        let root = Url::parse("https://example.com/").unwrap();
        assert!(!is_article_like(&root, 2));
    }

    #[test]
    fn article_heuristic_ignores_trailing_slash() {
        let a = Url::parse("https://example.com/2024/title").unwrap();
        let b = Url::parse("https://example.com/2024/title/").unwrap();
        assert!(is_article_like(&a, 2));
        assert!(is_article_like(&b, 2));
    }
}
