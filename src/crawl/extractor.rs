//! Content extraction from fetched HTML
//!
//! Produces the three things the pipeline needs from a page: its visible
//! text (boilerplate markup removed, whitespace collapsed), its title, and
//! the deduplicated set of same-site candidate links worth visiting.

use std::collections::HashSet;

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use url::Url;

use crate::config::CrawlConfig;
use crate::types::{ContentKind, Page};

use super::canonical_url;

/// Elements whose entire subtree is invisible or boilerplate; `head` covers
/// the title, which is carried separately on the page
const EXCLUDED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "svg", "header", "footer",
];

/// Whether a URL's path ends in one of the configured media/document
/// extensions. Checked before fetching and again on every harvested link.
pub fn has_media_extension(url: &Url, extensions: &[String]) -> bool {
    let path = url.path().to_lowercase();
    extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}

/// Extracts text, title, and candidate links from raw HTML
pub struct ContentExtractor {
    base_url: String,
    min_word_count: usize,
    media_extensions: Vec<String>,
    /// Denylist patterns, pre-lowercased
    link_denylist: Vec<String>,
    anchor_selector: Selector,
    title_selector: Selector,
}

impl ContentExtractor {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            min_word_count: config.min_word_count,
            media_extensions: config.media_extensions.clone(),
            link_denylist: config
                .link_denylist
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            anchor_selector: Selector::parse("a[href]").expect("static selector"),
            title_selector: Selector::parse("title").expect("static selector"),
        }
    }

    /// Build a `Page` from a fetched HTML body. Text below the minimum word
    /// count comes back empty; links are harvested either way.
    pub fn extract(&self, url: &Url, html: &str) -> Page {
        let document = Html::parse_document(html);

        let title = self.extract_title(&document, url);
        let mut text = extract_visible_text(&document);
        if text.split_whitespace().count() < self.min_word_count {
            text.clear();
        }
        let links = self.extract_links(&document, url);

        Page {
            url: url.clone(),
            kind: ContentKind::Html,
            title,
            text,
            links,
        }
    }

    fn extract_title(&self, document: &Html, url: &Url) -> String {
        let title = document
            .select(&self.title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            url.to_string()
        } else {
            title
        }
    }

    /// Resolve, canonicalize, and filter every anchor target on the page.
    /// Result preserves first-appearance order with no duplicates.
    fn extract_links(&self, document: &Html, page_url: &Url) -> Vec<Url> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.anchor_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(resolved) = canonical_url(page_url, href) else {
                continue;
            };
            if !self.is_worth_visiting(&resolved) {
                continue;
            }
            if seen.insert(resolved.as_str().to_string()) {
                links.push(resolved);
            }
        }

        links
    }

    /// Same-site, not denylisted, not a media file
    fn is_worth_visiting(&self, url: &Url) -> bool {
        let lower = url.as_str().to_lowercase();
        if self.link_denylist.iter().any(|bad| lower.contains(bad)) {
            return false;
        }
        if has_media_extension(url, &self.media_extensions) {
            return false;
        }
        url.as_str().starts_with(&self.base_url)
    }
}

/// Whether a node sits inside an element whose subtree is excluded
fn has_excluded_ancestor(node: &NodeRef<Node>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(elem) = parent.value().as_element() {
            if EXCLUDED_ELEMENTS.contains(&elem.name()) {
                return true;
            }
        }
        current = parent.parent();
    }
    false
}

/// Visible text of the whole document: every text node outside the excluded
/// subtrees, whitespace-normalized and joined with single spaces.
fn extract_visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(text_node) = node.value().as_text() else {
            continue;
        };
        if has_excluded_ancestor(&node) {
            continue;
        }
        for word in text_node.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }
    text
}
