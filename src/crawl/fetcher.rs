//! Page fetching with content classification
//!
//! The fetcher never fails: every outcome is a well-formed `Page` whose
//! `kind` records what happened, so the orchestrator branches on data
//! instead of catching errors. Classification order:
//! 1. media/document extension: skip without issuing the request
//! 2. network error, timeout, or non-2xx: `Unreachable`
//! 3. content type not HTML: `NonHtml`, body discarded
//! 4. otherwise parse and extract

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::types::{ContentKind, Page};

use super::extractor::{has_media_extension, ContentExtractor};

/// Fetch seam: the orchestrator only sees this trait
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetch and classify one URL. Infallible by contract.
    async fn fetch(&self, url: &Url) -> Page;
}

/// HTTP fetcher over a shared reqwest client
pub struct PageFetcher {
    client: Client,
    extractor: ContentExtractor,
    media_extensions: Vec<String>,
}

impl PageFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            extractor: ContentExtractor::new(config),
            media_extensions: config.media_extensions.clone(),
        })
    }
}

/// Whether a declared content type indicates parseable HTML
fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

#[async_trait]
impl PageFetch for PageFetcher {
    async fn fetch(&self, url: &Url) -> Page {
        if has_media_extension(url, &self.media_extensions) {
            debug!("skipping media file {}", url);
            return Page::empty(url.clone(), ContentKind::Media);
        }

        let response = match self.client.get(url.as_str()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("fetch failed for {}: {}", url, e);
                return Page::empty(url.clone(), ContentKind::Unreachable);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("fetch of {} returned {}", url, status);
            return Page::empty(url.clone(), ContentKind::Unreachable);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_html_content_type(&content_type) {
            debug!("skipping non-HTML {} ({})", url, content_type);
            return Page::empty(url.clone(), ContentKind::NonHtml);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to read body of {}: {}", url, e);
                return Page::empty(url.clone(), ContentKind::Unreachable);
            }
        };

        self.extractor.extract(url, &body)
    }
}
