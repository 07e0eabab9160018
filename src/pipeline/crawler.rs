//! The crawl orchestrator
//!
//! Drives the frontier-to-writer pipeline: pop a URL, consult the dedup
//! gate, fetch, harvest links, chunk, embed, and stage points for batched
//! writes. Runs to completion and reports counters at the end; a single
//! page's or batch's failure never aborts the crawl.
//!
//! Two entry points share the one engine:
//! - `run_full`: seeded with the site base URL, follows links, checks the
//!   dedup gate just-in-time before each fetch
//! - `run_incremental`: seeded with article-like links from the base URL
//!   (listing page), dedup precomputed for the whole seed batch, links not
//!   followed

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::chunking::chunk_page;
use crate::config::Config;
use crate::crawl::fetcher::PageFetch;
use crate::crawl::{is_article_like, Frontier};
use crate::embedding::TextEmbedder;
use crate::shutdown::Shutdown;
use crate::store::{IndexWriter, PointStore};
use crate::types::{ContentKind, CrawlStats, IndexPoint, Page};
use crate::util::truncate_str;

use super::buffer::WriteBuffer;

/// Mode-dependent knobs for one run
#[derive(Debug, Clone, Copy)]
struct RunOptions {
    follow_links: bool,
    dedup_before_fetch: bool,
}

/// Orchestrator owning injected service handles
pub struct CrawlPipeline {
    config: Config,
    fetcher: Arc<dyn PageFetch>,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn PointStore>,
    shutdown: Shutdown,
}

impl CrawlPipeline {
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetch>,
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn PointStore>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            config,
            fetcher,
            embedder,
            store,
            shutdown,
        }
    }

    /// Crawl the whole site from its base URL, skipping already-indexed
    /// pages before fetching them.
    pub async fn run_full(&self) -> Result<CrawlStats> {
        self.prepare_store().await?;

        let base = self.config.base_url()?;
        let mut frontier = Frontier::new();
        frontier.offer(base);

        let options = RunOptions {
            follow_links: true,
            dedup_before_fetch: self.config.crawl.dedup_before_fetch,
        };
        let stats = self.drain_frontier(&mut frontier, options).await;
        report(&stats);
        Ok(stats)
    }

    /// Index only new articles linked from the base URL (listing page).
    pub async fn run_incremental(&self) -> Result<CrawlStats> {
        self.prepare_store().await?;

        let base = self.config.base_url()?;
        info!("harvesting article links from {}", base);
        let listing = self.fetcher.fetch(&base).await;
        if listing.kind != ContentKind::Html {
            anyhow::bail!("listing page {} was not fetchable HTML", base);
        }

        let min_segments = self.config.crawl.article_min_path_segments;
        let articles: Vec<Url> = listing
            .links
            .iter()
            .filter(|u| is_article_like(u, min_segments))
            .cloned()
            .collect();
        info!("{} article links detected", articles.len());

        // Dedup the whole seed batch up front; only unindexed URLs are
        // fetched at all.
        let mut stats = CrawlStats::default();
        let mut frontier = Frontier::new();
        for url in articles {
            match self.store.is_url_indexed(url.as_str()).await {
                Ok(true) => {
                    debug!("already indexed: {}", url);
                    stats.pages_already_indexed += 1;
                }
                Ok(false) => {
                    if frontier.offer(url) {
                        stats.urls_discovered += 1;
                    }
                }
                Err(e) => {
                    warn!("dedup check failed for {}: {}", url, e);
                    if frontier.offer(url) {
                        stats.urls_discovered += 1;
                    }
                }
            }
        }
        info!("{} new articles to index", frontier.pending());

        let options = RunOptions {
            follow_links: false,
            dedup_before_fetch: false,
        };
        let run_stats = self.drain_frontier(&mut frontier, options).await;
        stats.merge(&run_stats);
        report(&stats);
        Ok(stats)
    }

    /// Collection and payload index must exist before any write; failure
    /// here is fatal for the run.
    async fn prepare_store(&self) -> Result<()> {
        self.store
            .ensure_collection(self.embedder.dimensions())
            .await
            .context("failed to ensure collection")?;
        self.store
            .ensure_url_index()
            .await
            .context("failed to ensure payload index on 'url'")?;
        Ok(())
    }

    /// Process frontier items until it is empty or shutdown is requested.
    async fn drain_frontier(&self, frontier: &mut Frontier, options: RunOptions) -> CrawlStats {
        let writer = IndexWriter::new(
            Arc::clone(&self.store),
            &self.config.storage,
            self.shutdown.clone(),
        );
        let mut buffer = WriteBuffer::new(self.config.storage.batch_size);
        let mut stats = CrawlStats::default();

        while let Some(url) = frontier.next() {
            if self.shutdown.is_triggered() {
                info!("shutdown requested, stopping crawl");
                break;
            }
            if frontier.is_visited(&url) {
                continue;
            }
            frontier.mark_visited(&url);
            stats.pages_visited += 1;

            if options.dedup_before_fetch {
                match self.store.is_url_indexed(url.as_str()).await {
                    Ok(true) => {
                        debug!("already indexed: {}", url);
                        stats.pages_already_indexed += 1;
                        continue;
                    }
                    Ok(false) => {}
                    // Fetch anyway: worst case the page is indexed twice,
                    // which a search-time URL filter tolerates.
                    Err(e) => warn!("dedup check failed for {}: {}", url, e),
                }
            }

            let page = self.fetcher.fetch(&url).await;
            info!(
                "[{}] {} ({})",
                stats.pages_visited,
                truncate_str(url.as_str(), 96),
                kind_label(&page)
            );

            if options.follow_links {
                for link in &page.links {
                    if frontier.offer(link.clone()) {
                        stats.urls_discovered += 1;
                    }
                }
            }

            match page.kind {
                ContentKind::Unreachable => {
                    stats.pages_unreachable += 1;
                    continue;
                }
                ContentKind::Media | ContentKind::NonHtml => {
                    stats.pages_not_html += 1;
                    continue;
                }
                ContentKind::Html => {}
            }
            if !page.is_indexable() {
                stats.pages_under_length += 1;
                continue;
            }

            match self.index_page(&page).await {
                Ok(points) => {
                    for point in points {
                        buffer.push(point);
                    }
                    while buffer.is_full() {
                        let batch = buffer.take_batch();
                        let outcome = writer.write(&batch).await;
                        stats.points_written += outcome.written;
                        stats.points_dropped += outcome.dropped;
                    }
                }
                Err(e) => {
                    warn!("embedding failed for {}: {}", url, e);
                    stats.pages_embed_failed += 1;
                }
            }
        }

        // Final flush: nothing staged is lost on graceful completion
        let rest = buffer.drain();
        if !rest.is_empty() {
            let outcome = writer.write(&rest).await;
            stats.points_written += outcome.written;
            stats.points_dropped += outcome.dropped;
        }

        stats
    }

    /// Chunk and embed one page into ready-to-write points
    async fn index_page(&self, page: &Page) -> Result<Vec<IndexPoint>> {
        let chunks = chunk_page(page, self.config.chunking.max_words);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        anyhow::ensure!(
            vectors.len() == chunks.len(),
            "embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        );
        Ok(chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexPoint::new(chunk, vector))
            .collect())
    }
}

fn kind_label(page: &Page) -> &'static str {
    match page.kind {
        ContentKind::Html => {
            if page.text.is_empty() {
                "under length"
            } else {
                "html"
            }
        }
        ContentKind::NonHtml => "non-html",
        ContentKind::Media => "media",
        ContentKind::Unreachable => "unreachable",
    }
}

fn report(stats: &CrawlStats) {
    info!(
        "crawl finished: {} visited, {} already indexed, {} unreachable, \
         {} non-html, {} under length, {} embed failures",
        stats.pages_visited,
        stats.pages_already_indexed,
        stats.pages_unreachable,
        stats.pages_not_html,
        stats.pages_under_length,
        stats.pages_embed_failed,
    );
    info!(
        "{} points written, {} dropped, {} urls discovered",
        stats.points_written, stats.points_dropped, stats.urls_discovered,
    );
}
