//! Sitedex: crawl a website and index its text into a vector database

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitedex::{
    config::{Config, LogFormat},
    crawl::PageFetcher,
    embedding::{HttpEmbedder, TextEmbedder},
    pipeline::CrawlPipeline,
    shutdown,
    store::{PointStore, QdrantStore},
    util::truncate_str,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sitedex")]
#[command(about = "Crawl a website and index its text into a vector database")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sitedex.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the whole site, skipping pages already indexed
    Crawl {
        /// Override the configured base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Index only new articles linked from the base URL
    Refresh,

    /// Embed a query and print the nearest stored chunks
    Search {
        /// Search query
        query: String,

        /// Number of results
        #[arg(short, long, default_value = "5")]
        top_k: usize,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show collection statistics
    Stats,

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init must work without an existing config
    if let Commands::Init { ref path } = cli.command {
        setup_logging(cli.verbose, &Default::default())?;
        return init_config(path.clone());
    }

    let config = Config::load(&cli.config)?;
    setup_logging(cli.verbose, &config.logging)?;

    match cli.command {
        Commands::Crawl { base_url } => {
            let mut config = config;
            if let Some(base) = base_url {
                config.crawl.base_url = base;
                config.validate()?;
            }
            run_pipeline(config, Mode::Full).await
        }
        Commands::Refresh => run_pipeline(config, Mode::Incremental).await,
        Commands::Search {
            query,
            top_k,
            format,
        } => search(config, query, top_k, format).await,
        Commands::Stats => stats(config).await,
        Commands::Init { .. } => unreachable!("handled above"),
    }
}

/// Verbosity flags override the configured level; format comes from config
fn setup_logging(verbose: u8, logging: &sitedex::config::LoggingConfig) -> Result<()> {
    let level = match verbose {
        0 => logging.level.as_tracing_level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false);
    match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}

enum Mode {
    Full,
    Incremental,
}

async fn run_pipeline(config: Config, mode: Mode) -> Result<()> {
    let fetcher = Arc::new(PageFetcher::new(&config.crawl).context("failed to build fetcher")?);
    let embedder =
        Arc::new(HttpEmbedder::new(config.embedding.clone()).context("failed to build embedder")?);
    let store =
        Arc::new(QdrantStore::new(&config.storage).context("failed to build store client")?);

    let (handle, sd) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, finishing current batch");
            handle.trigger();
        }
    });

    let pipeline = CrawlPipeline::new(config, fetcher, embedder, store, sd);
    match mode {
        Mode::Full => pipeline.run_full().await?,
        Mode::Incremental => pipeline.run_incremental().await?,
    };
    Ok(())
}

async fn search(config: Config, query: String, top_k: usize, format: String) -> Result<()> {
    let embedder = HttpEmbedder::new(config.embedding.clone())?;
    let store = QdrantStore::new(&config.storage)?;

    let vectors = embedder
        .embed(&[query.clone()])
        .await
        .context("failed to embed query")?;
    let vector = vectors
        .into_iter()
        .next()
        .context("embedder returned no vector for the query")?;

    let results = store.search(&vector, top_k).await?;

    if format == "json" {
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(|p| {
                serde_json::json!({
                    "score": p.score,
                    "url": p.payload.as_ref().map(|pl| pl.url.as_str()),
                    "title": p.payload.as_ref().map(|pl| pl.title.as_str()),
                    "text": p.payload.as_ref().map(|pl| pl.text.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }
    println!("Results for '{}':\n", query);
    for (i, point) in results.iter().enumerate() {
        match &point.payload {
            Some(payload) => {
                println!("{}. [{:.3}] {}", i + 1, point.score, payload.title);
                println!("   {}", payload.url);
                println!("   {}\n", truncate_str(&payload.text, 200));
            }
            None => println!("{}. [{:.3}] <no payload>", i + 1, point.score),
        }
    }
    Ok(())
}

async fn stats(config: Config) -> Result<()> {
    let store = QdrantStore::new(&config.storage)?;
    let count = store.point_count().await?;
    println!("Collection: {}", config.storage.collection);
    println!("Points:     {}", count);
    Ok(())
}

fn init_config(path: PathBuf) -> Result<()> {
    let config = Config::default();
    let config_path = path.join("sitedex.toml");

    let toml_content = format!(
        r#"# Sitedex configuration

[crawl]
# Site to crawl; only URLs under this prefix are visited
base_url = "{}"
request_timeout_secs = {}
# Pages with fewer words are mined for links but not indexed
min_word_count = {}
# Check the store before fetching (skips already-indexed pages on re-runs)
dedup_before_fetch = {}
# Minimum non-empty path segments for a link to count as an article
article_min_path_segments = {}

[chunking]
max_words = {}

[embedding]
endpoint = "{}"
model = "{}"
dimensions = {}
# api_key falls back to the OPENAI_API_KEY environment variable

[storage]
url = "{}"
collection = "{}"
batch_size = {}
max_attempts = {}
backoff_base_secs = {}
# api_key falls back to the QDRANT_API_KEY environment variable

[logging]
format = "text"
level = "info"
"#,
        config.crawl.base_url,
        config.crawl.request_timeout_secs,
        config.crawl.min_word_count,
        config.crawl.dedup_before_fetch,
        config.crawl.article_min_path_segments,
        config.chunking.max_words,
        config.embedding.endpoint,
        config.embedding.model,
        config.embedding.dimensions,
        config.storage.url,
        config.storage.collection,
        config.storage.batch_size,
        config.storage.max_attempts,
        config.storage.backoff_base_secs,
    );

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());
    Ok(())
}
