//! # Awful Article Stats
//!
//! Turns plain-text dumps of scraped news articles into the data behind a
//! set of comparison charts: per-article scatter plots, image size scatter,
//! histograms and summary tables, one report per selected category.
//!
//! ## Usage
//!
//! ```sh
//! awful_article_stats -j ./json -m ./markdown \
//!     --source CNN=data/cnn_articles.txt --source FOX=data/fox_news_articles.txt
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Loading**: Read each configured source from disk or over HTTP
//! 2. **Parsing**: Split every dump into article records tagged with the source label
//! 3. **Selection**: Filter by category and metric bounds
//! 4. **Aggregation**: Build scatter points, histograms and summaries
//! 5. **Output**: Write JSON for the chart frontend and Markdown for reading

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod binner;
mod cli;
mod config;
mod errors;
mod loader;
mod models;
mod outputs;
mod parser;
mod report;
mod selector;
mod summary;
mod utils;

use cli::Cli;
use config::StatsConfig;
use loader::{RetryLoad, SourceLoader, load_sources};
use models::Article;
use outputs::{json, markdown};
use report::build_report;
use selector::CategoryFilter;
use utils::ensure_writable_dir;

/// Base delay between retries of a transient load failure.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_stats starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match args.config.as_deref() {
        Some(path) => StatsConfig::load(Path::new(path))?,
        None => StatsConfig::default(),
    };
    config.apply_cli(&args)?;
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Load and parse sources ----
    let source_loader = RetryLoad::new(
        SourceLoader::new(Duration::from_secs(args.timeout_secs)),
        args.retries,
        RETRY_BASE_DELAY,
    );
    let loaded = load_sources(&source_loader, &config.sources).await?;

    let articles: Vec<Article> = loaded
        .iter()
        .flat_map(|source| {
            let parsed = parser::parse(&source.text, &source.label);
            info!(source = %source.label, count = parsed.len(), "Parsed source");
            parsed
        })
        .collect();
    info!(count = articles.len(), "Total articles parsed");

    // ---- Reports ----
    let categories: Vec<CategoryFilter> = if args.all_categories {
        config.categories.iter().map(|c| CategoryFilter::from(c.as_str())).collect()
    } else {
        vec![CategoryFilter::from(args.category.as_str())]
    };

    let generated_at = Local::now().to_rfc3339();
    for category in &categories {
        let report = build_report(&articles, &config, category, generated_at.clone());

        if let Err(e) = json::write_report(&report, &args.json_output_dir).await {
            error!(%category, error = %e, "Failed to write JSON report");
            return Err(e);
        }
        if let Err(e) = markdown::write_report(&report, &args.markdown_output_dir).await {
            error!(%category, error = %e, "Failed writing Markdown report");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        reports = categories.len(),
        "Execution complete"
    );

    Ok(())
}
