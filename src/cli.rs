//! Command-line interface definitions for Awful Article Stats.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Values given here override the matching entries of the YAML configuration.

use clap::Parser;

/// Command-line arguments for the Awful Article Stats application.
///
/// # Examples
///
/// ```sh
/// # Two sources given inline
/// awful_article_stats -j ./json -m ./markdown \
///     --source CNN=data/cnn_articles.txt \
///     --source FOX=data/fox_news_articles.txt
///
/// # Sources from a config file, one report per configured category
/// awful_article_stats -j ./json -m ./markdown -c stats.yaml --all-categories
///
/// # Only sports articles between 100 and 2000 words
/// awful_article_stats -j ./json -m ./markdown -c stats.yaml \
///     --category sports --min-words 100 --max-words 2000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "ARTICLE_STATS_CONFIG")]
    pub config: Option<String>,

    /// Source as LABEL=LOCATOR (path or http(s) URL); repeatable, replaces configured sources
    #[arg(short, long)]
    pub source: Vec<String>,

    /// Category to report on ("All" for every article)
    #[arg(long, default_value = "All")]
    pub category: String,

    /// Write one report per configured category instead of only --category
    #[arg(long)]
    pub all_categories: bool,

    /// Bucket count for computed-width histograms
    #[arg(long)]
    pub bin_count: Option<usize>,

    /// Inclusive lower bound on word count
    #[arg(long)]
    pub min_words: Option<u64>,

    /// Inclusive upper bound on word count
    #[arg(long)]
    pub max_words: Option<u64>,

    /// Retries for transient load failures
    #[arg(long, default_value_t = 3)]
    pub retries: usize,

    /// Per-request timeout for HTTP sources, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
