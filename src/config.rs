//! YAML configuration for sources, categories and chart views.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration once at least one source is given on the command line.
//!
//! ```yaml
//! sources:
//!   - label: CNN
//!     locator: data/cnn_articles.txt
//!   - label: FOX
//!     locator: https://example.com/data/fox_news_articles.txt
//! categories: [All, sports, health, science, politics, world]
//! bin_count: 10
//! histograms:
//!   - metric: word_count
//!     bin_width: 150
//!   - metric: image_count
//! word_count:
//!   min: 30
//!   max: 5000
//! ```

use crate::cli::Cli;
use crate::errors::ConfigError;
use crate::models::Metric;
use crate::selector::MetricRange;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A named source dump and where to load it from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Label stored on every article of this source (e.g. `"CNN"`).
    pub label: String,
    /// Local path, `file://` URL or `http(s)://` URL.
    pub locator: String,
}

impl SourceConfig {
    /// Parse a `LABEL=LOCATOR` command-line value.
    pub fn parse_pair(value: &str) -> Result<Self, ConfigError> {
        match value.split_once('=') {
            Some((label, locator)) if !label.trim().is_empty() && !locator.trim().is_empty() => Ok(Self {
                label: label.trim().to_string(),
                locator: locator.trim().to_string(),
            }),
            _ => Err(ConfigError::InvalidSource(value.to_string())),
        }
    }
}

/// One histogram view: the metric to bucket and an optional fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistogramConfig {
    pub metric: Metric,
    /// Fixed bucket width; computed-width buckets when absent.
    #[serde(default)]
    pub bin_width: Option<u64>,
}

impl HistogramConfig {
    pub fn width(&self) -> Option<NonZeroU64> {
        self.bin_width.and_then(NonZeroU64::new)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    pub sources: Vec<SourceConfig>,
    /// Categories offered for filtering; `"All"` selects everything.
    pub categories: Vec<String>,
    /// Bucket count for computed-width histograms.
    pub bin_count: usize,
    pub histograms: Vec<HistogramConfig>,
    /// Inclusive word count bounds applied before every view.
    pub word_count: MetricRange,
    /// Inclusive image count bounds applied before every view.
    pub image_count: MetricRange,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            categories: ["All", "sports", "health", "science", "politics", "world"]
                .into_iter()
                .map(String::from)
                .collect(),
            bin_count: 10,
            histograms: vec![
                HistogramConfig {
                    metric: Metric::WordCount,
                    bin_width: Some(150),
                },
                HistogramConfig {
                    metric: Metric::ImageCount,
                    bin_width: None,
                },
            ],
            word_count: MetricRange::default(),
            image_count: MetricRange::default(),
        }
    }
}

impl StatsConfig {
    /// Read a configuration file.
    #[instrument(level = "info")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse { path: display, source })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null rather than an empty mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if !cli.source.is_empty() {
            self.sources = cli
                .source
                .iter()
                .map(|pair| SourceConfig::parse_pair(pair))
                .collect::<Result<_, _>>()?;
            debug!(count = self.sources.len(), "Sources overridden from command line");
        }
        if let Some(bin_count) = cli.bin_count {
            self.bin_count = bin_count;
        }
        if cli.min_words.is_some() {
            self.word_count.min = cli.min_words;
        }
        if cli.max_words.is_some() {
            self.word_count.max = cli.max_words;
        }
        Ok(())
    }

    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if let Some(label) = self.sources.iter().map(|s| &s.label).duplicates().next() {
            return Err(ConfigError::DuplicateSource(label.clone()));
        }
        if self.bin_count == 0 {
            return Err(ConfigError::ZeroBinCount);
        }
        if let Some(histogram) = self.histograms.iter().find(|h| h.bin_width == Some(0)) {
            return Err(ConfigError::ZeroBinWidth(histogram.metric));
        }
        for (metric, range) in self.ranges() {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(ConfigError::InvertedBounds { metric, min, max });
                }
            }
        }
        info!(
            sources = self.sources.len(),
            categories = self.categories.len(),
            histograms = self.histograms.len(),
            "Configuration validated"
        );
        Ok(())
    }

    /// Bucket count for computed-width histograms.
    pub fn bins(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.bin_count).unwrap_or(crate::binner::DEFAULT_BIN_COUNT)
    }

    /// Metric bounds in the order they are applied.
    pub fn ranges(&self) -> [(Metric, MetricRange); 2] {
        [(Metric::WordCount, self.word_count), (Metric::ImageCount, self.image_count)]
    }
}
