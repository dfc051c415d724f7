//! Assembles every chart view for one category selection.
//!
//! A [`Report`] is what the rendering layer consumes: scatter series per
//! metric, the image size scatter, one histogram per configured view,
//! per-source metric distributions and the summary tables. Building it is pure; writing it out lives in
//! [`crate::outputs`].

use crate::aggregator::{aggregate, image_size_points, split_by_source};
use crate::binner::{Binning, bin, bin_with};
use crate::config::StatsConfig;
use crate::models::{Article, Bin, Metric, Series};
use crate::selector::{CategoryFilter, MetricRange, select};
use crate::summary::{
    CategorySummary, DailyCount, Distribution, WeekdayCount, category_summary, daily_counts, metric_distribution,
    weekday_counts,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Per-article scatter view of one metric.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScatterView {
    pub metric: Metric,
    pub label: String,
    pub series: Vec<Series>,
}

/// Histogram of one metric.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramView {
    pub metric: Metric,
    pub label: String,
    /// Fixed width, or `None` when buckets were computed from the data.
    pub bin_width: Option<u64>,
    pub bins: Vec<Bin>,
}

/// Per-source spread of one metric.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistributionView {
    pub metric: Metric,
    pub label: String,
    pub sources: Vec<Distribution>,
}

/// How many articles of a source were parsed and how many survived selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceTotals {
    pub source: String,
    pub parsed: usize,
    pub selected: usize,
}

/// Everything the charts need for one category selection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// RFC 3339 timestamp of when the report was built.
    pub generated_at: String,
    /// Selected category, `"All"` for every article.
    pub category: String,
    /// Categories available for selection.
    pub categories: Vec<String>,
    pub sources: Vec<SourceTotals>,
    pub scatter: Vec<ScatterView>,
    /// Image dimensions of every article in the category; metric bounds do
    /// not apply.
    pub image_sizes: Vec<Series>,
    pub histograms: Vec<HistogramView>,
    pub distributions: Vec<DistributionView>,
    pub category_summary: Vec<CategorySummary>,
    pub weekdays: Vec<WeekdayCount>,
    pub daily: Vec<DailyCount>,
}

impl Report {
    /// Number of articles that passed selection.
    pub fn selected(&self) -> usize {
        self.sources.iter().map(|s| s.selected).sum()
    }
}

/// Apply the category filter and every configured metric bound.
pub fn select_articles<'a>(articles: &'a [Article], category: &CategoryFilter, config: &StatsConfig) -> Vec<&'a Article> {
    let [(first_metric, first_range), rest @ ..] = config.ranges();
    let mut selected = select(articles, category, &first_range, |a| first_metric.value(a));
    for (metric, range) in rest {
        selected = select(selected, &CategoryFilter::All, &range, |a| metric.value(a));
    }
    selected
}

/// Build the report for `category` over all parsed articles.
///
/// # Arguments
///
/// * `articles` - Articles of every source, in load order
/// * `config` - Validated configuration
/// * `category` - Category selection
/// * `generated_at` - Timestamp recorded in the report
#[instrument(level = "info", skip_all, fields(articles = articles.len(), %category))]
pub fn build_report(
    articles: &[Article],
    config: &StatsConfig,
    category: &CategoryFilter,
    generated_at: String,
) -> Report {
    let selected = select_articles(articles, category, config);

    let sources = config
        .sources
        .iter()
        .map(|source| SourceTotals {
            source: source.label.clone(),
            parsed: articles.iter().filter(|a| a.source == source.label).count(),
            selected: selected.iter().filter(|a| a.source == source.label).count(),
        })
        .collect();

    let metrics = [Metric::WordCount, Metric::ImageCount];
    let scatter = metrics
        .into_iter()
        .map(|metric| ScatterView {
            metric,
            label: metric.label().to_string(),
            series: split_by_source(aggregate(&selected, |a| metric.value(a))),
        })
        .collect();

    let histograms = config
        .histograms
        .iter()
        .map(|histogram| {
            let metric = histogram.metric;
            HistogramView {
                metric,
                label: metric.label().to_string(),
                bin_width: histogram.width().map(|w| w.get()),
                bins: match histogram.width() {
                    Some(width) => bin(&selected, |a| metric.value(a), Some(width)),
                    None => bin_with(&selected, |a| metric.value(a), Binning::Computed { bins: config.bins() }),
                },
            }
        })
        .collect();

    let distributions = metrics
        .into_iter()
        .map(|metric| DistributionView {
            metric,
            label: metric.label().to_string(),
            sources: metric_distribution(&selected, |a| metric.value(a)),
        })
        .collect();

    let in_category = select(articles, category, &MetricRange::default(), |a| Metric::WordCount.value(a));

    let report = Report {
        generated_at,
        category: category.to_string(),
        categories: config.categories.clone(),
        sources,
        scatter,
        image_sizes: split_by_source(image_size_points(&in_category)),
        histograms,
        distributions,
        category_summary: category_summary(&selected),
        weekdays: weekday_counts(&selected),
        daily: daily_counts(&selected),
    };
    info!(selected = report.selected(), "Built report");
    report
}
