//! Histogram bucketing of a per-article metric.
//!
//! Two policies share one entry point:
//!
//! - **Computed width**: `k` buckets spanning the observed `min..=max`,
//!   `width = ceil((max - min + 1) / k)`. Empty buckets are left out.
//! - **Fixed width**: buckets of a given width starting at 0. Interior empty
//!   buckets are kept so the axis stays continuous; only trailing empty
//!   buckets are trimmed.
//!
//! A value on a boundary belongs to the bucket whose lower bound it equals.

use crate::models::{Article, Bin, SourceCount};
use itertools::Itertools;
use std::collections::HashMap;
use std::num::{NonZeroU64, NonZeroUsize};
use tracing::{debug, instrument};

/// Bucket count used when no explicit width is given.
pub const DEFAULT_BIN_COUNT: NonZeroUsize = NonZeroUsize::new(10).expect("10 is non-zero");

/// How bucket boundaries are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binning {
    /// `bins` buckets of equal width covering the observed range.
    Computed { bins: NonZeroUsize },
    /// Buckets of `width` starting at 0.
    Fixed { width: NonZeroU64 },
}

impl Binning {
    /// Fixed width when one is given, computed width over `bins` otherwise.
    pub fn from_width(width: Option<NonZeroU64>, bins: NonZeroUsize) -> Self {
        match width {
            Some(width) => Binning::Fixed { width },
            None => Binning::Computed { bins },
        }
    }
}

/// Sources of `articles` in first-seen order.
pub fn sources_in_order(articles: &[&Article]) -> Vec<String> {
    articles
        .iter()
        .map(|article| article.source.clone())
        .unique()
        .collect()
}

/// Bucket `articles` by `metric`, using a fixed width when `bin_width` is
/// given and [`DEFAULT_BIN_COUNT`] computed buckets otherwise.
pub fn bin<F>(articles: &[&Article], metric: F, bin_width: Option<NonZeroU64>) -> Vec<Bin>
where
    F: Fn(&Article) -> u64,
{
    bin_with(articles, metric, Binning::from_width(bin_width, DEFAULT_BIN_COUNT))
}

/// Bucket `articles` by `metric` under an explicit [`Binning`] policy.
///
/// Every bucket carries a count for each source present in `articles`, so the
/// counts of all returned buckets add up to `articles.len()`.
///
/// # Returns
///
/// Buckets ordered by ascending lower bound, or an empty vector when
/// `articles` is empty.
#[instrument(level = "debug", skip(articles, metric), fields(articles = articles.len()))]
pub fn bin_with<F>(articles: &[&Article], metric: F, binning: Binning) -> Vec<Bin>
where
    F: Fn(&Article) -> u64,
{
    let values: Vec<(u64, &str)> = articles
        .iter()
        .map(|article| (metric(*article), article.source.as_str()))
        .collect();
    let Some((min, max)) = values.iter().map(|(value, _)| *value).minmax().into_option() else {
        return Vec::new();
    };

    let (start, width, buckets) = match binning {
        Binning::Computed { bins } => {
            let span = max - min + 1;
            let width = span.div_ceil(bins.get() as u64);
            // Rows past the last occupied one would always be empty.
            (min, width, span.div_ceil(width))
        }
        Binning::Fixed { width } => {
            let width = width.get();
            (0, width, max / width + 1)
        }
    };

    let sources = sources_in_order(articles);
    let columns: HashMap<&str, usize> = sources
        .iter()
        .enumerate()
        .map(|(column, source)| (source.as_str(), column))
        .collect();

    let mut counts = vec![vec![0usize; sources.len()]; buckets as usize];
    for (value, source) in values {
        let row = ((value - start) / width).min(buckets - 1) as usize;
        if let Some(&column) = columns.get(source) {
            counts[row][column] += 1;
        }
    }

    let mut bins: Vec<Bin> = counts
        .into_iter()
        .enumerate()
        .map(|(row, row_counts)| {
            let low = start + row as u64 * width;
            let high = low + width - 1;
            Bin {
                range: format!("{low}-{high}"),
                low,
                high,
                counts: sources
                    .iter()
                    .zip(row_counts)
                    .map(|(source, count)| SourceCount {
                        source: source.clone(),
                        count,
                    })
                    .collect(),
            }
        })
        .collect();

    match binning {
        Binning::Computed { .. } => bins.retain(|bin| bin.total() > 0),
        Binning::Fixed { .. } => {
            let keep = bins.iter().rposition(|bin| bin.total() > 0).map_or(0, |last| last + 1);
            bins.truncate(keep);
        }
    }

    debug!(min, max, width, buckets = bins.len(), "Binned metric");
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn article(source: &str, word_count: u32) -> Article {
        Article {
            source: source.to_string(),
            category: "world".to_string(),
            title: format!("{source} {word_count}"),
            url: String::new(),
            date: String::new(),
            word_count,
            images: vec![],
        }
    }

    fn words(a: &Article) -> u64 {
        Metric::WordCount.value(a)
    }

    fn labels(bins: &[Bin]) -> Vec<&str> {
        bins.iter().map(|b| b.range.as_str()).collect()
    }

    #[test]
    fn test_fixed_width_boundaries() {
        let articles: Vec<Article> = [0, 140, 150, 299, 300].into_iter().map(|w| article("CNN", w)).collect();
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, words, NonZeroU64::new(150));

        assert_eq!(labels(&bins), vec!["0-149", "150-299", "300-449"]);
        assert_eq!(bins.iter().map(Bin::total).collect::<Vec<_>>(), vec![2, 2, 1]);
    }

    #[test]
    fn test_fixed_width_keeps_interior_empty_buckets() {
        let articles = vec![article("CNN", 10), article("FOX", 700)];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, words, NonZeroU64::new(150));

        assert_eq!(labels(&bins), vec!["0-149", "150-299", "300-449", "450-599", "600-749"]);
        assert_eq!(bins[0].count_for("CNN"), 1);
        assert_eq!(bins[0].count_for("FOX"), 0);
        assert_eq!(bins[2].total(), 0);
        assert_eq!(bins[4].count_for("FOX"), 1);
    }

    #[test]
    fn test_counts_split_by_source() {
        let articles = vec![article("CNN", 20), article("FOX", 30), article("FOX", 40), article("NPR", 200)];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, words, NonZeroU64::new(150));

        let sources: Vec<&str> = bins[0].counts.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["CNN", "FOX", "NPR"]);
        assert_eq!(bins[0].count_for("FOX"), 2);
        assert_eq!(bins[1].count_for("NPR"), 1);
    }

    #[test]
    fn test_computed_width() {
        let articles: Vec<Article> = (100..=119).map(|w| article("CNN", w)).collect();
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, words, None);

        // 20 distinct values over 10 buckets => width 2 starting at the minimum
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].range, "100-101");
        assert_eq!(bins[9].range, "118-119");
        assert!(bins.iter().all(|b| b.total() == 2));
    }

    #[test]
    fn test_computed_width_drops_empty_buckets() {
        let articles = vec![article("CNN", 0), article("CNN", 1), article("FOX", 99)];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, words, None);

        assert_eq!(labels(&bins), vec!["0-9", "90-99"]);
        assert_eq!(bins[0].count_for("CNN"), 2);
        assert_eq!(bins[1].count_for("FOX"), 1);
    }

    #[test]
    fn test_computed_width_single_value() {
        let articles = vec![article("CNN", 42), article("CNN", 42)];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin_with(
            &selected,
            words,
            Binning::Computed {
                bins: NonZeroUsize::new(4).unwrap(),
            },
        );

        assert_eq!(labels(&bins), vec!["42-42"]);
        assert_eq!(bins[0].total(), 2);
    }

    #[test]
    fn test_huge_bin_count_only_allocates_occupied_range() {
        let articles = vec![article("CNN", 5), article("FOX", 7)];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin_with(
            &selected,
            words,
            Binning::Computed {
                bins: NonZeroUsize::new(usize::MAX / 2).unwrap(),
            },
        );

        assert_eq!(labels(&bins), vec!["5-5", "7-7"]);
        assert_eq!(bins[1].count_for("FOX"), 1);
    }

    #[test]
    fn test_empty_selection() {
        assert!(bin(&[], words, None).is_empty());
        assert!(bin(&[], words, NonZeroU64::new(150)).is_empty());
    }

    #[test]
    fn test_no_article_lost_or_double_counted() {
        let articles: Vec<Article> = [3, 17, 17, 250, 999, 1000, 4, 0]
            .into_iter()
            .enumerate()
            .map(|(i, w)| article(if i % 2 == 0 { "CNN" } else { "FOX" }, w))
            .collect();
        let selected: Vec<&Article> = articles.iter().collect();

        for binning in [
            Binning::Computed {
                bins: NonZeroUsize::new(10).unwrap(),
            },
            Binning::Computed {
                bins: NonZeroUsize::new(3).unwrap(),
            },
            Binning::Fixed {
                width: NonZeroU64::new(150).unwrap(),
            },
            Binning::Fixed {
                width: NonZeroU64::new(1).unwrap(),
            },
        ] {
            let bins = bin_with(&selected, words, binning);
            let total: usize = bins.iter().map(Bin::total).sum();
            assert_eq!(total, selected.len(), "{binning:?}");
        }
    }

    #[test]
    fn test_image_count_metric() {
        let mut with_images = article("CNN", 0);
        with_images.images = vec![
            crate::models::Image {
                width: 10,
                height: 10
            };
            3
        ];
        let articles = vec![article("CNN", 0), with_images];
        let selected: Vec<&Article> = articles.iter().collect();
        let bins = bin(&selected, |a| Metric::ImageCount.value(a), NonZeroU64::new(1));

        assert_eq!(labels(&bins), vec!["0-0", "1-1", "2-2", "3-3"]);
        assert_eq!(bins.iter().map(Bin::total).collect::<Vec<_>>(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_sources_in_order() {
        let articles = vec![article("FOX", 1), article("CNN", 2), article("FOX", 3)];
        let selected: Vec<&Article> = articles.iter().collect();
        assert_eq!(sources_in_order(&selected), vec!["FOX", "CNN"]);
    }
}
