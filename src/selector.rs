//! Category and range filtering of parsed articles.

use crate::models::Article;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which categories a view includes.
///
/// Built from the label the user picked: `"All"` (any case) selects every
/// article, anything else selects articles whose category matches it
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// Lower-cased category label.
    Only(String),
}

impl CategoryFilter {
    pub fn new(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_lowercase())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category.to_lowercase() == *wanted,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(label: &str) -> Self {
        CategoryFilter::new(label)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

/// Inclusive bounds on a metric. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl MetricRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Keep the articles that match `category` and whose metric lies in `range`.
///
/// Input order is preserved. `metric` is only evaluated when `range` has at
/// least one bound.
///
/// # Arguments
///
/// * `articles` - Articles to filter; may itself be the output of an earlier `select`
/// * `category` - Category test
/// * `range` - Inclusive bounds on the metric
/// * `metric` - Extracts the bounded attribute from an article
pub fn select<'a, I, F>(articles: I, category: &CategoryFilter, range: &MetricRange, metric: F) -> Vec<&'a Article>
where
    I: IntoIterator<Item = &'a Article>,
    F: Fn(&Article) -> u64,
{
    articles
        .into_iter()
        .filter(|article| category.matches(&article.category))
        .filter(|article| range.is_unbounded() || range.contains(metric(*article)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn article(title: &str, category: &str, word_count: u32) -> Article {
        Article {
            source: "CNN".to_string(),
            category: category.to_string(),
            title: title.to_string(),
            url: String::new(),
            date: String::new(),
            word_count,
            images: vec![],
        }
    }

    fn fixture() -> Vec<Article> {
        vec![
            article("a", "Sports", 15),
            article("b", "politics", 15),
            article("c", "sports", 9),
            article("d", "sports", 21),
            article("e", "SPORTS", 10),
            article("f", "sports", 20),
        ]
    }

    fn titles(selected: &[&Article]) -> Vec<String> {
        selected.iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_all_returns_everything_in_order() {
        let articles = fixture();
        let selected = select(&articles, &CategoryFilter::new("All"), &MetricRange::default(), |a| {
            Metric::WordCount.value(a)
        });
        assert_eq!(titles(&selected), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_category_and_inclusive_bounds() {
        let articles = fixture();
        let selected = select(
            &articles,
            &CategoryFilter::new("Sports"),
            &MetricRange::new(Some(10), Some(20)),
            |a| Metric::WordCount.value(a),
        );
        assert_eq!(titles(&selected), vec!["a", "e", "f"]);
    }

    #[test]
    fn test_open_bounds() {
        let articles = fixture();
        let at_least = select(&articles, &CategoryFilter::All, &MetricRange::new(Some(20), None), |a| {
            Metric::WordCount.value(a)
        });
        assert_eq!(titles(&at_least), vec!["d", "f"]);

        let at_most = select(&articles, &CategoryFilter::All, &MetricRange::new(None, Some(9)), |a| {
            Metric::WordCount.value(a)
        });
        assert_eq!(titles(&at_most), vec!["c"]);
    }

    #[test]
    fn test_chained_selection() {
        let articles = fixture();
        let sports = select(&articles, &CategoryFilter::new("sports"), &MetricRange::default(), |a| {
            Metric::WordCount.value(a)
        });
        let long = select(sports, &CategoryFilter::All, &MetricRange::new(Some(16), None), |a| {
            Metric::WordCount.value(a)
        });
        assert_eq!(titles(&long), vec!["d", "f"]);
    }

    #[test]
    fn test_unknown_category_selects_nothing() {
        let articles = fixture();
        let selected = select(&articles, &CategoryFilter::new("weather"), &MetricRange::default(), |a| {
            Metric::WordCount.value(a)
        });
        assert!(selected.is_empty());
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!(CategoryFilter::new("ALL"), CategoryFilter::All);
        assert_eq!(CategoryFilter::new(" Health "), CategoryFilter::Only("health".to_string()));
        assert_eq!(CategoryFilter::from("world").to_string(), "world");
        assert_eq!(CategoryFilter::All.to_string(), "All");
    }

    #[test]
    fn test_range_contains() {
        let range = MetricRange::new(Some(10), Some(20));
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
        assert!(MetricRange::default().contains(u64::MAX));
    }
}
