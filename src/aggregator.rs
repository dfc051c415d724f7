//! Scatter point projection and deduplication.
//!
//! Every scatter view follows the same shape: project the selected articles
//! onto `(x, y)` coordinates tagged with their source, then collapse points
//! that share `(x, y, source)` into one weighted [`GroupedPoint`] so the chart
//! draws a bigger marker instead of stacking identical ones.
//!
//! The collapsing step is [`group_counts`], an insertion-ordered counter
//! parameterized by a key function. All views share it.

use crate::models::{Article, GroupedPoint, Point, Series};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::{debug, instrument};

/// Count items by `key`, keeping the first item seen for each key.
///
/// Output order is the order in which keys were first seen. Every count is at
/// least 1.
pub fn group_counts<T, K, I, F>(items: I, key: F) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(T, usize)> = Vec::new();

    for item in items {
        match slots.entry(key(&item)) {
            Entry::Occupied(slot) => groups[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push((item, 1));
            }
        }
    }
    groups
}

/// Collapse points sharing `(x, y, source)` into weighted points.
pub fn group_points<I>(points: I) -> Vec<GroupedPoint>
where
    I: IntoIterator<Item = Point>,
{
    group_counts(points, |p| (p.x, p.y, p.source.clone()))
        .into_iter()
        .map(|(point, z)| GroupedPoint::new(point, z))
        .collect()
}

/// Project articles onto `(position, metric)` points.
///
/// `x` is the 0-based position of the article in `articles`, so callers
/// should pass the already filtered sequence.
pub fn article_points<F>(articles: &[&Article], metric: F) -> Vec<Point>
where
    F: Fn(&Article) -> u64,
{
    articles
        .iter()
        .enumerate()
        .map(|(index, article)| Point {
            x: index as u64,
            y: metric(*article),
            source: article.source.clone(),
            title: article.title.clone(),
        })
        .collect()
}

/// Scatter points for a per-article metric, deduplicated.
///
/// # Arguments
///
/// * `articles` - Selected articles, in display order
/// * `metric` - Value plotted on the y axis
///
/// # Returns
///
/// One [`GroupedPoint`] per distinct `(x, y, source)`, in first-seen order.
#[instrument(level = "debug", skip_all, fields(articles = articles.len()))]
pub fn aggregate<F>(articles: &[&Article], metric: F) -> Vec<GroupedPoint>
where
    F: Fn(&Article) -> u64,
{
    let grouped = group_points(article_points(articles, metric));
    debug!(points = grouped.len(), "Aggregated article points");
    grouped
}

/// Scatter points of image dimensions (`x` = width, `y` = height).
///
/// Every image of every article contributes one point tagged with the
/// article's source and title. Images of the same size from the same source
/// collapse into one weighted point.
#[instrument(level = "debug", skip_all, fields(articles = articles.len()))]
pub fn image_size_points(articles: &[&Article]) -> Vec<GroupedPoint> {
    let points = articles.iter().flat_map(|article| {
        article.images.iter().map(move |image| Point {
            x: u64::from(image.width),
            y: u64::from(image.height),
            source: article.source.clone(),
            title: article.title.clone(),
        })
    });
    let grouped = group_points(points);
    debug!(points = grouped.len(), "Aggregated image size points");
    grouped
}

/// Partition grouped points into one series per source.
///
/// Series appear in first-seen source order; points keep their relative order.
pub fn split_by_source(points: Vec<GroupedPoint>) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for point in points {
        match series.iter_mut().find(|s| s.source == point.source) {
            Some(existing) => existing.points.push(point),
            None => series.push(Series {
                source: point.source.clone(),
                points: vec![point],
            }),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Image, Metric};

    fn point(x: u64, y: u64, source: &str, title: &str) -> Point {
        Point {
            x,
            y,
            source: source.to_string(),
            title: title.to_string(),
        }
    }

    fn article(source: &str, title: &str, word_count: u32, images: Vec<Image>) -> Article {
        Article {
            source: source.to_string(),
            category: "world".to_string(),
            title: title.to_string(),
            url: String::new(),
            date: String::new(),
            word_count,
            images,
        }
    }

    #[test]
    fn test_group_points_counts_duplicates_in_first_seen_order() {
        let grouped = group_points(vec![
            point(0, 5, "A", "first"),
            point(0, 5, "A", "second"),
            point(1, 5, "A", "third"),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!((grouped[0].x, grouped[0].y, grouped[0].z), (0, 5, 2));
        assert_eq!(grouped[0].title, "first");
        assert_eq!((grouped[1].x, grouped[1].y, grouped[1].z), (1, 5, 1));
    }

    #[test]
    fn test_source_is_part_of_the_key() {
        let grouped = group_points(vec![point(0, 5, "A", "a"), point(0, 5, "B", "b")]);
        assert_eq!(grouped.len(), 2);
        assert!(grouped.iter().all(|p| p.z == 1));
    }

    #[test]
    fn test_group_counts_generic_key() {
        let words = ["b", "a", "b", "c", "a", "b"];
        let counts = group_counts(words, |w| *w);
        assert_eq!(counts, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_aggregate_uses_position_as_x() {
        let articles = vec![
            article("CNN", "one", 100, vec![]),
            article("FOX", "two", 250, vec![]),
            article("CNN", "three", 100, vec![]),
        ];
        let selected: Vec<&Article> = articles.iter().collect();
        let grouped = aggregate(&selected, |a| Metric::WordCount.value(a));

        let coords: Vec<(u64, u64, &str, usize)> = grouped
            .iter()
            .map(|p| (p.x, p.y, p.source.as_str(), p.z))
            .collect();
        assert_eq!(coords, vec![(0, 100, "CNN", 1), (1, 250, "FOX", 1), (2, 100, "CNN", 1)]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[], |a| Metric::ImageCount.value(a)).is_empty());
    }

    #[test]
    fn test_image_size_points_merge_repeated_sizes() {
        let wide = Image {
            width: 1200,
            height: 675,
        };
        let square = Image {
            width: 500,
            height: 500,
        };
        let articles = vec![
            article("CNN", "one", 0, vec![wide, wide]),
            article("FOX", "two", 0, vec![wide, square]),
            article("CNN", "three", 0, vec![square, wide]),
        ];
        let selected: Vec<&Article> = articles.iter().collect();
        let grouped = image_size_points(&selected);

        let coords: Vec<(u64, u64, &str, usize)> = grouped
            .iter()
            .map(|p| (p.x, p.y, p.source.as_str(), p.z))
            .collect();
        assert_eq!(
            coords,
            vec![
                (1200, 675, "CNN", 3),
                (1200, 675, "FOX", 1),
                (500, 500, "FOX", 1),
                (500, 500, "CNN", 1),
            ]
        );
        assert_eq!(grouped[0].title, "one");
    }

    #[test]
    fn test_split_by_source() {
        let grouped = group_points(vec![
            point(0, 1, "FOX", "a"),
            point(1, 2, "CNN", "b"),
            point(2, 3, "FOX", "c"),
        ]);
        let series = split_by_source(grouped);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].source, "FOX");
        assert_eq!(series[0].points.iter().map(|p| p.x).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(series[1].source, "CNN");
        assert_eq!(series[1].points.len(), 1);
    }
}
