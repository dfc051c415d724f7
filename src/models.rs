//! Data models for parsed articles and the derived chart records.
//!
//! This module defines the value objects that flow through the pipeline:
//! - [`Article`] and [`Image`]: records produced by the parser
//! - [`Metric`]: the numeric attribute a view is computed over
//! - [`Point`] and [`GroupedPoint`]: scatter coordinates before and after deduplication
//! - [`Series`]: grouped points belonging to a single source
//! - [`Bin`] and [`SourceCount`]: histogram buckets
//!
//! Field names serialize as camelCase to match what the chart frontend reads.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single article parsed from a source dump.
///
/// Articles are immutable once the parser hands them out. Every text field may
/// be empty except that at least one of `category` or `title` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Label of the publication the article came from (e.g. `"CNN"`).
    pub source: String,
    /// Section label as written in the dump (e.g. `"sports"`).
    pub category: String,
    /// Headline.
    pub title: String,
    /// Article URL, unvalidated.
    pub url: String,
    /// Publication date as free text.
    pub date: String,
    /// Number of words; 0 when absent or unparseable.
    pub word_count: u32,
    /// Images with known dimensions, in the order they were listed.
    pub images: Vec<Image>,
}

impl Article {
    /// Parse the free-text `date` field.
    ///
    /// Scrapers write RFC 2822 dates (`Mon, 16 Dec 2024 10:00:00 +0000`);
    /// RFC 3339 is accepted as a fallback. Returns `None` when neither format
    /// matches.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let date = self.date.trim();
        if date.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc2822(date)
            .or_else(|_| DateTime::parse_from_rfc3339(date))
            .ok()
    }
}

/// Pixel dimensions of an image embedded in an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Image {
    pub width: u32,
    pub height: u32,
}

/// A numeric attribute of an [`Article`] that scatter and histogram views are
/// computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// [`Article::word_count`].
    WordCount,
    /// Number of entries in [`Article::images`].
    ImageCount,
}

impl Metric {
    /// Extract this metric from an article.
    pub fn value(&self, article: &Article) -> u64 {
        match self {
            Metric::WordCount => u64::from(article.word_count),
            Metric::ImageCount => article.images.len() as u64,
        }
    }

    /// Human-readable axis label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::WordCount => "Word Count",
            Metric::ImageCount => "Number of Images",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::WordCount => f.write_str("word_count"),
            Metric::ImageCount => f.write_str("image_count"),
        }
    }
}

/// One scatter coordinate before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Point {
    pub x: u64,
    pub y: u64,
    pub source: String,
    pub title: String,
}

/// A scatter coordinate weighted by how many input points shared its
/// `(x, y, source)` key.
///
/// `title` is taken from the first point seen for the key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupedPoint {
    pub x: u64,
    pub y: u64,
    pub source: String,
    pub title: String,
    /// Number of input points with this key; always at least 1.
    pub z: usize,
}

impl GroupedPoint {
    pub fn new(point: Point, z: usize) -> Self {
        Self {
            x: point.x,
            y: point.y,
            source: point.source,
            title: point.title,
            z,
        }
    }
}

/// All grouped points of one source, rendered as a single chart series.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Series {
    pub source: String,
    pub points: Vec<GroupedPoint>,
}

/// Article count for one source inside a [`Bin`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// One histogram bucket covering the inclusive range `low..=high`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bin {
    /// Display label, `"<low>-<high>"`.
    pub range: String,
    pub low: u64,
    pub high: u64,
    /// One entry per source, in first-seen source order.
    pub counts: Vec<SourceCount>,
}

impl Bin {
    /// Count for `source`, or 0 when the source has no entry.
    pub fn count_for(&self, source: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.source == source)
            .map_or(0, |c| c.count)
    }

    /// Sum of the counts of every source.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}
