//! Summary tables over selected articles: per category, per weekday, per
//! publication day, and the per-source spread of a metric.

use crate::binner::sources_in_order;
use crate::models::{Article, SourceCount};
use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Article count and mean word count for one `(category, source)` pair.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Lower-cased category; empty for uncategorized articles.
    pub category: String,
    pub source: String,
    pub articles: usize,
    pub average_word_count: f64,
}

/// Number of articles published on one weekday, per source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeekdayCount {
    pub weekday: String,
    pub counts: Vec<SourceCount>,
}

/// Number of articles published on one calendar day, per source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyCount {
    /// `YYYY-MM-DD`, in the offset the date was written with.
    pub date: String,
    pub counts: Vec<SourceCount>,
}

/// Five-number summary of a metric over the articles of one source.
///
/// Quartiles use linear interpolation between the closest ranks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Distribution {
    pub source: String,
    pub articles: usize,
    pub min: u64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: u64,
}

/// Summarize articles by category and source.
///
/// Rows are ordered by category, then by first-seen source within the
/// category.
pub fn category_summary(articles: &[&Article]) -> Vec<CategorySummary> {
    // category -> [(source, articles, total words)]
    let mut by_category: BTreeMap<String, Vec<(String, usize, u64)>> = BTreeMap::new();

    for article in articles {
        let rows = by_category.entry(article.category.to_lowercase()).or_default();
        match rows.iter_mut().find(|(source, _, _)| *source == article.source) {
            Some((_, count, words)) => {
                *count += 1;
                *words += u64::from(article.word_count);
            }
            None => rows.push((article.source.clone(), 1, u64::from(article.word_count))),
        }
    }

    by_category
        .into_iter()
        .flat_map(|(category, rows)| {
            rows.into_iter().map(move |(source, count, words)| CategorySummary {
                category: category.clone(),
                source,
                articles: count,
                average_word_count: words as f64 / count as f64,
            })
        })
        .collect()
}

/// Count articles per weekday of publication, Monday first.
///
/// All seven weekdays are always present. Articles whose `date` cannot be
/// parsed are left out.
pub fn weekday_counts(articles: &[&Article]) -> Vec<WeekdayCount> {
    let sources = sources_in_order(articles);
    let mut counts = vec![[0usize; 7]; sources.len()];

    let mut undated = 0usize;
    for article in articles {
        let Some(published) = article.published_at() else {
            undated += 1;
            continue;
        };
        if let Some(column) = sources.iter().position(|s| *s == article.source) {
            counts[column][published.weekday().num_days_from_monday() as usize] += 1;
        }
    }
    debug!(undated, "Counted articles per weekday");

    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(day, weekday)| WeekdayCount {
            weekday: weekday_name(*weekday).to_string(),
            counts: sources
                .iter()
                .zip(&counts)
                .map(|(source, per_day)| SourceCount {
                    source: source.clone(),
                    count: per_day[day],
                })
                .collect(),
        })
        .collect()
}

/// Count articles per publication day, oldest first.
///
/// Only days with at least one article appear. Articles whose `date` cannot
/// be parsed are left out.
pub fn daily_counts(articles: &[&Article]) -> Vec<DailyCount> {
    let sources = sources_in_order(articles);
    let mut by_day: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();

    for article in articles {
        let Some(published) = article.published_at() else {
            continue;
        };
        let Some(column) = sources.iter().position(|s| *s == article.source) else {
            continue;
        };
        by_day
            .entry(published.date_naive())
            .or_insert_with(|| vec![0; sources.len()])[column] += 1;
    }
    debug!(days = by_day.len(), "Counted articles per day");

    by_day
        .into_iter()
        .map(|(date, per_source)| DailyCount {
            date: date.format("%Y-%m-%d").to_string(),
            counts: sources
                .iter()
                .zip(per_source)
                .map(|(source, count)| SourceCount {
                    source: source.clone(),
                    count,
                })
                .collect(),
        })
        .collect()
}

/// Spread of `metric` per source, in first-seen source order.
pub fn metric_distribution<F>(articles: &[&Article], metric: F) -> Vec<Distribution>
where
    F: Fn(&Article) -> u64,
{
    sources_in_order(articles)
        .into_iter()
        .map(|source| {
            let values: Vec<u64> = articles
                .iter()
                .filter(|article| article.source == source)
                .map(|article| metric(*article))
                .sorted_unstable()
                .collect();
            Distribution {
                articles: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
                source,
            }
        })
        .collect()
}

/// Linearly interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[u64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] as f64 + (sorted[upper] as f64 - sorted[lower] as f64) * fraction
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
