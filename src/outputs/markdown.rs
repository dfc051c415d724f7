//! Markdown rendering of a report.
//!
//! The Markdown file is a readable companion to the JSON: every view is
//! flattened into a table, with histograms rendered one column per source.

use crate::models::{Bin, Series, SourceCount};
use crate::summary::Distribution;
use crate::report::Report;
use crate::utils::{slugify, upcase};
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Image sizes listed per report, most frequent first.
const TOP_IMAGE_SIZES: usize = 10;

/// Render `report` as a Markdown document.
pub fn report_to_markdown(report: &Report) -> String {
    let mut md = String::new();

    writeln!(md, "# Article Statistics: {}\n", upcase(&report.category)).unwrap();
    writeln!(md, "_Generated {}_\n", report.generated_at).unwrap();

    writeln!(md, "## Sources\n").unwrap();
    writeln!(md, "| Source | Parsed | Selected |").unwrap();
    writeln!(md, "|---|---:|---:|").unwrap();
    for source in &report.sources {
        writeln!(md, "| {} | {} | {} |", source.source, source.parsed, source.selected).unwrap();
    }
    writeln!(md).unwrap();

    for histogram in &report.histograms {
        let width = histogram
            .bin_width
            .map_or_else(|| "computed width".to_string(), |w| format!("width {w}"));
        writeln!(md, "## {} ({})\n", histogram.label, width).unwrap();
        write_bins(&mut md, &histogram.bins);
    }

    for view in &report.scatter {
        writeln!(md, "## {} per Article\n", view.label).unwrap();
        write_series_ranges(&mut md, &view.series);
    }

    for view in &report.distributions {
        writeln!(md, "## {} Distribution\n", view.label).unwrap();
        write_distribution(&mut md, &view.sources);
    }

    writeln!(md, "## Most Common Image Sizes\n").unwrap();
    write_image_sizes(&mut md, &report.image_sizes);

    writeln!(md, "## Categories\n").unwrap();
    writeln!(md, "| Category | Source | Articles | Avg. Words |").unwrap();
    writeln!(md, "|---|---|---:|---:|").unwrap();
    for row in &report.category_summary {
        let category = if row.category.is_empty() { "(none)" } else { row.category.as_str() };
        writeln!(
            md,
            "| {} | {} | {} | {:.1} |",
            category, row.source, row.articles, row.average_word_count
        )
        .unwrap();
    }
    writeln!(md).unwrap();

    writeln!(md, "## Articles by Day of the Week\n").unwrap();
    let weekdays: Vec<(&str, &[SourceCount])> = report
        .weekdays
        .iter()
        .map(|day| (day.weekday.as_str(), day.counts.as_slice()))
        .collect();
    write_source_counts(&mut md, "Day", &weekdays);

    writeln!(md, "## Articles Published per Day\n").unwrap();
    let daily: Vec<(&str, &[SourceCount])> = report
        .daily
        .iter()
        .map(|day| (day.date.as_str(), day.counts.as_slice()))
        .collect();
    write_source_counts(&mut md, "Date", &daily);

    md
}

/// One row per label, one column per source.
fn write_source_counts(md: &mut String, first_column: &str, rows: &[(&str, &[SourceCount])]) {
    let Some(first) = rows.first().map(|(_, counts)| *counts).filter(|counts| !counts.is_empty()) else {
        writeln!(md, "_No articles selected._\n").unwrap();
        return;
    };
    let sources = first.iter().map(|c| c.source.as_str()).join(" | ");
    writeln!(md, "| {first_column} | {sources} |").unwrap();
    writeln!(md, "|---|{}", "---:|".repeat(first.len())).unwrap();
    for (label, counts) in rows {
        let counts = counts.iter().map(|c| c.count).join(" | ");
        writeln!(md, "| {label} | {counts} |").unwrap();
    }
    writeln!(md).unwrap();
}

fn write_bins(md: &mut String, bins: &[Bin]) {
    let Some(first) = bins.first() else {
        writeln!(md, "_No articles selected._\n").unwrap();
        return;
    };
    let sources: Vec<&str> = first.counts.iter().map(|c| c.source.as_str()).collect();
    writeln!(md, "| Range | {} | Total |", sources.join(" | ")).unwrap();
    writeln!(md, "|---|{}---:|", "---:|".repeat(sources.len())).unwrap();
    for bin in bins {
        let counts = sources.iter().map(|source| bin.count_for(source)).join(" | ");
        writeln!(md, "| {} | {} | {} |", bin.range, counts, bin.total()).unwrap();
    }
    writeln!(md).unwrap();
}

fn write_series_ranges(md: &mut String, series: &[Series]) {
    if series.is_empty() {
        writeln!(md, "_No articles selected._\n").unwrap();
        return;
    }
    writeln!(md, "| Source | Articles | Min | Max |").unwrap();
    writeln!(md, "|---|---:|---:|---:|").unwrap();
    for s in series {
        let articles: usize = s.points.iter().map(|p| p.z).sum();
        let (min, max) = s
            .points
            .iter()
            .map(|p| p.y)
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        writeln!(md, "| {} | {} | {} | {} |", s.source, articles, min, max).unwrap();
    }
    writeln!(md).unwrap();
}

fn write_distribution(md: &mut String, sources: &[Distribution]) {
    if sources.is_empty() {
        writeln!(md, "_No articles selected._\n").unwrap();
        return;
    }
    writeln!(md, "| Source | Articles | Min | Q1 | Median | Q3 | Max |").unwrap();
    writeln!(md, "|---|---:|---:|---:|---:|---:|---:|").unwrap();
    for d in sources {
        writeln!(
            md,
            "| {} | {} | {} | {:.1} | {:.1} | {:.1} | {} |",
            d.source, d.articles, d.min, d.q1, d.median, d.q3, d.max
        )
        .unwrap();
    }
    writeln!(md).unwrap();
}

fn write_image_sizes(md: &mut String, series: &[Series]) {
    let top = series
        .iter()
        .flat_map(|s| s.points.iter())
        .sorted_by(|a, b| b.z.cmp(&a.z))
        .take(TOP_IMAGE_SIZES)
        .collect::<Vec<_>>();
    if top.is_empty() {
        writeln!(md, "_No images with known sizes._\n").unwrap();
        return;
    }
    writeln!(md, "| Size | Source | Images |").unwrap();
    writeln!(md, "|---|---|---:|").unwrap();
    for point in top {
        writeln!(md, "| {}x{} | {} | {} |", point.x, point.y, point.source, point.z).unwrap();
    }
    writeln!(md).unwrap();
}

/// Path of the Markdown file for `report` under `markdown_output_dir`.
pub fn report_path(report: &Report, markdown_output_dir: &str) -> String {
    format!(
        "{}/{}.md",
        markdown_output_dir.trim_end_matches('/'),
        slugify(&report.category)
    )
}

/// Render and write the Markdown for `report`, returning the path written.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, category = %report.category))]
pub async fn write_report(report: &Report, markdown_output_dir: &str) -> Result<String, Box<dyn Error>> {
    let path = report_path(report, markdown_output_dir);
    fs::create_dir_all(markdown_output_dir).await?;
    fs::write(&path, report_to_markdown(report)).await?;
    info!(%path, "Wrote Markdown report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceConfig, StatsConfig};
    use crate::parser::parse;
    use crate::report::build_report;
    use crate::selector::CategoryFilter;

    fn sample_report(category: &str) -> Report {
        let raw = "\
Category: sports
Title: Cup final
Date: Mon, 16 Dec 2024 10:00:00 +0000
Word Count: 140 words
Images: 2 (Sizes: 1200x675, 640x480)

Category: world
Title: Summit ends
Word Count: 320 words
";
        let articles = parse(raw, "CNN");
        let config = StatsConfig {
            sources: vec![SourceConfig {
                label: "CNN".to_string(),
                locator: "cnn.txt".to_string(),
            }],
            ..StatsConfig::default()
        };
        build_report(&articles, &config, &CategoryFilter::new(category), "now".to_string())
    }

    #[test]
    fn test_markdown_sections() {
        let md = report_to_markdown(&sample_report("All"));

        assert!(md.starts_with("# Article Statistics: All\n"));
        assert!(md.contains("| CNN | 2 | 2 |"));
        assert!(md.contains("## Word Count (width 150)"));
        assert!(md.contains("| Range | CNN | Total |"));
        assert!(md.contains("| 0-149 | 1 | 1 |"));
        assert!(md.contains("| 150-299 | 0 | 0 |"));
        assert!(md.contains("## Number of Images (computed width)"));
        assert!(md.contains("| 1200x675 | CNN | 1 |"));
        assert!(md.contains("| sports | CNN | 1 | 140.0 |"));
        assert!(md.contains("| Monday | 1 |"));
        assert!(md.contains("## Word Count Distribution"));
        assert!(md.contains("| CNN | 2 | 140 | 185.0 | 230.0 | 275.0 | 320 |"));
        assert!(md.contains("| Date | CNN |"));
        assert!(md.contains("| 2024-12-16 | 1 |"));
    }

    #[test]
    fn test_markdown_empty_selection() {
        let md = report_to_markdown(&sample_report("weather"));

        assert!(md.starts_with("# Article Statistics: Weather\n"));
        assert!(md.contains("_No articles selected._"));
        assert!(md.contains("_No images with known sizes._"));
        assert!(!md.contains("| Day |"));
        assert!(!md.contains("| Date |"));
    }

    #[test]
    fn test_report_path() {
        assert_eq!(report_path(&sample_report("sports"), "md/"), "md/sports.md");
    }
}
