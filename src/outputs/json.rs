//! JSON output for the chart frontend.
//!
//! The report is written to `{json_output_dir}/{category-slug}.json`, so the
//! frontend can fetch the file matching the category the user picked.

use crate::report::Report;
use crate::utils::slugify;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON file for `report` under `json_output_dir`.
pub fn report_path(report: &Report, json_output_dir: &str) -> String {
    format!(
        "{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        slugify(&report.category)
    )
}

/// Write a [`Report`] as pretty-printed JSON.
///
/// # Returns
///
/// The path written to, or an error if directory creation, serialization or
/// writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, category = %report.category))]
pub async fn write_report(report: &Report, json_output_dir: &str) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = report_path(report, json_output_dir);
    info!(%path, "Writing JSON");
    fs::write(&path, json).await?;
    info!(%path, selected = report.selected(), "Wrote JSON report");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(category: &str) -> Report {
        Report {
            generated_at: "2025-02-17T00:00:00+00:00".to_string(),
            category: category.to_string(),
            categories: vec!["All".to_string(), "sports".to_string()],
            sources: vec![],
            scatter: vec![],
            image_sizes: vec![],
            histograms: vec![],
            distributions: vec![],
            category_summary: vec![],
            weekdays: vec![],
            daily: vec![],
        }
    }

    #[test]
    fn test_report_path() {
        assert_eq!(report_path(&report("All"), "/tmp/json/"), "/tmp/json/all.json");
        assert_eq!(report_path(&report("world news"), "out"), "out/world-news.json");
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let dir = std::env::temp_dir().join(format!("awful_article_stats_json_{}", std::process::id()));
        let dir = dir.to_str().unwrap().to_string();

        let written = write_report(&report("sports"), &dir).await.unwrap();
        let raw = tokio::fs::read_to_string(&written).await.unwrap();
        let back: Report = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, report("sports"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
