//! Parser for the plain-text article dumps written by the scrapers.
//!
//! A dump is a sequence of blocks separated by blank lines, one block per
//! article:
//!
//! ```text
//! Category: politics
//! Title: Senate passes budget
//! URL: https://example.com/budget
//! Date: Mon, 16 Dec 2024 10:00:00 +0000
//! Word Count: 204 words
//! Images: 3 (Sizes: 1200x675, 1200x675, Unknown Size)
//! ```
//!
//! Parsing is best effort. Missing fields keep their defaults, unparseable
//! numbers become 0, and image sizes that cannot be read are dropped. Nothing
//! in the content can make [`parse`] fail.

use crate::models::{Article, Image};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, trace};

/// First run of digits at the start of a value, after optional whitespace and `+`.
static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\+?(\d+)").expect("leading integer pattern is valid"));

/// First parenthesized group on an `Images:` line.
static SIZES_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]*)\)").expect("sizes group pattern is valid"));

/// Fields collected while walking the lines of one block.
#[derive(Debug, Default)]
struct ArticleDraft {
    category: String,
    title: String,
    url: String,
    date: String,
    word_count: u32,
    images: Vec<Image>,
}

impl ArticleDraft {
    /// Blocks with neither a category nor a title are noise (stray separators,
    /// trailing metadata) and produce nothing.
    fn finish(self, source: &str) -> Option<Article> {
        if self.category.is_empty() && self.title.is_empty() {
            return None;
        }
        Some(Article {
            source: source.to_string(),
            category: self.category,
            title: self.title,
            url: self.url,
            date: self.date,
            word_count: self.word_count,
            images: self.images,
        })
    }
}

type FieldSetter = fn(&mut ArticleDraft, &str);

/// Line prefixes and the field each one fills. Checked in order; the first
/// matching prefix wins.
const FIELDS: &[(&str, FieldSetter)] = &[
    ("Category:", set_category),
    ("Title:", set_title),
    ("URL:", set_url),
    ("Date:", set_date),
    ("Word Count:", set_word_count),
    ("Images:", set_images),
];

fn set_category(draft: &mut ArticleDraft, rest: &str) {
    draft.category = rest.trim().to_string();
}

fn set_title(draft: &mut ArticleDraft, rest: &str) {
    draft.title = rest.trim().to_string();
}

fn set_url(draft: &mut ArticleDraft, rest: &str) {
    draft.url = rest.trim().to_string();
}

fn set_date(draft: &mut ArticleDraft, rest: &str) {
    draft.date = rest.trim().to_string();
}

fn set_word_count(draft: &mut ArticleDraft, rest: &str) {
    draft.word_count = leading_integer(rest).unwrap_or(0);
}

fn set_images(draft: &mut ArticleDraft, rest: &str) {
    draft.images = parse_image_sizes(rest);
}

/// Parse a whole dump into articles tagged with `source`.
///
/// Blocks are split on lines that contain only whitespace. Each block is
/// parsed on its own, so a malformed block never affects its neighbours.
///
/// # Arguments
///
/// * `raw_text` - Complete contents of one source dump
/// * `source` - Label stored in [`Article::source`] (e.g. `"CNN"`)
///
/// # Returns
///
/// Articles in the order their blocks appear in the dump.
#[instrument(level = "info", skip(raw_text), fields(bytes = raw_text.len()))]
pub fn parse(raw_text: &str, source: &str) -> Vec<Article> {
    let mut articles = Vec::new();
    let mut dropped = 0usize;

    let chunks = raw_text.lines().chunk_by(|line| line.trim().is_empty());
    for (blank, block) in &chunks {
        if blank {
            continue;
        }
        let lines: Vec<&str> = block.collect();
        match parse_block(&lines, source) {
            Some(article) => articles.push(article),
            None => {
                dropped += 1;
                debug!(
                    block = %truncate_for_log(&lines.join(" | "), 120),
                    "Dropping block without category or title"
                );
            }
        }
    }

    info!(count = articles.len(), dropped, "Parsed articles");
    articles
}

fn parse_block(lines: &[&str], source: &str) -> Option<Article> {
    let mut draft = ArticleDraft::default();
    for line in lines {
        if let Some((prefix, setter)) = FIELDS.iter().find(|(prefix, _)| line.starts_with(*prefix)) {
            setter(&mut draft, &line[prefix.len()..]);
        }
    }
    draft.finish(source)
}

/// Leading integer of `value`, mirroring how the dumps write counts
/// (`"204 words"`). Returns `None` when the value does not start with digits
/// or the number does not fit.
fn leading_integer(value: &str) -> Option<u32> {
    LEADING_INTEGER
        .captures(value)
        .and_then(|caps| caps[1].parse().ok())
}

/// Read the `WxH` tokens from the remainder of an `Images:` line.
///
/// The sizes live in the first parenthesized group, optionally introduced by
/// `Sizes:`. Tokens mentioning "unknown" and tokens without two positive
/// integers are skipped.
fn parse_image_sizes(rest: &str) -> Vec<Image> {
    let Some(group) = SIZES_GROUP.captures(rest).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };
    let sizes = group.as_str().trim();
    let sizes = sizes.strip_prefix("Sizes:").unwrap_or(sizes);

    sizes.split(',').filter_map(parse_image_token).collect()
}

fn parse_image_token(token: &str) -> Option<Image> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if token.to_lowercase().contains("unknown") {
        trace!(token, "Skipping image of unknown size");
        return None;
    }

    let (width, height) = token.split_once('x')?;
    let (width, height) = (leading_integer(width)?, leading_integer(height)?);
    if width == 0 || height == 0 {
        trace!(token, "Skipping image with zero dimension");
        return None;
    }
    Some(Image { width, height })
}
