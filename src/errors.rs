//! Error types for loading source dumps and reading configuration.
//!
//! Only transport and configuration problems are errors. Malformed article
//! content is tolerated by the parser and never reaches these types.

use crate::models::Metric;
use std::io;
use thiserror::Error;

/// Failure to obtain the raw text of a source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: io::Error,
    },

    #[error("request to {locator} failed: {source}")]
    Http {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{locator} responded with HTTP {status}")]
    Status {
        locator: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid locator: {0}")]
    InvalidLocator(String),
}

impl LoadError {
    /// Whether retrying the same load could succeed.
    ///
    /// Timeouts, connection and send failures, rate limiting and server
    /// errors are transient. Missing files, client errors, body decoding and
    /// redirect failures, and bad locators are not.
    pub fn is_transient(&self) -> bool {
        match self {
            LoadError::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            LoadError::Http { source, .. } => source.is_timeout() || source.is_connect() || source.is_request(),
            LoadError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            LoadError::InvalidLocator(_) => false,
        }
    }
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid source {0:?}: expected LABEL=LOCATOR")]
    InvalidSource(String),

    #[error("no sources configured")]
    NoSources,

    #[error("duplicate source label {0:?}")]
    DuplicateSource(String),

    #[error("bin_count must be at least 1")]
    ZeroBinCount,

    #[error("bin_width for {0} must be at least 1")]
    ZeroBinWidth(Metric),

    #[error("{metric} bounds are inverted: min {min} > max {max}")]
    InvertedBounds { metric: Metric, min: u64, max: u64 },
}
