//! Loading raw source dumps from disk or over HTTP, with retry and backoff.
//!
//! # Architecture
//!
//! - [`Load`]: core trait, turns a locator into the raw text of a dump
//! - [`SourceLoader`]: reads local paths and `file://` URLs with `tokio::fs`,
//!   fetches `http(s)://` URLs with `reqwest`
//! - [`RetryLoad`]: decorator that retries transient failures of any [`Load`]
//! - [`load_sources`]: loads every configured source concurrently
//!
//! # Retry Strategy
//!
//! - Exponential backoff from a base delay, capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay
//! - Only [`LoadError::is_transient`] failures are retried

use crate::config::SourceConfig;
use crate::errors::LoadError;
use futures::stream::{self, StreamExt, TryStreamExt};
use rand::{Rng, rng};
use reqwest::header::USER_AGENT;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Sources fetched at the same time by [`load_sources`].
const PARALLEL_LOADS: usize = 4;

/// Trait for obtaining the raw text of a source dump.
pub trait Load {
    /// Load the complete text behind `locator`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the text cannot be obtained. Implementors
    /// never substitute empty text for a failed load.
    async fn load(&self, locator: &str) -> Result<String, LoadError>;
}

/// Where a locator points.
#[derive(Debug, PartialEq, Eq)]
enum Location {
    Http(Url),
    File(PathBuf),
}

fn classify(locator: &str) -> Result<Location, LoadError> {
    match Url::parse(locator) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Location::Http(url)),
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(Location::File)
            .map_err(|_| LoadError::InvalidLocator(locator.to_string())),
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(url) if url.scheme().len() > 1 => Err(LoadError::InvalidLocator(locator.to_string())),
        _ => Ok(Location::File(PathBuf::from(locator))),
    }
}

/// Loader for local files and HTTP(S) URLs.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: reqwest::Client,
    timeout: StdDuration,
}

impl SourceLoader {
    pub fn new(timeout: StdDuration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Load for SourceLoader {
    #[instrument(level = "info", skip(self))]
    async fn load(&self, locator: &str) -> Result<String, LoadError> {
        let t0 = Instant::now();
        let text = match classify(locator)? {
            Location::File(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| LoadError::Io {
                    locator: locator.to_string(),
                    source,
                })?,
            Location::Http(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(
                        USER_AGENT,
                        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
                    )
                    .timeout(self.timeout)
                    .send()
                    .await
                    .map_err(|source| LoadError::Http {
                        locator: locator.to_string(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        locator: locator.to_string(),
                        status,
                    });
                }
                response.text().await.map_err(|source| LoadError::Http {
                    locator: locator.to_string(),
                    source,
                })?
            }
        };

        debug!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Loaded source text"
        );
        Ok(text)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Load`] implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryLoad<T> {
    /// The loader being wrapped.
    inner: T,
    /// Retries after the first attempt before giving up.
    max_retries: usize,
    /// Delay before the first retry; doubles with each attempt.
    base_delay: StdDuration,
    /// Upper bound on the backoff delay, before jitter.
    max_delay: StdDuration,
}

impl<T> RetryLoad<T>
where
    T: Load,
{
    /// Wrap `inner`, retrying transient failures up to `max_retries` times.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let loader = RetryLoad::new(SourceLoader::new(Duration::from_secs(30)), 3, Duration::from_millis(500));
    /// let text = loader.load("https://example.com/cnn_articles.txt").await?;
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryLoad<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryLoad")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Load for RetryLoad<T>
where
    T: Load,
{
    #[instrument(level = "info", skip(self))]
    async fn load(&self, locator: &str) -> Result<String, LoadError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.load(locator).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if !e.is_transient() {
                        error!(attempt, error = %e, "load() failed permanently");
                        return Err(e);
                    }
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "load() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "load() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Raw text of one configured source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub label: String,
    pub text: String,
}

/// Load every source concurrently, keeping the configured order.
///
/// # Errors
///
/// Fails with the first [`LoadError`]; a source is never silently skipped.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn load_sources<L>(loader: &L, sources: &[SourceConfig]) -> Result<Vec<LoadedSource>, LoadError>
where
    L: Load,
{
    let loaded: Vec<LoadedSource> = stream::iter(sources)
        .map(|source| async move {
            let text = loader.load(&source.locator).await?;
            Ok::<_, LoadError>(LoadedSource {
                label: source.label.clone(),
                text,
            })
        })
        .buffered(PARALLEL_LOADS)
        .try_collect()
        .await?;

    info!(count = loaded.len(), "Loaded all sources");
    Ok(loaded)
}
