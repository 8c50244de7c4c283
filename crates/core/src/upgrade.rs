//! Feed upgrading: replace every entry's description with the extracted
//! main content of the page it links to.
//!
//! Pages are fetched concurrently, bounded by [`UpgradeConfig::concurrency`],
//! and results come back in feed order. Every per-entry failure degrades to
//! an empty fragment; only a failure to retrieve the feed itself is fatal.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, debug_span, info, warn};
use url::Url;

use crate::cache::{PageCache, default_cache_dir};
use crate::extract::{ExtractConfig, grab_content_with_config};
use crate::feed::{Feed, FeedEntry, UpgradedEntry, fetch_feed};
use crate::fetch::{FetchConfig, build_client, decode_utf8, fetch_bytes};
use crate::formatters::render_rss;
use crate::Result;

/// Configuration for feed upgrading
#[derive(Debug, Clone)]
pub struct UpgradeConfig {
    /// Maximum number of pages fetched at once (default: 8).
    pub concurrency: usize,
    /// HTTP settings for page and feed requests.
    pub fetch: FetchConfig,
    /// Fragment cache directory, `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Extraction settings.
    pub extract: ExtractConfig,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            fetch: FetchConfig::default(),
            cache_dir: Some(default_cache_dir()),
            extract: ExtractConfig::default(),
        }
    }
}

impl UpgradeConfig {
    /// Creates a new builder for UpgradeConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fullfeed_core::UpgradeConfig;
    ///
    /// let config = UpgradeConfig::builder().concurrency(4).timeout(10).no_cache().build();
    /// assert_eq!(config.concurrency, 4);
    /// assert!(config.cache_dir.is_none());
    /// ```
    pub fn builder() -> UpgradeConfigBuilder {
        UpgradeConfigBuilder::new()
    }
}

/// Builder for UpgradeConfig.
pub struct UpgradeConfigBuilder {
    config: UpgradeConfig,
}

impl UpgradeConfigBuilder {
    pub fn new() -> Self {
        Self { config: UpgradeConfig::default() }
    }

    /// Sets the maximum number of concurrent page fetches (at least 1).
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the fragment cache directory.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = Some(dir.into());
        self
    }

    /// Disables the fragment cache.
    pub fn no_cache(mut self) -> Self {
        self.config.cache_dir = None;
        self
    }

    pub fn extract(mut self, value: ExtractConfig) -> Self {
        self.config.extract = value;
        self
    }

    pub fn build(self) -> UpgradeConfig {
        self.config
    }
}

impl Default for UpgradeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `link` should not be fetched.
///
/// Links back to the feed's own site (discussion threads, "Ask" posts) and
/// PDF documents get an empty fragment.
pub fn should_skip(link: &str, feed_url: &str) -> bool {
    if link.ends_with(".pdf") {
        return true;
    }
    match (Url::parse(link), Url::parse(feed_url)) {
        (Ok(link), Ok(feed)) => link.origin() == feed.origin(),
        _ => false,
    }
}

/// Fetches, extracts and caches page fragments for feed entries.
///
/// Shared between tasks through an [`Arc`]; one HTTP client serves every
/// request.
pub struct Upgrader {
    client: Client,
    config: UpgradeConfig,
    cache: Option<PageCache>,
}

impl Upgrader {
    pub fn new(config: UpgradeConfig) -> Result<Self> {
        let client = build_client(&config.fetch)?;
        let cache = config.cache_dir.as_ref().map(PageCache::new);
        Ok(Self { client, config, cache })
    }

    pub fn config(&self) -> &UpgradeConfig {
        &self.config
    }

    /// Produce the fragment for one link.
    ///
    /// Skipped links yield "" without any I/O. A cached fragment is returned
    /// as is. Otherwise the page is fetched and extracted, and the result is
    /// cached, including an empty one. Network failures yield "" and are not
    /// cached; a body that is not UTF-8 is treated as an empty page.
    pub async fn upgrade_link(&self, link: &str, feed_url: &str) -> String {
        if should_skip(link, feed_url) {
            debug!(link, "skipping link");
            return String::new();
        }

        if let Some(cache) = &self.cache
            && let Some(content) = cache.lookup(link).await
        {
            return content;
        }

        let bytes = match fetch_bytes(&self.client, link, &self.config.fetch).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(link, error = %e, "fetch failed");
                return String::new();
            }
        };

        let html = decode_utf8(bytes).unwrap_or_else(|e| {
            debug!(link, error = %e, "treating undecodable page as empty");
            String::new()
        });

        let url = link.to_string();
        let extract = self.config.extract.clone();
        let task = tokio::task::spawn_blocking(move || grab_content_with_config(&html, &url, &extract));
        let content = match task.await {
            Ok(content) => content,
            Err(e) => {
                warn!(link, error = %e, "extraction task failed");
                return String::new();
            }
        };

        if let Some(cache) = &self.cache
            && let Err(e) = cache.store(link, &content).await
        {
            warn!(link, error = %e, "failed to write cache entry");
        }

        content
    }

    /// Upgrade every entry, at most `concurrency` at a time.
    ///
    /// The output has one element per input entry, in input order.
    pub async fn upgrade_entries(self: &Arc<Self>, entries: Vec<FeedEntry>, feed_url: &str) -> Vec<UpgradedEntry> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut handles = Vec::with_capacity(entries.len());

        for entry in entries {
            let upgrader = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let feed_url = feed_url.to_string();
            let span = debug_span!("upgrade", link = %entry.link);
            let task_entry = entry.clone();

            let handle = tokio::spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await;
                    let content = upgrader.upgrade_link(&task_entry.link, &feed_url).await;
                    UpgradedEntry { entry: task_entry, content }
                }
                .instrument(span),
            );
            handles.push((entry, handle));
        }

        let mut upgraded = Vec::with_capacity(handles.len());
        for (entry, handle) in handles {
            match handle.await {
                Ok(result) => upgraded.push(result),
                Err(e) => {
                    warn!(link = %entry.link, error = %e, "upgrade task failed");
                    upgraded.push(UpgradedEntry { entry, content: String::new() });
                }
            }
        }
        upgraded
    }

    /// Upgrade an already parsed feed and render it as RSS.
    ///
    /// `base_url` decides which links count as the feed's own site.
    pub async fn upgrade_parsed(self: &Arc<Self>, feed: Feed, base_url: &str) -> Result<String> {
        let Feed { channel, entries } = feed;
        let total = entries.len();
        let upgraded = self.upgrade_entries(entries, base_url).await;

        let filled = upgraded.iter().filter(|u| !u.content.is_empty()).count();
        info!(total, filled, "feed upgraded");

        render_rss(&channel, &upgraded)
    }

    /// Fetch the feed at `feed_url`, upgrade it and render it as RSS.
    pub async fn upgrade_feed(self: &Arc<Self>, feed_url: &str) -> Result<String> {
        let feed = fetch_feed(feed_url, &self.config.fetch).await?;
        debug!(feed_url, entries = feed.len(), "feed fetched");
        self.upgrade_parsed(feed, feed_url).await
    }
}

/// Upgrade `entries` with a one-off [`Upgrader`].
pub async fn upgrade_entries(
    entries: Vec<FeedEntry>, feed_url: &str, config: &UpgradeConfig,
) -> Result<Vec<UpgradedEntry>> {
    let upgrader = Arc::new(Upgrader::new(config.clone())?);
    Ok(upgrader.upgrade_entries(entries, feed_url).await)
}

/// Fetch, upgrade and render the feed at `feed_url`.
///
/// # Errors
///
/// [`FullfeedError::FeedUnavailable`](crate::FullfeedError::FeedUnavailable)
/// when the feed cannot be retrieved,
/// [`FullfeedError::FeedParseError`](crate::FullfeedError::FeedParseError)
/// when it is not RSS.
pub async fn upgrade_feed(feed_url: &str, config: &UpgradeConfig) -> Result<String> {
    let upgrader = Arc::new(Upgrader::new(config.clone())?);
    upgrader.upgrade_feed(feed_url).await
}
