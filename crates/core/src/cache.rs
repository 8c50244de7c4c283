//! On-disk cache of extracted page fragments.
//!
//! One file per URL, named by [`cache_key`]. Entries never expire; an empty
//! file is a valid entry and means "extraction produced nothing".

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Result;

/// Directory name used when no platform cache directory is available
pub const FALLBACK_CACHE_DIR: &str = "upgraded";

/// Derive a filesystem-safe cache key from a URL.
///
/// Every ASCII punctuation character becomes `_`; everything else is kept.
/// Distinct URLs can collide (`a-b` and `a.b`), which is accepted.
pub fn cache_key(url: &str) -> String {
    url.chars().map(|c| if c.is_ascii_punctuation() { '_' } else { c }).collect()
}

/// Default cache location: `<platform cache dir>/fullfeed/upgraded`.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("fullfeed").join(FALLBACK_CACHE_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

/// A directory of cached fragments keyed by URL
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    /// Look up the cached fragment for `url`.
    ///
    /// Missing or unreadable entries are misses.
    pub async fn lookup(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(url, path = %path.display(), "cache hit");
                Some(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(url, path = %path.display(), error = %e, "unreadable cache entry, refetching");
                None
            }
        }
    }

    /// Store `content` for `url`, creating the directory if needed and
    /// overwriting any previous entry.
    pub async fn store(&self, url: &str, content: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.entry_path(url), content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://a.b/c?d=1", "https___a_b_c_d_1")]
    #[case("http://example.com/~user/page#top", "http___example_com__user_page_top")]
    #[case("https://x.com/naïve", "https___x_com_naïve")]
    #[case("plain", "plain")]
    fn test_cache_key(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(cache_key(url), expected);
    }

    #[test]
    fn test_cache_key_collisions_accepted() {
        assert_eq!(cache_key("https://a.b/x-y"), cache_key("https://a.b/x.y"));
    }

    #[test]
    fn test_default_cache_dir_ends_with_upgraded() {
        assert!(default_cache_dir().ends_with(FALLBACK_CACHE_DIR));
    }

    #[tokio::test]
    async fn test_store_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("nested").join("cache"));
        let url = "https://example.com/story?id=1";

        assert_eq!(cache.lookup(url).await, None);

        cache.store(url, "<p>Fragment</p>").await.unwrap();
        assert_eq!(cache.lookup(url).await.as_deref(), Some("<p>Fragment</p>"));
        assert!(cache.entry_path(url).ends_with("https___example_com_story_id_1"));

        cache.store(url, "").await.unwrap();
        assert_eq!(cache.lookup(url).await.as_deref(), Some(""));
    }
}
