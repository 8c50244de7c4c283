//! Source feed reading.
//!
//! Only the fields the upgrader needs are kept: the channel header and, per
//! item, its title, link and comments URL.

use tracing::warn;

use crate::fetch::{FetchConfig, build_client, fetch_bytes};
use crate::{FullfeedError, Result};

/// The Hacker News front-page feed
pub const HN_RSS_FEED: &str = "https://news.ycombinator.com/rss";

/// Site links of the Hacker News feed point back to
pub const HN_SITE: &str = "https://news.ycombinator.com/";

/// Channel header of the source feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// One story from the source feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// The story's target URL
    pub link: String,
    /// URL of the discussion page
    pub comments: String,
}

/// A feed entry paired with its extracted fragment ("" when nothing was extracted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradedEntry {
    pub entry: FeedEntry,
    pub content: String,
}

/// A parsed source feed
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub channel: ChannelInfo,
    /// Entries in feed order
    pub entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse an RSS document.
///
/// Items without a link are dropped. A missing title or comments URL becomes
/// an empty string.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed> {
    let channel = rss::Channel::read_from(bytes).map_err(|e| FullfeedError::FeedParseError(e.to_string()))?;

    let entries = channel
        .items()
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let Some(link) = item.link() else {
                warn!(position, title = item.title().unwrap_or_default(), "dropping feed item without a link");
                return None;
            };
            Some(FeedEntry {
                title: item.title().unwrap_or_default().to_string(),
                link: link.to_string(),
                comments: item.comments().unwrap_or_default().to_string(),
            })
        })
        .collect();

    Ok(Feed {
        channel: ChannelInfo {
            title: channel.title().to_string(),
            link: channel.link().to_string(),
            description: channel.description().to_string(),
        },
        entries,
    })
}

/// Fetch and parse the feed at `url`.
///
/// Any failure to retrieve the document is reported as
/// [`FullfeedError::FeedUnavailable`].
pub async fn fetch_feed(url: &str, config: &FetchConfig) -> Result<Feed> {
    let unavailable = |e: FullfeedError| FullfeedError::FeedUnavailable { url: url.to_string(), reason: e.to_string() };

    let client = build_client(config).map_err(unavailable)?;
    let bytes = fetch_bytes(&client, url, config).await.map_err(unavailable)?;
    parse_feed(&bytes)
}
