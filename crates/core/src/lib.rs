pub mod dom_tree;
pub mod error;
pub mod extract;
pub mod links;
pub mod parse;
pub mod postprocess;
pub mod preprocess;
pub mod scoring;

#[cfg(feature = "fetch")]
pub mod cache;
#[cfg(feature = "fetch")]
pub mod feed;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "fetch")]
pub mod formatters;
#[cfg(feature = "fetch")]
pub mod upgrade;

#[doc(hidden)]
pub use dom_tree::{DomTree, NodeId};
pub use error::{FullfeedError, Result};
pub use extract::{ExtractConfig, ExtractedContent};
pub use extract::{
    extract_content, extract_content_with_config, extract_from_bytes, grab_content, grab_content_with_config,
};
pub use links::{fix_links, resolve_link};
pub use parse::Document;
#[doc(hidden)]
pub use postprocess::PostProcessConfig;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
#[doc(hidden)]
pub use scoring::{Candidate, CandidateSet, ScoreConfig, class_id_weight, collect_candidates};

#[cfg(feature = "fetch")]
pub use cache::{PageCache, cache_key, default_cache_dir};
#[cfg(feature = "fetch")]
pub use feed::{ChannelInfo, Feed, FeedEntry, HN_RSS_FEED, HN_SITE, UpgradedEntry, fetch_feed, parse_feed};
#[cfg(feature = "fetch")]
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::{build_client, decode_utf8, fetch_bytes, fetch_file, fetch_stdin, fetch_url};
#[cfg(feature = "fetch")]
pub use formatters::{RssConfig, RssFormatter, render_rss, sanitize_cdata};
#[cfg(feature = "fetch")]
pub use upgrade::{UpgradeConfig, UpgradeConfigBuilder, Upgrader, should_skip, upgrade_entries, upgrade_feed};
