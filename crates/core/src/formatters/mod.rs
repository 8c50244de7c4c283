pub mod rss;

pub use self::rss::{RssConfig, RssFormatter, comments_block, render_rss, sanitize_cdata};
