//! Error types for fullfeed operations.
//!
//! This module defines [`FullfeedError`], which covers every failure that can
//! occur while fetching pages, extracting content, reading the source feed
//! and maintaining the page cache.
//!
//! Almost every variant is recoverable: a single entry degrades to empty
//! content and the feed is still emitted. The exceptions are failures to
//! retrieve or parse the source feed itself, see
//! [`FullfeedError::is_recoverable`].
//!
//! # Example
//!
//! ```rust
//! use fullfeed_core::{FullfeedError, Result};
//!
//! fn first_paragraph(html: &str) -> Result<String> {
//!     if !html.contains("<p") {
//!         return Err(FullfeedError::NoContent);
//!     }
//!     // ... extraction logic
//!     # Ok(String::new())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction and feed-upgrade operations.
#[derive(Error, Debug)]
pub enum FullfeedError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} returned for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The document could not be parsed, which html5ever only reports for empty input.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The response body is not valid UTF-8.
    #[error("Invalid character encoding")]
    InvalidEncoding,

    /// No paragraph-bearing element was found in the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// The source feed could not be retrieved.
    ///
    /// This is the only failure that aborts a feed upgrade.
    #[error("Feed {url} is unavailable: {reason}")]
    FeedUnavailable { url: String, reason: String },

    /// The source feed was retrieved but is not a readable RSS document.
    #[error("Failed to parse feed: {0}")]
    FeedParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File and cache I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FullfeedError {
    /// Whether a feed upgrade can continue after this error.
    ///
    /// Per-entry failures (network, encoding, parsing, cache I/O) degrade the
    /// entry to empty content. Failing to obtain the source feed is fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::FeedUnavailable { .. } | Self::FeedParseError(_))
    }
}

/// Result type alias for FullfeedError.
pub type Result<T> = std::result::Result<T, FullfeedError>;
