//! Page and feed fetching from URLs, files, and stdin.
//!
//! Bodies are returned as raw bytes; callers decide how to treat content
//! that is not UTF-8 (see [`decode_utf8`]).

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{FullfeedError, Result};

/// HTTP client configuration for fetching pages and feeds.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; fullfeed/0.1; RSS full-text upgrader)".to_string() }
    }
}

impl FetchConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Build a client that can be shared across many requests.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(FullfeedError::HttpError)
}

/// Parse and validate an HTTP(S) URL.
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed_url = Url::parse(url).map_err(|e| FullfeedError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed_url.scheme() {
        "http" | "https" => Ok(parsed_url),
        other => Err(FullfeedError::InvalidUrl(format!("{url}: unsupported scheme {other}"))),
    }
}

/// Fetch the raw body of `url`.
///
/// Follows redirects and applies the configured timeout to the whole
/// request, body included. Any non-2xx status is an error.
pub async fn fetch_bytes(client: &Client, url: &str, config: &FetchConfig) -> Result<Vec<u8>> {
    let parsed_url = parse_http_url(url)?;
    let map_timeout = |e: reqwest::Error| {
        if e.is_timeout() { FullfeedError::Timeout { timeout: config.timeout } } else { FullfeedError::HttpError(e) }
    };

    let response = client
        .get(parsed_url)
        .timeout(config.timeout_duration())
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(map_timeout)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FullfeedError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let body = response.bytes().await.map_err(map_timeout)?;
    Ok(body.to_vec())
}

/// Fetch `url` and decode it as UTF-8 text.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    let bytes = fetch_bytes(&client, url, config).await?;
    decode_utf8(bytes)
}

/// Strictly decode a body as UTF-8.
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| FullfeedError::InvalidEncoding)
}

/// Reads a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<Vec<u8>> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(FullfeedError::FileNotFound(path_buf))
    } else {
        fs::read(&path_buf).map_err(FullfeedError::from)
    }
}

/// Reads all of standard input until EOF.
pub fn fetch_stdin() -> Result<Vec<u8>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).map_err(FullfeedError::from)?;

    Ok(buffer)
}
