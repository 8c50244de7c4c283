//! Main-content extraction pipeline.
//!
//! `(html, url) → normalize breaks → parse → remove scripts → collect and
//! score candidates → select root → strip noise → resolve links → serialize`.
//!
//! [`extract_content`] reports why extraction failed; [`grab_content`]
//! degrades every failure to an empty string, which is what the feed
//! upgrader embeds.

use tracing::debug;
use url::Url;

use crate::parse::Document;
use crate::postprocess::{PostProcessConfig, postprocess_tree};
use crate::preprocess::{PreprocessConfig, preprocess_html, remove_scripts};
use crate::scoring::{Candidate, CandidateSet, ScoreConfig, collect_candidates};
use crate::{FullfeedError, Result, links};

/// Configuration for content extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Pre-parse and pre-scoring cleanup
    pub preprocess: PreprocessConfig,
    /// Candidate scoring weights
    pub score: ScoreConfig,
    /// Noise stripping applied to the selected root
    pub postprocess: PostProcessConfig,
}

/// The result of content extraction
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Inner markup of the content root
    pub content: String,
    /// Score of the selected candidate
    pub top_score: i64,
    /// Number of candidates that were considered
    pub candidate_count: usize,
}

/// Select the top candidate.
///
/// The first candidate with the strictly highest score wins, so ties go to
/// the one registered earliest.
pub fn select_top_candidate(candidates: &CandidateSet) -> Result<Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates.iter() {
        if best.is_none_or(|current| candidate.score > current.score) {
            best = Some(candidate);
        }
    }
    best.copied().ok_or(FullfeedError::NoContent)
}

/// Extract the main content from an already parsed document.
///
/// The document is mutated in place. `url` is used to resolve relative
/// links; when it is not a valid absolute URL, links are left untouched.
pub fn extract_document(doc: &mut Document, url: &str, config: &ExtractConfig) -> Result<ExtractedContent> {
    if config.preprocess.remove_scripts {
        remove_scripts(doc.tree_mut());
    }

    let candidates = collect_candidates(doc.tree(), &config.score);
    let top = select_top_candidate(&candidates)?;

    let tree = doc.tree_mut();
    postprocess_tree(tree, top.node_id, &config.postprocess);

    match Url::parse(url) {
        Ok(base) => {
            links::fix_links(tree, top.node_id, &base);
        }
        Err(e) => debug!(url, error = %e, "source URL is not absolute, leaving links unresolved"),
    }

    Ok(ExtractedContent {
        content: tree.inner_html(top.node_id),
        top_score: top.score,
        candidate_count: candidates.len(),
    })
}

/// Extract content with a custom configuration
pub fn extract_content_with_config(html: &str, url: &str, config: &ExtractConfig) -> Result<ExtractedContent> {
    let html = preprocess_html(html, &config.preprocess);
    let mut doc = Document::parse(&html)?;
    extract_document(&mut doc, url, config)
}

/// Extract the main content fragment of `html`, fetched from `url`
///
/// # Errors
///
/// [`FullfeedError::NoContent`] when the page holds no paragraphs.
pub fn extract_content(html: &str, url: &str) -> Result<String> {
    extract_content_with_config(html, url, &ExtractConfig::default()).map(|extracted| extracted.content)
}

/// Extract from a raw response body, which must be UTF-8
pub fn extract_from_bytes(bytes: &[u8], url: &str) -> Result<String> {
    let html = std::str::from_utf8(bytes).map_err(|_| FullfeedError::InvalidEncoding)?;
    extract_content(html, url)
}

/// Extract the main content fragment, or an empty string on any failure.
pub fn grab_content(html: &str, url: &str) -> String {
    grab_content_with_config(html, url, &ExtractConfig::default())
}

/// [`grab_content`] with a custom configuration
pub fn grab_content_with_config(html: &str, url: &str, config: &ExtractConfig) -> String {
    match extract_content_with_config(html, url, config) {
        Ok(extracted) => extracted.content,
        Err(e) => {
            debug!(url, error = %e, "extraction yielded no content");
            String::new()
        }
    }
}
