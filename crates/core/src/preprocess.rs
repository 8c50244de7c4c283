use std::sync::LazyLock;

use regex::Regex;

use crate::dom_tree::{DomTree, NodeId};

/// Two `<br>` tags separated only by whitespace
static DOUBLE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br */? *>[ \r\n]*<br */? *>").expect("double break pattern is valid"));

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to turn `<br><br>` runs into paragraph breaks before parsing
    pub normalize_breaks: bool,
    /// Whether to remove script elements before scoring
    pub remove_scripts: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { normalize_breaks: true, remove_scripts: true }
    }
}

/// Preprocess raw HTML text before it is parsed
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    if config.normalize_breaks { normalize_breaks(html) } else { html.to_string() }
}

/// Replace every double line break with a paragraph boundary.
///
/// Pages that separate paragraphs with `<br><br>` instead of `<p>` would
/// otherwise expose a single giant text node and never register as
/// candidates.
pub fn normalize_breaks(html: &str) -> String {
    DOUBLE_BREAK.replace_all(html, "</p><p>").into_owned()
}

/// Remove every `<script>` element from the whole document.
///
/// Returns the number of removed elements.
pub fn remove_scripts(tree: &mut DomTree) -> usize {
    let root = tree.root();
    remove_elements(tree, root, "script")
}

/// Detach every descendant of `scope` with the given tag.
pub(crate) fn remove_elements(tree: &mut DomTree, scope: NodeId, tag: &str) -> usize {
    let targets = tree.elements_by_tag(scope, tag);
    for &id in &targets {
        tree.detach(id);
    }
    targets.len()
}
