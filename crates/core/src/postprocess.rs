//! Noise stripping for the selected content root.
//!
//! Runs after the content root has been chosen. Stylesheets are removed from
//! the whole document; everything else is scoped to the root's subtree.

use crate::dom_tree::{DomTree, NodeId};
use crate::preprocess::remove_elements;

/// Configuration for HTML post-processing cleanup
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Attributes removed from every element inside the content root
    pub strip_attributes: Vec<String>,
    /// A noisy-looking div is kept once its markup holds this many commas
    pub max_div_commas: usize,
    /// Tags removed from the content root unless they hold many spaces
    pub prune_tags: Vec<String>,
    /// Space count at which a prunable tag is kept
    pub min_spaces_to_keep: usize,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            strip_attributes: vec!["style".to_string(), "class".to_string()],
            max_div_commas: 10,
            prune_tags: vec!["form".to_string(), "object".to_string(), "iframe".to_string()],
            min_spaces_to_keep: 10_000,
        }
    }
}

/// Descendant tag counts used to decide whether a `<div>` is noise
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DivCounts {
    pub p: usize,
    pub img: usize,
    pub li: usize,
    pub a: usize,
    pub embed: usize,
    pub pre: usize,
    pub code: usize,
    /// Commas in the div's inner markup
    pub commas: usize,
}

impl DivCounts {
    /// Count the relevant descendants of `div`.
    pub fn of(tree: &DomTree, div: NodeId) -> Self {
        let mut counts = Self::default();
        for id in tree.descendants(div) {
            match tree.tag_name(id) {
                Some("p") => counts.p += 1,
                Some("img") => counts.img += 1,
                Some("li") => counts.li += 1,
                Some("a") => counts.a += 1,
                Some("embed") => counts.embed += 1,
                Some("pre") => counts.pre += 1,
                Some("code") => counts.code += 1,
                _ => {}
            }
        }
        counts.commas = tree.inner_html(div).matches(',').count();
        counts
    }

    /// Whether a div with these counts is link, image or list noise.
    ///
    /// Divs holding preformatted text or code are never noise.
    pub fn is_noise(&self, max_commas: usize) -> bool {
        self.commas < max_commas
            && self.pre == 0
            && self.code == 0
            && (self.img > self.p || self.li > self.p || self.a > self.p || self.p == 0 || self.embed > 0)
    }
}

/// Post-process the content root in place, in the fixed step order.
pub fn postprocess_tree(tree: &mut DomTree, root: NodeId, config: &PostProcessConfig) {
    remove_stylesheet_links(tree);
    remove_style_blocks(tree);
    strip_attributes(tree, root, &config.strip_attributes);
    kill_divs(tree, root, config.max_div_commas);
    for tag in &config.prune_tags {
        clean_tag(tree, root, tag, config.min_spaces_to_keep);
    }
}

/// Remove `<link type="text/css">` elements anywhere in the document
pub fn remove_stylesheet_links(tree: &mut DomTree) -> usize {
    let links: Vec<NodeId> = tree
        .elements_by_tag(tree.root(), "link")
        .into_iter()
        .filter(|&id| tree.attr(id, "type") == Some("text/css"))
        .collect();
    for &id in &links {
        tree.detach(id);
    }
    links.len()
}

/// Remove `<style>` elements anywhere in the document
pub fn remove_style_blocks(tree: &mut DomTree) -> usize {
    let root = tree.root();
    remove_elements(tree, root, "style")
}

/// Remove the named attributes from every descendant of `root`
pub fn strip_attributes(tree: &mut DomTree, root: NodeId, names: &[String]) {
    for id in tree.descendants(root) {
        for name in names {
            tree.remove_attr(id, name);
        }
    }
}

/// Remove divs inside `root` that look like link, image or list noise
///
/// Divs are judged in document order. Returns the number of removed divs.
pub fn kill_divs(tree: &mut DomTree, root: NodeId, max_commas: usize) -> usize {
    let mut removed = 0;
    for div in tree.elements_by_tag(root, "div") {
        if DivCounts::of(tree, div).is_noise(max_commas) {
            tree.detach(div);
            removed += 1;
        }
    }
    removed
}

/// Remove `tag` elements inside `root` whose inner markup has fewer than `min_spaces` spaces
pub fn clean_tag(tree: &mut DomTree, root: NodeId, tag: &str, min_spaces: usize) -> usize {
    let mut removed = 0;
    for id in tree.elements_by_tag(root, tag) {
        if tree.inner_html(id).matches(' ').count() < min_spaces {
            tree.detach(id);
            removed += 1;
        }
    }
    removed
}
