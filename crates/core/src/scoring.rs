//! Candidate collection and scoring.
//!
//! Every parent of a `<p>` element becomes a candidate. Candidates earn or
//! lose points from their `class`/`id` naming and from the paragraphs they
//! directly contain. Scores are kept in a [`CandidateSet`] keyed by
//! [`NodeId`], never on the nodes themselves.

use std::collections::HashMap;

use crate::dom_tree::{DomTree, NodeId};

/// Class/id prefixes that suggest an element does NOT contain main content
pub const NEGATIVE_KEYWORDS: &[&str] = &["comment", "meta", "footer", "footnote", "foot"];

/// Class/id prefixes that suggest an element contains main content
pub const POSITIVE_KEYWORDS: &[&str] = &["post", "hentry", "entry", "content", "text", "body", "article"];

/// Configuration for content scoring algorithm
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Added when class or id starts with a negative keyword (applied per attribute)
    pub negative_weight: i64,
    /// Added when class or id starts with a positive keyword (applied per attribute)
    pub positive_weight: i64,
    /// A paragraph whose inner markup is longer than this earns one point
    pub min_paragraph_len: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { negative_weight: -50, positive_weight: 25, min_paragraph_len: 10 }
    }
}

/// A node that encloses at least one paragraph, with its running score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub node_id: NodeId,
    pub score: i64,
}

/// Candidates in registration order, at most one per node
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    index: HashMap<NodeId, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node_id` with score 0 unless already present.
    ///
    /// Returns `true` when the node was newly registered.
    pub fn register(&mut self, node_id: NodeId) -> bool {
        if self.index.contains_key(&node_id) {
            return false;
        }
        self.index.insert(node_id, self.candidates.len());
        self.candidates.push(Candidate { node_id, score: 0 });
        true
    }

    /// Add `delta` to a registered candidate's score.
    pub fn add_score(&mut self, node_id: NodeId, delta: i64) {
        if let Some(&position) = self.index.get(&node_id)
            && let Some(candidate) = self.candidates.get_mut(position)
        {
            candidate.score += delta;
        }
    }

    pub fn get(&self, node_id: NodeId) -> Option<&Candidate> {
        self.index.get(&node_id).and_then(|&position| self.candidates.get(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Whether `value` starts with one of `keywords`.
pub fn starts_with_any(value: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| value.starts_with(keyword))
}

/// Score contribution of one naming attribute value.
fn naming_weight(value: &str, config: &ScoreConfig) -> i64 {
    let mut weight = 0;
    if starts_with_any(value, NEGATIVE_KEYWORDS) {
        weight += config.negative_weight;
    }
    if starts_with_any(value, POSITIVE_KEYWORDS) {
        weight += config.positive_weight;
    }
    weight
}

/// Calculate the class/ID weight for a newly registered candidate.
///
/// The class tokens are joined with single spaces and matched as one string;
/// the id is matched separately, so both can contribute.
pub fn class_id_weight(tree: &DomTree, node_id: NodeId, config: &ScoreConfig) -> i64 {
    let mut weight = 0;

    if let Some(class) = tree.attr(node_id, "class") {
        let joined = class.split_whitespace().collect::<Vec<_>>().join(" ");
        weight += naming_weight(&joined, config);
    }

    if let Some(id) = tree.attr(node_id, "id") {
        weight += naming_weight(id, config);
    }

    weight
}

/// Points a paragraph contributes to its parent, computed from its inner markup.
///
/// One point for markup longer than `min_paragraph_len` characters, plus one
/// point per comma.
pub fn paragraph_score(inner_html: &str, config: &ScoreConfig) -> i64 {
    let length_bonus = i64::from(inner_html.chars().count() > config.min_paragraph_len);
    let commas = inner_html.matches(',').count() as i64;
    length_bonus + commas
}

/// Build and score the candidate set for a document.
///
/// Paragraphs are visited in document order, so candidates are registered in
/// the order their first paragraph appears.
pub fn collect_candidates(tree: &DomTree, config: &ScoreConfig) -> CandidateSet {
    let mut candidates = CandidateSet::new();

    for paragraph in tree.elements_by_tag(tree.root(), "p") {
        let Some(parent) = tree.parent(paragraph) else {
            continue;
        };

        if candidates.register(parent) {
            candidates.add_score(parent, class_id_weight(tree, parent, config));
        }

        let inner = tree.inner_html(paragraph);
        candidates.add_score(parent, paragraph_score(&inner, config));
    }

    candidates
}
