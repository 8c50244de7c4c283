//! Mutable view over a parsed HTML tree.
//!
//! Extraction deletes nodes, strips attributes and rewrites links in place.
//! [`DomTree`] wraps the `scraper` document and edits its `ego_tree` nodes
//! directly, so serialization goes through html5ever and keeps namespaced
//! attributes, template contents and raw-text elements exactly as parsed.
//!
//! A [`NodeId`] stays valid after its node is detached, which lets candidate
//! scores live in a side table keyed by node.
//!
//! `<template>` contents sit under a fragment node in the underlying tree.
//! The accessors here look through that fragment, so a paragraph inside a
//! template reports the template element as its parent.

use html5ever::{LocalName, QualName, ns};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, StrTendril};

pub use ego_tree::NodeId;

fn attr_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}

/// A parsed document that can be edited in place
#[derive(Debug, Clone)]
pub struct DomTree {
    html: Html,
}

impl DomTree {
    pub fn new(html: Html) -> Self {
        Self { html }
    }

    /// ID of the document node.
    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.html.tree.get(id).map(|node| node.value())
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id)?.as_element()
    }

    fn with_element_mut<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut node = self.html.tree.get_mut(id)?;
        match node.value() {
            Node::Element(element) => Some(f(element)),
            _ => None,
        }
    }

    /// Local tag name if the node is an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Parent of a node, looking through template content fragments.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let mut parent = self.html.tree.get(id)?.parent()?;
        while parent.value().is_fragment() {
            parent = parent.parent()?;
        }
        Some(parent.id())
    }

    /// Children in document order, with template contents inlined.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.html.tree.get(id) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        for child in node.children() {
            if child.value().is_fragment() {
                children.extend(child.children().map(|grandchild| grandchild.id()));
            } else {
                children.push(child.id());
            }
        }
        children
    }

    /// Value of an attribute without a namespace.
    ///
    /// `attr(id, "href")` never matches `xlink:href`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: String) {
        let qualname = attr_name(name);
        self.with_element_mut(id, |element| match element.attrs.binary_search_by(|(key, _)| key.cmp(&qualname)) {
            Ok(index) => element.attrs[index].1 = StrTendril::from(value),
            Err(index) => element.attrs.insert(index, (qualname, StrTendril::from(value))),
        });
    }

    /// Remove an attribute and return its value. Absent attributes are a no-op.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let qualname = attr_name(name);
        self.with_element_mut(id, |element| {
            let index = element.attrs.binary_search_by(|(key, _)| key.cmp(&qualname)).ok()?;
            Some(element.attrs.remove(index).1.to_string())
        })
        .flatten()
    }

    /// Unlink a node (and with it its whole subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        let Some(mut node) = self.html.tree.get(id) else {
            return false;
        };
        loop {
            if node.id() == root {
                return true;
            }
            match node.parent() {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.html.tree.get(id) else {
            return Vec::new();
        };
        node.descendants()
            .skip(1)
            .filter(|descendant| !descendant.value().is_fragment())
            .map(|descendant| descendant.id())
            .collect()
    }

    /// Descendant elements of `scope` with the given tag, in document order.
    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.is_element(id, tag))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node_id| self.node(node_id)?.as_text())
            .map(|text| &**text)
            .collect()
    }

    /// Markup of the node's children, excluding the node's own tags.
    pub fn inner_html(&self, id: NodeId) -> String {
        let Some(node) = self.html.tree.get(id) else {
            return String::new();
        };
        match ElementRef::wrap(node) {
            Some(element) => element.inner_html(),
            None if node.value().is_document() => self.html.html(),
            None => String::new(),
        }
    }

    /// Markup of the node including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let Some(node) = self.html.tree.get(id) else {
            return String::new();
        };
        match ElementRef::wrap(node) {
            Some(element) => element.html(),
            None if node.value().is_document() => self.html.html(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(html: &str) -> DomTree {
        DomTree::new(Html::parse_document(html))
    }

    fn first(tree: &DomTree, tag: &str) -> NodeId {
        tree.elements_by_tag(tree.root(), tag)[0]
    }

    const SAMPLE: &str = r#"<div class="post" id="main"><p>Fish &amp; chips</p><img src="a.png"><!-- note --></div>"#;

    #[test]
    fn test_inner_and_outer_html() {
        let tree = tree(SAMPLE);
        let div = first(&tree, "div");
        assert_eq!(tree.inner_html(div), r#"<p>Fish &amp; chips</p><img src="a.png"><!-- note -->"#);
        assert_eq!(tree.outer_html(div), SAMPLE);
    }

    #[test]
    fn test_attribute_escaping() {
        let tree = tree(r#"<a title="say &quot;hi&quot; &amp; <go>">x</a>"#);
        let a = first(&tree, "a");
        assert_eq!(tree.outer_html(a), r#"<a title="say &quot;hi&quot; &amp; <go>">x</a>"#);
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let tree = tree("<style>a > b { color: red; }</style>");
        let style = first(&tree, "style");
        assert_eq!(tree.outer_html(style), "<style>a > b { color: red; }</style>");
    }

    #[test]
    fn test_namespaced_attributes_survive() {
        let mut tree = tree(r##"<div><svg><use xlink:href="#icon"></use></svg></div>"##);
        let div = first(&tree, "div");
        let icon = first(&tree, "use");

        assert_eq!(tree.attr(icon, "href"), None);
        tree.set_attr(icon, "class", "glyph".to_string());
        assert!(tree.inner_html(div).contains(r##"xlink:href="#icon""##));
        assert!(tree.inner_html(div).contains(r#"class="glyph""#));
    }

    #[test]
    fn test_template_contents_are_children() {
        let tree = tree(r#"<div id="r"><template><p>t</p></template><p>x</p></div>"#);
        let div = first(&tree, "div");
        let template = first(&tree, "template");
        let inner = first(&tree, "p");

        assert_eq!(tree.parent(inner), Some(template));
        assert_eq!(tree.children(template), vec![inner]);
        assert_eq!(tree.elements_by_tag(div, "p").len(), 2);
        assert_eq!(tree.inner_html(div), "<template><p>t</p></template><p>x</p>");
    }

    #[test]
    fn test_remove_attr_absent_is_noop() {
        let mut tree = tree(SAMPLE);
        let div = first(&tree, "div");
        assert_eq!(tree.remove_attr(div, "style"), None);
        assert_eq!(tree.remove_attr(div, "class"), Some("post".to_string()));
        assert_eq!(tree.attr(div, "class"), None);
        assert_eq!(tree.attr(div, "id"), Some("main"));
    }

    #[test]
    fn test_set_attr_replaces_value() {
        let mut tree = tree(SAMPLE);
        let div = first(&tree, "div");
        tree.set_attr(div, "id", "other".to_string());
        tree.set_attr(div, "lang", "en".to_string());
        assert_eq!(tree.attr(div, "id"), Some("other"));
        assert_eq!(tree.attr(div, "lang"), Some("en"));
        assert_eq!(tree.attr(div, "class"), Some("post"));
    }

    #[test]
    fn test_detach_removes_subtree() {
        let mut tree = tree(SAMPLE);
        let div = first(&tree, "div");
        let p = first(&tree, "p");
        tree.detach(p);

        assert!(!tree.is_attached(p));
        assert!(tree.is_attached(div));
        assert!(tree.elements_by_tag(tree.root(), "p").is_empty());
        assert!(!tree.inner_html(div).contains("Fish"));

        tree.detach(p);
        assert_eq!(tree.children(div).len(), 2);
    }

    #[test]
    fn test_descendants_document_order() {
        let tree = tree(SAMPLE);
        let div = first(&tree, "div");
        let tags: Vec<_> = tree.descendants(div).into_iter().filter_map(|id| tree.tag_name(id)).collect();
        assert_eq!(tags, vec!["p", "img"]);
        assert!(!tree.descendants(div).contains(&div));
    }

    #[test]
    fn test_text_content() {
        let tree = tree(SAMPLE);
        assert_eq!(tree.text_content(first(&tree, "div")), "Fish & chips");
    }
}
