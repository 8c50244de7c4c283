//! HTML parsing into the mutable document model.
//!
//! Parsing is delegated to `scraper` (html5ever), which recovers from any
//! malformed markup the way a browser does. The only input rejected is an
//! empty document.
//!
//! # Example
//!
//! ```rust
//! use fullfeed_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body><p class="content">Paragraph</p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! assert_eq!(doc.select_tag("p").len(), 1);
//! ```

use scraper::Html;

use crate::dom_tree::{DomTree, NodeId};
use crate::{FullfeedError, Result};

/// A parsed, mutable HTML document.
///
/// # Example
///
/// ```rust
/// use fullfeed_core::parse::Document;
///
/// let doc = Document::parse("<p>Hello</p>").unwrap();
/// let p = doc.select_tag("p")[0];
/// assert_eq!(doc.tree().inner_html(p), "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Errors
    ///
    /// [`FullfeedError::HtmlParseError`] when the input holds nothing but
    /// whitespace.
    pub fn parse(html: &str) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(FullfeedError::HtmlParseError("document is empty".to_string()));
        }
        Ok(Self { tree: DomTree::new(Html::parse_document(html)) })
    }

    /// The underlying tree.
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Mutable access to the tree.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// All elements with the given tag name, in document order.
    pub fn select_tag(&self, tag: &str) -> Vec<NodeId> {
        self.tree.elements_by_tag(self.tree.root(), tag)
    }

    /// Gets the content of the first `<title>` element.
    pub fn title(&self) -> Option<String> {
        let title = self.select_tag("title").into_iter().next()?;
        Some(self.tree.text_content(title).trim().to_string())
    }

    /// Serializes the entire document.
    pub fn as_string(&self) -> String {
        self.tree.inner_html(self.tree.root())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.tree.text_content(self.tree.root())
    }
}
