//! Relative link resolution inside the content root.

use url::Url;

use crate::dom_tree::{DomTree, NodeId};

/// Attributes holding URLs that get resolved against the source page
pub const LINK_ATTRIBUTES: &[&str] = &["href", "src"];

/// Resolve `value` against `base`.
///
/// Values that already parse as absolute URLs are returned verbatim. `None`
/// means the value cannot be joined and should be left as it is.
pub fn resolve_link(base: &Url, value: &str) -> Option<String> {
    if Url::parse(value).is_ok() {
        return Some(value.to_string());
    }
    base.join(value).ok().map(String::from)
}

/// Rewrite every `href`/`src` under `root` to an absolute URL.
///
/// Returns the number of attributes that changed.
pub fn fix_links(tree: &mut DomTree, root: NodeId, base: &Url) -> usize {
    let mut changed = 0;
    for id in tree.descendants(root) {
        for &name in LINK_ATTRIBUTES {
            let Some(value) = tree.attr(id, name) else {
                continue;
            };
            if let Some(resolved) = resolve_link(base, value)
                && resolved != value
            {
                tree.set_attr(id, name, resolved);
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b", "https://x.com/a/b")]
    #[case("https://other.com/c", "https://other.com/c")]
    #[case("//cdn.com/d", "https://cdn.com/d")]
    #[case("img/c.png", "https://x.com/y/img/c.png")]
    #[case("../up", "https://x.com/up")]
    #[case("?page=2", "https://x.com/y/?page=2")]
    #[case("#notes", "https://x.com/y/#notes")]
    #[case("mailto:someone@example.com", "mailto:someone@example.com")]
    #[case("https://other.com", "https://other.com")]
    fn test_resolve_link(#[case] value: &str, #[case] expected: &str) {
        let base = Url::parse("https://x.com/y/").unwrap();
        assert_eq!(resolve_link(&base, value).as_deref(), Some(expected));
    }

    #[test]
    fn test_fix_links_in_root_only() {
        let html = r#"
            <a href="/outside">Outside</a>
            <div id="root">
                <p><a href="/inside">In</a> and <img src="pic.png"></p>
                <a href="https://abs.example/page">Abs</a>
            </div>
        "#;
        let mut doc = Document::parse(html).unwrap();
        let root = doc.select_tag("div")[0];
        let base = Url::parse("https://news.example/story/1").unwrap();

        let changed = fix_links(doc.tree_mut(), root, &base);
        let inner = doc.tree().inner_html(root);

        assert_eq!(changed, 2);
        assert!(inner.contains(r#"href="https://news.example/inside""#));
        assert!(inner.contains(r#"src="https://news.example/story/pic.png""#));
        assert!(inner.contains(r#"href="https://abs.example/page""#));

        let outside = doc.select_tag("a")[0];
        assert_eq!(doc.tree().attr(outside, "href"), Some("/outside"));
    }

    #[test]
    fn test_fix_links_ignores_namespaced_href() {
        let html = r##"<div id="root"><a href="/doc">Doc</a><svg><use xlink:href="#icon"></use></svg></div>"##;
        let mut doc = Document::parse(html).unwrap();
        let root = doc.select_tag("div")[0];
        let base = Url::parse("https://x.com/y/").unwrap();

        assert_eq!(fix_links(doc.tree_mut(), root, &base), 1);
        let inner = doc.tree().inner_html(root);
        assert!(inner.contains(r##"<use xlink:href="#icon"></use>"##));
        assert!(!inner.contains("https://x.com/y/#icon"));
    }
}
