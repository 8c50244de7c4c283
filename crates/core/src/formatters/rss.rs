//! RSS 2.0 output for upgraded feeds.
//!
//! Each item keeps the source title, link and comments URL. Its description
//! is a CDATA block wrapping the extracted fragment between two links to the
//! discussion page.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::feed::{ChannelInfo, UpgradedEntry};
use crate::{FullfeedError, Result};

const CDATA_END: &str = "]]>";

/// Configuration for RSS output
#[derive(Debug, Clone)]
pub struct RssConfig {
    /// Spaces per nesting level, 0 for compact output
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration
    pub xml_declaration: bool,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self { indent: 2, xml_declaration: true }
    }
}

/// Remove every `]]>` so the fragment can sit inside a CDATA section.
///
/// Removal repeats until none is left, since deleting one occurrence can
/// join its neighbours into a new one (`]]]]>>`).
pub fn sanitize_cdata(content: &str) -> String {
    let mut sanitized = content.replace(CDATA_END, "");
    while sanitized.contains(CDATA_END) {
        sanitized = sanitized.replace(CDATA_END, "");
    }
    sanitized
}

/// The item description payload: the fragment framed by comments links.
pub fn comments_block(comments: &str, content: &str) -> String {
    format!(r#"<a href="{comments}">Comments</a><br/>{content}<br/><a href="{comments}">Comments</a>"#)
}

fn xml_error(e: impl std::error::Error + Send + Sync + 'static) -> FullfeedError {
    FullfeedError::Io(std::io::Error::other(e))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_error)?;
    let escaped: Cow<'_, str> = partial_escape(text);
    writer.write_event(Event::Text(BytesText::from_escaped(escaped))).map_err(xml_error)?;
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)?;
    Ok(())
}

fn write_item(writer: &mut Writer<Vec<u8>>, upgraded: &UpgradedEntry) -> Result<()> {
    let entry = &upgraded.entry;
    writer.write_event(Event::Start(BytesStart::new("item"))).map_err(xml_error)?;
    write_text_element(writer, "title", &entry.title)?;
    write_text_element(writer, "link", &entry.link)?;
    write_text_element(writer, "comments", &entry.comments)?;

    let payload = sanitize_cdata(&comments_block(&entry.comments, &upgraded.content));
    writer.write_event(Event::Start(BytesStart::new("description"))).map_err(xml_error)?;
    writer.write_event(Event::CData(BytesCData::new(payload))).map_err(xml_error)?;
    writer.write_event(Event::End(BytesEnd::new("description"))).map_err(xml_error)?;

    writer.write_event(Event::End(BytesEnd::new("item"))).map_err(xml_error)?;
    Ok(())
}

/// Render a channel and its upgraded entries as an RSS 2.0 document.
pub fn render_rss_with_config(
    channel: &ChannelInfo, entries: &[UpgradedEntry], config: &RssConfig,
) -> Result<String> {
    let mut writer = if config.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', config.indent)
    } else {
        Writer::new(Vec::new())
    };

    if config.xml_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None))).map_err(xml_error)?;
    }

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start)).map_err(xml_error)?;
    writer.write_event(Event::Start(BytesStart::new("channel"))).map_err(xml_error)?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;

    for upgraded in entries {
        write_item(&mut writer, upgraded)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel"))).map_err(xml_error)?;
    writer.write_event(Event::End(BytesEnd::new("rss"))).map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(|_| FullfeedError::InvalidEncoding)
}

/// Render with the default configuration
pub fn render_rss(channel: &ChannelInfo, entries: &[UpgradedEntry]) -> Result<String> {
    render_rss_with_config(channel, entries, &RssConfig::default())
}

pub struct RssFormatter {
    config: RssConfig,
}

impl RssFormatter {
    pub fn new(config: RssConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, channel: &ChannelInfo, entries: &[UpgradedEntry]) -> Result<String> {
        render_rss_with_config(channel, entries, &self.config)
    }
}

impl Default for RssFormatter {
    fn default() -> Self {
        Self::new(RssConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedEntry;

    fn channel() -> ChannelInfo {
        ChannelInfo {
            title: "Hacker News".to_string(),
            link: "https://news.ycombinator.com/".to_string(),
            description: "Links for the intellectually curious, ranked by readers.".to_string(),
        }
    }

    fn upgraded(title: &str, link: &str, comments: &str, content: &str) -> UpgradedEntry {
        UpgradedEntry {
            entry: FeedEntry { title: title.to_string(), link: link.to_string(), comments: comments.to_string() },
            content: content.to_string(),
        }
    }

    #[test]
    fn test_sanitize_cdata() {
        assert_eq!(sanitize_cdata("a]]>b"), "ab");
        assert_eq!(sanitize_cdata("]]]]>>"), "");
        assert_eq!(sanitize_cdata("x ]]]]>>> y"), "x > y");
        assert_eq!(sanitize_cdata("<p>fine]] > ok</p>"), "<p>fine]] > ok</p>");
    }

    #[test]
    fn test_comments_block() {
        assert_eq!(
            comments_block("https://hn/item?id=1", "<p>Body</p>"),
            r#"<a href="https://hn/item?id=1">Comments</a><br/><p>Body</p><br/><a href="https://hn/item?id=1">Comments</a>"#
        );
    }

    #[test]
    fn test_render_escapes_text_fields() {
        let entries =
            [upgraded("A & B <i>", "https://a.com/?x=1&y=2", "https://news.ycombinator.com/item?id=1", "")];
        let xml = render_rss(&channel(), &entries).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert!(xml.contains("<title>A &amp; B &lt;i&gt;</title>"));
        assert!(xml.contains("<link>https://a.com/?x=1&amp;y=2</link>"));
        assert!(xml.contains("<comments>https://news.ycombinator.com/item?id=1</comments>"));
    }

    #[test]
    fn test_render_description_cdata() {
        let entries = [upgraded("T", "https://a.com/", "https://hn/c", "<p>Text ]]> more</p>")];
        let xml = render_rss(&channel(), &entries).unwrap();

        assert!(xml.contains(
            r#"<![CDATA[<a href="https://hn/c">Comments</a><br/><p>Text  more</p><br/><a href="https://hn/c">Comments</a>]]>"#
        ));
    }

    #[test]
    fn test_render_preserves_order_and_parses() {
        let entries = [
            upgraded("First", "https://a.com/1", "https://hn/1", "<p>One</p>"),
            upgraded("Second", "https://a.com/2", "https://hn/2", ""),
        ];
        let xml = render_rss(&channel(), &entries).unwrap();

        let parsed = ::rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(parsed.title(), "Hacker News");
        let titles: Vec<_> = parsed.items().iter().filter_map(|item| item.title()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(
            parsed.items()[1].description().map(str::trim),
            Some(r#"<a href="https://hn/2">Comments</a><br/><br/><a href="https://hn/2">Comments</a>"#)
        );
    }

    #[test]
    fn test_compact_without_declaration() {
        let formatter = RssFormatter::new(RssConfig { indent: 0, xml_declaration: false });
        let xml = formatter.format(&channel(), &[]).unwrap();
        assert!(xml.starts_with(r#"<rss version="2.0"><channel><title>Hacker News</title>"#));
        assert!(xml.ends_with("</channel></rss>"));
    }
}
