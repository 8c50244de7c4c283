//! Library API integration tests
use fullfeed_core::*;

const ARTICLE_URL: &str = "https://blog.example.com/posts/rust-feeds";

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_extract_article_fixture() {
    let html = read_fixture("article.html");
    let content = extract_content(&html, ARTICLE_URL).expect("should extract");

    assert!(content.contains("<h1>Why Rust Fits Feed Tooling</h1>"));
    assert!(content.contains("Feed readers, scrapers, and aggregators"));
    assert!(content.contains("deterministic, testable, and cacheable"));
}

#[test]
fn test_comments_and_footer_not_selected() {
    let content = grab_content(&read_fixture("article.html"), ARTICLE_URL);

    assert!(!content.contains("Great post"));
    assert!(!content.contains("Copyright 2024"));
    assert!(!content.contains("About"));
}

#[test]
fn test_noise_stripped_from_article() {
    let content = grab_content(&read_fixture("article.html"), ARTICLE_URL);

    assert!(!content.contains("Tweet"));
    assert!(!content.contains("Subscribe"));
    assert!(!content.contains("trackRead"));
    assert!(!content.contains("class="));
    assert!(!content.contains("style="));
    assert!(content.contains("<pre><code>let fragment = grab_content(&amp;html, url);</code></pre>"));
}

#[test]
fn test_article_links_resolved() {
    let content = grab_content(&read_fixture("article.html"), ARTICLE_URL);

    assert!(content.contains(r#"href="https://blog.example.com/guides/links""#));
    assert!(content.contains(r#"src="https://blog.example.com/posts/images/diagram.png""#));
}

#[test]
fn test_extraction_details() {
    let result = extract_content_with_config(&read_fixture("article.html"), ARTICLE_URL, &ExtractConfig::default())
        .expect("should extract");

    assert_eq!(result.top_score, 25 + (1 + 4) + (1 + 3) + (1 + 3));
    assert_eq!(result.candidate_count, 3);
}

#[test]
fn test_article_content_beats_comment_sibling() {
    let html = r#"
        <html><body>
        <div class="article-content" style="margin: 0">
            <p class="lead">First, the setup, in brief.</p>
            <p style="color: red">Second, the details, with <a href="/more">a link</a>.</p>
            <p>Third, the caveats, and limits.</p>
            <p>Fourth, the numbers, as measured.</p>
            <p>Fifth, the summary, to close.</p>
        </div>
        <div class="comment">
            <p>Nice, article, thanks, for, writing, this, up, really, great.</p>
        </div>
        </body></html>
    "#;

    let result = extract_content_with_config(html, ARTICLE_URL, &ExtractConfig::default()).expect("should extract");
    let content = &result.content;

    assert_eq!(result.candidate_count, 2);
    assert!(content.contains("<p>First, the setup, in brief.</p>"));
    assert!(content.contains("Fifth, the summary, to close."));
    assert!(content.contains(r#"<a href="https://blog.example.com/more">a link</a>"#));
    assert!(!content.contains("Nice, article"));
    assert!(!content.contains("class="));
    assert!(!content.contains("style="));
}

#[test]
fn test_no_paragraphs_fixture() {
    let html = read_fixture("no_paragraphs.html");

    assert_eq!(grab_content(&html, ARTICLE_URL), "");
    assert!(matches!(extract_content(&html, ARTICLE_URL), Err(FullfeedError::NoContent)));
}

#[test]
fn test_extraction_is_idempotent_per_input() {
    let html = read_fixture("article.html");
    assert_eq!(grab_content(&html, ARTICLE_URL), grab_content(&html, ARTICLE_URL));
}

#[test]
fn test_custom_score_config() {
    let html = r#"
        <div class="post"><p>Short one.</p></div>
        <div id="plain"><p>Lots, of, commas, here, to, win.</p></div>
    "#;

    assert_eq!(grab_content(html, ARTICLE_URL), "<p>Short one.</p>");

    let config = ExtractConfig { score: ScoreConfig { positive_weight: 0, ..Default::default() }, ..Default::default() };
    assert_eq!(grab_content_with_config(html, ARTICLE_URL, &config), "<p>Lots, of, commas, here, to, win.</p>");
}

#[test]
fn test_parse_feed_fixture() {
    let feed = parse_feed(read_fixture("hn_feed.xml").as_bytes()).expect("should parse");

    assert_eq!(feed.channel.title, "Hacker News");
    assert_eq!(feed.len(), 3);
    assert_eq!(feed.entries[1].title, "Parsing & Scoring: A Survey [pdf]");
    assert!(feed.entries.iter().all(|entry| should_skip(&entry.link, HN_RSS_FEED)));
}

#[test]
fn test_render_fixture_feed() {
    let feed = parse_feed(read_fixture("hn_feed.xml").as_bytes()).unwrap();
    let upgraded: Vec<_> = feed
        .entries
        .iter()
        .cloned()
        .map(|entry| UpgradedEntry { entry, content: "<p>Body]]></p>".to_string() })
        .collect();

    let xml = render_rss(&feed.channel, &upgraded).unwrap();

    assert_eq!(xml.matches("<item>").count(), 3);
    assert_eq!(xml.matches("<p>Body</p>").count(), 3);
    assert!(xml.contains("<title>Parsing &amp; Scoring: A Survey [pdf]</title>"));
}
