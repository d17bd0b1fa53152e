use url::Url;

use crate::config::{ReadabilitySettings, ValidationSettings};
use crate::extractor::{ExtractionError, HeadMetadata, extract, validate::validate};
use crate::normalize::parse_document;

fn article_page() -> String {
    let paragraph = "Rust gives you control over memory layout without giving up safety, and the borrow checker catches whole classes of bugs before the program ever runs. ";
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Ownership Explained - Field Notes</title>
  <meta property="og:site_name" content="Field Notes">
  <style>body {{ color: red; }}</style>
</head>
<body>
  <nav class="site-nav"><a href="/">Home</a><a href="/about">About</a></nav>
  <div class="cookie-notice">We use cookies. Accept?</div>
  <article>
    <h1>Ownership Explained</h1>
    <p>{p1}</p>
    <h2>Borrowing</h2>
    <p>{p2} See the <a href="/related">related post</a> for details.</p>
    <p style="display: none">Hidden tracking text that must never appear.</p>
    <ul><li>Moves transfer ownership</li><li>Borrows lend it<ul><li>Shared or exclusive</li></ul></li></ul>
    <img src="/images/diagram.png" alt="Diagram">
    <p>{p3}</p>
  </article>
  <div class="share-buttons">Share this on every network</div>
  <footer>Copyright Field Notes</footer>
  <script>trackPageView();</script>
</body>
</html>"#,
        p1 = paragraph.repeat(3),
        p2 = paragraph.repeat(2),
        p3 = paragraph.repeat(3),
    )
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_extract_article() {
    let result = extract(
        &article_page(),
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    );
    let article = result.expect("article should be extracted");

    assert!(article.title.contains("Ownership Explained"));
    assert_eq!(article.site_name.as_deref(), Some("Field Notes"));
    assert!(article.text_content.contains("borrow checker"));
    assert!(!article.content_html.contains("<script"));
    assert!(!article.content_html.contains("<style"));
    assert!(!article.content_html.contains("site-nav"));
    assert!(!article.content_html.contains("cookie"));
    assert!(!article.text_content.contains("Hidden tracking text"));
    assert!(!article.text_content.contains("every network"));
    assert_eq!(article.length, article.text_content.chars().count());
}

#[test]
fn test_extract_resolves_relative_links() {
    let article = extract(
        &article_page(),
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    )
    .unwrap();

    assert!(article.content_html.contains("https://example.com/related"));
    assert!(article.content_html.contains("https://example.com/images/diagram.png"));
}

#[test]
fn test_head_metadata_reads_declared_facts() {
    let document = parse_document(
        r#"<html lang="de"><head>
            <meta property="og:site_name" content=" Field Notes ">
            <meta name="author" content="Ada Byte">
            <meta name="description" content="First">
            <meta property="og:description" content="Second">
            <meta name="viewport" content="width=device-width">
        </head><body></body></html>"#,
    );
    let head = HeadMetadata::read(&document);
    assert_eq!(
        head,
        HeadMetadata {
            language: Some("de".to_string()),
            site_name: Some("Field Notes".to_string()),
            byline: Some("Ada Byte".to_string()),
            description: Some("First".to_string()),
        }
    );
}

#[test]
fn test_head_metadata_skips_blank_content() {
    let document = parse_document(
        r#"<html lang=" "><head><meta name="author" content="  "></head></html>"#,
    );
    assert_eq!(HeadMetadata::read(&document), HeadMetadata::default());
}

#[test]
fn test_extract_reads_site_name_and_byline_from_head() {
    let page = article_page()
        .replace(
            "<title>Ownership Explained - Field Notes</title>",
            "<title>Ownership Explained</title>",
        )
        .replace(
            r#"<meta property="og:site_name" content="Field Notes">"#,
            r#"<meta property="og:site_name" content="Field Notes"><meta name="author" content="Ada Byte">"#,
        );
    let article = extract(
        &page,
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    )
    .unwrap();

    assert_eq!(article.site_name.as_deref(), Some("Field Notes"));
    assert_eq!(article.byline.as_deref(), Some("Ada Byte"));
}

#[test]
fn test_extract_uses_declared_language() {
    let article = extract(
        &article_page(),
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    )
    .unwrap();

    assert_eq!(article.language.as_deref(), Some("en"));
}

#[test]
fn test_extracted_article_passes_validation() {
    let article = extract(
        &article_page(),
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    )
    .unwrap();

    assert_eq!(validate(&article, &ValidationSettings::default()), Ok(()));
}

#[test]
fn test_extracted_article_converts_to_markdown() {
    let article = extract(
        &article_page(),
        &url("https://example.com/posts/ownership"),
        &ReadabilitySettings::default(),
    )
    .unwrap();

    let markdown = crate::markdown::convert(&article.content_html);
    assert!(markdown.contains("## Borrowing"));
    assert!(markdown.contains("- Moves transfer ownership"));
    assert!(markdown.contains("  - Shared or exclusive"));
    assert!(markdown.contains("[related post][1]"));
    assert!(markdown.contains("[1]: https://example.com/related"));
    assert!(!markdown.contains("<p"));
}

#[test]
fn test_boilerplate_only_page_has_no_article() {
    let html = r#"<html><head><title>Menu</title></head><body>
        <nav><a href="/a">A</a><a href="/b">B</a></nav>
        <header>Site header</header>
        <footer>Footer text</footer>
    </body></html>"#;

    let result = extract(html, &url("https://example.com/menu"), &ReadabilitySettings::default());
    assert!(matches!(result, Err(ExtractionError::NoArticle)));
}

#[test]
fn test_malformed_html_is_tolerated() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let result = extract(html, &url("https://example.com/broken"), &ReadabilitySettings::default());

    if let Ok(article) = result {
        assert!(article.text_content.contains("Unclosed tags"));
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            path in "[a-z]{0,12}"
        ) {
            let page = url(&format!("https://example.com/{path}"));
            let _ = extract(&html, &page, &ReadabilitySettings::default());
        }

        #[test]
        fn test_convert_is_deterministic(html in ".*") {
            prop_assert_eq!(crate::markdown::convert(&html), crate::markdown::convert(&html));
        }
    }
}
