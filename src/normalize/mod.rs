//! DOM normalization: prunes invisible, empty and boilerplate nodes from a
//! parsed page before structure tagging and content scoring.
//!
//! Each [`Pass`] is independent and idempotent. [`normalize`] runs them in
//! the fixed order of [`PIPELINE`].

pub mod denylist;

use std::sync::LazyLock;

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use regex::Regex;
use tracing::{debug, warn};

pub use denylist::{BOILERPLATE, BoilerplateRule};

/// Attributes that survive [`Pass::DisallowedAttributes`].
pub const ALLOWED_ATTRIBUTES: &[&str] = &["src", "href", "alt", "title", "class", "id"];

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden)\s*(?:!important)?\s*(?:;|$)")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    HiddenElements,
    EmptyContainers,
    FragmentAnchors,
    Boilerplate,
    DisallowedAttributes,
}

/// Visibility and emptiness pruning come first so the denylist never scans
/// subtrees that are already gone. The denylist runs before attribute
/// stripping because some of its rules match on `role` and `data-*`.
pub const PIPELINE: [Pass; 5] = [
    Pass::HiddenElements,
    Pass::EmptyContainers,
    Pass::FragmentAnchors,
    Pass::Boilerplate,
    Pass::DisallowedAttributes,
];

impl Pass {
    pub fn name(self) -> &'static str {
        match self {
            Self::HiddenElements => "hidden-elements",
            Self::EmptyContainers => "empty-containers",
            Self::FragmentAnchors => "fragment-anchors",
            Self::Boilerplate => "boilerplate",
            Self::DisallowedAttributes => "disallowed-attributes",
        }
    }

    /// Runs the pass over `document` and returns how many nodes (or, for
    /// attribute stripping, attributes) it removed.
    pub fn apply(self, document: &NodeRef) -> usize {
        match self {
            Self::HiddenElements => remove_hidden(document),
            Self::EmptyContainers => remove_empty_containers(document),
            Self::FragmentAnchors => remove_fragment_anchors(document),
            Self::Boilerplate => remove_boilerplate(document),
            Self::DisallowedAttributes => strip_attributes(document),
        }
    }
}

pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

pub fn normalize(document: &NodeRef) {
    for pass in PIPELINE {
        let removed = pass.apply(document);
        debug!(pass = pass.name(), removed, "normalization pass finished");
    }
}

/// Collects matches up front so callers can detach while walking.
pub(crate) fn select_nodes(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match root.select(selector) {
        Ok(matches) => matches.map(|m| m.as_node().clone()).collect(),
        Err(()) => {
            warn!(selector, "skipping unparseable selector");
            Vec::new()
        }
    }
}

pub(crate) fn element_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|e| e.name.local.to_string())
}

pub(crate) fn attribute(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

fn has_ancestor(node: &NodeRef, tag: &str) -> bool {
    node.ancestors()
        .any(|a| a.as_element().is_some_and(|e| &*e.name.local == tag))
}

fn is_hidden(node: &NodeRef) -> bool {
    let Some(element) = node.as_element() else {
        return false;
    };
    let attributes = element.attributes.borrow();
    attributes.contains("hidden")
        || attributes
            .get("style")
            .is_some_and(|style| HIDDEN_STYLE.is_match(style))
}

fn remove_hidden(document: &NodeRef) -> usize {
    let hidden: Vec<NodeRef> = document.descendants().filter(is_hidden).collect();
    for node in &hidden {
        node.detach();
    }
    hidden.len()
}

fn remove_empty_containers(document: &NodeRef) -> usize {
    let mut removed = 0;
    for node in select_nodes(document, "p, div, span") {
        if node.text_contents().trim().is_empty() {
            node.detach();
            removed += 1;
        }
    }
    removed
}

fn remove_fragment_anchors(document: &NodeRef) -> usize {
    let mut removed = 0;
    for node in select_nodes(document, "a[href]") {
        if attribute(&node, "href").is_some_and(|href| href.trim_start().starts_with('#')) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

fn remove_boilerplate(document: &NodeRef) -> usize {
    let mut removed = 0;
    for rule in BOILERPLATE {
        for node in select_nodes(document, rule.selector) {
            if rule.exempt_in_article && has_ancestor(&node, "article") {
                continue;
            }
            node.detach();
            removed += 1;
        }
    }
    removed
}

fn strip_attributes(document: &NodeRef) -> usize {
    let mut removed = 0;
    for node in document.inclusive_descendants() {
        let Some(element) = node.as_element() else {
            continue;
        };
        let mut attributes = element.attributes.borrow_mut();
        let before = attributes.map.len();
        attributes
            .map
            .retain(|name, _| ALLOWED_ATTRIBUTES.contains(&&*name.local));
        removed += before - attributes.map.len();
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_html(document: &NodeRef) -> String {
        document
            .select_first("body")
            .map(|b| b.as_node().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_hidden_elements_removed() {
        let doc = parse_document(
            r#"<body><p>Visible text</p><p style="display: none">Gone</p><div style="color:red; visibility:hidden">Gone too</div><p hidden>Hidden attr</p></body>"#,
        );
        assert_eq!(Pass::HiddenElements.apply(&doc), 3);
        let text = doc.text_contents();
        assert!(text.contains("Visible text"));
        assert!(!text.contains("Gone"));
        assert!(!text.contains("Hidden attr"));
    }

    #[test]
    fn test_visible_style_kept() {
        let doc = parse_document(r#"<body><p style="display: block">Shown</p></body>"#);
        assert_eq!(Pass::HiddenElements.apply(&doc), 0);
        assert!(doc.text_contents().contains("Shown"));
    }

    #[test]
    fn test_empty_containers_removed() {
        let doc = parse_document(
            "<body><div>  </div><p>\n</p><span></span><p>Keep me</p><section></section></body>",
        );
        assert_eq!(Pass::EmptyContainers.apply(&doc), 3);
        let html = body_html(&doc);
        assert!(html.contains("<p>Keep me</p>"));
        // only p, div and span are containers for this pass
        assert!(html.contains("<section>"));
    }

    #[test]
    fn test_fragment_anchors_removed() {
        let doc = parse_document(
            "<body><p><a href=\"#top\">Back to top</a> <a href=\"/page#part\">Elsewhere</a></p></body>",
        );
        assert_eq!(Pass::FragmentAnchors.apply(&doc), 1);
        let html = body_html(&doc);
        assert!(!html.contains("Back to top"));
        assert!(html.contains("/page#part"));
    }

    #[test]
    fn test_attributes_outside_allowlist_stripped() {
        let doc = parse_document(
            r#"<body><a href="/x" onclick="evil()" class="link" data-track="1" title="t">x</a><img src="a.png" alt="a" width="10" style="border:0"></body>"#,
        );
        assert_eq!(Pass::DisallowedAttributes.apply(&doc), 4);
        let html = body_html(&doc);
        assert!(html.contains(r#"href="/x""#));
        assert!(html.contains(r#"class="link""#));
        assert!(html.contains(r#"title="t""#));
        assert!(html.contains(r#"alt="a""#));
        assert!(!html.contains("onclick"));
        assert!(!html.contains("data-track"));
        assert!(!html.contains("width"));
        assert!(!html.contains("style"));
    }

    #[test]
    fn test_boilerplate_respects_article_scope() {
        let doc = parse_document(
            r#"<body>
                <nav>Site nav</nav>
                <header class="masthead">Site header</header>
                <article>
                    <header>Article header</header>
                    <nav>Table of contents</nav>
                    <p>Body text</p>
                    <div class="ad">Inline ad</div>
                    <footer>Article footer</footer>
                </article>
                <footer>Site footer</footer>
                <div class="author-bio">Site bio</div>
            </body>"#,
        );
        Pass::Boilerplate.apply(&doc);
        let text = doc.text_contents();
        assert!(!text.contains("Site nav"));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Site footer"));
        assert!(!text.contains("Site bio"));
        assert!(!text.contains("Inline ad"));
        assert!(text.contains("Article header"));
        assert!(text.contains("Table of contents"));
        assert!(text.contains("Article footer"));
        assert!(text.contains("Body text"));
    }

    #[test]
    fn test_boilerplate_matches_role_and_data_attributes() {
        let doc = parse_document(
            r#"<body><div role="navigation">Menu</div><div data-tracking="x">Pixel</div><p>Story</p></body>"#,
        );
        normalize(&doc);
        let text = doc.text_contents();
        assert!(!text.contains("Menu"));
        assert!(!text.contains("Pixel"));
        assert!(text.contains("Story"));
    }

    #[test]
    fn test_denylist_selectors_all_parse() {
        let doc = parse_document("<body></body>");
        for rule in BOILERPLATE {
            assert!(doc.select(rule.selector).is_ok(), "bad selector {}", rule.selector);
        }
    }

    #[test]
    fn test_denylist_completeness() {
        let mut html = String::from("<body>");
        for (i, rule) in BOILERPLATE.iter().enumerate() {
            let element = match rule.selector {
                "script" => "<script>var x = 1;</script>".to_string(),
                "style" => "<style>p{}</style>".to_string(),
                "iframe" => "<iframe src=\"/frame\"></iframe>".to_string(),
                "nav" | "header" | "footer" => {
                    format!("<{0}>chrome {i}</{0}>", rule.selector)
                }
                s if s.starts_with('.') => format!("<div class=\"{}\">item {i}</div>", &s[1..]),
                s if s.starts_with('#') => format!("<div id=\"{}\">item {i}</div>", &s[1..]),
                "[id*=\"ad-\"]" => format!("<div id=\"top-ad-slot\">item {i}</div>"),
                "[class*=\"ad-\"]" => format!("<div class=\"ad-banner\">item {i}</div>"),
                "[id*=\"google\"]" => format!("<div id=\"google-box\">item {i}</div>"),
                "[class*=\"google\"]" => format!("<div class=\"googlead\">item {i}</div>"),
                s => {
                    // [role="..."] and [data-...]
                    let attr = s.trim_start_matches('[').trim_end_matches(']');
                    format!("<div {attr}>item {i}</div>")
                }
            };
            html.push_str(&element);
        }
        html.push_str("<article><header>kept header</header><div class=\"author-bio\">kept bio</div><p>article body text</p></article></body>");

        let doc = parse_document(&html);
        normalize(&doc);

        for rule in BOILERPLATE {
            let leftovers: Vec<_> = select_nodes(&doc, rule.selector)
                .into_iter()
                .filter(|n| !has_ancestor(n, "article"))
                .collect();
            assert!(leftovers.is_empty(), "{} survived", rule.selector);
        }
        let text = doc.text_contents();
        assert!(text.contains("kept header"));
        assert!(text.contains("kept bio"));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let html = r##"<body><nav>nav</nav><article><h1 style="color:red">Title</h1><p>Para <a href="#x">x</a> one</p><div></div><ul><li class="ad">Ad</li><li>Item</li></ul></article></body>"##;
        let doc = parse_document(html);
        normalize(&doc);
        let once = doc.to_string();
        normalize(&doc);
        assert_eq!(once, doc.to_string());
    }
}
