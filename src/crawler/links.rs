use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::crawler::LinkParseError;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Resolves one `href` against the page it was found on. Only absolute
/// http(s) results with a host are accepted; the fragment is dropped.
pub fn resolve_href(base: &Url, href: &str) -> Result<Url, LinkParseError> {
    let malformed = || LinkParseError::MalformedHref(href.to_string());

    let trimmed = href.trim();
    if trimmed.is_empty() {
        return Err(malformed());
    }
    let mut url = base.join(trimmed).map_err(|_| malformed())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(malformed());
    }
    url.set_fragment(None);
    Ok(url)
}

/// Every anchor target on the page, resolved and in document order, with
/// duplicates removed. Hrefs that fail to resolve are logged and skipped.
pub fn harvest_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match resolve_href(base, href) {
            Ok(url) => {
                if seen.insert(url.as_str().to_string()) {
                    links.push(url);
                }
            }
            Err(e) => debug!(page = %base, error = %e, "skipping link"),
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_resolves_relative_hrefs() {
        assert_eq!(
            resolve_href(&base(), "other").unwrap().as_str(),
            "https://example.com/blog/other"
        );
        assert_eq!(
            resolve_href(&base(), "/about").unwrap().as_str(),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_strips_fragment() {
        assert_eq!(
            resolve_href(&base(), "/docs#install").unwrap().as_str(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        for href in ["mailto:me@example.com", "javascript:void(0)", "ftp://example.com/f"] {
            assert_eq!(
                resolve_href(&base(), href),
                Err(LinkParseError::MalformedHref(href.to_string()))
            );
        }
    }

    #[test]
    fn test_rejects_unparseable_href() {
        assert!(resolve_href(&base(), "http://[::1").is_err());
        assert!(resolve_href(&base(), "   ").is_err());
    }

    #[test]
    fn test_harvest_dedupes_and_keeps_order() {
        let html = r##"<body>
            <a href="/b">B</a>
            <a href="/a#top">A</a>
            <a href="/b">B again</a>
            <a href="https://example.com/a">A again</a>
            <a href="mailto:x@example.com">mail</a>
            <a>no href</a>
        </body>"##;
        let links: Vec<String> = harvest_links(html, &base())
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(links, vec!["https://example.com/b", "https://example.com/a"]);
    }
}
