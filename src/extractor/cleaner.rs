use ammonia::{Builder, UrlRelative};
use url::Url;

use crate::extractor::model::{ExtractedArticle, normalize_whitespace};
use crate::structure::{HEADING_LEVEL_ATTR, IS_QUOTE_ATTR, LIST_TYPE_ATTR, NESTING_LEVEL_ATTR};

/// Attributes kept on every tag on top of ammonia's per-tag defaults.
const GENERIC_ATTRIBUTES: &[&str] = &[
    "class",
    "id",
    HEADING_LEVEL_ATTR,
    LIST_TYPE_ATTR,
    NESTING_LEVEL_ATTR,
    IS_QUOTE_ATTR,
];

/// Sanitizes the article HTML, rewrites relative `href`/`src` against the
/// page URL, and tidies the plain text. Structure attributes pass through.
pub fn sanitize_and_resolve_links(article: &mut ExtractedArticle, base_url: &Url) {
    let mut builder = Builder::default();
    builder.add_generic_attributes(GENERIC_ATTRIBUTES);

    // ammonia pins its own `url` major version
    if let Ok(base) = ammonia::Url::parse(base_url.as_str()) {
        builder.url_relative(UrlRelative::RewriteWithBase(base));
    }

    article.content_html = builder.clean(&article.content_html).to_string();
    article.text_content = normalize_whitespace(&article.text_content);
    article.length = article.text_content.chars().count();
}
