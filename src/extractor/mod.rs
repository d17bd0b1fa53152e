pub mod cleaner;
pub mod language;
pub mod model;
pub mod reader;
pub mod validate;

#[cfg(test)]
mod tests;

pub use model::ExtractedArticle;

use kuchiki::NodeRef;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ReadabilitySettings;
use crate::{normalize, structure};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no article found")]
    NoArticle,

    #[error("document could not be parsed: {0}")]
    Parse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("too short: {length} characters, need {min}")]
    TooShort { length: usize, min: usize },

    #[error("too few paragraphs: {found} found, need {min}")]
    TooFewParagraphs { found: usize, min: usize },
}

/// Normalize, tag, score and clean one raw page. The returned article HTML
/// carries the structure attributes the Markdown converter reads.
pub fn extract(
    raw_html: &str,
    url: &Url,
    settings: &ReadabilitySettings,
) -> Result<ExtractedArticle, ExtractionError> {
    let document = normalize::parse_document(raw_html);
    // attribute stripping drops `lang` and meta `content`, so read them first
    let head = HeadMetadata::read(&document);
    normalize::normalize(&document);
    let annotations = structure::tag(&document);
    debug!(annotated = annotations.len(), "structure tagged");

    let mut article = reader::extract(&document.to_string(), url, settings)?;
    cleaner::sanitize_and_resolve_links(&mut article, url);
    article.site_name = head.site_name.or(article.site_name);
    article.byline = article.byline.or(head.byline);
    article.excerpt = article.excerpt.or(head.description);
    article.language = language::article_language(
        head.language.as_deref().or(article.language.as_deref()),
        &article.text_content,
    );

    Ok(article)
}

/// Page-level facts declared in `<html>` and `<head>`.
#[derive(Debug, Default, PartialEq, Eq)]
struct HeadMetadata {
    language: Option<String>,
    site_name: Option<String>,
    byline: Option<String>,
    description: Option<String>,
}

impl HeadMetadata {
    fn read(document: &NodeRef) -> Self {
        let mut head = HeadMetadata {
            language: document
                .select_first("html")
                .ok()
                .and_then(|html| html.attributes.borrow().get("lang").and_then(non_blank)),
            ..Default::default()
        };

        let Ok(metas) = document.select("meta") else {
            return head;
        };
        for meta in metas {
            let attributes = meta.attributes.borrow();
            let Some(content) = attributes.get("content").and_then(non_blank) else {
                continue;
            };
            let key = attributes
                .get("property")
                .or_else(|| attributes.get("name"))
                .unwrap_or_default()
                .to_ascii_lowercase();
            let slot = match key.as_str() {
                "og:site_name" => &mut head.site_name,
                "author" | "article:author" => &mut head.byline,
                "description" | "og:description" => &mut head.description,
                _ => continue,
            };
            slot.get_or_insert(content);
        }
        head
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

