use dom_smoothie::{Config as SmoothieConfig, Readability};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::config::ReadabilitySettings;
use crate::extractor::{ExtractionError, model::ExtractedArticle};

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

pub fn scorer_config(settings: &ReadabilitySettings) -> SmoothieConfig {
    SmoothieConfig {
        char_threshold: settings.char_threshold,
        n_top_candidates: settings.n_top_candidates,
        keep_classes: settings.keep_classes,
        classes_to_preserve: settings.classes_to_preserve.clone(),
        disable_json_ld: settings.disable_json_ld,
        ..Default::default()
    }
}

/// Scores the (already normalized and tagged) document and returns the best
/// article candidate.
pub fn extract(
    html: &str,
    url: &Url,
    settings: &ReadabilitySettings,
) -> Result<ExtractedArticle, ExtractionError> {
    let mut readability = Readability::new(html, Some(url.as_str()), Some(scorer_config(settings)))
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let article = readability
        .parse()
        .map_err(|_| ExtractionError::NoArticle)?;

    let content_html = article.content.to_string();
    let text_content = article.text_content.to_string();
    if content_html.trim().is_empty() || text_content.trim().is_empty() {
        return Err(ExtractionError::NoArticle);
    }

    let site_name = article
        .site_name
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| site_name_from_title(html));

    Ok(ExtractedArticle {
        title: article.title.trim().to_string(),
        length: text_content.chars().count(),
        content_html,
        text_content,
        excerpt: non_empty(article.excerpt.clone()),
        byline: non_empty(article.byline.clone()),
        site_name,
        language: non_empty(article.lang.clone()),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The trailing part of a "Title - Site" / "Title | Site" document title.
fn site_name_from_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title = document
        .select(&TITLE_SELECTOR)
        .next()?
        .text()
        .collect::<String>();
    [" - ", " | "]
        .iter()
        .find_map(|sep| title.rfind(sep).map(|pos| title[pos + sep.len()..].trim().to_string()))
        .filter(|s| !s.is_empty())
}
