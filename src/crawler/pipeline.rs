use tracing::{debug, instrument};
use url::Url;

use crate::config::{Config, ReadabilitySettings, ValidationSettings};
use crate::crawler::{PageError, PageRecord};
use crate::extractor::{self, validate::validate};
use crate::markdown;

const UNTITLED: &str = "Untitled Page";

/// Per-page processing after the fetch: normalize, tag, extract, clean,
/// validate, convert.
#[derive(Debug, Clone, Default)]
pub struct PagePipeline {
    pub readability: ReadabilitySettings,
    pub validation: ValidationSettings,
}

impl PagePipeline {
    pub fn new(readability: ReadabilitySettings, validation: ValidationSettings) -> Self {
        Self {
            readability,
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.readability.clone(), config.validation)
    }

    #[instrument(skip_all, fields(url = %url))]
    pub fn process(&self, html: &str, url: &Url) -> Result<PageRecord, PageError> {
        let article = extractor::extract(html, url, &self.readability)?;
        validate(&article, &self.validation)?;

        let markdown = markdown::convert(&article.content_html);
        let title = if article.title.trim().is_empty() {
            title_from_url(url)
        } else {
            article.title.trim().to_string()
        };
        debug!(title = %title, chars = markdown.chars().count(), "page converted");

        Ok(PageRecord::new(url.to_string(), title, markdown))
    }
}

/// Last non-empty path segment, or a fixed placeholder.
fn title_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}
