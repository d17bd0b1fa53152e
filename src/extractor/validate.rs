use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::ValidationSettings;
use crate::extractor::{ValidationError, model::ExtractedArticle};

static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Rejects articles whose HTML is too short or which carry too few real
/// paragraphs. Length is checked first.
pub fn validate(
    article: &ExtractedArticle,
    settings: &ValidationSettings,
) -> Result<(), ValidationError> {
    let length = article.content_html.chars().count();
    if length < settings.min_content_length {
        return Err(ValidationError::TooShort {
            length,
            min: settings.min_content_length,
        });
    }

    let found = meaningful_paragraphs(&article.content_html, settings.min_paragraph_chars);
    if found < settings.min_paragraphs {
        return Err(ValidationError::TooFewParagraphs {
            found,
            min: settings.min_paragraphs,
        });
    }

    Ok(())
}

fn meaningful_paragraphs(html: &str, min_chars: usize) -> usize {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&PARAGRAPH_SELECTOR)
        .filter(|p| p.text().collect::<String>().trim().chars().count() > min_chars)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(html: String) -> ExtractedArticle {
        ExtractedArticle {
            title: "Title".to_string(),
            content_html: html,
            text_content: String::new(),
            length: 0,
            excerpt: None,
            byline: None,
            site_name: None,
            language: None,
        }
    }

    /// Pads `html` with a trailing empty-text div until it is `len` chars long.
    fn padded(html: &str, len: usize) -> String {
        let shell = "<div></div>";
        let pad = len - html.chars().count() - shell.len();
        format!("{html}<div>{}</div>", " ".repeat(pad))
    }

    #[test]
    fn test_rejects_99_characters() {
        let html = padded("<p>abcdefghijklmnopqrstuvwxyz</p><p>abcdefghijklmnopqrstuvwxyz</p>", 99);
        assert_eq!(html.chars().count(), 99);
        let result = validate(&article(html), &ValidationSettings::default());
        assert_eq!(result, Err(ValidationError::TooShort { length: 99, min: 100 }));
    }

    #[test]
    fn test_accepts_two_paragraphs_of_21_chars() {
        let para = "a".repeat(21);
        let html = padded(&format!("<p>  {para}  </p><p>{para}</p>"), 100);
        assert_eq!(html.chars().count(), 100);
        assert_eq!(validate(&article(html), &ValidationSettings::default()), Ok(()));
    }

    #[test]
    fn test_rejects_single_qualifying_paragraph() {
        let html = padded(
            &format!("<p>{}</p><p>{}</p>", "b".repeat(40), "c".repeat(20)),
            150,
        );
        assert_eq!(html.chars().count(), 150);
        assert_eq!(
            validate(&article(html), &ValidationSettings::default()),
            Err(ValidationError::TooFewParagraphs { found: 1, min: 2 })
        );
    }

    #[test]
    fn test_length_checked_before_paragraphs() {
        let result = validate(&article("<p>x</p>".to_string()), &ValidationSettings::default());
        assert!(matches!(result, Err(ValidationError::TooShort { .. })));
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let settings = ValidationSettings {
            min_content_length: 10,
            min_paragraph_chars: 2,
            min_paragraphs: 1,
        };
        assert_eq!(validate(&article("<p>short one</p>".to_string()), &settings), Ok(()));
    }
}
