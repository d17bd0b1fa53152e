use whatlang::detect;

const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_LENGTH: usize = 50;

/// Language of an article: the page's declared `lang` when present,
/// otherwise statistical detection over the text. Declared tags come back
/// lowercased; detected languages are ISO 639-3 codes.
pub fn article_language(declared: Option<&str>, text: &str) -> Option<String> {
    if let Some(lang) = declared
        .map(|l| l.trim().to_ascii_lowercase())
        .filter(|l| !l.is_empty())
    {
        return Some(lang);
    }
    detect_language(text)
}

pub fn detect_language(text: &str) -> Option<String> {
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return None;
    }

    detect(text)
        .filter(|info| info.confidence() >= MIN_CONFIDENCE)
        .map(|info| info.lang().code().to_string())
}
