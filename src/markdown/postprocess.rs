use regex::Regex;
use std::sync::LazyLock;

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static WHITESPACE_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s+\n").unwrap());

static SETEXT_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([^#\n][^\n]+)\n={3,}$").unwrap());

static SETEXT_H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([^#\n][^\n]+)\n-{3,}$").unwrap());

/// Final tidy-up of rendered Markdown. Steps run once, in this order.
pub fn postprocess(markdown: &str) -> String {
    let text = EXCESS_NEWLINES.replace_all(markdown, "\n\n");
    let text = WHITESPACE_LINES.replace_all(&text, "\n\n");
    let text = SETEXT_H1.replace_all(&text, "# ${1}");
    let text = SETEXT_H2.replace_all(&text, "## ${1}");
    text.trim().to_string()
}
