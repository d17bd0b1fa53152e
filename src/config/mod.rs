//! Configuration handling for the crawler and the API server.
//!
//! Every heuristic threshold used by the pipeline lives here as a named,
//! overridable value. `Config::from_env` reads overrides from environment
//! variables and falls back to the defaults below.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_MAX_PAGES: &str = "WEBMARK_MAX_PAGES";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "WEBMARK_FETCH_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "WEBMARK_USER_AGENT";
pub const ENV_CHAR_THRESHOLD: &str = "WEBMARK_CHAR_THRESHOLD";
pub const ENV_TOP_CANDIDATES: &str = "WEBMARK_TOP_CANDIDATES";
pub const ENV_MIN_CONTENT_LENGTH: &str = "WEBMARK_MIN_CONTENT_LENGTH";
pub const ENV_MIN_PARAGRAPH_CHARS: &str = "WEBMARK_MIN_PARAGRAPH_CHARS";
pub const ENV_MIN_PARAGRAPHS: &str = "WEBMARK_MIN_PARAGRAPHS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Classes the readability scorer must never strip, regardless of density.
pub const PRESERVED_CLASSES: &[&str] = &[
    "code",
    "prettyprint",
    "highlight",
    "language-*",
    "math",
    "theorem",
    "table",
    "figure",
    "katex",
    "mermaid",
    "markdown-structure",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_body_size: u64,
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_size: 5 * 1024 * 1024,
            max_redirects: 10,
        }
    }
}

/// Knobs handed to the readability scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadabilitySettings {
    /// Minimum characters a candidate needs before it is considered.
    pub char_threshold: usize,
    /// How many top-scoring candidates are compared before picking one.
    pub n_top_candidates: usize,
    pub keep_classes: bool,
    pub classes_to_preserve: Vec<String>,
    pub disable_json_ld: bool,
}

impl Default for ReadabilitySettings {
    fn default() -> Self {
        Self {
            char_threshold: 100,
            n_top_candidates: 5,
            keep_classes: true,
            classes_to_preserve: PRESERVED_CLASSES.iter().map(|c| c.to_string()).collect(),
            disable_json_ld: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Minimum length of the article HTML, in characters.
    pub min_content_length: usize,
    /// A paragraph counts only when its trimmed text is longer than this.
    pub min_paragraph_chars: usize,
    pub min_paragraphs: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            min_paragraph_chars: 20,
            min_paragraphs: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    pub max_pages: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    pub crawl: CrawlSettings,
    pub fetch: FetchSettings,
    pub readability: ReadabilitySettings,
    pub validation: ValidationSettings,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr);

        let max_pages = parse_var(ENV_MAX_PAGES, "max_pages", defaults.crawl.max_pages)?;
        if max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_pages",
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = parse_var(
            ENV_FETCH_TIMEOUT_SECS,
            "fetch_timeout_secs",
            defaults.fetch.timeout.as_secs(),
        )?;
        let user_agent = env::var(ENV_USER_AGENT).unwrap_or(defaults.fetch.user_agent);

        let readability = ReadabilitySettings {
            char_threshold: parse_var(
                ENV_CHAR_THRESHOLD,
                "char_threshold",
                defaults.readability.char_threshold,
            )?,
            n_top_candidates: parse_var(
                ENV_TOP_CANDIDATES,
                "n_top_candidates",
                defaults.readability.n_top_candidates,
            )?,
            ..defaults.readability
        };

        let validation = ValidationSettings {
            min_content_length: parse_var(
                ENV_MIN_CONTENT_LENGTH,
                "min_content_length",
                defaults.validation.min_content_length,
            )?,
            min_paragraph_chars: parse_var(
                ENV_MIN_PARAGRAPH_CHARS,
                "min_paragraph_chars",
                defaults.validation.min_paragraph_chars,
            )?,
            min_paragraphs: parse_var(
                ENV_MIN_PARAGRAPHS,
                "min_paragraphs",
                defaults.validation.min_paragraphs,
            )?,
        };

        Ok(Self {
            bind_addr,
            crawl: CrawlSettings { max_pages },
            fetch: FetchSettings {
                timeout: Duration::from_secs(timeout_secs),
                user_agent,
                ..defaults.fetch
            },
            readability,
            validation,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            crawl: CrawlSettings::default(),
            fetch: FetchSettings::default(),
            readability: ReadabilitySettings::default(),
            validation: ValidationSettings::default(),
        }
    }
}

fn parse_var<T>(key: &str, field: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: format!("{raw:?}: {e}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
