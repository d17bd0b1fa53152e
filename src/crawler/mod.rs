//! Breadth-first, same-host crawl producing one Markdown record per page.

pub mod job;
pub mod links;
pub mod pipeline;

pub use job::{CrawlJob, CrawlState};
pub use pipeline::PagePipeline;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extractor::{ExtractionError, ValidationError};
use crate::fetcher::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub markdown: String,
    /// Character count of `markdown`.
    pub length: usize,
}

impl PageRecord {
    pub fn new(url: String, title: String, markdown: String) -> Self {
        let length = markdown.chars().count();
        Self {
            url,
            title,
            markdown,
            length,
        }
    }
}

/// Fatal; raised before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("invalid start url {url}: {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("max_pages must be positive")]
    InvalidMaxPages,
}

/// Why one URL produced no record. The crawl continues past all of these.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkParseError {
    #[error("malformed href: {0:?}")]
    MalformedHref(String),
}
