use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

use crate::fetcher::errors::FetchError;

#[derive(Debug, Clone)]
pub struct PageResponse {
    /// URL after redirects; links on the page resolve against it.
    pub url_final: Url,
    pub status: StatusCode,
    pub encoding: &'static encoding_rs::Encoding,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}

/// Anything that can hand the crawler the HTML of a page.
///
/// A source is created for one crawl job and dropped when the job ends.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError>;
}
