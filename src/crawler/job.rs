use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::DEFAULT_MAX_PAGES;
use crate::crawler::{JobError, PageError, PagePipeline, PageRecord, links::harvest_links};
use crate::fetcher::PageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
}

/// State of one crawl. Built per request and consumed by [`CrawlJob::run`];
/// never shared between requests.
#[derive(Debug)]
pub struct CrawlJob {
    start_url: Url,
    max_pages: usize,
    visited: HashSet<String>,
    queue: VecDeque<String>,
    results: Vec<PageRecord>,
    state: CrawlState,
}

impl CrawlJob {
    pub fn new(start_url: &str, max_pages: usize) -> Result<Self, JobError> {
        let invalid = |reason: &str| JobError::InvalidStartUrl {
            url: start_url.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(start_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if max_pages == 0 {
            return Err(JobError::InvalidMaxPages);
        }
        url.set_fragment(None);

        Ok(Self {
            queue: VecDeque::from([url.to_string()]),
            start_url: url,
            max_pages,
            visited: HashSet::new(),
            results: Vec::new(),
            state: CrawlState::Idle,
        })
    }

    pub fn with_default_limit(start_url: &str) -> Result<Self, JobError> {
        Self::new(start_url, DEFAULT_MAX_PAGES)
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn results(&self) -> &[PageRecord] {
        &self.results
    }

    pub fn into_results(self) -> Vec<PageRecord> {
        self.results
    }

    /// Crawls breadth-first, one URL at a time, until the queue drains or
    /// `max_pages` records exist. Per-URL failures are logged and skipped.
    #[instrument(skip_all, fields(start_url = %self.start_url, max_pages = self.max_pages))]
    pub async fn run(&mut self, source: &dyn PageSource, pipeline: &PagePipeline) -> &[PageRecord] {
        self.state = CrawlState::Running;
        info!("crawl started");

        while self.results.len() < self.max_pages {
            let Some(url) = self.queue.pop_front() else {
                break;
            };
            if !self.visited.insert(url.clone()) {
                continue;
            }

            let response = match source.fetch(&url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, kind = ?e.kind(), error = %e, "skipping page");
                    continue;
                }
            };

            // a redirect target counts as seen too
            let final_url = response.url_final.to_string();
            if final_url != url {
                self.visited.insert(final_url);
            }

            match pipeline.process(&response.body_utf8, &response.url_final) {
                Ok(record) => {
                    debug!(url = %record.url, chars = record.length, "page recorded");
                    self.results.push(record);
                }
                Err(e) => log_page_error(&url, &e),
            }

            self.enqueue_links(&response.body_utf8, &response.url_final);
        }

        self.state = CrawlState::Completed;
        info!(
            pages = self.results.len(),
            visited = self.visited.len(),
            "crawl completed"
        );
        &self.results
    }

    fn enqueue_links(&mut self, html: &str, page_url: &Url) {
        let budget = self.max_pages.saturating_sub(self.results.len());
        if budget == 0 {
            return;
        }

        let start_host = self.start_url.host_str();
        let mut added = 0;
        for link in harvest_links(html, page_url) {
            if added == budget {
                break;
            }
            if link.host_str() != start_host {
                continue;
            }
            let link = String::from(link);
            if self.visited.contains(&link) || self.queue.contains(&link) {
                continue;
            }
            self.queue.push_back(link);
            added += 1;
        }
        debug!(page = %page_url, added, queued = self.queue.len(), "links enqueued");
    }
}

fn log_page_error(url: &str, error: &PageError) {
    match error {
        PageError::Fetch(e) => warn!(url, kind = ?e.kind(), error = %e, "skipping page"),
        PageError::Extraction(e) => info!(url, error = %e, "no article on page"),
        PageError::Validation(e) => info!(url, error = %e, "page rejected"),
    }
}
