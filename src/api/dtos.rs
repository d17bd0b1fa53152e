use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sink::StoredPage;

const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    pub url: String,
    pub max_pages: Option<usize>,
    pub folder: Option<String>,
}

impl CrawlRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LENGTH {
            return Err("URL too long".to_string());
        }
        if self.folder.as_ref().is_some_and(|f| f.trim().is_empty()) {
            return Err("Folder cannot be blank".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageListResponse {
    pub pages: Vec<StoredPage>,
}

#[derive(Debug, Deserialize)]
pub struct MovePageRequest {
    pub folder: String,
}

impl MovePageRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.folder.trim().is_empty() {
            return Err("Folder cannot be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub title: Option<String>,
    pub page_ids: Vec<Uuid>,
}

impl ExportRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.page_ids.is_empty() {
            return Err("At least one page is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_request_valid() {
        let request = CrawlRequest {
            url: "https://example.com".to_string(),
            max_pages: Some(3),
            folder: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_crawl_request_empty_url() {
        let request = CrawlRequest {
            url: "  ".to_string(),
            max_pages: None,
            folder: None,
        };
        assert_eq!(request.validate().unwrap_err(), "URL cannot be empty");
    }

    #[test]
    fn test_crawl_request_url_too_long() {
        let request = CrawlRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
            max_pages: None,
            folder: None,
        };
        assert_eq!(request.validate().unwrap_err(), "URL too long");
    }

    #[test]
    fn test_move_request_blank_folder() {
        let request = MovePageRequest {
            folder: " ".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_export_request_needs_pages() {
        let request = ExportRequest {
            title: None,
            page_ids: vec![],
        };
        assert!(request.validate().is_err());
    }
}
