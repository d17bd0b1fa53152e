//! Bundling stored pages into an e-book. Only the seam lives here; the
//! API answers 501 when no packager is configured.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EPUB_CONTENT_TYPE: &str = "application/epub+zip";

/// One chapter of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub markdown: String,
}

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("nothing to package")]
    Empty,

    #[error("packaging failed: {0}")]
    Failed(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait Packager: Send + Sync {
    fn package(&self, title: &str, sections: &[Section]) -> Result<Vec<u8>, PackagingError>;
}
